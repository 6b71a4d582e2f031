//! Item synchronization client for the item service.
//!
//! # Overview
//! Keeps a local, ordered item collection consistent with the remote
//! collection through list/create/delete calls. Requests are built and
//! responses parsed as plain data (host-does-IO pattern); a `Transport`
//! performs the actual round trip.
//!
//! # Design
//! - `ItemClient` is stateless — it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `RemoteItemClient` pairs an `ItemClient` with a `Transport` and is the
//!   `ItemRemote` the store talks to. Tests swap in scripted remotes.
//! - `ItemStore` mutates its collection only after the remote call
//!   succeeds, and returns every outcome as a `Result`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod remote;
pub mod store;
pub mod transport;
pub mod types;

pub use client::{ItemClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use remote::{ItemRemote, RemoteItemClient};
pub use store::ItemStore;
pub use transport::{Transport, UreqTransport};
pub use types::{Item, ItemDraft, ItemId};
