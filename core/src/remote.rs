//! The remote side of the item collection, as seen by the store.
//!
//! `ItemRemote` is the contract the store depends on. `RemoteItemClient` is
//! the production implementation: build with `ItemClient`, execute with a
//! `Transport`, parse with `ItemClient`. It keeps no state between calls.

use tracing::debug;

use crate::client::ItemClient;
use crate::error::ApiError;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Item, ItemDraft, ItemId};

/// Create/read/delete access to the remote item collection.
pub trait ItemRemote {
    fn list(&self) -> Result<Vec<Item>, ApiError>;

    fn get(&self, id: ItemId) -> Result<Item, ApiError>;

    /// The returned item carries the server-assigned id.
    fn create(&self, draft: &ItemDraft) -> Result<Item, ApiError>;

    fn delete(&self, id: ItemId) -> Result<(), ApiError>;
}

/// One HTTP round trip per call against a fixed base URL.
#[derive(Clone)]
pub struct RemoteItemClient<T = UreqTransport> {
    client: ItemClient,
    transport: T,
}

impl RemoteItemClient<UreqTransport> {
    /// Client over the default blocking transport.
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }
}

impl<T: Transport> RemoteItemClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: ItemClient::new(base_url),
            transport,
        }
    }

    pub fn client(&self) -> &ItemClient {
        &self.client
    }
}

impl<T: Transport> ItemRemote for RemoteItemClient<T> {
    fn list(&self) -> Result<Vec<Item>, ApiError> {
        let response = self.transport.execute(self.client.build_list_items())?;
        let items = self.client.parse_list_items(response)?;
        debug!(count = items.len(), "listed items");
        Ok(items)
    }

    fn get(&self, id: ItemId) -> Result<Item, ApiError> {
        let response = self.transport.execute(self.client.build_get_item(id))?;
        self.client.parse_get_item(response)
    }

    fn create(&self, draft: &ItemDraft) -> Result<Item, ApiError> {
        let request = self.client.build_create_item(draft)?;
        let response = self.transport.execute(request)?;
        let item = self.client.parse_create_item(response)?;
        debug!(id = item.id, "created item");
        Ok(item)
    }

    fn delete(&self, id: ItemId) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_delete_item(id))?;
        self.client.parse_delete_item(response)?;
        debug!(id, "deleted item");
        Ok(())
    }
}
