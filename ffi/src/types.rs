//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. An absent item description is a
//! null pointer. Conversion functions live here to keep `lib.rs` focused on
//! the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use item_core::{ApiError, HttpMethod, Item, ItemClient, ItemStore, RemoteItemClient};

/// Opaque handle to an `ItemClient` (build/parse only, no I/O).
pub struct FfiItemClient {
    pub(crate) inner: ItemClient,
}

/// Opaque handle to an `ItemStore` that performs its own HTTP I/O.
pub struct FfiItemStore {
    pub(crate) inner: ItemStore<RemoteItemClient>,
}

/// Move `s` into a C string owned by the caller. Interior NULs are dropped.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Delete = 2,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `item_build_*` functions. The C caller executes the request
/// and passes the response back through `item_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: item_core::HttpRequest) -> *mut Self {
        let path = into_c_string(req.path);
        let body = match req.body {
            Some(b) => into_c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: into_c_string(k),
                    value: into_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to an `item_parse_*` function. The FFI layer reads
/// but does not free these fields. A null `body` reads as empty.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiItemResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Http = 2,
    Transport = 3,
    Decode = 4,
    Encode = 5,
    InvalidDraft = 6,
    Panic = 7,
    NullArg = 8,
}

/// Tag that tells `item_free_result` what `FfiItemResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Item = 1,
    ItemList = 2,
}

/// A single item exposed to C. `description` is null when absent.
#[repr(C)]
pub struct FfiItem {
    pub id: i64,
    pub name: *mut c_char,
    pub description: *mut c_char,
}

impl FfiItem {
    fn from_core(item: Item) -> Self {
        FfiItem {
            id: item.id,
            name: into_c_string(item.name),
            description: item.description.map_or(std::ptr::null_mut(), into_c_string),
        }
    }
}

/// A list of items exposed to C.
#[repr(C)]
pub struct FfiItemList {
    pub items: *mut FfiItem,
    pub len: u32,
}

/// Result envelope for parse and store operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, `http_status` is set when the server answered,
/// and `data` is null.
#[repr(C)]
pub struct FfiItemResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiItemResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        http_status: u16,
        data_tag: FfiDataTag,
        data: *mut c_void,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiItemResult {
            error_code,
            error_message,
            http_status,
            data_tag,
            data,
        }))
    }

    /// Build a success result carrying a single `FfiItem`.
    pub(crate) fn ok_item(item: Item) -> *mut Self {
        let ffi_item = Box::new(FfiItem::from_core(item));
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            FfiDataTag::Item,
            Box::into_raw(ffi_item) as *mut c_void,
        )
    }

    /// Build a success result carrying an `FfiItemList`.
    pub(crate) fn ok_item_list(items: Vec<Item>) -> *mut Self {
        let len = items.len() as u32;
        let ptr = if items.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_items: Box<[FfiItem]> = items.into_iter().map(FfiItem::from_core).collect();
            Box::into_raw(ffi_items) as *mut FfiItem
        };

        let ffi_list = Box::new(FfiItemList { items: ptr, len });
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            FfiDataTag::ItemList,
            Box::into_raw(ffi_list) as *mut c_void,
        )
    }

    /// Build a success result with no data payload (e.g. delete).
    pub(crate) fn ok_empty() -> *mut Self {
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let error_code = match &err {
            e if e.is_not_found() => FfiErrorCode::NotFound,
            ApiError::HttpError { .. } => FfiErrorCode::Http,
            ApiError::TransportError(_) => FfiErrorCode::Transport,
            ApiError::DecodeError(_) => FfiErrorCode::Decode,
            ApiError::EncodeError(_) => FfiErrorCode::Encode,
            ApiError::InvalidDraft(_) => FfiErrorCode::InvalidDraft,
        };
        let http_status = err.status().unwrap_or(0);
        Self::boxed(
            error_code,
            into_c_string(err.to_string()),
            http_status,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            into_c_string(format!("null argument: {name}")),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Panic,
            into_c_string(msg.to_string()),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }
}
