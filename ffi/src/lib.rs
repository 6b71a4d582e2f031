//! C-ABI wrapper around `item-core`.
//!
//! # Overview
//! Exposes the item API to any language with a C FFI (the Swift host in
//! particular) in two flavours:
//! - a client handle whose `build_*` / `parse_*` functions leave the HTTP
//!   round trip to the host,
//! - a store handle that performs its own I/O and keeps the session's item
//!   collection, loading flag and error message.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - A single `FfiItemResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `item_free_*` function to release them.
//! - A store handle must not be used from two threads at once.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use item_core::{HttpResponse, ItemDraft, ItemStore, RemoteItemClient};

use types::*;

/// Copy a nullable C string. Invalid UTF-8 is replaced, not rejected.
fn read_c_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `ItemClient` bound to `base_url` (e.g. `http://host:8000/api`).
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `item_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn item_client_new(base_url: *const c_char) -> *mut FfiItemClient {
    catch_unwind(|| match read_c_str(base_url) {
        Some(url) => Box::into_raw(Box::new(FfiItemClient {
            inner: item_core::ItemClient::new(&url),
        })),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `item_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn item_client_free(client: *mut FfiItemClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build an HTTP request for listing all items.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `item_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn item_build_list_items(client: *const FfiItemClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_items())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build an HTTP request for fetching a single item by id.
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn item_build_get_item(client: *const FfiItemClient, id: i64) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_get_item(id))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build an HTTP request for creating a new item.
///
/// `description` may be null. Returns null if `client` or `name` is null, or
/// if the name is blank.
#[unsafe(no_mangle)]
pub extern "C" fn item_build_create_item(
    client: *const FfiItemClient,
    name: *const c_char,
    description: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let Some(name) = read_c_str(name) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &*client };
        let draft = ItemDraft::new(name, read_c_str(description));
        match client.inner.build_create_item(&draft) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build an HTTP request for deleting an item by id.
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn item_build_delete_item(
    client: *const FfiItemClient,
    id: i64,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_delete_item(id))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body is
/// treated as empty.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse::new(resp.status, read_c_str(resp.body).unwrap_or_default())
}

/// Shared null checks and conversion for every `item_parse_*` function.
fn parse_with(
    client: *const FfiItemClient,
    response: *const FfiHttpResponse,
    parse: impl FnOnce(&item_core::ItemClient, HttpResponse) -> *mut FfiItemResult,
) -> *mut FfiItemResult {
    if client.is_null() {
        return FfiItemResult::null_arg("client");
    }
    if response.is_null() {
        return FfiItemResult::null_arg("response");
    }
    let client = unsafe { &*client };
    let resp = unsafe { &*response };
    parse(&client.inner, ffi_response_to_core(resp))
}

/// Parse the response to a list-items request.
///
/// Returns a result with `data_tag = ItemList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn item_parse_list_items(
    client: *const FfiItemClient,
    response: *const FfiHttpResponse,
) -> *mut FfiItemResult {
    catch_unwind(|| {
        parse_with(client, response, |c, resp| match c.parse_list_items(resp) {
            Ok(items) => FfiItemResult::ok_item_list(items),
            Err(e) => FfiItemResult::from_error(e),
        })
    })
    .unwrap_or_else(|_| FfiItemResult::panic("panic in item_parse_list_items"))
}

/// Parse the response to a get-item request.
///
/// Returns a result with `data_tag = Item` on success.
#[unsafe(no_mangle)]
pub extern "C" fn item_parse_get_item(
    client: *const FfiItemClient,
    response: *const FfiHttpResponse,
) -> *mut FfiItemResult {
    catch_unwind(|| {
        parse_with(client, response, |c, resp| match c.parse_get_item(resp) {
            Ok(item) => FfiItemResult::ok_item(item),
            Err(e) => FfiItemResult::from_error(e),
        })
    })
    .unwrap_or_else(|_| FfiItemResult::panic("panic in item_parse_get_item"))
}

/// Parse the response to a create-item request.
///
/// Returns a result with `data_tag = Item` on success (any 2xx status).
#[unsafe(no_mangle)]
pub extern "C" fn item_parse_create_item(
    client: *const FfiItemClient,
    response: *const FfiHttpResponse,
) -> *mut FfiItemResult {
    catch_unwind(|| {
        parse_with(client, response, |c, resp| match c.parse_create_item(resp) {
            Ok(item) => FfiItemResult::ok_item(item),
            Err(e) => FfiItemResult::from_error(e),
        })
    })
    .unwrap_or_else(|_| FfiItemResult::panic("panic in item_parse_create_item"))
}

/// Parse the response to a delete-item request. The body is ignored.
///
/// Returns a result with `data_tag = None` on success.
#[unsafe(no_mangle)]
pub extern "C" fn item_parse_delete_item(
    client: *const FfiItemClient,
    response: *const FfiHttpResponse,
) -> *mut FfiItemResult {
    catch_unwind(|| {
        parse_with(client, response, |c, resp| match c.parse_delete_item(resp) {
            Ok(()) => FfiItemResult::ok_empty(),
            Err(e) => FfiItemResult::from_error(e),
        })
    })
    .unwrap_or_else(|_| FfiItemResult::panic("panic in item_parse_delete_item"))
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Create an empty store talking to `base_url` over blocking HTTP.
///
/// Returns null if `base_url` is null. Free with `item_store_free`.
#[unsafe(no_mangle)]
pub extern "C" fn item_store_new(base_url: *const c_char) -> *mut FfiItemStore {
    catch_unwind(|| match read_c_str(base_url) {
        Some(url) => Box::into_raw(Box::new(FfiItemStore {
            inner: ItemStore::new(RemoteItemClient::new(&url)),
        })),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a store created by `item_store_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn item_store_free(store: *mut FfiItemStore) {
    if !store.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(store) });
        }));
    }
}

/// Run `op` against the store and wrap its outcome. On success the result
/// carries a snapshot of the whole collection.
fn with_store(
    store: *mut FfiItemStore,
    op: impl FnOnce(&mut ItemStore<RemoteItemClient>) -> Result<&[item_core::Item], item_core::ApiError>,
) -> *mut FfiItemResult {
    if store.is_null() {
        return FfiItemResult::null_arg("store");
    }
    let store = unsafe { &mut *store };
    match op(&mut store.inner) {
        Ok(items) => FfiItemResult::ok_item_list(items.to_vec()),
        Err(e) => FfiItemResult::from_error(e),
    }
}

/// Replace the collection with the server's list. Blocks for one round trip.
#[unsafe(no_mangle)]
pub extern "C" fn item_store_load(store: *mut FfiItemStore) -> *mut FfiItemResult {
    catch_unwind(AssertUnwindSafe(|| with_store(store, |s| s.load())))
        .unwrap_or_else(|_| FfiItemResult::panic("panic in item_store_load"))
}

/// Create an item and append it locally. `description` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn item_store_add(
    store: *mut FfiItemStore,
    name: *const c_char,
    description: *const c_char,
) -> *mut FfiItemResult {
    catch_unwind(AssertUnwindSafe(|| {
        let Some(name) = read_c_str(name) else {
            return FfiItemResult::null_arg("name");
        };
        let description = read_c_str(description);
        with_store(store, |s| s.add(&name, description.as_deref()))
    }))
    .unwrap_or_else(|_| FfiItemResult::panic("panic in item_store_add"))
}

/// Delete an item by id and drop it locally.
#[unsafe(no_mangle)]
pub extern "C" fn item_store_remove(store: *mut FfiItemStore, id: i64) -> *mut FfiItemResult {
    catch_unwind(AssertUnwindSafe(|| with_store(store, |s| s.remove_by_id(id))))
        .unwrap_or_else(|_| FfiItemResult::panic("panic in item_store_remove"))
}

/// Snapshot of the current collection without any I/O.
#[unsafe(no_mangle)]
pub extern "C" fn item_store_items(store: *mut FfiItemStore) -> *mut FfiItemResult {
    catch_unwind(AssertUnwindSafe(|| with_store(store, |s| Ok(s.items()))))
        .unwrap_or_else(|_| FfiItemResult::panic("panic in item_store_items"))
}

/// Whether a load is in progress. False for a null store.
#[unsafe(no_mangle)]
pub extern "C" fn item_store_is_loading(store: *const FfiItemStore) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        !store.is_null() && unsafe { &*store }.inner.is_loading()
    }))
    .unwrap_or(false)
}

/// The last recorded error, or null if there is none.
/// Free with `item_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn item_store_error_message(store: *const FfiItemStore) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return std::ptr::null_mut();
        }
        match unsafe { &*store }.inner.error_message() {
            Some(msg) => into_c_string(msg.to_string()),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Dismiss the current error. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn item_store_clear_error(store: *mut FfiItemStore) {
    if !store.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            unsafe { &mut *store }.inner.clear_error();
        }));
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `item_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn item_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        item_free_string(req.path);
        item_free_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                item_free_string(h.key);
                item_free_string(h.value);
            }
        }
    });
}

/// Free an `FfiItemResult` returned by any `item_parse_*` or `item_store_*`
/// function. Safe to call with null. Uses `data_tag` to determine what
/// `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn item_free_result(result: *mut FfiItemResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        item_free_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Item => {
                let item = unsafe { Box::from_raw(result.data as *mut FfiItem) };
                free_ffi_item_fields(&item);
            }
            FfiDataTag::ItemList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiItemList) };
                if !list.items.is_null() && list.len > 0 {
                    let items = unsafe {
                        Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                            list.items,
                            list.len as usize,
                        ))
                    };
                    for item in items.iter() {
                        free_ffi_item_fields(item);
                    }
                }
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free the C-string fields of an `FfiItem` (but not the struct itself).
fn free_ffi_item_fields(item: &FfiItem) {
    item_free_string(item.name);
    item_free_string(item.description);
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn item_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
