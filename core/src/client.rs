//! Stateless HTTP request builder and response parser for the item API.
//!
//! # Design
//! `ItemClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Any 2xx status counts as success; everything else is an `HttpError`.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Item, ItemDraft, ItemId};

/// Base URL of the item service in local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Synchronous, stateless client for the item API.
#[derive(Debug, Clone)]
pub struct ItemClient {
    base_url: String,
}

impl Default for ItemClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ItemClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/items/", self.base_url)
    }

    fn item_url(&self, id: ItemId) -> String {
        format!("{}/items/{id}", self.base_url)
    }

    pub fn build_list_items(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.collection_url(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_item(&self, id: ItemId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.item_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_item(&self, draft: &ItemDraft) -> Result<HttpRequest, ApiError> {
        draft.validate()?;
        let body = serde_json::to_string(draft).map_err(|e| ApiError::EncodeError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.collection_url(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_delete_item(&self, id: ItemId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.item_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_items(&self, response: HttpResponse) -> Result<Vec<Item>, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_get_item(&self, response: HttpResponse) -> Result<Item, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_create_item(&self, response: HttpResponse) -> Result<Item, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    /// The body is ignored; only the status is inspected.
    pub fn parse_delete_item(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DecodeError(e.to_string()))
}

/// Map non-2xx status codes to `ApiError::HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ItemClient {
        ItemClient::new("http://localhost:8000/api")
    }

    #[test]
    fn build_list_items_produces_correct_request() {
        let req = client().build_list_items();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8000/api/items/");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_item_produces_correct_request() {
        let req = client().build_get_item(42);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8000/api/items/42");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_item_produces_correct_request() {
        let draft = ItemDraft::new("Lapel mic", Some("Clip-on".to_string()));
        let req = client().build_create_item(&draft).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8000/api/items/");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "Lapel mic");
        assert_eq!(body["description"], "Clip-on");
    }

    #[test]
    fn build_create_item_rejects_blank_name() {
        let err = client().build_create_item(&ItemDraft::new("", None)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidDraft(_)));
    }

    #[test]
    fn build_delete_item_produces_correct_request() {
        let req = client().build_delete_item(7);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:8000/api/items/7");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_items_success() {
        let response = HttpResponse::new(
            200,
            r#"[{"id":1,"name":"Mic","description":null},{"id":2,"name":"Cable","description":"XLR"}]"#,
        );
        let items = client().parse_list_items(response).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Mic");
        assert_eq!(items[1].description.as_deref(), Some("XLR"));
    }

    #[test]
    fn parse_list_items_bad_json() {
        let err = client().parse_list_items(HttpResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DecodeError(_)));
    }

    #[test]
    fn parse_list_items_server_error() {
        let err = client()
            .parse_list_items(HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_create_item_accepts_200_and_201() {
        let body = r#"{"id":7,"name":"X","description":null}"#;
        let created = client().parse_create_item(HttpResponse::new(201, body)).unwrap();
        assert_eq!(created.id, 7);
        let ok = client().parse_create_item(HttpResponse::new(200, body)).unwrap();
        assert_eq!(ok, created);
    }

    #[test]
    fn parse_create_item_wrong_shape() {
        let err = client()
            .parse_create_item(HttpResponse::new(201, r#"{"name":"no id"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::DecodeError(_)));
    }

    #[test]
    fn parse_get_item_not_found() {
        let err = client()
            .parse_get_item(HttpResponse::new(404, r#"{"detail":"Item not found"}"#))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn parse_delete_item_ignores_body() {
        assert!(client().parse_delete_item(HttpResponse::new(204, "")).is_ok());
        assert!(client().parse_delete_item(HttpResponse::new(200, "garbage")).is_ok());
    }

    #[test]
    fn parse_delete_item_not_found() {
        let err = client().parse_delete_item(HttpResponse::new(404, "")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ItemClient::new("http://localhost:8000/api/");
        assert_eq!(client.build_list_items().path, "http://localhost:8000/api/items/");
    }

    #[test]
    fn default_points_at_local_service() {
        assert_eq!(ItemClient::default().base_url(), DEFAULT_BASE_URL);
    }
}
