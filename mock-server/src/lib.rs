use std::{io, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Insertion-ordered items plus the next id to hand out.
#[derive(Debug)]
pub struct ItemDb {
    items: Vec<Item>,
    next_id: i64,
}

impl Default for ItemDb {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }
}

pub type Db = Arc<RwLock<ItemDb>>;

/// Bind address, read from `API_HOST` / `API_PORT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> io::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> io::Result<Self> {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("API_PORT") {
            Some(raw) => raw.parse().map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidInput, format!("invalid API_PORT {raw:?}: {e}"))
            })?,
            None => 8000,
        };
        Ok(Self { host, port })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(ItemDb::default()));
    Router::new()
        .route("/health", get(health))
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/", get(list_items).post(create_item))
        .route("/api/items/{id}", get(get_item).delete(delete_item))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "serving item api");
    }
    axum::serve(listener, app()).await
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Item not found" })))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_items(State(db): State<Db>) -> Json<Vec<Item>> {
    let db = db.read().await;
    Json(db.items.clone())
}

async fn get_item(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Item>, (StatusCode, Json<Value>)> {
    let db = db.read().await;
    db.items
        .iter()
        .find(|item| item.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

async fn create_item(
    State(db): State<Db>,
    Json(input): Json<CreateItem>,
) -> Result<(StatusCode, Json<Item>), (StatusCode, Json<Value>)> {
    if input.name.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": "name must not be empty" })),
        ));
    }
    let mut db = db.write().await;
    let item = Item {
        id: db.next_id,
        name: input.name,
        description: input.description,
    };
    db.next_id += 1;
    db.items.push(item.clone());
    debug!(id = item.id, "created item");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn delete_item(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let mut db = db.write().await;
    let before = db.items.len();
    db.items.retain(|item| item.id != id);
    if db.items.len() == before {
        return Err(not_found());
    }
    debug!(id, "deleted item");
    Ok(StatusCode::NO_CONTENT)
}
