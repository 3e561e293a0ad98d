//! PenPal letter service
//!
//! Stores sealed letters as rows and serves them back, either as JSON for
//! clients or as the standalone interactive letter for recipients.
//!
//! ## Routes
//!
//! - `POST /api/letters` with `{recipient_display_name, sender_display_name, serialized_content}`
//!   returns `201 {"id": "..."}`, or 422 when the content is not a valid letter
//! - `GET /api/letters/{id}` returns the stored row
//! - `GET /<prefix>/{id}` returns the letter as an HTML page
//! - `GET /health` returns `ok`

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use dashmap::{DashMap, mapref::entry::Entry};
use penpal_core::export::{build_interactive_letter_html, escape_html};
use penpal_core::link::DEFAULT_ROUTE_PREFIX;
use penpal_core::storage::{CreatedLetter, LetterRow, NewLetterRow, generate_store_id};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub const ENV_SERVER_ADDR: &str = "PENPAL_SERVER_ADDR";
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3030";

/// Server startup errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid listen address {0}")]
    InvalidAddr(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Listen address and public routing.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Path segment the letter pages are served under.
    pub route_prefix: String,
}

impl ServerConfig {
    /// Read `PENPAL_SERVER_ADDR` and `PENPAL_ROUTE_PREFIX`.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerError> {
        let addr = lookup(ENV_SERVER_ADDR)
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let addr: SocketAddr = addr
            .trim()
            .parse()
            .map_err(|_| ServerError::InvalidAddr(addr.clone()))?;
        let route_prefix = lookup(penpal_core::config::ENV_ROUTE_PREFIX)
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_ROUTE_PREFIX.to_string());
        Ok(Self { addr, route_prefix })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3030)),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
        }
    }
}

/// Shared application state
#[derive(Default)]
pub struct AppState {
    letters: DashMap<String, LetterRow>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Insert a row under a fresh id.
    fn insert(&self, row: NewLetterRow) -> String {
        loop {
            let id = generate_store_id();
            match self.letters.entry(id.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    slot.insert(LetterRow::new(id.clone(), row));
                    return id;
                }
            }
        }
    }

    fn get(&self, id: &str) -> Option<LetterRow> {
        self.letters.get(id).map(|row| row.value().clone())
    }
}

/// Handler errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Letter not found")]
    NotFound,
    #[error("Invalid letter content: {0}")]
    InvalidContent(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidContent(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Build the router.
pub fn router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let letter_page = format!("/{}/{{id}}", config.route_prefix);
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/letters", post(create_letter))
        .route("/api/letters/{id}", get(get_letter))
        .route(&letter_page, get(view_letter))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Index page
async fn index() -> &'static str {
    "PenPal letter service"
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

async fn create_letter(
    State(state): State<Arc<AppState>>,
    Json(row): Json<NewLetterRow>,
) -> Result<(StatusCode, Json<CreatedLetter>), ApiError> {
    let letter = row.letter().map_err(|e| {
        warn!("Rejected letter: {}", e);
        ApiError::InvalidContent(e.to_string())
    })?;
    if !letter.has_unique_decoration_ids() {
        warn!("Rejected letter with duplicate decoration ids");
        return Err(ApiError::InvalidContent("duplicate decoration ids".to_string()));
    }
    let id = state.insert(row);
    info!("Stored letter {}", id);
    Ok((StatusCode::CREATED, Json(CreatedLetter { id })))
}

async fn get_letter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<LetterRow>, ApiError> {
    state.get(&id).map(Json).ok_or(ApiError::NotFound)
}

async fn view_letter(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let letter = state.get(&id).map(|row| row.letter());
    match letter {
        Some(Ok(letter)) => Html(build_interactive_letter_html(&letter)).into_response(),
        Some(Err(e)) => {
            warn!("Stored letter {} is unreadable: {}", id, e);
            not_found_page(&id)
        }
        None => not_found_page(&id),
    }
}

fn not_found_page(id: &str) -> Response {
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>Letter not found</title>
<style>
body {{ margin: 0; min-height: 100vh; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 16px; background: #faf7f5; color: #3a3330; font-family: Georgia, serif; }}
a {{ padding: 8px 16px; border-radius: 12px; background: #3a3330; color: #faf7f5; text-decoration: none; }}
</style>
</head>
<body>
<p>Letter not found.</p>
<p class="id">{}</p>
<a href="/">Go home</a>
</body>
</html>
"#,
        escape_html(id)
    );
    (StatusCode::NOT_FOUND, Html(html)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_config_overrides() {
        let config = ServerConfig::from_lookup(|key| match key {
            ENV_SERVER_ADDR => Some("127.0.0.1:8080".to_string()),
            _ => Some("/letter/".to_string()),
        })
        .unwrap();
        assert_eq!(config.addr, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(config.route_prefix, "letter");

        assert!(matches!(
            ServerConfig::from_lookup(|_| Some("nope".to_string())),
            Err(ServerError::InvalidAddr(_))
        ));
    }

    #[test]
    fn test_insert_assigns_fresh_ids() {
        let state = AppState::new();
        let row = NewLetterRow {
            recipient_display_name: "A friend".to_string(),
            sender_display_name: "Anonymous".to_string(),
            serialized_content: "{}".to_string(),
        };
        let a = state.insert(row.clone());
        let b = state.insert(row);
        assert_ne!(a, b);
        assert_eq!(state.len(), 2);
        assert_eq!(state.get(&a).unwrap().id, a);
    }
}
