//! Health and root endpoints

use axum::{response::Redirect, Json};
use serde_json::{json, Value};

/// Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "registre-core",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// The root serves no content; send browsers to the login page
pub async fn root_redirect() -> Redirect {
    Redirect::temporary("/login.html")
}
