use actix_web::{web, HttpResponse};

use crate::dto::SessionDTO;
use crate::error::Result;
use crate::server::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/session", web::get().to(get_session));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// GET /v1/session
///
/// Who is signed in right now. `loading` is true until the startup session
/// restore has resolved.
async fn get_session(state: web::Data<AppState>) -> Result<HttpResponse> {
    let identity = state.session_manager.identity().await;
    Ok(HttpResponse::Ok().json(SessionDTO {
        identity: identity.map(Into::into),
        loading: state.session_manager.is_loading(),
    }))
}
