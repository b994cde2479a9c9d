use actix_web::web::{Data, Json};
use actix_web::{web, HttpResponse};
use log::info;

use crate::dto::{CredentialsRequest, IdentityDTO, SuccessResponse};
use crate::error::Result;
use crate::server::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/signup", web::post().to(sign_up))
            .route("/login", web::post().to(log_in))
            .route("/logout", web::post().to(log_out)),
    );
}

/// POST /v1/auth/signup
///
/// Registers the account. No session is created; the service may require
/// email confirmation first.
async fn sign_up(state: Data<AppState>, body: Json<CredentialsRequest>) -> Result<HttpResponse> {
    let identity = state
        .session_manager
        .sign_up(&body.email, &body.password)
        .await?;
    info!("sign-up accepted for {}", identity.id);
    Ok(HttpResponse::Ok().json(SuccessResponse {
        message: format!("account created for {}", body.email),
    }))
}

/// POST /v1/auth/login
///
/// The task list populates asynchronously once the session-change
/// notification lands; poll GET /v1/tasks or POST /v1/tasks/refresh.
async fn log_in(state: Data<AppState>, body: Json<CredentialsRequest>) -> Result<HttpResponse> {
    let identity = state
        .session_manager
        .sign_in(&body.email, &body.password)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "identity": IdentityDTO::from(identity)
    })))
}

/// POST /v1/auth/logout
async fn log_out(state: Data<AppState>) -> Result<HttpResponse> {
    state.session_manager.sign_out().await?;
    Ok(HttpResponse::Ok().json(SuccessResponse {
        message: "signed out".to_string(),
    }))
}
