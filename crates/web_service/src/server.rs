use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::{error, info};
use supabase_client::{SupabaseClient, SupabaseClientTrait};
use task_core::Config;
use task_sync::{spawn_session_listener, MemorySessionStore, SessionManager, TaskListSynchronizer};

use crate::controllers::{auth_controller, session_controller, task_controller};

pub struct AppState {
    pub session_manager: Arc<SessionManager>,
    pub synchronizer: Arc<TaskListSynchronizer>,
}

const DEFAULT_WORKER_COUNT: usize = 4;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .configure(session_controller::config)
            .configure(auth_controller::config)
            .configure(task_controller::config),
    );
}

/// Assemble the components around one shared client handle. The web shell
/// has no durable local session, so the store is in-memory only.
pub fn build_state(client: Arc<dyn SupabaseClientTrait>) -> AppState {
    let session_manager = Arc::new(SessionManager::new(
        Arc::clone(&client),
        Arc::new(MemorySessionStore::default()),
    ));
    let synchronizer = Arc::new(TaskListSynchronizer::new(Arc::clone(&client)));
    AppState {
        session_manager,
        synchronizer,
    }
}

pub async fn run(config: Config, port: u16) -> Result<(), String> {
    info!("Starting web service...");

    let client: Arc<dyn SupabaseClientTrait> = Arc::new(SupabaseClient::new(&config));
    let state = build_state(Arc::clone(&client));
    let session_manager = Arc::clone(&state.session_manager);
    let synchronizer = Arc::clone(&state.synchronizer);
    let _listener = spawn_session_listener(
        Arc::clone(&client),
        Arc::clone(&session_manager),
        Arc::clone(&synchronizer),
    );

    // Resolve the authenticated/unauthenticated branch before serving.
    if let Some(identity) = session_manager.restore_session().await {
        synchronizer.set_active_owner(Some(identity.id.clone())).await;
        if let Err(err) = synchronizer.fetch_all(&identity.id).await {
            error!("initial task fetch failed: {err}");
        }
    }

    let app_state = web::Data::new(state);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .workers(DEFAULT_WORKER_COUNT)
    .bind(format!("127.0.0.1:{port}"))
    .map_err(|e| format!("Failed to bind server: {e}"))?
    .run();

    info!("Web service listening on http://127.0.0.1:{port}");

    if let Err(e) = server.await {
        error!("Web server error: {}", e);
        return Err(format!("Web server error: {e}"));
    }

    Ok(())
}
