use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use task_core::{Config, Identity, Session, Task};
use tokio::sync::{broadcast, RwLock};

use crate::api::models::{
    AuthErrorResponse, CompletedPatch, CredentialsRequest, NewTaskRow, RestErrorResponse,
    SessionResponse, SignUpResponse, UserResponse,
};
use crate::client_trait::SupabaseClientTrait;
use crate::error::{AuthErrorKind, Result, SupabaseError};
use crate::events::{AuthChangeEvent, AuthStateChange};

const AUTH_EVENT_CHANNEL_CAPACITY: usize = 16;

/// HTTP client for the hosted auth and task storage API.
///
/// One instance is shared by every component of a shell; the current session
/// lives here so authenticated calls pick up the bearer token without the
/// callers threading it through.
#[derive(Debug)]
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    session: RwLock<Option<Session>>,
    auth_events: broadcast::Sender<AuthStateChange>,
}

impl SupabaseClient {
    pub fn new(config: &Config) -> Self {
        let http = Client::builder()
            .default_headers(Self::default_headers(&config.supabase_anon_key))
            .build()
            .expect("supabase http client");
        let (auth_events, _) = broadcast::channel(AUTH_EVENT_CHANNEL_CAPACITY);

        SupabaseClient {
            http,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            session: RwLock::new(None),
            auth_events,
        }
    }

    fn default_headers(anon_key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(anon_key) {
            Ok(value) => {
                headers.insert("apikey", value);
            }
            Err(_) => warn!("anon key is not a valid header value, requests will be anonymous"),
        }
        headers
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    async fn bearer(&self) -> Result<String> {
        let guard = self.session.read().await;
        guard
            .as_ref()
            .map(|session| session.access_token.clone())
            .ok_or(SupabaseError::NoSession)
    }

    fn emit(&self, event: AuthChangeEvent, session: Option<Session>) {
        // Delivery is best effort; a shell without a listener is fine.
        let _ = self.auth_events.send(AuthStateChange { event, session });
    }

    async fn check_auth_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<AuthErrorResponse>(&body) {
            Ok(error) => Err(SupabaseError::Auth {
                kind: error.kind(),
                message: error.message(),
            }),
            Err(_) => Err(SupabaseError::Api {
                status: status.as_u16(),
                message: body,
            }),
        }
    }

    async fn check_rest_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<RestErrorResponse>(&body)
            .map(|error| error.message())
            .unwrap_or(body);
        Err(SupabaseError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SupabaseClientTrait for SupabaseClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        let response = self
            .http
            .post(self.auth_url("signup"))
            .json(&CredentialsRequest { email, password })
            .send()
            .await?;
        let response = Self::check_auth_response(response).await?;
        let identity = response
            .json::<SignUpResponse>()
            .await?
            .into_identity()
            .ok_or_else(|| SupabaseError::Auth {
                kind: AuthErrorKind::Other,
                message: "signup response carried no user record".to_string(),
            })?;
        info!("sign-up accepted for {}", identity.id);
        Ok(identity)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&CredentialsRequest { email, password })
            .send()
            .await?;
        let response = Self::check_auth_response(response).await?;
        let session = response.json::<SessionResponse>().await?.into_session();

        {
            let mut guard = self.session.write().await;
            *guard = Some(session.clone());
        }
        info!("signed in as {}", session.user.id);
        self.emit(AuthChangeEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        let token = self.bearer().await?;
        let response = self
            .http
            .post(self.auth_url("logout"))
            .bearer_auth(&token)
            .send()
            .await?;
        Self::check_auth_response(response).await?;

        {
            let mut guard = self.session.write().await;
            *guard = None;
        }
        info!("signed out");
        self.emit(AuthChangeEvent::SignedOut, None);
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>> {
        let current = { self.session.read().await.clone() };
        let Some(session) = current else {
            return Ok(None);
        };

        let response = self
            .http
            .get(self.auth_url("user"))
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("stored session rejected by the service");
            let mut guard = self.session.write().await;
            *guard = None;
            return Ok(None);
        }
        let response = Self::check_auth_response(response).await?;
        let user: UserResponse = response.json().await?;

        let mut session = session;
        session.user = user.into();
        Ok(Some(session))
    }

    async fn set_session(&self, session: Session) -> Result<Identity> {
        let identity = session.user.clone();
        {
            let mut guard = self.session.write().await;
            *guard = Some(session.clone());
        }
        debug!("adopted persisted session for {}", identity.id);
        self.emit(AuthChangeEvent::SignedIn, Some(session));
        Ok(identity)
    }

    async fn fetch_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let token = self.bearer().await?;
        let owner_filter = format!("eq.{user_id}");
        let response = self
            .http
            .get(self.rest_url("tasks"))
            .query(&[
                ("select", "*"),
                ("user_id", owner_filter.as_str()),
                ("order", "id.desc"),
            ])
            .bearer_auth(&token)
            .send()
            .await?;
        let response = Self::check_rest_response(response).await?;
        Ok(response.json::<Vec<Task>>().await?)
    }

    async fn insert_task(&self, title: &str, user_id: &str) -> Result<Vec<Task>> {
        let token = self.bearer().await?;
        let rows = [NewTaskRow {
            title,
            completed: false,
            user_id,
        }];
        let response = self
            .http
            .post(self.rest_url("tasks"))
            .header("Prefer", "return=representation")
            .bearer_auth(&token)
            .json(&rows)
            .send()
            .await?;
        let response = Self::check_rest_response(response).await?;
        Ok(response.json::<Vec<Task>>().await?)
    }

    async fn set_task_completed(&self, task_id: i64, completed: bool) -> Result<()> {
        let token = self.bearer().await?;
        let response = self
            .http
            .patch(self.rest_url("tasks"))
            .query(&[("id", format!("eq.{task_id}"))])
            .bearer_auth(&token)
            .json(&CompletedPatch { completed })
            .send()
            .await?;
        Self::check_rest_response(response).await?;
        Ok(())
    }

    async fn delete_task(&self, task_id: i64) -> Result<()> {
        let token = self.bearer().await?;
        let response = self
            .http
            .delete(self.rest_url("tasks"))
            .query(&[("id", format!("eq.{task_id}"))])
            .header("Prefer", "return=representation")
            .bearer_auth(&token)
            .send()
            .await?;
        let response = Self::check_rest_response(response).await?;
        let deleted: Vec<Task> = response.json().await?;
        if deleted.is_empty() {
            warn!("delete for task {task_id} matched no rows");
            return Err(SupabaseError::RowNotFound);
        }
        Ok(())
    }

    fn on_auth_state_change(&self) -> broadcast::Receiver<AuthStateChange> {
        self.auth_events.subscribe()
    }
}
