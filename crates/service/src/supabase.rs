//! Thin Supabase REST client.
//!
//! Two flavours exist:
//! - server clients use the service-role key and keep no session state;
//! - public clients use the anon key, the same credential a browser holds.
//!
//! Errors from the HTTP layer are surfaced as-is; there is no retry.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument};

use configs::{PublicConfig, ServerConfig};

use crate::errors::SupabaseError;

static SERVER_CLIENT: OnceCell<Arc<SupabaseClient>> = OnceCell::new();
static PUBLIC_CLIENT: OnceCell<Arc<SupabaseClient>> = OnceCell::new();

/// Session mode a client was created for.
///
/// Recorded only: this client sends a fixed key on every request and never
/// refreshes or stores a user session, whatever the flags say. They tell
/// callers which credential flavour they hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthOptions {
    pub auto_refresh_token: bool,
    pub persist_session: bool,
}

impl AuthOptions {
    /// Stateless server usage.
    pub const SERVER: AuthOptions = AuthOptions { auto_refresh_token: false, persist_session: false };
    pub const PUBLIC: AuthOptions = AuthOptions { auto_refresh_token: true, persist_session: true };
}

pub struct SupabaseClient {
    base_url: String,
    auth: AuthOptions,
    http: reqwest::Client,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    pub fn new(url: &str, api_key: &str, auth: AuthOptions) -> Result<Self, SupabaseError> {
        let mut apikey = HeaderValue::from_str(api_key).map_err(|e| SupabaseError::InvalidKey(e.to_string()))?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| SupabaseError::InvalidKey(e.to_string()))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self { base_url: url.trim_end_matches('/').to_string(), auth, http })
    }

    pub fn url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_options(&self) -> AuthOptions {
        self.auth
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET /rest/v1/{table}?select={columns}`
    #[instrument(skip(self), fields(base = %self.base_url))]
    pub async fn select<T: DeserializeOwned>(&self, table: &str, columns: &str) -> Result<Vec<T>, SupabaseError> {
        let resp = self
            .http
            .get(self.rest_url(table))
            .query(&[("select", columns)])
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let rows = resp.json::<Vec<T>>().await?;
        debug!(rows = rows.len(), "supabase select");
        Ok(rows)
    }

    /// Inserts rows and returns them as stored.
    #[instrument(skip(self, rows), fields(base = %self.base_url, count = rows.len()))]
    pub async fn insert<T, R>(&self, table: &str, rows: &[T]) -> Result<Vec<R>, SupabaseError>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let resp = self
            .http
            .post(self.rest_url(table))
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.json::<Vec<R>>().await?)
    }

    /// Calls a Postgres function exposed at `/rest/v1/rpc/{function}`.
    #[instrument(skip(self, args), fields(base = %self.base_url))]
    pub async fn rpc<A, R>(&self, function: &str, args: &A) -> Result<R, SupabaseError>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self
            .http
            .post(self.rest_url(&format!("rpc/{function}")))
            .json(args)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.json::<R>().await?)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, SupabaseError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), %body, "supabase request failed");
    Err(SupabaseError::Status { status: status.as_u16(), body })
}

/// New service-role client on every call.
pub fn create_client(cfg: &ServerConfig) -> Result<SupabaseClient, SupabaseError> {
    SupabaseClient::new(&cfg.supabase_url, &cfg.supabase_service_role_key, AuthOptions::SERVER)
}

/// Process-wide service-role client, built from the environment on first use.
pub fn get_server_client() -> Result<Arc<SupabaseClient>, SupabaseError> {
    SERVER_CLIENT
        .get_or_try_init(|| {
            let cfg = configs::get_server_config()?;
            create_client(&cfg).map(Arc::new)
        })
        .map(Arc::clone)
}

pub fn create_public_client(cfg: &PublicConfig) -> Result<SupabaseClient, SupabaseError> {
    SupabaseClient::new(&cfg.supabase_url, &cfg.supabase_anon_key, AuthOptions::PUBLIC)
}

/// Process-wide anon-key client.
pub fn public_client() -> Result<Arc<SupabaseClient>, SupabaseError> {
    PUBLIC_CLIENT
        .get_or_try_init(|| {
            let cfg = configs::get_public_config()?;
            create_public_client(&cfg).map(Arc::new)
        })
        .map(Arc::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_cfg() -> ServerConfig {
        ServerConfig {
            supabase_url: "https://abc.supabase.co/".into(),
            supabase_anon_key: "anon".into(),
            supabase_service_role_key: "service".into(),
            app_url: "http://localhost:3000".into(),
        }
    }

    #[test]
    fn server_client_records_stateless_mode() {
        let c = create_client(&server_cfg()).unwrap();
        assert_eq!(c.auth_options(), AuthOptions::SERVER);
        assert!(!c.auth_options().auto_refresh_token);
        assert!(!c.auth_options().persist_session);
        assert_eq!(c.url(), "https://abc.supabase.co");
    }

    #[test]
    fn public_client_records_session_mode() {
        let cfg = PublicConfig {
            supabase_url: "https://abc.supabase.co".into(),
            supabase_anon_key: "anon".into(),
            app_url: "http://localhost:3000".into(),
            app_name: "English Academy".into(),
        };
        let c = create_public_client(&cfg).unwrap();
        assert_eq!(c.auth_options(), AuthOptions::PUBLIC);
    }

    #[test]
    fn rest_url_joins_paths() {
        let c = create_client(&server_cfg()).unwrap();
        assert_eq!(c.rest_url("exams"), "https://abc.supabase.co/rest/v1/exams");
        assert_eq!(c.rest_url("/rpc/f"), "https://abc.supabase.co/rest/v1/rpc/f");
    }

    #[test]
    fn rejects_key_with_newline() {
        let err = SupabaseClient::new("https://abc.supabase.co", "bad\nkey", AuthOptions::SERVER).unwrap_err();
        assert!(matches!(err, SupabaseError::InvalidKey(_)));
    }

    #[test]
    fn debug_hides_credentials() {
        let c = create_client(&server_cfg()).unwrap();
        let dbg = format!("{:?}", c);
        assert!(!dbg.contains("service"));
    }
}
