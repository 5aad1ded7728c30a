//! API client with session support
//!
//! Owns the credential pair, attaches bearer authentication to every call,
//! and hides token refresh from callers: a 401 triggers exactly one refresh
//! and, on success, exactly one resend of the original request. When the
//! refresh fails the stored credentials are cleared and the session-expired
//! callback fires so the presentation layer can restart.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use fichaje_model::{LoginResponse, RefreshResponse, Usuario};

use crate::config;
use crate::errors::{ClientError, ClientResult};
use crate::routes;
use crate::store::CredentialStore;
use crate::transport::{
    HttpRequest, HttpResponse, Method, ReqwestTransport, Transport,
};

/// Callback invoked when the session cannot be recovered
pub type SessionExpiredCallback =
    Arc<Mutex<Option<Box<dyn Fn() + Send + Sync>>>>;

const CONTENT_TYPE_JSON: (&str, &str) = ("Content-Type", "application/json");

/// Session client for the attendance API
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
    expired_callback: SessionExpiredCallback,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    /// Create a client against the given base URL with the default transport
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self::with_transport(base_url, store, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client with an explicit transport (tests, custom stacks)
    pub fn with_transport(
        base_url: impl Into<String>,
        store: Arc<dyn CredentialStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("[ApiClient] Creating API client with base URL: {}", base_url);
        Self {
            base_url,
            transport,
            store,
            expired_callback: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a client from the `FICHAJE_API_URL` environment variable
    pub fn from_env(store: Arc<dyn CredentialStore>) -> anyhow::Result<Self> {
        Ok(Self::new(config::api_url_from_env()?, store))
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The injected credential store
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Build an absolute URL for an API path
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let p = path.as_ref();
        if p.starts_with("http://") || p.starts_with("https://") {
            return p.to_string();
        }
        format!("{}{}", self.base_url, p)
    }

    /// Register the callback fired on unrecoverable expiry.
    ///
    /// The presentation layer decides what a restart means; any caller
    /// mid-flight is abandoned when this fires.
    pub async fn set_session_expired_callback<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.expired_callback.lock().await = Some(Box::new(callback));
    }

    async fn notify_session_expired(&self) {
        if let Some(callback) = self.expired_callback.lock().await.as_ref() {
            callback();
        }
    }

    /// Perform an authenticated request, refreshing the token at most once.
    ///
    /// The Authorization header is always derived from the stored access
    /// token; any caller-supplied authorization header is discarded. Every
    /// non-401 status is returned to the caller as-is, and so is the status
    /// of the single retried request, whatever it turns out to be.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        headers: Vec<(String, String)>,
        body: Option<Vec<u8>>,
    ) -> ClientResult<HttpResponse> {
        let Some(access) = self.store.access_token().await? else {
            return Err(ClientError::NotAuthenticated);
        };

        let response = self
            .send_authenticated(method, path, &headers, body.clone(), &access)
            .await?;
        if response.status != 401 {
            return Ok(response);
        }

        info!(
            "[ApiClient] Got 401 for {} {}, attempting token refresh",
            method.as_str(),
            path
        );
        if self.refresh_access_token().await? {
            let Some(access) = self.store.access_token().await? else {
                return Err(ClientError::SessionExpired);
            };
            info!("[ApiClient] Token refreshed, retrying request once");
            let retry = self
                .send_authenticated(method, path, &headers, body, &access)
                .await?;
            return Ok(retry);
        }

        // Refresh failed; the session is gone for good.
        self.store.clear().await?;
        self.notify_session_expired().await;
        Err(ClientError::SessionExpired)
    }

    async fn send_authenticated(
        &self,
        method: Method,
        path: &str,
        headers: &[(String, String)],
        body: Option<Vec<u8>>,
        access: &str,
    ) -> ClientResult<HttpResponse> {
        let mut merged: Vec<(String, String)> = Vec::with_capacity(headers.len() + 2);
        merged.push((
            CONTENT_TYPE_JSON.0.to_string(),
            CONTENT_TYPE_JSON.1.to_string(),
        ));
        for (name, value) in headers {
            if name.eq_ignore_ascii_case("authorization") {
                continue;
            }
            merged.push((name.clone(), value.clone()));
        }
        merged.push(("Authorization".to_string(), format!("Bearer {access}")));

        let response = self
            .transport
            .send(HttpRequest {
                method,
                url: self.build_url(path),
                headers: merged,
                body,
            })
            .await?;
        Ok(response)
    }

    /// Refresh the access token using the stored refresh token.
    ///
    /// Returns false without a network call when no refresh token exists.
    /// On any failure the credential store is cleared and false is returned;
    /// on success only the access token slot is overwritten.
    pub(crate) async fn refresh_access_token(&self) -> ClientResult<bool> {
        let Some(refresh) = self.store.refresh_token().await? else {
            return Ok(false);
        };

        let body = serde_json::json!({ "refresh": refresh })
            .to_string()
            .into_bytes();
        let request = HttpRequest {
            method: Method::Post,
            url: self.build_url(routes::usuarios::auth::REFRESH),
            headers: vec![(
                CONTENT_TYPE_JSON.0.to_string(),
                CONTENT_TYPE_JSON.1.to_string(),
            )],
            body: Some(body),
        };

        match self.transport.send(request).await {
            Ok(response) if response.is_success() => {
                match response.json::<RefreshResponse>() {
                    Ok(parsed) => {
                        self.store.store_access_token(&parsed.access).await?;
                        Ok(true)
                    }
                    Err(e) => {
                        warn!(
                            "[ApiClient] Refresh returned malformed body: {}",
                            e
                        );
                        self.store.clear().await?;
                        Ok(false)
                    }
                }
            }
            Ok(response) => {
                warn!(
                    "[ApiClient] Token refresh rejected with status {}",
                    response.status
                );
                self.store.clear().await?;
                Ok(false)
            }
            Err(e) => {
                warn!("[ApiClient] Token refresh failed: {}", e);
                self.store.clear().await?;
                Ok(false)
            }
        }
    }

    /// Authenticate and persist the credential pair plus profile.
    ///
    /// A rejected login mutates nothing; the server's `{error}` message is
    /// surfaced verbatim when present.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> ClientResult<Usuario> {
        let body = serde_json::json!({ "email": email, "password": password })
            .to_string()
            .into_bytes();
        let response = self
            .transport
            .send(HttpRequest {
                method: Method::Post,
                url: self.build_url(routes::usuarios::auth::LOGIN),
                headers: vec![(
                    CONTENT_TYPE_JSON.0.to_string(),
                    CONTENT_TYPE_JSON.1.to_string(),
                )],
                body: Some(body),
            })
            .await?;

        if !response.is_success() {
            warn!(
                "[ApiClient] Login rejected with status {}",
                response.status
            );
            return Err(match Self::server_error_message(&response) {
                Some(message) => ClientError::Api(message),
                None => ClientError::InvalidCredentials,
            });
        }

        let parsed: LoginResponse = response.json()?;
        self.store
            .store_session(&parsed.tokens, &parsed.usuario)
            .await?;
        info!("[ApiClient] Login successful for {}", parsed.usuario.email);
        Ok(parsed.usuario)
    }

    /// End the session.
    ///
    /// Server-side invalidation is best effort and its failures are only
    /// logged; local storage is cleared on every path.
    pub async fn logout(&self) -> ClientResult<()> {
        match self.store.refresh_token().await {
            Ok(Some(refresh)) => {
                let body = serde_json::json!({ "refresh": refresh })
                    .to_string()
                    .into_bytes();
                if let Err(e) = self
                    .request(
                        Method::Post,
                        routes::usuarios::auth::LOGOUT,
                        Vec::new(),
                        Some(body),
                    )
                    .await
                {
                    warn!("[ApiClient] Server-side logout failed: {}", e);
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(
                    "[ApiClient] Could not read refresh token for logout: {}",
                    e
                );
            }
        }

        self.store.clear().await?;
        Ok(())
    }

    /// Whether the stored session is still valid.
    ///
    /// False without any network traffic when no access token is stored.
    pub async fn check_session(&self) -> ClientResult<bool> {
        if self.store.access_token().await?.is_none() {
            return Ok(false);
        }
        match self
            .request(Method::Get, routes::usuarios::auth::CHECK, Vec::new(), None)
            .await
        {
            Ok(response) => Ok(response.is_success()),
            Err(e) => {
                debug!("[ApiClient] Session check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> ClientResult<T> {
        let response =
            self.request(Method::Get, path, Vec::new(), None).await?;
        Self::decode(response, fallback)
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> ClientResult<T> {
        let body = serde_json::to_vec(body)?;
        let response = self
            .request(Method::Post, path, Vec::new(), Some(body))
            .await?;
        Self::decode(response, fallback)
    }

    async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> ClientResult<T> {
        let response =
            self.request(Method::Post, path, Vec::new(), None).await?;
        Self::decode(response, fallback)
    }

    async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> ClientResult<T> {
        let body = serde_json::to_vec(body)?;
        let response = self
            .request(Method::Put, path, Vec::new(), Some(body))
            .await?;
        Self::decode(response, fallback)
    }

    /// Interpret a business response: 2xx bodies parse as JSON, anything
    /// else surfaces the server's `{error}` message or the fallback.
    fn decode<T: DeserializeOwned>(
        response: HttpResponse,
        fallback: &str,
    ) -> ClientResult<T> {
        if response.is_success() {
            Ok(response.json()?)
        } else {
            Err(ClientError::Api(
                Self::server_error_message(&response)
                    .unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }

    fn server_error_message(response: &HttpResponse) -> Option<String> {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            error: Option<String>,
        }
        serde_json::from_slice::<ErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.error)
    }
}

impl ApiClient {
    /// List all user accounts
    pub async fn list_usuarios(&self) -> ClientResult<Vec<Usuario>> {
        self.get_json(
            routes::usuarios::COLLECTION,
            "Error al obtener usuarios",
        )
        .await
    }

    /// Create a user account
    pub async fn create_usuario(
        &self,
        nuevo: &fichaje_model::NuevoUsuario,
    ) -> ClientResult<Usuario> {
        self.post_json(
            routes::usuarios::COLLECTION,
            nuevo,
            "Error al crear usuario",
        )
        .await
    }

    /// Apply a partial update to a user account
    pub async fn update_usuario(
        &self,
        id: i64,
        cambios: &fichaje_model::ActualizarUsuario,
    ) -> ClientResult<Usuario> {
        self.put_json(
            &routes::usuarios::item(id),
            cambios,
            "Error al actualizar usuario",
        )
        .await
    }

    /// Delete a user account
    pub async fn delete_usuario(&self, id: i64) -> ClientResult<()> {
        let response = self
            .request(
                Method::Delete,
                &routes::usuarios::item(id),
                Vec::new(),
                None,
            )
            .await?;
        if response.is_success() {
            info!("[ApiClient] Deleted user {}", id);
            Ok(())
        } else {
            Err(ClientError::Api(
                Self::server_error_message(&response)
                    .unwrap_or_else(|| "Error al eliminar usuario".to_string()),
            ))
        }
    }

    /// Clock in the current user
    pub async fn marcar_entrada(
        &self,
    ) -> ClientResult<fichaje_model::MarcarResponse> {
        self.post_empty(
            routes::asistencia::MARCAR_ENTRADA,
            "Error al marcar entrada",
        )
        .await
    }

    /// Clock out the current user
    pub async fn marcar_salida(
        &self,
    ) -> ClientResult<fichaje_model::MarcarResponse> {
        self.post_empty(
            routes::asistencia::MARCAR_SALIDA,
            "Error al marcar salida",
        )
        .await
    }

    /// Late-arrivals report
    pub async fn reportes_atrasos(
        &self,
    ) -> ClientResult<fichaje_model::ReporteAtrasos> {
        self.get_json(
            routes::asistencia::reportes::ATRASOS,
            "Error al obtener reportes de atrasos",
        )
        .await
    }

    /// Absences report
    pub async fn reportes_inasistencias(
        &self,
    ) -> ClientResult<fichaje_model::ReporteInasistencias> {
        self.get_json(
            routes::asistencia::reportes::INASISTENCIAS,
            "Error al obtener reportes de inasistencias",
        )
        .await
    }

    /// Early-departures report
    pub async fn reportes_salidas_anticipadas(
        &self,
    ) -> ClientResult<fichaje_model::ReporteSalidasAnticipadas> {
        self.get_json(
            routes::asistencia::reportes::SALIDAS_ANTICIPADAS,
            "Error al obtener reportes de salidas anticipadas",
        )
        .await
    }

    /// Full attendance log, optionally filtered by day and user
    pub async fn todos_los_registros(
        &self,
        fecha: Option<chrono::NaiveDate>,
        usuario_id: Option<i64>,
    ) -> ClientResult<fichaje_model::TodosLosRegistros> {
        let mut path = routes::asistencia::TODOS_REGISTROS.to_string();
        let mut query = Vec::new();
        if let Some(fecha) = fecha {
            query.push(format!("fecha={fecha}"));
        }
        if let Some(id) = usuario_id {
            query.push(format!("usuario_id={id}"));
        }
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query.join("&"));
        }
        self.get_json(&path, "Error al obtener registros").await
    }

    /// Attendance records inside an inclusive date range
    pub async fn registros_por_rango(
        &self,
        fecha_inicio: chrono::NaiveDate,
        fecha_fin: chrono::NaiveDate,
    ) -> ClientResult<fichaje_model::TodosLosRegistros> {
        let path = format!(
            "{}?fecha_inicio={}&fecha_fin={}",
            routes::asistencia::REGISTROS,
            fecha_inicio,
            fecha_fin
        );
        self.get_json(&path, "Error al obtener registros por rango")
            .await
    }
}
