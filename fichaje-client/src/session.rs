//! Session lifecycle on top of the API client.
//!
//! Keeps the logged-in profile cached in memory and decides, on startup,
//! whether a persisted session from a previous run is still usable.

use std::sync::Arc;

use log::info;
use tokio::sync::RwLock;

use fichaje_model::Usuario;

use crate::client::ApiClient;
use crate::errors::ClientResult;

/// Tracks who is logged in across the life of the process
#[derive(Debug)]
pub struct SessionManager {
    client: Arc<ApiClient>,
    usuario: RwLock<Option<Usuario>>,
}

impl SessionManager {
    /// Wrap an API client
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            usuario: RwLock::new(None),
        }
    }

    /// The underlying client
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Restore a persisted session, if the server still accepts it.
    ///
    /// A stored profile is only adopted after the server confirms the
    /// token; otherwise the stale credentials are cleared so the next
    /// start does not retry them.
    pub async fn bootstrap(&self) -> ClientResult<Option<Usuario>> {
        let cached = self.client.store().usuario().await?;
        let has_token = self.client.store().access_token().await?.is_some();

        if let (Some(cached), true) = (cached, has_token) {
            if self.client.check_session().await? {
                info!(
                    "[SessionManager] Restored session for {}",
                    cached.email
                );
                *self.usuario.write().await = Some(cached.clone());
                return Ok(Some(cached));
            }
            info!("[SessionManager] Stored session is no longer valid, clearing");
            self.client.store().clear().await?;
        }

        *self.usuario.write().await = None;
        Ok(None)
    }

    /// Log in and cache the returned profile
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> ClientResult<Usuario> {
        let usuario = self.client.login(email, password).await?;
        *self.usuario.write().await = Some(usuario.clone());
        Ok(usuario)
    }

    /// Log out; the cached profile is dropped even if the server call fails
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self.client.logout().await;
        *self.usuario.write().await = None;
        result
    }

    /// The cached profile, if logged in
    pub async fn usuario(&self) -> Option<Usuario> {
        self.usuario.read().await.clone()
    }

    /// True when a profile is cached and an access token is stored
    pub async fn is_authenticated(&self) -> ClientResult<bool> {
        if self.usuario.read().await.is_none() {
            return Ok(false);
        }
        Ok(self.client.store().access_token().await?.is_some())
    }

    /// Whether the logged-in user is an administrator
    pub async fn is_admin(&self) -> bool {
        self.usuario
            .read()
            .await
            .as_ref()
            .map(|u| u.rol.is_admin())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CredentialStore, MemoryCredentialStore};
    use crate::transport::{
        HttpRequest, HttpResponse, Transport, TransportError,
    };
    use fichaje_model::Rol;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    struct FakeTransport {
        script: StdMutex<VecDeque<HttpResponse>>,
        calls: StdMutex<usize>,
    }

    impl FakeTransport {
        fn new(script: Vec<HttpResponse>) -> Arc<Self> {
            Arc::new(Self {
                script: StdMutex::new(script.into()),
                calls: StdMutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl Transport for FakeTransport {
        async fn send(
            &self,
            _request: HttpRequest,
        ) -> Result<HttpResponse, TransportError> {
            *self.calls.lock().unwrap() += 1;
            Ok(self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .expect("transport called more often than scripted"))
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    fn test_usuario(rol: Rol) -> Usuario {
        Usuario {
            id: 1,
            email: "ana@example.com".to_string(),
            nombre: "Ana".to_string(),
            apellido: "Lopez".to_string(),
            rol,
            activo: true,
            date_joined: None,
            last_login: None,
        }
    }

    fn manager_with(
        store: Arc<MemoryCredentialStore>,
        transport: Arc<FakeTransport>,
    ) -> SessionManager {
        SessionManager::new(Arc::new(ApiClient::with_transport(
            "http://api.test/api",
            store,
            transport,
        )))
    }

    #[tokio::test]
    async fn bootstrap_adopts_a_still_valid_session() {
        let store = Arc::new(MemoryCredentialStore::with_credentials(
            "A1",
            "R1",
            Some(test_usuario(Rol::Administrador)),
        ));
        let transport = FakeTransport::new(vec![response(200, "")]);
        let manager = manager_with(store, transport);

        let restored = manager.bootstrap().await.unwrap();
        assert_eq!(restored.unwrap().email, "ana@example.com");
        assert!(manager.is_authenticated().await.unwrap());
        assert!(manager.is_admin().await);
    }

    #[tokio::test]
    async fn bootstrap_clears_a_rejected_session() {
        let store = Arc::new(MemoryCredentialStore::with_credentials(
            "A1",
            "R1",
            Some(test_usuario(Rol::Empleado)),
        ));
        // The check 401s and the refresh is rejected too.
        let transport = FakeTransport::new(vec![
            response(401, ""),
            response(400, ""),
        ]);
        let manager = manager_with(store.clone(), transport.clone());

        assert!(manager.bootstrap().await.unwrap().is_none());
        assert!(store.access_token().await.unwrap().is_none());
        assert!(store.usuario().await.unwrap().is_none());
        assert_eq!(transport.calls(), 2);
        assert!(!manager.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn bootstrap_without_stored_session_stays_offline() {
        let store = Arc::new(MemoryCredentialStore::new());
        let transport = FakeTransport::new(Vec::new());
        let manager = manager_with(store, transport.clone());

        assert!(manager.bootstrap().await.unwrap().is_none());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn logout_drops_the_cached_profile() {
        let store = Arc::new(MemoryCredentialStore::with_credentials(
            "A1",
            "R1",
            Some(test_usuario(Rol::Empleado)),
        ));
        let transport = FakeTransport::new(vec![
            response(200, ""),
            response(500, ""),
        ]);
        let manager = manager_with(store.clone(), transport);

        manager.bootstrap().await.unwrap();
        assert!(manager.is_authenticated().await.unwrap());

        manager.logout().await.unwrap();
        assert!(manager.usuario().await.is_none());
        assert!(!manager.is_authenticated().await.unwrap());
        assert!(store.refresh_token().await.unwrap().is_none());
    }
}
