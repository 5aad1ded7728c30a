//! Persistent credential storage
//!
//! The session client owns three slots: access token, refresh token, and the
//! cached user profile. They are written wholesale on login, the access token
//! alone on refresh, and cleared wholesale on logout or irrecoverable expiry.
//! The store is an injected dependency so tests and embedders can supply
//! their own persistence.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use fichaje_model::{TokenPair, Usuario};

pub(crate) const SESSION_FILE: &str = "session.json";

/// Credential store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to initialize credential store: {0}")]
    InitFailed(String),

    #[error("failed to read credential store")]
    ReadFailed(#[source] std::io::Error),

    #[error("failed to write credential store")]
    WriteFailed(#[source] std::io::Error),

    #[error("corrupted credential store")]
    CorruptedData(#[source] serde_json::Error),
}

/// Snapshot of the three credential slots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    usuario: Option<Usuario>,
}

/// Storage for the credential pair and cached profile
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn access_token(&self) -> Result<Option<String>, StoreError>;
    async fn refresh_token(&self) -> Result<Option<String>, StoreError>;
    async fn usuario(&self) -> Result<Option<Usuario>, StoreError>;

    /// Overwrite all three slots; called on successful login
    async fn store_session(
        &self,
        tokens: &TokenPair,
        usuario: &Usuario,
    ) -> Result<(), StoreError>;

    /// Overwrite only the access token; called on successful refresh
    async fn store_access_token(&self, access: &str) -> Result<(), StoreError>;

    /// Clear all three slots; called on logout and unrecoverable expiry
    async fn clear(&self) -> Result<(), StoreError>;
}

/// In-memory store for tests and embedders with their own persistence
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    state: RwLock<StoredCredentials>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an existing credential pair, as after a past login
    pub fn with_credentials(
        access: impl Into<String>,
        refresh: impl Into<String>,
        usuario: Option<Usuario>,
    ) -> Self {
        Self {
            state: RwLock::new(StoredCredentials {
                access_token: Some(access.into()),
                refresh_token: Some(refresh.into()),
                usuario,
            }),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn access_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.state.read().await.access_token.clone())
    }

    async fn refresh_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.state.read().await.refresh_token.clone())
    }

    async fn usuario(&self) -> Result<Option<Usuario>, StoreError> {
        Ok(self.state.read().await.usuario.clone())
    }

    async fn store_session(
        &self,
        tokens: &TokenPair,
        usuario: &Usuario,
    ) -> Result<(), StoreError> {
        *self.state.write().await = StoredCredentials {
            access_token: Some(tokens.access.clone()),
            refresh_token: Some(tokens.refresh.clone()),
            usuario: Some(usuario.clone()),
        };
        Ok(())
    }

    async fn store_access_token(&self, access: &str) -> Result<(), StoreError> {
        self.state.write().await.access_token = Some(access.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.state.write().await = StoredCredentials::default();
        Ok(())
    }
}

/// File-backed store surviving application restarts
///
/// Credentials live in a single JSON file under the platform data directory.
/// The file is chmod 0o600 on unix; tokens are opaque bearer strings, so the
/// only defense that matters is keeping other users of the machine out.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store at the platform-default location
    pub fn new() -> Result<Self, StoreError> {
        let proj_dirs = ProjectDirs::from("", "fichaje", "fichaje")
            .ok_or_else(|| {
                StoreError::InitFailed(
                    "unable to determine data directory".to_string(),
                )
            })?;
        Ok(Self {
            path: proj_dirs.data_dir().join(SESSION_FILE),
        })
    }

    /// Create a store at an explicit path, for tests and portable setups
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StoredCredentials, StoreError> {
        if !self.path.exists() {
            return Ok(StoredCredentials::default());
        }
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(StoreError::ReadFailed)?;
        serde_json::from_str(&data).map_err(StoreError::CorruptedData)
    }

    async fn save(&self, state: &StoredCredentials) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StoreError::WriteFailed)?;
        }
        let json = serde_json::to_string_pretty(state)
            .map_err(StoreError::CorruptedData)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(StoreError::WriteFailed)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = tokio::fs::metadata(&self.path)
                .await
                .map_err(StoreError::WriteFailed)?
                .permissions();
            perms.set_mode(0o600);
            tokio::fs::set_permissions(&self.path, perms)
                .await
                .map_err(StoreError::WriteFailed)?;
        }

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn access_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.load().await?.access_token)
    }

    async fn refresh_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.load().await?.refresh_token)
    }

    async fn usuario(&self) -> Result<Option<Usuario>, StoreError> {
        Ok(self.load().await?.usuario)
    }

    async fn store_session(
        &self,
        tokens: &TokenPair,
        usuario: &Usuario,
    ) -> Result<(), StoreError> {
        self.save(&StoredCredentials {
            access_token: Some(tokens.access.clone()),
            refresh_token: Some(tokens.refresh.clone()),
            usuario: Some(usuario.clone()),
        })
        .await
    }

    async fn store_access_token(&self, access: &str) -> Result<(), StoreError> {
        let mut state = self.load().await?;
        state.access_token = Some(access.to_string());
        self.save(&state).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            tokio::fs::remove_file(&self.path)
                .await
                .map_err(StoreError::WriteFailed)?;
            log::info!("Cleared credential store at {:?}", self.path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fichaje_model::Rol;
    use tempfile::TempDir;

    fn test_usuario() -> Usuario {
        Usuario {
            id: 1,
            email: "ana@example.com".to_string(),
            nombre: "Ana".to_string(),
            apellido: "Lopez".to_string(),
            rol: Rol::Empleado,
            activo: true,
            date_joined: None,
            last_login: None,
        }
    }

    fn test_tokens() -> TokenPair {
        TokenPair {
            access: "A1".to_string(),
            refresh: "R1".to_string(),
        }
    }

    #[tokio::test]
    async fn file_store_round_trips_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::with_path(
            temp_dir.path().join(SESSION_FILE),
        );

        store
            .store_session(&test_tokens(), &test_usuario())
            .await
            .unwrap();

        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("A1"));
        assert_eq!(store.refresh_token().await.unwrap().as_deref(), Some("R1"));
        assert_eq!(
            store.usuario().await.unwrap().map(|u| u.email),
            Some("ana@example.com".to_string())
        );
    }

    #[tokio::test]
    async fn refresh_overwrites_only_access_token() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::with_path(
            temp_dir.path().join(SESSION_FILE),
        );
        store
            .store_session(&test_tokens(), &test_usuario())
            .await
            .unwrap();

        store.store_access_token("A2").await.unwrap();

        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("A2"));
        assert_eq!(store.refresh_token().await.unwrap().as_deref(), Some("R1"));
        assert!(store.usuario().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn clear_removes_backing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SESSION_FILE);
        let store = FileCredentialStore::with_path(path.clone());
        store
            .store_session(&test_tokens(), &test_usuario())
            .await
            .unwrap();
        assert!(path.exists());

        store.clear().await.unwrap();
        assert!(!path.exists());
        assert!(store.access_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty_slots() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::with_path(
            temp_dir.path().join(SESSION_FILE),
        );
        assert!(store.access_token().await.unwrap().is_none());
        assert!(store.refresh_token().await.unwrap().is_none());
        assert!(store.usuario().await.unwrap().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SESSION_FILE);
        let store = FileCredentialStore::with_path(path.clone());
        store
            .store_session(&test_tokens(), &test_usuario())
            .await
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
