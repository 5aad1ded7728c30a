//! Session client for the Fichaje attendance API.
//!
//! Wraps the REST backend behind a typed client that manages the JWT
//! credential pair for the caller: requests carry the stored access token,
//! a 401 is answered with exactly one token refresh and one resend, and an
//! unrecoverable refresh clears the stored credentials and notifies the
//! application through a session-expired callback.

pub mod client;
pub mod config;
pub mod errors;
pub mod routes;
pub mod session;
pub mod store;
pub mod transport;

pub use client::{ApiClient, SessionExpiredCallback};
pub use errors::{ClientError, ClientResult};
pub use session::SessionManager;
pub use store::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, StoreError,
};
pub use transport::{
    HttpRequest, HttpResponse, Method, ReqwestTransport, Transport,
    TransportError,
};

pub use fichaje_model as model;
