//! Novel client: HTTP plumbing, session persistence and endpoint services.
pub mod api;
mod auth;
mod client;
pub mod session;
mod settings;
mod transport;
mod types;

pub use auth::{is_public_read, AuthPolicy};
pub use client::{ApiClient, RequestOptions};
pub use session::{
    FileSessionStore, MemorySessionStore, SessionGrant, SessionKey, SessionStore, StoreError,
};
pub use settings::{ClientSettings, ConfigError, BASE_URL_VAR, DEFAULT_BASE_URL, TIMEOUT_VAR};
pub use transport::{OutgoingRequest, ReqwestTransport, Transport};
pub use types::{ClientError, FailureKind, RawResponse, CONNECTIVITY_MESSAGE};

pub use reqwest::Method;
