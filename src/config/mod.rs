mod auth;
mod credentials;
mod loader;
mod store;
mod types;

pub use auth::{build_request_auth, RequestAuth};
pub use credentials::{ApiSecret, AuthScheme, KeySource, ResolvedKey};
pub use loader::{ConfigError, BASE_URL_ENV};
pub use store::ConfigStore;
pub use types::{ApiConfig, Config, SearchConfig, StorageConfig};
