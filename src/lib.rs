//! catsync
//!
//! Pulls a company's cats from the integration API and merges them into a
//! local SQLite table keyed by the integration's cat id.

pub mod config;
pub mod db;
pub mod models;
pub mod remote;
pub mod sync;
pub mod transform;

pub use config::{Config, ConfigError, RemoteConfig};
pub use db::{init_db, CatRepository, FeatureFlags, FlagError, UpsertError};
pub use models::{Cat, RemoteCat, StoredCat};
pub use remote::{ApiClient, ApiError, CatSource, ClientConfigError};
pub use sync::{classify, ErrorKind, SyncError, SyncResult, SyncService};
pub use transform::{transform, transform_all};
