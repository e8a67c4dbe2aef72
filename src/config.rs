//! Construction-time configuration.

use serde::{Deserialize, Serialize};

/// What `search_vector` does when the database holds no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySearchPolicy {
    /// Return an empty result list.
    #[default]
    ReturnEmpty,
    /// Fail with [`Error::EmptyStore`](crate::Error::EmptyStore).
    Error,
}

/// Options recognized when building a database.
///
/// ```
/// use embeddb::{EmptySearchPolicy, StoreConfig};
///
/// let config: StoreConfig = serde_json::from_str(r#"{"dim": 384}"#).unwrap();
/// assert_eq!(config.dim, Some(384));
/// assert_eq!(config.empty_search, EmptySearchPolicy::ReturnEmpty);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Pins the vector length before any insertion.
    pub dim: Option<usize>,
    pub empty_search: EmptySearchPolicy,
}
