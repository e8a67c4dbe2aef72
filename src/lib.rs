//! # EmbedDB - A Small Embedded Vector Database
//!
//! EmbedDB keeps application-chosen IDs mapped to `f32` vectors plus open
//! metadata, and answers exact nearest-neighbor queries by cosine
//! similarity. Text can be stored and searched directly when an
//! [`Embedder`] is configured. The whole database saves to and loads from a
//! single JSON document.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use embeddb::{EmbedDB, HashEmbedder, Metadata};
//!
//! let db = EmbedDB::builder()
//!     .embedder(Arc::new(HashEmbedder::new(3)))
//!     .build();
//!
//! // Insert vectors
//! db.add_vector("vec1", vec![1.0, 0.0, 0.0], Metadata::new()).unwrap();
//! db.add_vector("vec2", vec![0.0, 1.0, 0.0], Metadata::new()).unwrap();
//! db.add_vector("vec3", vec![0.7, 0.7, 0.0], Metadata::new()).unwrap();
//!
//! // Search for similar vectors
//! let results = db.search_vector(&[1.0, 0.0, 0.0], 2).unwrap();
//! assert_eq!(results[0].id, "vec1"); // Most similar vector
//!
//! // Text goes through the embedder; metadata defaults to {"text": ...}
//! db.add_text("doc1", "semantic search", None).unwrap();
//! let (_, meta) = db.get("doc1").unwrap();
//! assert_eq!(meta["text"].as_str(), Some("semantic search"));
//! ```

pub mod config;
pub mod embed;
pub mod error;
pub mod persist;
pub mod record;
pub mod server;
pub mod vector;
mod db;

// Re-export EmbedDB as the primary public API
pub use config::{EmptySearchPolicy, StoreConfig};
pub use db::{EmbedDB, EmbedDBBuilder};
pub use embed::{Embedder, HashEmbedder};
pub use error::{EmbedError, Error, Result};
pub use record::{MetaValue, Metadata, SearchHit, VectorRecord};
