//! The database module
//! Provide CRUD and search methods for the vector database

use crate::config::{EmptySearchPolicy, StoreConfig};
use crate::embed::Embedder;
use crate::error::{Error, Result};
use crate::record::{text_metadata, Metadata, SearchHit, VectorRecord};
use crate::vector;
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::debug;

/// Records kept in insertion order.
///
/// Vectors are stored contiguously as `[v1_d1, v1_d2, ..., v2_d1, ...]`,
/// with `ids` and `metadata` at the matching positions.
#[derive(Debug, Default)]
pub(crate) struct Records {
    pub(crate) dimension: Option<usize>,
    ids: Vec<String>,
    vectors: Vec<f32>,
    metadata: Vec<Metadata>,
    index: HashMap<String, usize>,
}

impl Records {
    pub(crate) fn with_dimension(dimension: Option<usize>) -> Records {
        Records { dimension, ..Records::default() }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    /// Checks `vector` against the established dimension without mutating.
    pub(crate) fn check(&self, vector: &[f32]) -> Result<()> {
        check_components(vector)?;
        match self.dimension {
            Some(d) if d != vector.len() => {
                Err(Error::DimensionMismatch { expected: d, actual: vector.len() })
            }
            _ => Ok(()),
        }
    }

    /// Inserts or replaces. Returns `true` when an existing record was replaced.
    pub(crate) fn upsert(&mut self, id: String, vector: Vec<f32>, metadata: Metadata) -> Result<bool> {
        self.check(&vector)?;
        let dim = vector.len();
        self.dimension = Some(dim);

        if let Some(&index) = self.index.get(&id) {
            let start = index * dim;
            self.vectors[start..start + dim].copy_from_slice(&vector);
            self.metadata[index] = metadata;
            return Ok(true);
        }

        self.index.insert(id.clone(), self.ids.len());
        self.ids.push(id);
        self.vectors.extend(vector);
        self.metadata.push(metadata);
        Ok(false)
    }

    pub(crate) fn remove(&mut self, id: &str) -> Result<()> {
        let index = self.index.remove(id).ok_or_else(|| Error::NotFound(id.to_string()))?;
        let dim = self.dim_or_zero();

        self.vectors.drain(index * dim..(index + 1) * dim);
        self.ids.remove(index);
        self.metadata.remove(index);
        for position in self.index.values_mut() {
            if *position > index {
                *position -= 1;
            }
        }
        Ok(())
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn id(&self, index: usize) -> &str {
        &self.ids[index]
    }

    pub(crate) fn meta(&self, index: usize) -> &Metadata {
        &self.metadata[index]
    }

    /// Retrieves a vector slice from the flat array by index.
    pub(crate) fn vector(&self, index: usize) -> &[f32] {
        let dim = self.dim_or_zero();
        let start = index * dim;
        &self.vectors[start..start + dim]
    }

    pub(crate) fn ids(&self) -> &[String] {
        &self.ids
    }

    fn dim_or_zero(&self) -> usize {
        self.dimension.unwrap_or(0)
    }
}

/// Rejects empty vectors and non-finite components.
pub(crate) fn check_components(vector: &[f32]) -> Result<()> {
    if vector.is_empty() {
        return Err(Error::InvalidVector("vector is empty".to_string()));
    }
    if let Some(pos) = vector.iter().position(|x| !x.is_finite()) {
        return Err(Error::InvalidVector(format!("component {} is not finite", pos)));
    }
    Ok(())
}

/// An embedded vector database.
///
/// Every operation takes `&self`; the record set sits behind a single mutex,
/// so one `EmbedDB` can be shared between threads (e.g. in an `Arc`).
pub struct EmbedDB {
    records: Mutex<Records>,
    config: StoreConfig,
    embedder: Option<Arc<dyn Embedder>>,
}

impl fmt::Debug for EmbedDB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbedDB")
            .field("count", &self.count())
            .field("dim", &self.dim())
            .field("config", &self.config)
            .field("embedder", &self.embedder.is_some())
            .finish()
    }
}

impl Default for EmbedDB {
    fn default() -> Self {
        EmbedDB::new()
    }
}

impl EmbedDB {
    /// Creates a new empty vector database instance.
    ///
    /// The database starts with no dimension constraint and no embedder. The
    /// dimension will be set automatically on the first insert operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use embeddb::EmbedDB;
    ///
    /// let db = EmbedDB::new();
    /// assert_eq!(db.count(), 0);
    /// ```
    pub fn new() -> EmbedDB {
        EmbedDB::with_config(StoreConfig::default(), None)
    }

    pub fn with_config(config: StoreConfig, embedder: Option<Arc<dyn Embedder>>) -> EmbedDB {
        EmbedDB {
            records: Mutex::new(Records::with_dimension(config.dim)),
            config,
            embedder,
        }
    }

    pub fn builder() -> EmbedDBBuilder {
        EmbedDBBuilder::default()
    }

    pub(crate) fn from_parts(
        records: Records,
        config: StoreConfig,
        embedder: Option<Arc<dyn Embedder>>,
    ) -> EmbedDB {
        EmbedDB { records: Mutex::new(records), config, embedder }
    }

    /// Attaches an embedder, e.g. after [`load`](EmbedDB::load).
    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> EmbedDB {
        self.embedder = Some(embedder);
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Records> {
        // Records are only mutated after validation, a panicking holder cannot
        // leave them half-written.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts or replaces a vector in the database.
    ///
    /// If the ID already exists, its vector and metadata are replaced entirely
    /// and the record keeps its position. If no dimension is established yet,
    /// this vector's length becomes the dimension.
    ///
    /// # Errors
    ///
    /// * [`Error::DimensionMismatch`] - length differs from the dimension
    /// * [`Error::InvalidVector`] - empty vector or non-finite component
    ///
    /// The database is left untouched on error.
    ///
    /// # Examples
    ///
    /// ```
    /// use embeddb::{EmbedDB, Metadata};
    ///
    /// let db = EmbedDB::new();
    /// db.add_vector("vec1", vec![3.0, 4.0], Metadata::new()).unwrap();
    ///
    /// // Dimension mismatch error
    /// let result = db.add_vector("vec2", vec![1.0, 2.0, 3.0], Metadata::new());
    /// assert!(result.is_err());
    /// assert_eq!(db.count(), 1);
    /// ```
    pub fn add_vector(&self, id: impl Into<String>, vector: Vec<f32>, metadata: Metadata) -> Result<()> {
        let id = id.into();
        let replaced = self.lock().upsert(id.clone(), vector, metadata)?;
        debug!(id = %id, replaced, "stored vector");
        Ok(())
    }

    /// Embeds `text` and stores the result under `id`.
    ///
    /// With `metadata == None` the record gets `{"text": text}`. Custom
    /// metadata is stored exactly as given, no `text` key is added.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use embeddb::{EmbedDB, HashEmbedder};
    ///
    /// let db = EmbedDB::builder().embedder(Arc::new(HashEmbedder::new(8))).build();
    /// db.add_text("d1", "hello", None).unwrap();
    ///
    /// let (vector, meta) = db.get("d1").unwrap();
    /// assert_eq!(vector.len(), 8);
    /// assert_eq!(meta["text"].as_str(), Some("hello"));
    /// ```
    pub fn add_text(&self, id: impl Into<String>, text: &str, metadata: Option<Metadata>) -> Result<()> {
        let vector = self.embed(text)?;
        let metadata = metadata.unwrap_or_else(|| text_metadata(text));
        self.add_vector(id, vector, metadata)
    }

    /// Searches for the `top_k` most similar records to `query`.
    ///
    /// Scores are cosine similarities in `[-1.0, 1.0]`, highest first; equal
    /// scores keep insertion order. A `top_k` of 0 gives an empty list and a
    /// `top_k` larger than the database gives every record.
    ///
    /// # Errors
    ///
    /// * [`Error::DimensionMismatch`] - query length differs from the dimension
    /// * [`Error::EmptyStore`] - no records and the policy is
    ///   [`EmptySearchPolicy::Error`]
    ///
    /// # Examples
    ///
    /// ```
    /// use embeddb::{EmbedDB, Metadata};
    ///
    /// let db = EmbedDB::new();
    /// db.add_vector("vec1", vec![1.0, 0.0, 0.0], Metadata::new()).unwrap();
    /// db.add_vector("vec2", vec![0.0, 1.0, 0.0], Metadata::new()).unwrap();
    /// db.add_vector("vec3", vec![0.7, 0.7, 0.0], Metadata::new()).unwrap();
    ///
    /// let results = db.search_vector(&[1.0, 0.0, 0.0], 2).unwrap();
    /// assert_eq!(results.len(), 2);
    /// assert_eq!(results[0].id, "vec1");
    /// assert!((results[0].similarity - 1.0).abs() < 1e-6);
    /// ```
    pub fn search_vector(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        let records = self.lock();

        if let Some(d) = records.dimension {
            if d != query.len() {
                return Err(Error::DimensionMismatch { expected: d, actual: query.len() });
            }
        }
        check_components(query)?;
        if records.len() == 0 {
            return match self.config.empty_search {
                EmptySearchPolicy::ReturnEmpty => Ok(Vec::new()),
                EmptySearchPolicy::Error => Err(Error::EmptyStore),
            };
        }

        let candidates = (0..records.len()).map(|i| (i, records.vector(i)));
        let ranked = vector::top_k(query, candidates, top_k)?;

        let hits = ranked
            .into_iter()
            .map(|(i, similarity)| SearchHit {
                id: records.id(i).to_string(),
                similarity,
                metadata: records.meta(i).clone(),
            })
            .collect();
        Ok(hits)
    }

    /// Embeds `query` and runs [`search_vector`](EmbedDB::search_vector).
    pub fn search_text(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        let embedded = self.embed(query)?;
        self.search_vector(&embedded, top_k)
    }

    /// Retrieves the vector and metadata stored under `id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use embeddb::{EmbedDB, Error, Metadata};
    ///
    /// let db = EmbedDB::new();
    /// db.add_vector("vec1", vec![3.0, 4.0], Metadata::new()).unwrap();
    ///
    /// let (vector, _meta) = db.get("vec1").unwrap();
    /// assert_eq!(vector, vec![3.0, 4.0]);
    ///
    /// assert!(matches!(db.get("vec2"), Err(Error::NotFound(_))));
    /// ```
    pub fn get(&self, id: &str) -> Result<(Vec<f32>, Metadata)> {
        let records = self.lock();
        let index = records.position(id).ok_or_else(|| Error::NotFound(id.to_string()))?;
        Ok((records.vector(index).to_vec(), records.meta(index).clone()))
    }

    /// Deletes a record by its ID.
    ///
    /// Later records move up one position; their relative order is kept.
    pub fn delete(&self, id: &str) -> Result<()> {
        self.lock().remove(id)?;
        debug!(id = %id, "deleted vector");
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().position(id).is_some()
    }

    /// Returns the number of records in the database.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns all IDs in insertion order.
    pub fn list_ids(&self) -> Vec<String> {
        self.lock().ids().to_vec()
    }

    /// Returns a copy of every record in insertion order.
    pub fn records(&self) -> Vec<VectorRecord> {
        let records = self.lock();
        (0..records.len())
            .map(|i| VectorRecord {
                id: records.id(i).to_string(),
                vector: records.vector(i).to_vec(),
                metadata: records.meta(i).clone(),
            })
            .collect()
    }

    /// The established vector dimension, if any.
    pub fn dim(&self) -> Option<usize> {
        self.lock().dimension
    }

    /// Removes every record and resets the dimension to the configured one.
    pub fn clear(&self) {
        *self.lock() = Records::with_dimension(self.config.dim);
        debug!("cleared database");
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedder = self.embedder.as_ref().ok_or(Error::EmbeddingUnavailable)?;
        embedder.embed(text).map_err(Error::Embedding)
    }
}

/// Builder for [`EmbedDB`].
///
/// ```
/// use std::sync::Arc;
/// use embeddb::{EmbedDB, EmptySearchPolicy, HashEmbedder};
///
/// let db = EmbedDB::builder()
///     .dim(16)
///     .embedder(Arc::new(HashEmbedder::new(16)))
///     .empty_search(EmptySearchPolicy::Error)
///     .build();
/// assert_eq!(db.dim(), Some(16));
/// ```
#[derive(Default)]
pub struct EmbedDBBuilder {
    config: StoreConfig,
    embedder: Option<Arc<dyn Embedder>>,
}

impl EmbedDBBuilder {
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dim(mut self, dim: usize) -> Self {
        self.config.dim = Some(dim);
        self
    }

    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn empty_search(mut self, policy: EmptySearchPolicy) -> Self {
        self.config.empty_search = policy;
        self
    }

    pub fn build(self) -> EmbedDB {
        EmbedDB::with_config(self.config, self.embedder)
    }

    pub(crate) fn into_parts(self) -> (StoreConfig, Option<Arc<dyn Embedder>>) {
        (self.config, self.embedder)
    }
}

#[cfg(test)]
mod db_test {
    use super::*;
    use crate::embed::HashEmbedder;
    use crate::record::MetaValue;

    fn meta(key: &str, value: impl Into<MetaValue>) -> Metadata {
        Metadata::from([(key.to_string(), value.into())])
    }

    fn text_db() -> EmbedDB {
        EmbedDB::builder().embedder(Arc::new(HashEmbedder::new(8))).build()
    }

    // ========== Insert Tests ==========

    #[test]
    fn test_insert_single_vector() {
        let db = EmbedDB::new();
        db.add_vector("vec1", vec![1.0, 2.0, 3.0], Metadata::new()).unwrap();

        let records = db.lock();
        assert_eq!(records.ids(), ["vec1".to_string()]);
        assert_eq!(records.dimension, Some(3));
        assert_eq!(records.vectors.len(), 3);
    }

    #[test]
    fn test_insert_multiple_vectors() {
        let db = EmbedDB::new();
        db.add_vector("vec1", vec![1.0, 0.0, 0.0], Metadata::new()).unwrap();
        db.add_vector("vec2", vec![0.0, 1.0, 0.0], Metadata::new()).unwrap();
        db.add_vector("vec3", vec![0.0, 0.0, 1.0], Metadata::new()).unwrap();

        assert_eq!(db.count(), 3);
        assert_eq!(db.lock().vectors.len(), 9); // 3 vectors × 3 dimensions
    }

    #[test]
    fn test_vectors_stored_unnormalized() {
        let db = EmbedDB::new();
        db.add_vector("vec1", vec![3.0, 4.0], Metadata::new()).unwrap();

        assert_eq!(db.get("vec1").unwrap().0, vec![3.0, 4.0]);
    }

    #[test]
    fn test_insert_dimension_mismatch() {
        let db = EmbedDB::new();
        db.add_vector("vec1", vec![1.0, 2.0, 3.0], Metadata::new()).unwrap();

        let result = db.add_vector("vec2", vec![1.0, 2.0], Metadata::new());
        assert!(matches!(result, Err(Error::DimensionMismatch { expected: 3, actual: 2 })));
        assert_eq!(db.count(), 1);
    }

    #[test]
    fn test_replace_with_wrong_dimension_keeps_old() {
        let db = EmbedDB::new();
        db.add_vector("vec1", vec![1.0, 2.0], meta("a", 1)).unwrap();

        assert!(db.add_vector("vec1", vec![1.0, 2.0, 3.0], meta("b", 2)).is_err());
        assert_eq!(db.get("vec1").unwrap(), (vec![1.0, 2.0], meta("a", 1)));
    }

    #[test]
    fn test_insert_rejects_invalid_vectors() {
        let db = EmbedDB::new();

        assert!(matches!(db.add_vector("e", vec![], Metadata::new()), Err(Error::InvalidVector(_))));
        assert!(matches!(
            db.add_vector("n", vec![1.0, f32::NAN], Metadata::new()),
            Err(Error::InvalidVector(_))
        ));
        assert!(matches!(
            db.add_vector("i", vec![f32::INFINITY, 0.0], Metadata::new()),
            Err(Error::InvalidVector(_))
        ));
        assert_eq!(db.count(), 0);
        assert_eq!(db.dim(), None);
    }

    #[test]
    fn test_pinned_dimension() {
        let db = EmbedDB::builder().dim(2).build();

        let result = db.add_vector("vec1", vec![1.0, 2.0, 3.0], Metadata::new());
        assert!(matches!(result, Err(Error::DimensionMismatch { expected: 2, actual: 3 })));
        db.add_vector("vec1", vec![1.0, 2.0], Metadata::new()).unwrap();
    }

    #[test]
    fn test_replacement_does_not_merge() {
        let db = EmbedDB::new();
        db.add_vector("x", vec![1.0, 0.0], meta("a", 1)).unwrap();
        db.add_vector("x", vec![0.0, 1.0], meta("b", 2)).unwrap();

        assert_eq!(db.count(), 1);
        assert_eq!(db.get("x").unwrap(), (vec![0.0, 1.0], meta("b", 2)));
    }

    #[test]
    fn test_replacement_keeps_position() {
        let db = EmbedDB::new();
        db.add_vector("a", vec![1.0, 0.0], Metadata::new()).unwrap();
        db.add_vector("b", vec![0.0, 1.0], Metadata::new()).unwrap();
        db.add_vector("a", vec![1.0, 1.0], Metadata::new()).unwrap();

        assert_eq!(db.list_ids(), vec!["a", "b"]);
        assert_eq!(db.get("b").unwrap().0, vec![0.0, 1.0]);
    }

    // ========== Text Tests ==========

    #[test]
    fn test_add_text_default_metadata() {
        let db = text_db();
        db.add_text("d1", "hello", None).unwrap();

        let (_, metadata) = db.get("d1").unwrap();
        assert_eq!(metadata, meta("text", "hello"));
    }

    #[test]
    fn test_add_text_custom_metadata() {
        let db = text_db();
        db.add_text("d2", "hello", Some(meta("category", "x"))).unwrap();

        let (_, metadata) = db.get("d2").unwrap();
        assert_eq!(metadata, meta("category", "x"));
    }

    #[test]
    fn test_add_text_adopts_embedder_dimension() {
        let db = text_db();
        db.add_text("d1", "hello", None).unwrap();

        assert_eq!(db.dim(), Some(8));
    }

    #[test]
    fn test_add_text_without_embedder() {
        let db = EmbedDB::new();

        assert!(matches!(db.add_text("d1", "hello", None), Err(Error::EmbeddingUnavailable)));
        assert!(matches!(db.search_text("hello", 1), Err(Error::EmbeddingUnavailable)));
    }

    #[test]
    fn test_embedder_failure_surfaces() {
        let failing = |_: &str| -> std::result::Result<Vec<f32>, crate::EmbedError> {
            Err("model offline".into())
        };
        let db = EmbedDB::builder().embedder(Arc::new(failing)).build();

        match db.add_text("d1", "hello", None) {
            Err(Error::Embedding(e)) => assert_eq!(e.to_string(), "model offline"),
            other => panic!("Expected embedding error, got {:?}", other),
        }
        assert_eq!(db.count(), 0);
    }

    #[test]
    fn test_embedder_dimension_conflict() {
        let db = text_db();
        db.add_vector("v", vec![1.0, 0.0], Metadata::new()).unwrap();

        let result = db.add_text("d1", "hello", None);
        assert!(matches!(result, Err(Error::DimensionMismatch { expected: 2, actual: 8 })));
    }

    #[test]
    fn test_search_text_finds_same_text() {
        let db = text_db();
        db.add_text("d1", "hello", None).unwrap();
        db.add_text("d2", "goodbye", None).unwrap();

        let results = db.search_text("hello", 1).unwrap();
        assert_eq!(results[0].id, "d1");
        assert!((results[0].similarity - 1.0).abs() < 1e-5);
        assert_eq!(results[0].metadata, meta("text", "hello"));
    }

    // ========== Search Tests ==========

    #[test]
    fn test_search_tie_break_by_insertion() {
        let db = EmbedDB::new();
        db.add_vector("a", vec![1.0, 0.0], Metadata::new()).unwrap();
        db.add_vector("b", vec![0.0, 1.0], Metadata::new()).unwrap();
        db.add_vector("c", vec![1.0, 0.0], Metadata::new()).unwrap();

        let results = db.search_vector(&[1.0, 0.0], 2).unwrap();
        let ids: Vec<&str> = results.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(results[0].similarity, 1.0);
        assert_eq!(results[1].similarity, 1.0);
    }

    #[test]
    fn test_search_top_k_bounds() {
        let db = EmbedDB::new();
        db.add_vector("a", vec![1.0, 0.0], Metadata::new()).unwrap();
        db.add_vector("b", vec![0.0, 1.0], Metadata::new()).unwrap();
        db.add_vector("c", vec![0.5, 0.5], Metadata::new()).unwrap();

        assert!(db.search_vector(&[1.0, 1.0], 0).unwrap().is_empty());
        assert_eq!(db.search_vector(&[1.0, 1.0], 1000).unwrap().len(), 3);
    }

    #[test]
    fn test_search_returns_metadata() {
        let db = EmbedDB::new();
        db.add_vector("a", vec![1.0, 0.0], meta("title", "first")).unwrap();

        let results = db.search_vector(&[1.0, 0.0], 1).unwrap();
        assert_eq!(results[0].metadata, meta("title", "first"));
    }

    #[test]
    fn test_search_empty_database() {
        let db = EmbedDB::new();
        assert!(db.search_vector(&[1.0, 2.0], 5).unwrap().is_empty());

        let strict = EmbedDB::builder().empty_search(EmptySearchPolicy::Error).build();
        assert!(matches!(strict.search_vector(&[1.0, 2.0], 5), Err(Error::EmptyStore)));
    }

    #[test]
    fn test_search_empty_pinned_checks_dimension() {
        let db = EmbedDB::builder().dim(3).build();

        assert!(matches!(
            db.search_vector(&[1.0, 2.0], 5),
            Err(Error::DimensionMismatch { expected: 3, actual: 2 })
        ));
        assert!(db.search_vector(&[1.0, 2.0, 3.0], 5).unwrap().is_empty());
    }

    #[test]
    fn test_search_dimension_mismatch() {
        let db = EmbedDB::new();
        db.add_vector("vec1", vec![1.0, 2.0, 3.0], Metadata::new()).unwrap();

        let result = db.search_vector(&[1.0, 2.0], 1);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_search_zero_query() {
        let db = EmbedDB::new();
        db.add_vector("a", vec![1.0, 0.0], Metadata::new()).unwrap();
        db.add_vector("b", vec![0.0, 1.0], Metadata::new()).unwrap();

        let results = db.search_vector(&[0.0, 0.0], 2).unwrap();
        assert_eq!(results[0].id, "a");
        assert!(results.iter().all(|h| h.similarity == 0.0));
    }

    // ========== Get Tests ==========

    #[test]
    fn test_get_nonexistent_vector() {
        let db = EmbedDB::new();
        db.add_vector("vec1", vec![1.0, 2.0], Metadata::new()).unwrap();

        assert!(matches!(db.get("vec2"), Err(Error::NotFound(id)) if id == "vec2"));
    }

    #[test]
    fn test_get_from_empty_database() {
        let db = EmbedDB::new();
        assert!(matches!(db.get("vec1"), Err(Error::NotFound(_))));
    }

    // ========== Delete Tests ==========

    #[test]
    fn test_delete_existing_vector() {
        let db = EmbedDB::new();
        db.add_vector("vec1", vec![1.0, 2.0], Metadata::new()).unwrap();
        db.add_vector("vec2", vec![3.0, 4.0], Metadata::new()).unwrap();

        db.delete("vec1").unwrap();

        assert!(!db.contains("vec1"));
        assert!(db.contains("vec2"));
        assert_eq!(db.count(), 1);
        assert_eq!(db.lock().vectors.len(), 2); // 1 vector × 2 dimensions
    }

    #[test]
    fn test_delete_nonexistent_vector() {
        let db = EmbedDB::new();
        db.add_vector("vec1", vec![1.0, 2.0], Metadata::new()).unwrap();

        let result = db.delete("vec2");
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(db.count(), 1);
    }

    #[test]
    fn test_delete_from_empty_database() {
        let db = EmbedDB::new();
        assert!(matches!(db.delete("vec1"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_delete_middle_vector() {
        let db = EmbedDB::new();
        db.add_vector("vec1", vec![1.0, 0.0], meta("n", 1)).unwrap();
        db.add_vector("vec2", vec![0.0, 1.0], meta("n", 2)).unwrap();
        db.add_vector("vec3", vec![1.0, 1.0], meta("n", 3)).unwrap();

        db.delete("vec2").unwrap();

        assert_eq!(db.list_ids(), vec!["vec1", "vec3"]);
        assert_eq!(db.get("vec1").unwrap(), (vec![1.0, 0.0], meta("n", 1)));
        assert_eq!(db.get("vec3").unwrap(), (vec![1.0, 1.0], meta("n", 3)));
    }

    #[test]
    fn test_delete_all_keeps_dimension() {
        let db = EmbedDB::new();
        db.add_vector("vec1", vec![1.0, 2.0], Metadata::new()).unwrap();
        db.add_vector("vec2", vec![3.0, 4.0], Metadata::new()).unwrap();

        db.delete("vec1").unwrap();
        db.delete("vec2").unwrap();

        assert_eq!(db.count(), 0);
        assert_eq!(db.lock().vectors.len(), 0);
        assert_eq!(db.dim(), Some(2));
        assert!(db.add_vector("vec3", vec![1.0, 2.0, 3.0], Metadata::new()).is_err());
    }

    #[test]
    fn test_insert_after_delete() {
        let db = EmbedDB::new();
        db.add_vector("vec1", vec![1.0, 2.0], Metadata::new()).unwrap();
        db.delete("vec1").unwrap();

        db.add_vector("vec1", vec![3.0, 4.0], Metadata::new()).unwrap();
        assert_eq!(db.get("vec1").unwrap().0, vec![3.0, 4.0]);
    }

    // ========== Introspection Tests ==========

    #[test]
    fn test_clear_resets_dimension() {
        let pinned = EmbedDB::builder().dim(2).build();
        pinned.add_vector("a", vec![1.0, 2.0], Metadata::new()).unwrap();
        pinned.clear();
        assert_eq!(pinned.count(), 0);
        assert_eq!(pinned.dim(), Some(2));

        let db = EmbedDB::new();
        db.add_vector("a", vec![1.0, 2.0], Metadata::new()).unwrap();
        db.clear();
        assert!(db.is_empty());
        assert_eq!(db.dim(), None);
        db.add_vector("a", vec![1.0, 2.0, 3.0], Metadata::new()).unwrap();
    }

    #[test]
    fn test_records_snapshot() {
        let db = EmbedDB::new();
        db.add_vector("a", vec![1.0, 0.0], meta("k", "v")).unwrap();
        db.add_vector("b", vec![0.0, 1.0], Metadata::new()).unwrap();

        let records = db.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], VectorRecord {
            id: "a".to_string(),
            vector: vec![1.0, 0.0],
            metadata: meta("k", "v"),
        });
        assert_eq!(records[1].id, "b");
    }

    #[test]
    fn test_shared_between_threads() {
        let db = Arc::new(EmbedDB::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let db = Arc::clone(&db);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        db.add_vector(format!("t{}_{}", t, i), vec![t as f32, i as f32 + 1.0], Metadata::new())
                            .unwrap();
                        db.search_vector(&[1.0, 1.0], 3).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(db.count(), 200);
    }
}
