//! Save/load of the whole database as a JSON document.
//!
//! ```json
//! {
//!   "dim": 2,
//!   "records": [
//!     { "id": "a", "vector": [1.0, 0.0], "metadata": { "text": "hello" } }
//!   ]
//! }
//! ```
//!
//! Records are written in insertion order and read back in the same order.

use crate::db::{check_components, EmbedDB, EmbedDBBuilder, Records};
use crate::error::{Error, Result};
use crate::record::{Metadata, VectorRecord};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};
use tempfile::NamedTempFile;
use tracing::{info, warn};

#[derive(Serialize)]
struct DocumentRef<'a> {
    dim: Option<usize>,
    records: Vec<RecordRef<'a>>,
}

#[derive(Serialize)]
struct RecordRef<'a> {
    id: &'a str,
    vector: &'a [f32],
    metadata: &'a Metadata,
}

#[derive(Deserialize)]
struct Document {
    dim: Option<usize>,
    records: Vec<VectorRecord>,
}

/// Serializes `db` into `writer`.
///
/// The lock is held while writing, so the document is a consistent snapshot.
pub fn write_to<W: Write>(db: &EmbedDB, mut writer: W) -> Result<()> {
    let records = db.lock();
    let document = DocumentRef {
        dim: records.dimension,
        records: (0..records.len())
            .map(|i| RecordRef {
                id: records.id(i),
                vector: records.vector(i),
                metadata: records.meta(i),
            })
            .collect(),
    };

    serde_json::to_writer_pretty(&mut writer, &document).map_err(|e| {
        if e.is_io() {
            Error::Io(e.into())
        } else {
            Error::CorruptData(format!("Serialization failed: {}", e))
        }
    })?;
    writer.flush()?;
    Ok(())
}

/// Parses a document from `reader` into the record set it describes.
pub(crate) fn read_records<R: Read>(reader: R) -> Result<Records> {
    let document: Document = serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            Error::Io(e.into())
        } else {
            Error::CorruptData(format!("Deserialization failed: {}", e))
        }
    })?;

    let mut records = Records::with_dimension(document.dim);
    if document.records.is_empty() {
        return Ok(records);
    }

    let dim = match document.dim {
        Some(d) if d > 0 => d,
        _ => return Err(Error::CorruptData("records present without a dimension".to_string())),
    };

    for record in document.records {
        if record.vector.len() != dim {
            return Err(Error::CorruptData(format!(
                "record '{}' has {} components, expected {}",
                record.id,
                record.vector.len(),
                dim
            )));
        }
        check_components(&record.vector)
            .map_err(|e| Error::CorruptData(format!("record '{}': {}", record.id, e)))?;
        if records.position(&record.id).is_some() {
            return Err(Error::CorruptData(format!("duplicate id '{}'", record.id)));
        }
        records.upsert(record.id, record.vector, record.metadata)?;
    }

    Ok(records)
}

/// Reads a database from `reader`, without an embedder and with default config.
pub fn read_from<R: Read>(reader: R) -> Result<EmbedDB> {
    EmbedDB::builder().read_from(reader)
}

impl EmbedDB {
    /// Saves the database to a JSON file.
    ///
    /// The document goes to a temporary file next to `path` which replaces
    /// `path` only once fully written, so a failed save never leaves a
    /// truncated file behind.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use embeddb::{EmbedDB, Metadata};
    ///
    /// let db = EmbedDB::new();
    /// db.add_vector("vec1", vec![1.0, 2.0, 3.0], Metadata::new()).unwrap();
    /// db.save("my_database.json").unwrap();
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        write_to(self, BufWriter::new(temp.as_file_mut()))?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        info!(path = %path.display(), count = self.count(), "saved database");
        Ok(())
    }

    /// Loads a database from a file previously written by [`save`](EmbedDB::save).
    ///
    /// The loaded database has no embedder; attach one with
    /// [`with_embedder`](EmbedDB::with_embedder) or load through
    /// [`EmbedDBBuilder::load`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use embeddb::EmbedDB;
    ///
    /// let db = EmbedDB::load("my_database.json").unwrap();
    /// println!("Loaded {} vectors", db.count());
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<EmbedDB> {
        EmbedDB::builder().load(path)
    }
}

impl EmbedDBBuilder {
    /// Loads a database file, keeping this builder's embedder and policy.
    ///
    /// A dimension pinned on the builder must agree with the file.
    pub fn load(self, path: impl AsRef<Path>) -> Result<EmbedDB> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let db = self.read_from(BufReader::new(file)).inspect_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to load database");
        })?;

        info!(path = %path.display(), count = db.count(), "loaded database");
        Ok(db)
    }

    pub fn read_from<R: Read>(self, reader: R) -> Result<EmbedDB> {
        let mut records = read_records(reader)?;
        let (config, embedder) = self.into_parts();

        match (config.dim, records.dimension) {
            (Some(pinned), Some(found)) if pinned != found => {
                return Err(Error::DimensionMismatch { expected: pinned, actual: found });
            }
            (Some(pinned), None) => records.dimension = Some(pinned),
            _ => {}
        }

        Ok(EmbedDB::from_parts(records, config, embedder))
    }
}
