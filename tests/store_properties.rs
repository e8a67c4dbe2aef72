use embeddb::{EmbedDB, Error, HashEmbedder, MetaValue, Metadata};
use std::sync::Arc;

fn meta(pairs: &[(&str, MetaValue)]) -> Metadata {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn abc_db() -> EmbedDB {
    let db = EmbedDB::new();
    db.add_vector("a", vec![1.0, 0.0], Metadata::new()).unwrap();
    db.add_vector("b", vec![0.0, 1.0], Metadata::new()).unwrap();
    db.add_vector("c", vec![1.0, 0.0], Metadata::new()).unwrap();
    db
}

#[test]
fn test_uniqueness_latest_wins() {
    let db = EmbedDB::builder().embedder(Arc::new(HashEmbedder::new(2))).build();
    db.add_vector("x", vec![1.0, 0.0], Metadata::new()).unwrap();
    db.add_text("x", "hello", None).unwrap();
    db.add_vector("y", vec![0.0, 1.0], Metadata::new()).unwrap();
    db.add_vector("x", vec![0.5, 0.5], meta(&[("v", MetaValue::from(3))])).unwrap();

    assert_eq!(db.count(), 2);
    assert_eq!(db.get("x").unwrap(), (vec![0.5, 0.5], meta(&[("v", MetaValue::from(3))])));
}

#[test]
fn test_dimension_invariant() {
    let db = abc_db();

    for bad in [vec![1.0], vec![1.0, 0.0, 0.0]] {
        assert!(matches!(
            db.add_vector("d", bad, Metadata::new()),
            Err(Error::DimensionMismatch { expected: 2, .. })
        ));
        assert_eq!(db.count(), 3);
    }
}

#[test]
fn test_ranking_with_tie_break() {
    let results = abc_db().search_vector(&[1.0, 0.0], 2).unwrap();

    let ranked: Vec<(&str, f32)> = results.iter().map(|h| (h.id.as_str(), h.similarity)).collect();
    assert_eq!(ranked, vec![("a", 1.0), ("c", 1.0)]);
}

#[test]
fn test_zero_vector_score() {
    assert_eq!(embeddb::vector::cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
}

#[test]
fn test_top_k_boundaries() {
    let db = abc_db();

    assert!(db.search_vector(&[1.0, 0.0], 0).unwrap().is_empty());
    let all = db.search_vector(&[1.0, 0.0], 1000).unwrap();
    let ids: Vec<&str> = all.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c", "b"]);
}

#[test]
fn test_default_vs_custom_metadata() {
    let db = EmbedDB::builder().embedder(Arc::new(HashEmbedder::new(8))).build();
    db.add_text("d1", "hello", None).unwrap();
    db.add_text("d2", "hello", Some(meta(&[("category", MetaValue::from("x"))]))).unwrap();

    assert_eq!(db.get("d1").unwrap().1, meta(&[("text", MetaValue::from("hello"))]));
    assert_eq!(db.get("d2").unwrap().1, meta(&[("category", MetaValue::from("x"))]));
    // Same text, same vector
    assert_eq!(db.get("d1").unwrap().0, db.get("d2").unwrap().0);
}

#[test]
fn test_replacement_semantics() {
    let db = EmbedDB::new();
    db.add_vector("x", vec![1.0, 2.0], meta(&[("a", MetaValue::from(1))])).unwrap();
    db.add_vector("x", vec![3.0, 4.0], meta(&[("b", MetaValue::from(2))])).unwrap();

    assert_eq!(db.get("x").unwrap(), (vec![3.0, 4.0], meta(&[("b", MetaValue::from(2))])));
}

#[test]
fn test_round_trip_is_observably_equal() {
    let db = EmbedDB::new();
    let records = [
        ("alpha", vec![0.5, -1.0, 2.0], meta(&[("text", MetaValue::from("first"))])),
        ("beta", vec![0.0, 0.0, 0.0], Metadata::new()),
        ("gamma", vec![-3.0, 0.25, 1.0], meta(&[
            ("tags", MetaValue::from(vec!["x", "y"])),
            ("nested", MetaValue::Map(meta(&[("ok", MetaValue::Bool(true)), ("none", MetaValue::Null)]))),
            ("weight", MetaValue::Float(1.5)),
        ])),
        ("delta", vec![0.5, -1.0, 2.0], Metadata::new()),
    ];
    for (id, vector, metadata) in records {
        db.add_vector(id, vector, metadata).unwrap();
    }
    db.delete("beta").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    db.save(&path).unwrap();
    let loaded = EmbedDB::load(&path).unwrap();

    assert_eq!(loaded.count(), db.count());
    assert_eq!(loaded.list_ids(), db.list_ids());
    for id in db.list_ids() {
        assert_eq!(loaded.get(&id).unwrap(), db.get(&id).unwrap());
    }
    let probe = [1.0, -0.5, 2.0];
    assert_eq!(loaded.search_vector(&probe, 10).unwrap(), db.search_vector(&probe, 10).unwrap());
}

#[test]
fn test_loaded_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"dim": 2, "records": [{"id": "a", "vector": [1.0]}]}"#).unwrap();

    assert!(matches!(EmbedDB::load(&path), Err(Error::CorruptData(_))));
}
