use embeddb::{EmbedDB, EmbedError, Embedder, MetaValue, Metadata};
use std::sync::Arc;
use std::time::Instant;

use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::Tokenizer;

const MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";
const DB_FILE: &str = "text_db.json";

const DOCUMENTS: [&str; 4] = [
    "EmbedDB is a lightweight vector database for rapid prototyping.",
    "Vector databases store embeddings for semantic search applications.",
    "Semantic search finds documents based on meaning, not just keywords.",
    "EmbedDB provides a simple API in a single Rust crate.",
];

/// Sentence embedder: BERT forward pass, mean pooling, L2 normalization.
struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl BertEmbedder {
    fn load(model_id: &str, device: Device) -> Result<Self, Box<dyn std::error::Error>> {
        let api = Api::new()?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let tokenizer_path = repo.get("tokenizer.json")?;
        let config_path = repo.get("config.json")?;
        let weights_path = repo.get("model.safetensors")?;

        let config: Config = serde_json::from_str(&std::fs::read_to_string(config_path)?)?;
        let tokenizer = Tokenizer::from_file(tokenizer_path).map_err(|e| e.to_string())?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], candle_core::DType::F32, &device)?
        };
        let model = BertModel::load(vb, &config)?;
        Ok(BertEmbedder { model, tokenizer, device })
    }
}

fn mean_pooling(
    hidden_states: &Tensor,
    attention_mask: &Tensor,
) -> candle_core::Result<Tensor> {
    let mask_expanded = attention_mask
        .unsqueeze(2)?
        .broadcast_as(hidden_states.shape())?
        .to_dtype(hidden_states.dtype())?;
    let sum_embeddings = (hidden_states * &mask_expanded)?.sum(1)?;
    let sum_mask = mask_expanded.sum(1)?.clamp(1e-9, f64::MAX)?;
    sum_embeddings.broadcast_div(&sum_mask)
}

fn l2_normalize(tensor: &Tensor) -> candle_core::Result<Tensor> {
    let norm = tensor.sqr()?.sum_keepdim(1)?.sqrt()?;
    tensor.broadcast_div(&norm.clamp(1e-12, f64::MAX)?)
}

impl Embedder for BertEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let encoding = self.tokenizer.encode(text, true)?;
        let len = encoding.get_ids().len();
        let ids = Tensor::from_vec(encoding.get_ids().to_vec(), (1, len), &self.device)?;
        let mask = Tensor::from_vec(encoding.get_attention_mask().to_vec(), (1, len), &self.device)?;
        let type_ids = ids.zeros_like()?;

        let hidden = self.model.forward(&ids, &type_ids, Some(&mask))?;
        let pooled = mean_pooling(&hidden, &mask)?;
        let normalized = l2_normalize(&pooled)?;
        Ok(normalized.get(0)?.to_vec1()?)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let query = if args.is_empty() {
        "How can I find similar documents?".to_string()
    } else {
        args.join(" ")
    };

    let device = Device::cuda_if_available(0)?;

    println!("Loading model '{}'...", MODEL_ID);
    let start = Instant::now();
    let embedder = BertEmbedder::load(MODEL_ID, device)?;
    println!("Model loaded in {:.3}s\n", start.elapsed().as_secs_f64());

    let db = EmbedDB::builder().embedder(Arc::new(embedder)).build();

    for (i, doc) in DOCUMENTS.iter().enumerate() {
        db.add_text(format!("doc{}", i), doc, None)?;
    }
    println!("Added {} documents to the database.\n", DOCUMENTS.len());

    let start = Instant::now();
    let results = db.search_text(&query, 2)?;
    println!("Query: \"{}\" ({:.1}ms)\n", query, start.elapsed().as_secs_f64() * 1000.0);

    println!("Top results:");
    for (rank, hit) in results.iter().enumerate() {
        let text = hit.metadata.get("text").and_then(MetaValue::as_str).unwrap_or("");
        println!("  {}. {} (score: {:.4})", rank + 1, text, hit.similarity);
    }

    db.save(DB_FILE)?;
    println!("\nDatabase saved to {}", DB_FILE);

    // Custom metadata is stored as given
    println!("\nAdding a document with custom metadata:");
    let metadata = Metadata::from([
        ("text".to_string(), MetaValue::from("This is a test document")),
        ("category".to_string(), MetaValue::from("test")),
        ("tags".to_string(), MetaValue::from(vec!["example", "embeddings"])),
    ]);
    db.add_text("custom_doc", "This is a test document", Some(metadata))?;

    let (_vector, meta) = db.get("custom_doc")?;
    println!("Retrieved metadata: {}", serde_json::to_string(&meta)?);

    Ok(())
}
