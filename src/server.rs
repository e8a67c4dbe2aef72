//! REST API for embeddb.
//!
//! Serves one shared [`EmbedDB`] over HTTP with JSON endpoints. The database
//! is registered as application data; every handler goes through its lock,
//! so concurrent requests see consistent state.
//!
//! ## Endpoints
//!
//! - `POST /insert` - Insert or replace vectors (or texts, if an embedder is configured)
//! - `POST /search` - Search by vector or text
//! - `POST /get` - Retrieve vectors and metadata by ID
//! - `POST /delete` - Delete vectors by ID
//! - `POST /save` - Save the database to a file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use actix_web::{web, App, HttpServer};
//! use embeddb::EmbedDB;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let db = web::Data::new(EmbedDB::new());
//!     HttpServer::new(move || App::new().app_data(db.clone()).configure(embeddb::server::config))
//!         .bind("0.0.0.0:7878")?
//!         .run()
//!         .await
//! }
//! ```

use actix_web::{web, HttpResponse, Responder};
use serde::{Serialize, Deserialize};
use crate::{EmbedDB, Error, Metadata, SearchHit};


// --- Request structs ---

#[derive(Deserialize)]
struct InsertEntry {
    id: String,
    values: Option<Vec<f32>>,
    text: Option<String>,
    metadata: Option<Metadata>,
}

#[derive(Deserialize)]
struct Query {
    value: Option<Vec<f32>>,
    text: Option<String>,
    top_k: usize,
}

#[derive(Deserialize)]
struct InsertRequest {
    vectors: Vec<InsertEntry>,
}

#[derive(Deserialize)]
struct SearchRequest {
    queries: Vec<Query>,
}

#[derive(Deserialize)]
struct IdsRequest {
    ids: Vec<String>,
}

#[derive(Deserialize)]
struct SaveRequest {
    path: String,
}

// --- Response structs ---

#[derive(Serialize)]
struct InsertResponse {
    inserted: usize,
    results: Vec<StatusResult>,
}

#[derive(Serialize)]
struct StatusResult {
    id: String,
    status: String,
    message: String,
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<SearchResultGroup>,
}

#[derive(Serialize)]
struct SearchResultGroup {
    matches: Vec<SearchHit>,
    message: String,
}

#[derive(Serialize)]
struct GetResponse {
    results: Vec<GetResult>,
}

#[derive(Serialize)]
struct GetResult {
    id: String,
    values: Option<Vec<f32>>,
    metadata: Option<Metadata>,
}

#[derive(Serialize)]
struct DeleteResponse {
    deleted: usize,
    results: Vec<StatusResult>,
}

fn status(id: &str, outcome: &Result<(), Error>, ok_message: &str) -> StatusResult {
    match outcome {
        Ok(()) => StatusResult {
            id: id.to_string(),
            status: "ok".to_string(),
            message: ok_message.to_string(),
        },
        Err(e) => StatusResult {
            id: id.to_string(),
            status: "error".to_string(),
            message: e.to_string(),
        },
    }
}

fn insert_entry(db: &EmbedDB, entry: &InsertEntry) -> Result<(), Error> {
    match (&entry.values, &entry.text) {
        (Some(values), None) => {
            db.add_vector(entry.id.clone(), values.clone(), entry.metadata.clone().unwrap_or_default())
        }
        (None, Some(text)) => db.add_text(entry.id.clone(), text, entry.metadata.clone()),
        _ => Err(Error::InvalidVector("exactly one of 'values' or 'text' is required".to_string())),
    }
}

fn run_query(db: &EmbedDB, query: &Query) -> Result<Vec<SearchHit>, Error> {
    match (&query.value, &query.text) {
        (Some(value), None) => db.search_vector(value, query.top_k),
        (None, Some(text)) => db.search_text(text, query.top_k),
        _ => Err(Error::InvalidVector("exactly one of 'value' or 'text' is required".to_string())),
    }
}

// --- Handlers ---

async fn insert_handler(db: web::Data<EmbedDB>, body: web::Json<InsertRequest>) -> impl Responder {
    let results: Vec<StatusResult> = body.vectors.iter()
        .map(|entry| status(&entry.id, &insert_entry(&db, entry), "Stored"))
        .collect();
    let inserted = results.iter().filter(|r| r.status == "ok").count();

    HttpResponse::Ok().json(InsertResponse { inserted, results })
}

async fn search_handler(db: web::Data<EmbedDB>, body: web::Json<SearchRequest>) -> impl Responder {
    let results = body.queries.iter()
        .map(|query| match run_query(&db, query) {
            Ok(matches) => SearchResultGroup { matches, message: "Search Success".to_string() },
            Err(e) => SearchResultGroup { matches: Vec::new(), message: e.to_string() },
        })
        .collect();

    HttpResponse::Ok().json(SearchResponse { results })
}

async fn get_handler(db: web::Data<EmbedDB>, body: web::Json<IdsRequest>) -> impl Responder {
    let results = body.ids.iter()
        .map(|id| match db.get(id) {
            Ok((values, metadata)) => GetResult { id: id.clone(), values: Some(values), metadata: Some(metadata) },
            Err(_) => GetResult { id: id.clone(), values: None, metadata: None },
        })
        .collect();

    HttpResponse::Ok().json(GetResponse { results })
}

async fn delete_handler(db: web::Data<EmbedDB>, body: web::Json<IdsRequest>) -> impl Responder {
    let results: Vec<StatusResult> = body.ids.iter()
        .map(|id| status(id, &db.delete(id), "Deleted"))
        .collect();
    let deleted = results.iter().filter(|r| r.status == "ok").count();

    HttpResponse::Ok().json(DeleteResponse { deleted, results })
}

async fn save_handler(db: web::Data<EmbedDB>, body: web::Json<SaveRequest>) -> impl Responder {
    match db.save(&body.path) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({"saved": db.count(), "path": body.path})),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({"error": e.to_string()})),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/insert").route(web::post().to(insert_handler)))
       .service(web::resource("/search").route(web::post().to(search_handler)))
       .service(web::resource("/get").route(web::post().to(get_handler)))
       .service(web::resource("/delete").route(web::post().to(delete_handler)))
       .service(web::resource("/save").route(web::post().to(save_handler)));
}
