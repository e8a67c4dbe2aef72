mod cli;

use actix_web::{web, App, HttpServer};
use embeddb::EmbedDB;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:7878";

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        let mut db = EmbedDB::new();
        cli::run_repl(&mut db);
    } else if args[1] == "serve" {
        // Usage: embeddb serve [addr] [db_path]
        let addr = args.get(2).map(String::as_str).unwrap_or(DEFAULT_ADDR);
        let db = match args.get(3) {
            Some(path) if std::path::Path::new(path).exists() => {
                EmbedDB::load(path).map_err(std::io::Error::other)?
            }
            _ => EmbedDB::new(),
        };

        let data = web::Data::new(db);
        tracing::info!(addr, "serving");
        HttpServer::new(move || App::new().app_data(data.clone()).configure(embeddb::server::config))
            .bind(addr)?
            .run()
            .await?;
    } else {
        cli::run_single_command();
    }

    Ok(())
}
