//! Prints the QUORUM OpenAPI document as JSON to stdout.
//!
//! Usage:
//!   cargo run -p quorum-api --bin generate-openapi > openapi.json

use quorum_api::ApiDoc;
use utoipa::OpenApi;

fn main() {
    let doc = ApiDoc::openapi();

    match serde_json::to_string_pretty(&doc) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize OpenAPI spec: {}", e);
            std::process::exit(1);
        }
    }
}
