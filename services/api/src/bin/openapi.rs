//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document of the REST surface to disk so the front end can
//! generate its client. The output path defaults to `openapi.json` and can be
//! overridden with the first command-line argument.

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn write_document(path: &str) -> Result<usize, Box<dyn std::error::Error>> {
    let mut doc = ApiDoc::openapi();
    doc.info.title = "Content Pipeline API".to_string();
    let json = doc.to_pretty_json()?;
    std::fs::write(path, &json)?;
    Ok(doc.paths.paths.len())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let routes = write_document(&path)?;
    println!("Wrote {} documented routes to {}", routes, path);
    Ok(())
}
