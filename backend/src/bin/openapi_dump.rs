//! Print the TravelTrove OpenAPI document.
//!
//! `openapi_dump` writes JSON; `openapi_dump --yaml` writes YAML.

use color_eyre::eyre::Result;
use traveltrove::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    let doc = ApiDoc::openapi();
    let rendered = if std::env::args().skip(1).any(|arg| arg == "--yaml") {
        doc.to_yaml()?
    } else {
        doc.to_pretty_json()?
    };
    println!("{rendered}");
    Ok(())
}
