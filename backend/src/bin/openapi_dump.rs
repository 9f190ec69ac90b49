//! Print the OpenAPI document as pretty JSON.

use std::io::Write;

use utoipa::OpenApi;
use venue_backend::ApiDoc;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let json = ApiDoc::openapi().to_pretty_json()?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
