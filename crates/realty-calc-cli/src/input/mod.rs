pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a typed input from `--input <file>` or, failing that, piped stdin.
pub fn load<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        tracing::debug!(path, what, "reading input file");
        return file::read_structured(path);
    }
    if let Some(data) = stdin::read_stdin()? {
        tracing::debug!(what, "reading input from stdin");
        return Ok(serde_json::from_value(data)?);
    }
    Err(format!("--input <file.json|file.yaml> or stdin required for {what}").into())
}
