//! Loading requests from JSON files
//!
//! A request file holds one encoded [`Request`]. Files are looked up by bare
//! name under a base directory, so `floor` resolves to `<base_dir>/floor.json`.

use std::path::{Path, PathBuf};
use unixrpc_core::{codec, Error, Request, Result};

/// Path of the request file named `name` under `base_dir`
pub fn resolve(base_dir: impl AsRef<Path>, name: &str) -> PathBuf {
    base_dir.as_ref().join(format!("{}.json", name))
}

/// Read and decode the request file named `name`
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Codec`] if it
/// does not hold a valid request.
pub fn load(base_dir: impl AsRef<Path>, name: &str) -> Result<Request> {
    let path = resolve(base_dir, name);
    let bytes = std::fs::read(&path)
        .map_err(|e| Error::Io(format!("failed to read {}: {}", path.display(), e)))?;
    let request = codec::decode_request(&bytes)?;
    tracing::debug!(path = %path.display(), method = %request.method, "Loaded request file");
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unixrpc_core::Value;

    #[test]
    fn test_resolve_appends_extension() {
        assert_eq!(resolve("json", "floor"), PathBuf::from("json/floor.json"));
    }

    #[test]
    fn test_load_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("floor.json"),
            r#"{"method": "floor", "params": [3.7], "param_types": ["float"], "id": 1}"#,
        )
        .unwrap();

        let request = load(dir.path(), "floor").unwrap();
        assert_eq!(request.method, "floor");
        assert_eq!(request.params, vec![Value::from(3.7)]);
        assert_eq!(request.param_types, vec!["float".to_string()]);
        assert_eq!(request.id, 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load(dir.path(), "missing"), Err(Error::Io(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{\"method\": ").unwrap();
        assert!(matches!(load(dir.path(), "bad"), Err(Error::Codec(_))));
    }
}
