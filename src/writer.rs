//! Rendering a document as indented JSON text.
//!
//! Output uses two-space indentation and leaves non-ASCII characters as-is,
//! with no trailing newline.

use serde_json::Value;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::error::FilterError;

/// Render `document` exactly as [`write_document`] would store it.
pub fn to_pretty_string(document: &Value) -> Result<String, FilterError> {
    serde_json::to_string_pretty(document).map_err(|source| FilterError::Serialize { source })
}

/// Serialize `document` into `path`, creating or truncating the file.
pub fn write_document(document: &Value, path: &Path) -> Result<(), FilterError> {
    let write_err = |source: io::Error| FilterError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document).map_err(|source| {
        if source.is_io() {
            write_err(source.into())
        } else {
            FilterError::Serialize { source }
        }
    })?;
    writer.flush().map_err(write_err)?;

    debug!(path = %path.display(), "wrote JSON document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterErrorKind;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn two_space_indent_without_escaping() {
        let doc = json!({"definitions": {"Adresse": {"description": "Rue de l'Église"}}});
        let rendered = to_pretty_string(&doc).unwrap();
        assert_eq!(
            rendered,
            "{\n  \"definitions\": {\n    \"Adresse\": {\n      \"description\": \"Rue de l'Église\"\n    }\n  }\n}"
        );
    }

    #[test]
    fn empty_containers_stay_compact() {
        let rendered = to_pretty_string(&json!({"definitions": {}, "required": []})).unwrap();
        assert_eq!(rendered, "{\n  \"definitions\": {},\n  \"required\": []\n}");
    }

    #[test]
    fn truncates_existing_output() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let out = dir.path().join("out.json");
        fs::write(&out, "x".repeat(4096))?;

        write_document(&json!({"definitions": {}}), &out)?;
        assert_eq!(fs::read_to_string(&out)?, "{\n  \"definitions\": {}\n}");
        Ok(())
    }

    #[test]
    fn missing_parent_directory_is_a_write_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let out = dir.path().join("absent").join("out.json");

        let err = write_document(&json!({"definitions": {}}), &out).unwrap_err();
        assert_eq!(err.kind(), FilterErrorKind::Write);
        assert!(!out.exists());
        Ok(())
    }
}
