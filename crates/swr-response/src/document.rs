//! # API Documents
//!
//! Loads Swagger / OpenAPI documents from disk into `serde_json::Value`.
//! The format is chosen by extension, case-insensitively:
//!
//! | Extension       | Parser        |
//! |-----------------|---------------|
//! | `.json`         | `serde_json`  |
//! | `.yaml`, `.yml` | `serde_yaml`  |
//!
//! YAML trees are converted node by node so the rest of the workspace only
//! deals with JSON values. Mapping keys that are not strings are
//! stringified, tags are dropped, and non-finite floats are rejected.

use std::path::Path;

use serde_json::{Map, Number, Value};

use crate::error::ResponseError;

/// Serialization format of an API document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Format implied by the path's extension, or `None` if unsupported.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Parse document text in the format implied by `path`.
///
/// `path` is used for format detection and error context only.
///
/// # Errors
///
/// [`ResponseError::UnsupportedDocumentFormat`] for an unknown extension,
/// [`ResponseError::DocumentLoad`] if the text does not parse or its root is
/// not a mapping.
pub fn parse_document(path: &Path, content: &str) -> Result<Value, ResponseError> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| {
        ResponseError::UnsupportedDocumentFormat {
            path: path.display().to_string(),
        }
    })?;
    let load_error = |reason: String| ResponseError::DocumentLoad {
        path: path.display().to_string(),
        reason,
    };

    let document = match format {
        DocumentFormat::Json => {
            serde_json::from_str(content).map_err(|e| load_error(format!("invalid JSON: {e}")))?
        }
        DocumentFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(content)
                .map_err(|e| load_error(format!("invalid YAML: {e}")))?;
            yaml_to_json(&yaml)
                .map_err(|e| load_error(format!("YAML-to-JSON conversion failed: {e}")))?
        }
    };

    if !document.is_object() {
        return Err(load_error("document root is not a mapping".to_string()));
    }
    Ok(document)
}

/// Read and parse the document at `path`.
pub async fn load_document(path: &Path) -> Result<Value, ResponseError> {
    if DocumentFormat::from_path(path).is_none() {
        return Err(ResponseError::UnsupportedDocumentFormat {
            path: path.display().to_string(),
        });
    }
    let content =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ResponseError::DocumentLoad {
                path: path.display().to_string(),
                reason: format!("cannot read file: {e}"),
            })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "api document read");
    parse_document(path, &content)
}

fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, String> {
    Ok(match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => Value::Number(yaml_number(n)?),
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                object.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Result<Number, String> {
    if let Some(i) = n.as_i64() {
        return Ok(Number::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Number::from(u));
    }
    n.as_f64()
        .and_then(Number::from_f64)
        .ok_or_else(|| format!("number {n} has no JSON representation"))
}

/// Response codes like `200:` parse as YAML integers; they become `"200"`.
fn yaml_key(key: &serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(&tagged.value),
        other => Err(format!("unsupported mapping key {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("api.json")),
            Some(DocumentFormat::Json)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("API.YAML")),
            Some(DocumentFormat::Yaml)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("api.yml")),
            Some(DocumentFormat::Yaml)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("api.txt")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("api")), None);
    }

    #[test]
    fn test_yaml_integer_keys_stringified() {
        let doc = parse_document(
            Path::new("api.yaml"),
            "responses:\n  200:\n    description: ok\n  default:\n    description: err\n",
        )
        .unwrap();
        assert_eq!(
            doc,
            json!({"responses": {"200": {"description": "ok"}, "default": {"description": "err"}}})
        );
    }

    #[test]
    fn test_yaml_scalars_converted() {
        let doc = parse_document(
            Path::new("a.yml"),
            "a: 1\nb: 1.5\nc: true\nd: ~\ne: [x, 2]\nf: !custom tagged\n",
        )
        .unwrap();
        assert_eq!(
            doc,
            json!({"a": 1, "b": 1.5, "c": true, "d": null, "e": ["x", 2], "f": "tagged"})
        );
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let err = parse_document(Path::new("a.yaml"), "a: .inf\n").unwrap_err();
        assert!(matches!(err, ResponseError::DocumentLoad { .. }));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = parse_document(Path::new("a.json"), "{ nope").unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_non_mapping_root_rejected() {
        let err = parse_document(Path::new("a.json"), "[1, 2]").unwrap_err();
        assert!(err.to_string().contains("not a mapping"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_document(&PathBuf::from("/nonexistent/api.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResponseError::DocumentLoad { .. }));
    }

    #[tokio::test]
    async fn test_load_unsupported_extension_before_io() {
        let err = load_document(Path::new("/nonexistent/api.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResponseError::UnsupportedDocumentFormat { .. }));
    }

    #[tokio::test]
    async fn test_load_from_tempfile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.yaml");
        std::fs::write(&path, "swagger: '2.0'\npaths: {}\n").unwrap();
        let doc = load_document(&path).await.unwrap();
        assert_eq!(doc, json!({"swagger": "2.0", "paths": {}}));
    }
}
