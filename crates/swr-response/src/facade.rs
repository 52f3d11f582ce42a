//! # Response Facade
//!
//! Turns request metadata into a managed response value.

use std::path::Path;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use swr_core::{resolve_type, PropertyPath, Schema, SchemaType};
use swr_schema::{ConstrainedArray, ConstrainedObject};

use crate::code::ResponseCode;
use crate::document::{load_document, DocumentFormat};
use crate::error::ResponseError;
use crate::resolver::OperationResolver;

const RESPONSES_CHAIN: [&str; 3] = ["swagger", "operation", "responses"];

/// A constrained response: a closed-shape object or a constrained array,
/// depending on the response schema.
#[derive(Debug, Clone)]
pub enum ManagedResponse {
    Object(ConstrainedObject),
    Array(ConstrainedArray),
}

impl ManagedResponse {
    pub fn as_object(&self) -> Option<&ConstrainedObject> {
        match self {
            Self::Object(object) => Some(object),
            Self::Array(_) => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ConstrainedObject> {
        match self {
            Self::Object(object) => Some(object),
            Self::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&ConstrainedArray> {
        match self {
            Self::Array(array) => Some(array),
            Self::Object(_) => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ConstrainedArray> {
        match self {
            Self::Array(array) => Some(array),
            Self::Object(_) => None,
        }
    }

    /// Plain JSON snapshot of the response.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Object(object) => object.to_value(),
            Self::Array(array) => array.to_value(),
        }
    }
}

impl Serialize for ManagedResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Object(object) => object.serialize(serializer),
            Self::Array(array) => array.serialize(serializer),
        }
    }
}

/// Build the managed response for `code` from the metadata attached to
/// `request` at `swagger.operation.responses.<code>.schema`.
///
/// # Errors
///
/// - [`ResponseError::StructuralLookup`] if a key along that chain is
///   missing.
/// - [`ResponseError::InvalidSchema`] if the schema fragment is not a
///   schema object.
/// - [`ResponseError::UnsupportedSchemaType`] if the schema resolves to
///   anything but `object` or `array`.
/// - [`ResponseError::Validation`] if a declared default breaks its own
///   property's rules.
pub fn resolve_response(
    request: &Value,
    code: impl Into<ResponseCode>,
) -> Result<ManagedResponse, ResponseError> {
    let code = code.into();
    let (schema, schema_type) = response_schema(request, &code)?;

    tracing::debug!(code = %code, schema_type = %schema_type, "building managed response");
    let schema = Arc::new(schema);
    match schema_type {
        SchemaType::Object => Ok(ManagedResponse::Object(ConstrainedObject::build(
            schema,
            PropertyPath::root(),
        )?)),
        SchemaType::Array => Ok(ManagedResponse::Array(ConstrainedArray::build(
            schema,
            PropertyPath::root(),
        )?)),
        other => Err(ResponseError::UnsupportedSchemaType {
            found: other.to_string(),
        }),
    }
}

/// Whether [`resolve_response`] would find an object or array schema for
/// `code`. Never fails.
pub fn manageable(request: &Value, code: impl Into<ResponseCode>) -> bool {
    let code = code.into();
    matches!(
        response_schema(request, &code),
        Ok((_, SchemaType::Object | SchemaType::Array))
    )
}

/// Load the API document at `document_path`, attach operation metadata to
/// `request` with `resolver`, and build the managed response for `code`.
///
/// See [`prepare_request`] for the defaults filled in beforehand.
pub async fn resolve_from_document<R>(
    request: &mut Value,
    code: impl Into<ResponseCode>,
    document_path: impl AsRef<Path>,
    resolver: &R,
) -> Result<ManagedResponse, ResponseError>
where
    R: OperationResolver + ?Sized,
{
    prepare_request(request, document_path, resolver).await?;
    resolve_response(request, code)
}

/// Load the API document at `document_path` and attach the metadata of the
/// operation `request` addresses, leaving `request` ready for
/// [`resolve_response`] and [`manageable`].
///
/// Before resolution the request gets defaults for anything it lacks:
/// `headers.content-type` (the document's first `produces` entry, else
/// `application/json`), `method` (`GET`) and `url` (`/`).
///
/// # Errors
///
/// [`ResponseError::UnsupportedDocumentFormat`] and
/// [`ResponseError::InvalidInput`] are raised before any file access.
/// [`ResponseError::DocumentLoad`] and [`ResponseError::Resolve`] follow.
pub async fn prepare_request<R>(
    request: &mut Value,
    document_path: impl AsRef<Path>,
    resolver: &R,
) -> Result<(), ResponseError>
where
    R: OperationResolver + ?Sized,
{
    let document_path = document_path.as_ref();
    if DocumentFormat::from_path(document_path).is_none() {
        return Err(ResponseError::UnsupportedDocumentFormat {
            path: document_path.display().to_string(),
        });
    }
    let fields = match request {
        Value::Object(fields) => fields,
        other => {
            return Err(ResponseError::InvalidInput {
                reason: format!("request must be an object, found {other}"),
            })
        }
    };

    let document = load_document(document_path).await?;
    apply_request_defaults(fields, &document);
    resolver.attach(&document, fields)?;
    Ok(())
}

fn apply_request_defaults(request: &mut Map<String, Value>, document: &Value) {
    let headers = request
        .entry("headers")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(headers) = headers.as_object_mut() {
        headers.entry("content-type").or_insert_with(|| {
            let produced = document
                .get("produces")
                .and_then(Value::as_array)
                .and_then(|produces| produces.first())
                .and_then(Value::as_str)
                .unwrap_or("application/json");
            Value::String(produced.to_string())
        });
    }
    request
        .entry("method")
        .or_insert_with(|| Value::String("GET".to_string()));
    request
        .entry("url")
        .or_insert_with(|| Value::String("/".to_string()));
}

/// Walk to the response schema for `code` and resolve its type.
fn response_schema(
    request: &Value,
    code: &ResponseCode,
) -> Result<(Schema, SchemaType), ResponseError> {
    let responses = lookup(request, &RESPONSES_CHAIN, &[])?;
    let schema_value = lookup(responses, &[code.as_str(), "schema"], &RESPONSES_CHAIN)?;

    let schema =
        Schema::from_value(schema_value).map_err(|source| ResponseError::InvalidSchema {
            code: code.to_string(),
            source,
        })?;
    let schema_type = resolve_type(&schema);
    Ok((schema, schema_type))
}

/// Follow `chain` from `root`. `walked` is the path already taken to reach
/// `root`, for error messages.
fn lookup<'v, 'k>(
    root: &'v Value,
    chain: &[&'k str],
    walked: &[&'k str],
) -> Result<&'v Value, ResponseError> {
    let mut path: Vec<&'k str> = walked.to_vec();
    let mut current = root;
    for &key in chain {
        match current.as_object().and_then(|object| object.get(key)) {
            Some(next) => {
                path.push(key);
                current = next;
            }
            None => {
                return Err(ResponseError::StructuralLookup {
                    missing: key.to_string(),
                    path: if path.is_empty() {
                        "(root)".to_string()
                    } else {
                        path.join(".")
                    },
                    shape: describe_shape(current),
                });
            }
        }
    }
    Ok(current)
}

fn describe_shape(value: &Value) -> String {
    match value {
        Value::Object(object) if object.is_empty() => "an empty object".to_string(),
        Value::Object(object) => {
            let keys: Vec<&str> = object.keys().map(String::as_str).collect();
            format!("an object with keys [{}]", keys.join(", "))
        }
        Value::Array(items) => format!("an array of length {}", items.len()),
        Value::String(_) => "a string".to_string(),
        Value::Number(_) => "a number".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Null => "null".to_string(),
    }
}
