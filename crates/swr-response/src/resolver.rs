//! # Operation Resolution
//!
//! Attaches operation metadata to a request so the facade can find the
//! response schema. The seam is [`OperationResolver`]; the built-in
//! [`PathTemplateResolver`] matches the request URL against the document's
//! `paths` templates.
//!
//! ## Attached Metadata
//!
//! ```text
//! request.swagger = {
//!     apiPath:   "/pets/{petId}",       matched template
//!     path:      { get: ..., ... },      path item
//!     operation: { responses: ... },     operation for the request method
//!     params:    { petId: "1234" },      path and query parameters
//! }
//! ```
//!
//! ## Matching
//!
//! The query string and fragment are dropped and `basePath` is stripped.
//! A `{name}` placeholder matches one non-empty segment, or part of one
//! (`/files/{name}.json`). When several templates match, the one with the
//! most literal segments wins.
//!
//! OpenAPI 3 responses carry their schema under
//! `content.<media type>.schema`. For those, the entry for the request's
//! `content-type` (or else the first entry) is copied up into `schema`.
//! `$ref` pointers are not followed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};
use thiserror::Error;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^}]+)}").expect("valid regex constant"));

/// Failure to find the operation a request addresses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No `paths` template matches the request path.
    #[error("no path template matches '{path}'")]
    PathNotFound { path: String },

    /// The matched path item has no operation for the method.
    #[error("method {method} is not defined for '{api_path}'")]
    MethodNotAllowed { method: String, api_path: String },

    /// The document lacks structure needed for resolution.
    #[error("invalid api document: {reason}")]
    InvalidDocument { reason: String },
}

/// Attaches `swagger` operation metadata to a request.
pub trait OperationResolver {
    /// Resolve the operation `request` addresses in `document` and store
    /// its metadata under `request["swagger"]`.
    fn attach(&self, document: &Value, request: &mut Map<String, Value>)
        -> Result<(), ResolveError>;
}

/// Resolves operations by matching the request path against `paths`
/// templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathTemplateResolver;

impl OperationResolver for PathTemplateResolver {
    fn attach(
        &self,
        document: &Value,
        request: &mut Map<String, Value>,
    ) -> Result<(), ResolveError> {
        let paths = document
            .get("paths")
            .and_then(Value::as_object)
            .ok_or_else(|| ResolveError::InvalidDocument {
                reason: "missing 'paths' mapping".to_string(),
            })?;

        let url = request.get("url").and_then(Value::as_str).unwrap_or("/");
        let method = request
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or("GET")
            .to_ascii_lowercase();
        let content_type = request
            .get("headers")
            .and_then(|headers| headers.get("content-type"))
            .and_then(Value::as_str)
            .map(str::to_owned);

        let base_path = document.get("basePath").and_then(Value::as_str);
        let (path, query) = split_url(url, base_path);

        let (api_path, mut params) = paths
            .keys()
            .filter_map(|template| {
                match_template(template, path).map(|(literals, params)| (template, literals, params))
            })
            .fold(None::<(&String, usize, Map<String, Value>)>, |best, candidate| {
                match best {
                    Some(b) if b.1 >= candidate.1 => Some(b),
                    _ => Some(candidate),
                }
            })
            .map(|(template, _, params)| (template.clone(), params))
            .ok_or_else(|| ResolveError::PathNotFound {
                path: path.to_string(),
            })?;

        let path_item = &paths[&api_path];
        let mut operation = path_item
            .get(&method)
            .filter(|operation| operation.is_object())
            .cloned()
            .ok_or_else(|| ResolveError::MethodNotAllowed {
                method: method.to_ascii_uppercase(),
                api_path: api_path.clone(),
            })?;
        hoist_content_schemas(&mut operation, content_type.as_deref());

        for (name, value) in query_pairs(query) {
            params.entry(name).or_insert(Value::String(value));
        }

        tracing::debug!(api_path = %api_path, method = %method, "operation resolved");
        let metadata = json!({
            "apiPath": api_path,
            "path": path_item,
            "operation": operation,
            "params": params,
        });
        request.insert("swagger".to_string(), metadata);
        Ok(())
    }
}

/// Split a request URL into its API path (basePath removed) and query.
fn split_url<'a>(url: &'a str, base_path: Option<&str>) -> (&'a str, &'a str) {
    let url = url.split('#').next().unwrap_or_default();
    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    let base = base_path.map(|b| b.trim_end_matches('/')).unwrap_or_default();
    if !base.is_empty() {
        if let Some(rest) = path.strip_prefix(base) {
            if rest.is_empty() || rest.starts_with('/') {
                return (rest, query);
            }
        }
    }
    (path, query)
}

fn segments(path: &str) -> Vec<&str> {
    path.trim_matches('/').split('/').collect()
}

/// Match `path` against `template`, returning the number of literal
/// segments and the captured parameters.
fn match_template(template: &str, path: &str) -> Option<(usize, Map<String, Value>)> {
    let template_segments = segments(template);
    let path_segments = segments(path);
    if template_segments.len() != path_segments.len() {
        return None;
    }

    let mut literals = 0;
    let mut params = Map::new();
    for (expected, actual) in template_segments.into_iter().zip(path_segments) {
        if !PLACEHOLDER.is_match(expected) {
            if expected != actual {
                return None;
            }
            literals += 1;
            continue;
        }
        if actual.is_empty() {
            return None;
        }
        let (regex, names) = segment_matcher(expected)?;
        let captures = regex.captures(actual)?;
        for (i, name) in names.into_iter().enumerate() {
            let value = captures.get(i + 1)?.as_str();
            params.insert(name, Value::String(value.to_string()));
        }
    }
    Some((literals, params))
}

/// Anchored regex for a templated segment plus its placeholder names.
fn segment_matcher(segment: &str) -> Option<(Regex, Vec<String>)> {
    let mut pattern = String::from("^");
    let mut names = Vec::new();
    let mut last = 0;
    for captures in PLACEHOLDER.captures_iter(segment) {
        let whole = captures.get(0)?;
        pattern.push_str(&regex::escape(&segment[last..whole.start()]));
        pattern.push_str("(.+?)");
        names.push(captures[1].to_string());
        last = whole.end();
    }
    pattern.push_str(&regex::escape(&segment[last..]));
    pattern.push('$');
    Regex::new(&pattern).ok().map(|regex| (regex, names))
}

fn query_pairs(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (name.to_string(), value.to_string())
        })
}

/// Copy `content.<media type>.schema` into `schema` for responses that
/// only declare content.
fn hoist_content_schemas(operation: &mut Value, content_type: Option<&str>) {
    let Some(responses) = operation
        .get_mut("responses")
        .and_then(Value::as_object_mut)
    else {
        return;
    };

    for response in responses.values_mut() {
        let Some(response) = response.as_object_mut() else {
            continue;
        };
        if response.contains_key("schema") {
            continue;
        }
        let Some(content) = response.get("content").and_then(Value::as_object) else {
            continue;
        };
        let media = content_type
            .and_then(|ct| content.get(ct))
            .or_else(|| content.values().next());
        if let Some(schema) = media.and_then(|media| media.get("schema")).cloned() {
            response.insert("schema".to_string(), schema);
        }
    }
}
