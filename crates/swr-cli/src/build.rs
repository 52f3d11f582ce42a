//! # Build CLI — print a constrained response.
//!
//! ```bash
//! swr build petstore.yaml --path /v1/pets/42 --code 200 \
//!     --body '{"name": "Rex"}' --param owner=Ann --pattern handlebar
//! ```
//!
//! The body is merged into an object response, or appended to an array
//! response, through the same validation as any other write. Parameters
//! come from the resolved path and query first; `--param` entries override
//! them.

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use serde_json::{Map, Value};
use swr_inject::{Injector, InjectorPattern};
use swr_response::{resolve_response, ManagedResponse};

use crate::OperationArgs;

/// Arguments for `swr build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub operation: OperationArgs,

    /// JSON to merge into (object) or append to (array) the response.
    #[arg(long)]
    pub body: Option<String>,

    /// Injection parameter as name=value. Repeatable. Values that parse as
    /// JSON are used as such, anything else as a string.
    #[arg(long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Placeholder syntax.
    #[arg(long, value_enum, default_value = "handlebar")]
    pub pattern: PatternChoice,

    /// Only substitute top-level members.
    #[arg(long)]
    pub shallow: bool,
}

/// Built-in placeholder syntaxes selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PatternChoice {
    /// `:name`
    Colon,
    /// `{name}`
    Handlebar,
    /// `{{name}}`
    DoubleHandlebar,
}

impl From<PatternChoice> for InjectorPattern {
    fn from(choice: PatternChoice) -> Self {
        match choice {
            PatternChoice::Colon => Self::Colon,
            PatternChoice::Handlebar => Self::Handlebar,
            PatternChoice::DoubleHandlebar => Self::DoubleHandlebar,
        }
    }
}

/// Execute `swr build`.
pub async fn run_build(args: &BuildArgs) -> Result<u8> {
    let response = build_response(args).await?;
    tracing::info!(
        document = %args.operation.document.display(),
        code = %args.operation.code,
        "response built"
    );
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(0)
}

/// Resolve the response, apply the body, and substitute parameters.
pub async fn build_response(args: &BuildArgs) -> Result<Value> {
    let request = args.operation.resolved_request().await?;
    let mut response = resolve_response(&request, args.operation.code.as_str())
        .with_context(|| format!("cannot build response {}", args.operation.code))?;

    if let Some(body) = &args.body {
        let body: Value = serde_json::from_str(body).context("--body is not valid JSON")?;
        apply_body(&mut response, body)?;
    }

    let mut data = request
        .pointer("/swagger/params")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    for param in &args.params {
        let (name, value) = parse_param(param)?;
        data.insert(name, value);
    }

    let injector = Injector::with_pattern(args.pattern.into()).recursive(!args.shallow);
    inject(&injector, &mut response, &data)?;
    Ok(response.to_value())
}

fn apply_body(response: &mut ManagedResponse, body: Value) -> Result<()> {
    match (response, body) {
        (ManagedResponse::Object(object), Value::Object(fields)) => object
            .merge(fields)
            .context("--body does not fit the response schema"),
        (ManagedResponse::Array(array), Value::Array(items)) => array
            .push_all(items)
            .context("--body does not fit the response schema"),
        (ManagedResponse::Object(_), _) => bail!("--body must be a JSON object for this response"),
        (ManagedResponse::Array(_), _) => bail!("--body must be a JSON array for this response"),
    }
}

fn inject(
    injector: &Injector,
    response: &mut ManagedResponse,
    data: &Map<String, Value>,
) -> Result<()> {
    let result = match response {
        ManagedResponse::Object(object) => injector.inject(object, data),
        ManagedResponse::Array(array) => injector.inject(array, data),
    };
    result.context("parameter substitution broke a response constraint")
}

/// Split `name=value`; the value is JSON when it parses as JSON.
pub fn parse_param(param: &str) -> Result<(String, Value)> {
    let Some((name, raw)) = param.split_once('=') else {
        bail!("parameter '{param}' must have the form NAME=VALUE");
    };
    if name.is_empty() {
        bail!("parameter '{param}' has an empty name");
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}
