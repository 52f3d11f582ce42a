//! # swr-cli — Command-Line Interface
//!
//! Provides the `swr` binary on top of the response facade.
//!
//! ## Subcommands
//!
//! - `swr build`: resolve an operation's response in an API document,
//!   build it (defaults applied), merge an optional body through
//!   validation, inject parameters and print the JSON.
//! - `swr check`: report whether the response is manageable, i.e. its
//!   schema is an object or an array.
//!
//! ```bash
//! swr build petstore.yaml --path /v1/pets/42 --code 200
//! swr build petstore.yaml --path /v1/pets --code 200 --body '[{"id": 1}]'
//! swr check petstore.yaml --path /v1/pets/42 --code 404
//! ```

pub mod build;
pub mod check;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{json, Value};
use swr_response::{prepare_request, PathTemplateResolver};

/// Arguments locating one response of one operation in an API document.
#[derive(Args, Debug, Clone)]
pub struct OperationArgs {
    /// Path to the Swagger/OpenAPI document (.json, .yaml or .yml).
    pub document: PathBuf,

    /// HTTP method of the operation.
    #[arg(long, default_value = "GET")]
    pub method: String,

    /// Request path, including any basePath and query string.
    #[arg(long, default_value = "/")]
    pub path: String,

    /// Response code to build (e.g. 200, 404, default).
    #[arg(long, default_value = "default")]
    pub code: String,
}

impl OperationArgs {
    /// Build a request for this operation and attach its metadata from the
    /// document.
    pub async fn resolved_request(&self) -> Result<Value> {
        let mut request = json!({"method": self.method, "url": self.path});
        prepare_request(&mut request, &self.document, &PathTemplateResolver)
            .await
            .with_context(|| {
                format!(
                    "cannot resolve {} {} in {}",
                    self.method,
                    self.path,
                    self.document.display()
                )
            })?;
        Ok(request)
    }
}
