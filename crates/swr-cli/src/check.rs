//! # Check CLI — is a response manageable?
//!
//! Exits `0` when the response schema is an object or array, `1` otherwise.
//! A document that cannot be loaded or an operation that cannot be resolved
//! is an error, not a "no".

use anyhow::Result;
use clap::Args;
use swr_response::manageable;

use crate::OperationArgs;

/// Arguments for `swr check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub operation: OperationArgs,
}

/// Execute `swr check`.
pub async fn run_check(args: &CheckArgs) -> Result<u8> {
    let op = &args.operation;
    let request = op.resolved_request().await?;
    if manageable(&request, op.code.as_str()) {
        println!("{} {} -> {}: manageable", op.method, op.path, op.code);
        Ok(0)
    } else {
        println!("{} {} -> {}: not manageable", op.method, op.path, op.code);
        Ok(1)
    }
}
