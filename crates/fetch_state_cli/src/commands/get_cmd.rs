use std::sync::Arc;

use clap::Args;
use fetch_state::{FetchController, FetchOptions, Retriever};
use serde_json::Value;
use tracing::{info, instrument};

use super::{build_retriever, ConnectionArgs};
use crate::errors::Error;

#[cfg(test)]
#[path = "get_cmd_tests.rs"]
mod tests;

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Resource to retrieve, absolute or relative to the base URL
    pub resource: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Execute the get command
#[instrument(skip(args), fields(resource = %args.resource))]
pub async fn execute(args: &GetArgs) -> Result<(), Error> {
    let config = args.connection.resolve_config()?;
    let retriever = build_retriever(&config)?;

    let data = fetch_once(&args.resource, retriever).await?;
    let rendered =
        serde_json::to_string_pretty(&data).map_err(|e| Error::Render(e.to_string()))?;
    println!("{rendered}");
    Ok(())
}

/// Runs a single automatic attempt and returns its payload.
pub async fn fetch_once(resource: &str, retriever: Arc<dyn Retriever>) -> Result<Value, Error> {
    let controller: FetchController<Value> =
        FetchController::new(resource, FetchOptions::default(), retriever)?;

    let state = controller.settled().await;
    controller.detach();

    match (state.error, state.data) {
        (Some(error), _) => Err(Error::Request(error)),
        (None, data) => {
            info!(resource = resource, "Resource retrieved");
            Ok(data.unwrap_or(Value::Null))
        }
    }
}
