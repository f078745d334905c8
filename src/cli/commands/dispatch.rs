//! Dispatch command handler

use crate::domain::Intent;
use crate::state::SharedState;

pub async fn cmd_dispatch(state: &SharedState, intent: Intent) -> anyhow::Result<()> {
    let context = state.dispatcher.dispatch(&intent).await?;
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}
