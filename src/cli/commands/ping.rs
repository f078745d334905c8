use crate::state::SharedState;

pub async fn cmd_ping(state: &SharedState) -> anyhow::Result<()> {
    state.store.ping().await?;
    println!("✓ Cache store is reachable");
    Ok(())
}
