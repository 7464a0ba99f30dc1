use crate::state::SharedState;

pub async fn cmd_reset(state: &SharedState) -> anyhow::Result<()> {
    let summary = state.activity.reset().await?;
    state.activity.flush().await?;

    println!(
        "✓ Reset usage counters for {} user(s) at {}",
        summary.users_reset,
        summary.last_reset.format("%Y-%m-%d %H:%M UTC")
    );

    Ok(())
}
