use crate::state::SharedState;

pub async fn cmd_stats(state: &SharedState) -> anyhow::Result<()> {
    let stats = state.activity.stats().await?;

    println!("Store Statistics");
    println!("{:-<40}", "");
    println!("Total users:      {}", stats.total_users);
    println!("Active today:     {}", stats.active_today);
    println!("Total usage:      {}", stats.total_usage);
    println!("Days until reset: {}", stats.days_until_reset);
    println!("Last reset:       {}", stats.last_reset.format("%Y-%m-%d %H:%M UTC"));
    println!("Next reset:       {}", stats.next_reset.format("%Y-%m-%d %H:%M UTC"));

    Ok(())
}
