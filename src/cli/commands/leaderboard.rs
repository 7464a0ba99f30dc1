use crate::state::SharedState;

pub async fn cmd_leaderboard(state: &SharedState, limit: Option<usize>) -> anyhow::Result<()> {
    let view = state.activity.leaderboard(limit).await?;
    // Computing ranks can award badges or run a due reset.
    state.activity.flush().await?;

    if view.entries.is_empty() {
        println!("No users on the leaderboard yet.");
        return Ok(());
    }

    println!("Leaderboard (top {}):", view.entries.len());
    println!("{:-<70}", "");
    println!(
        "{:>4}  {:<24} {:>8} {:>6} {:>10}",
        "#", "User", "Usage", "Days", "Score"
    );

    for entry in &view.entries {
        let user = &entry.user;
        println!(
            "{:>4}  {:<24} {:>8} {:>6} {:>10.1}",
            user.rank,
            user.user_id.as_str(),
            user.total_usage,
            user.active_days,
            entry.score
        );
    }

    println!("{:-<70}", "");
    println!("Last reset: {}", view.last_reset.format("%Y-%m-%d %H:%M UTC"));

    Ok(())
}
