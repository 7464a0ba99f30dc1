use crate::domain::UserId;
use crate::state::SharedState;

pub async fn cmd_register(state: &SharedState, raw_user_id: &str) -> anyhow::Result<()> {
    let user_id = UserId::parse(raw_user_id)?;
    let outcome = state.activity.record_activity(user_id).await?;
    state.activity.flush().await?;

    let user = &outcome.user;
    println!("✓ Activity recorded for {}", user.user_id);
    println!(
        "  Usage: {} | Active days: {} | Position: {}/{}",
        user.total_usage, user.active_days, outcome.rank, outcome.total_users
    );

    if !user.badges.is_empty() {
        let badges: Vec<&str> = user.badges.iter().map(|b| b.as_str()).collect();
        println!("  Badges: {}", badges.join(", "));
    }

    Ok(())
}
