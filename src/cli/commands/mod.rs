mod leaderboard;
mod register;
mod reset;
mod stats;

pub use leaderboard::cmd_leaderboard;
pub use register::cmd_register;
pub use reset::cmd_reset;
pub use stats::cmd_stats;
