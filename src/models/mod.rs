pub mod activity;
pub mod leaderboard;
pub mod user;

pub use activity::{ActivityAction, ActivityEntry};
pub use leaderboard::{LeaderboardEntry, ResetSummary, StoreStats};
pub use user::UserRecord;
