pub mod badges {

    pub const HEAVY_USER_USAGE: u64 = 100;

    pub const POWER_USER_USAGE: u64 = 1000;

    pub const WEEKLY_HERO_DAYS: u64 = 7;

    pub const MONTHLY_WARRIOR_DAYS: u64 = 30;

    pub const TOP_RANK_CUTOFF: u32 = 10;
}

pub mod scoring {

    pub const USAGE_WEIGHT: f64 = 0.5;

    pub const ACTIVE_DAY_WEIGHT: f64 = 10.0;

    /// Recency bonus for activity right now; decays by one point per day.
    pub const RECENCY_MAX: f64 = 100.0;

    pub const MILLIS_PER_DAY: f64 = 86_400_000.0;
}

pub mod limits {

    pub const DEFAULT_LEADERBOARD_LIMIT: usize = 50;

    pub const MAX_LEADERBOARD_LIMIT: usize = 1000;

    pub const DEFAULT_ACTIVITY_LIMIT: usize = 20;

    pub const DEFAULT_ACTIVITY_LOG_CAPACITY: usize = 1000;

    pub const DEFAULT_RESET_PERIOD_DAYS: u32 = 30;
}

pub const API_VERSION: &str = "1.0";
