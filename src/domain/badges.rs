//! Achievement badges and their catalog metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::badges::{
    HEAVY_USER_USAGE, MONTHLY_WARRIOR_DAYS, POWER_USER_USAGE, TOP_RANK_CUTOFF, WEEKLY_HERO_DAYS,
};

/// Badge identifiers as they appear in the persisted document and on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Newbie,
    HeavyUser,
    PowerUser,
    WeeklyHero,
    MonthlyWarrior,
    #[serde(rename = "top_10")]
    Top10,
    Champion,
}

/// Static description of a badge, served to the badge showcase.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeInfo {
    pub id: Badge,
    pub name: &'static str,
    pub description: &'static str,
    pub requirement: &'static str,
    pub icon: &'static str,
}

impl Badge {
    pub const ALL: [Self; 7] = [
        Self::Newbie,
        Self::HeavyUser,
        Self::PowerUser,
        Self::WeeklyHero,
        Self::MonthlyWarrior,
        Self::Top10,
        Self::Champion,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newbie => "newbie",
            Self::HeavyUser => "heavy_user",
            Self::PowerUser => "power_user",
            Self::WeeklyHero => "weekly_hero",
            Self::MonthlyWarrior => "monthly_warrior",
            Self::Top10 => "top_10",
            Self::Champion => "champion",
        }
    }

    /// Badges earned from usage and active-day counters.
    #[must_use]
    pub fn earned_by_counters(total_usage: u64, active_days: u64) -> Vec<Self> {
        let mut earned = Vec::new();
        if total_usage >= HEAVY_USER_USAGE {
            earned.push(Self::HeavyUser);
        }
        if total_usage >= POWER_USER_USAGE {
            earned.push(Self::PowerUser);
        }
        if active_days >= WEEKLY_HERO_DAYS {
            earned.push(Self::WeeklyHero);
        }
        if active_days >= MONTHLY_WARRIOR_DAYS {
            earned.push(Self::MonthlyWarrior);
        }
        earned
    }

    /// Badges earned from a leaderboard position. Rank 0 means unranked.
    #[must_use]
    pub fn earned_by_rank(rank: u32) -> Vec<Self> {
        let mut earned = Vec::new();
        if (1..=TOP_RANK_CUTOFF).contains(&rank) {
            earned.push(Self::Top10);
        }
        if rank == 1 {
            earned.push(Self::Champion);
        }
        earned
    }

    #[must_use]
    pub const fn info(self) -> BadgeInfo {
        let (name, description, requirement, icon) = match self {
            Self::Newbie => ("Newbie", "New user just joined", "Join the platform", "👶"),
            Self::HeavyUser => (
                "Heavy User",
                "Used tools 100+ times",
                "100 tool uses",
                "🏋️",
            ),
            Self::PowerUser => (
                "Power User",
                "Used tools 1000+ times",
                "1000 tool uses",
                "⚡",
            ),
            Self::WeeklyHero => (
                "Weekly Hero",
                "Active on 7 different days",
                "7 active days",
                "🌟",
            ),
            Self::MonthlyWarrior => (
                "Monthly Warrior",
                "Active on 30 different days",
                "30 active days",
                "🗓️",
            ),
            Self::Top10 => ("Top 10", "Ranked in top 10 users", "Top 10 rank", "🏆"),
            Self::Champion => ("Champion", "Ranked #1 on leaderboard", "#1 Rank", "👑"),
        };

        BadgeInfo {
            id: self,
            name,
            description,
            requirement,
            icon,
        }
    }

    #[must_use]
    pub fn catalog() -> Vec<BadgeInfo> {
        Self::ALL.iter().map(|b| b.info()).collect()
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
