pub mod activity_service;
pub use activity_service::{ActivityError, ActivityService, LeaderboardView, LoginOutcome};

pub mod activity_service_impl;
pub use activity_service_impl::DefaultActivityService;
