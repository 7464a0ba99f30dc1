use super::ApiError;
use crate::constants::limits::MAX_LEADERBOARD_LIMIT;
use crate::domain::UserId;

/// Turns the raw `userId` parameter into a sanitized [`UserId`].
pub fn validate_user_id(raw: Option<&str>) -> Result<UserId, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::validation("User ID is required"))?;
    Ok(UserId::parse(raw)?)
}

/// Parses an optional `limit` query value. Absent or empty means "use the default".
pub fn parse_limit(raw: Option<&str>) -> Result<Option<usize>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let limit = raw.parse::<usize>().map_err(|_| {
        ApiError::validation(format!(
            "Invalid limit: {raw}. Limit must be a number between 1 and {MAX_LEADERBOARD_LIMIT}"
        ))
    })?;

    validate_limit(limit).map(Some)
}

pub fn validate_limit(limit: usize) -> Result<usize, ApiError> {
    const MIN_LIMIT: usize = 1;

    if !(MIN_LIMIT..=MAX_LEADERBOARD_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between {} and {}",
            limit, MIN_LIMIT, MAX_LEADERBOARD_LIMIT
        )));
    }
    Ok(limit)
}
