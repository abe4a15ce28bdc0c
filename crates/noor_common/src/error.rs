//! Error taxonomy
//!
//! Location denial and reflection failures are recovered where they happen
//! (fallback coordinate, canned reflection). Schedule failures propagate.

/// Schedule resolution errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Prayer times unavailable: {0}")]
    ComputationUnavailable(String),

    #[error("Hijri date unavailable: {0}")]
    CalendarUnavailable(String),
}

/// Location oracle errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("Location lookup failed: {0}")]
    Lookup(String),

    #[error("Location service refused: {0}")]
    Refused(String),

    #[error("Location lookup timed out after {0} seconds")]
    Timeout(u64),

    #[error(transparent)]
    Invalid(#[from] ScheduleError),
}

/// Reflection service errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReflectionError {
    #[error("Reflection service is disabled in configuration")]
    Disabled,

    #[error("No API key configured for {0}")]
    MissingApiKey(&'static str),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Reflection service returned empty response")]
    EmptyResponse,
}

/// Top-level failure categories
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NoorError {
    #[error("Location denied: {0}")]
    LocationDenied(#[from] LocationError),

    #[error("Schedule computation unavailable: {0}")]
    ScheduleComputationUnavailable(#[from] ScheduleError),

    #[error("Reflection service failure: {0}")]
    ReflectionServiceFailure(#[from] ReflectionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_wrap_component_errors() {
        let err: NoorError = ScheduleError::ComputationUnavailable("polar night".into()).into();
        assert!(matches!(err, NoorError::ScheduleComputationUnavailable(_)));
        assert_eq!(
            err.to_string(),
            "Schedule computation unavailable: Prayer times unavailable: polar night"
        );

        let err: NoorError = LocationError::Timeout(5).into();
        assert!(matches!(err, NoorError::LocationDenied(_)));

        let err: NoorError = ReflectionError::Disabled.into();
        assert!(matches!(err, NoorError::ReflectionServiceFailure(_)));
    }

    #[test]
    fn test_invalid_coordinate_is_a_location_error() {
        let err: LocationError = ScheduleError::InvalidCoordinate("latitude 91".into()).into();
        assert!(matches!(err, LocationError::Invalid(_)));
    }
}
