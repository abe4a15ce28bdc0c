//! Exit codes for noorctl

use noor_common::ScheduleError;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when prayer times cannot be computed for the location/date
pub const EXIT_SCHEDULE_UNAVAILABLE: i32 = 69;

/// Map a command failure to its exit code
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<ScheduleError>().is_some() {
        EXIT_SCHEDULE_UNAVAILABLE
    } else {
        EXIT_GENERAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_errors_have_own_code() {
        let err = anyhow::Error::new(ScheduleError::ComputationUnavailable("polar night".into()));
        assert_eq!(exit_code_for(&err), EXIT_SCHEDULE_UNAVAILABLE);

        let other = anyhow::anyhow!("config missing");
        assert_eq!(exit_code_for(&other), EXIT_GENERAL_ERROR);
    }
}
