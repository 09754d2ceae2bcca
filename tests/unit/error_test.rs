//! Tests for error types

use ticket_pool::config::ConfigError;
use ticket_pool::core::{AppResult, PoolError};
use ticket_pool::runtime::CommandError;

#[test]
fn test_pool_error_display() {
    assert_eq!(
        PoolError::Interrupted.to_string(),
        "interrupted while waiting for a ticket"
    );
    assert!(PoolError::InvalidCapacity(0).to_string().contains("at least one ticket"));
}

#[test]
fn test_pool_error_is_transparent_in_config_error() {
    let err = ConfigError::from(PoolError::InvalidCapacity(0));
    assert_eq!(err.to_string(), PoolError::InvalidCapacity(0).to_string());
}

#[test]
fn test_app_result_wraps_library_errors() {
    fn take_interrupted() -> AppResult<()> {
        let taken: Result<(), PoolError> = Err(PoolError::Interrupted);
        taken?;
        Ok(())
    }
    let err = take_interrupted().unwrap_err();
    assert_eq!(err.downcast_ref::<PoolError>(), Some(&PoolError::Interrupted));
}

#[test]
fn test_command_error_display() {
    assert_eq!(
        CommandError::InvalidMechanism("FOO".into()).to_string(),
        "Invalid mechanism `FOO`. Use: MUTEX, RWLOCK, or CHANNEL"
    );
    assert_eq!(
        CommandError::InvalidNumber("x".into()).to_string(),
        "Invalid number format: `x`"
    );
}
