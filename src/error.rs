//! Error types for the traffic light
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur while running a traffic light
#[derive(Debug, Error)]
pub enum TrafficLightError {
    /// The OS refused to create the cycling thread
    #[error("Failed to spawn background thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// `start()` was called on a light that already runs its cycle loop
    #[error("Traffic light already started")]
    AlreadyStarted,

    /// Cycle bounds or polling interval are unusable
    #[error("Invalid timing: {0}")]
    InvalidTiming(String),

    /// A background thread panicked before it could be joined
    #[error("Task panicked: {0}")]
    TaskPanicked(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for traffic light operations
pub type Result<T> = std::result::Result<T, TrafficLightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::OutOfMemory, "no threads left");
        let err = TrafficLightError::Spawn(io_err);
        assert_eq!(err.to_string(), "Failed to spawn background thread: no threads left");
    }

    #[test]
    fn test_already_started_error() {
        let err = TrafficLightError::AlreadyStarted;
        assert_eq!(err.to_string(), "Traffic light already started");
    }

    #[test]
    fn test_invalid_timing_error() {
        let err = TrafficLightError::InvalidTiming("min 7 exceeds max 6".to_string());
        assert_eq!(err.to_string(), "Invalid timing: min 7 exceeds max 6");
    }

    #[test]
    fn test_task_panicked_error() {
        let err = TrafficLightError::TaskPanicked("light-cycle".to_string());
        assert_eq!(err.to_string(), "Task panicked: light-cycle");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TrafficLightError = io_err.into();
        assert!(matches!(err, TrafficLightError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_err = serde_yaml::from_str::<u32>("[not, a, number]").unwrap_err();
        let err: TrafficLightError = yaml_err.into();
        assert!(matches!(err, TrafficLightError::Yaml(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(TrafficLightError::AlreadyStarted)
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
