#![forbid(unsafe_code)]

//! Construction-time errors.
//!
//! Only invalid configuration is surfaced as an error. Numeric degeneracy is
//! recovered inside the channel, callback panics are contained at the call
//! boundary, and out-of-order or post-disposal calls are ignored.

use thiserror::Error;

/// A spring parameter outside its physical domain.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SpringError {
    #[error("spring mass must be positive, got {0}")]
    NonPositiveMass(f64),
    #[error("spring stiffness must be positive, got {0}")]
    NonPositiveStiffness(f64),
    #[error("spring damping must not be negative, got {0}")]
    NegativeDamping(f64),
    #[error("spring parameter {name} is not finite")]
    NonFinite { name: &'static str },
}

/// Invalid engine configuration. Fatal to engine creation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Press and release springs are validated when built; only the elastic
    /// spring is assembled from configuration.
    #[error("invalid elastic spring: {0}")]
    ElasticSpring(#[from] SpringError),
    #[error("deform intensity must be positive and finite, got {0}")]
    InvalidDeformIntensity(f64),
    #[error("drag intensity must be non-negative and finite, got {0}")]
    InvalidDragIntensity(f64),
    #[error("fixed press scale must be positive and finite, got {0}")]
    InvalidFixedScale(f64),
    #[error("adaptive growth must be non-negative and finite, got {0} px")]
    InvalidGrowth(f64),
    #[error("press visibility tolerance must be non-negative and finite, got {0}")]
    InvalidTolerance(f64),
    #[error("long-press duration must be non-zero")]
    ZeroLongPressDuration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spring_error_messages_are_descriptive() {
        assert_eq!(
            SpringError::NonPositiveMass(0.0).to_string(),
            "spring mass must be positive, got 0"
        );
        assert_eq!(
            SpringError::NonFinite { name: "damping" }.to_string(),
            "spring parameter damping is not finite"
        );
    }

    #[test]
    fn config_error_wraps_spring_error() {
        let err = ConfigError::from(SpringError::NegativeDamping(-1.0));
        assert_eq!(
            err.to_string(),
            "invalid elastic spring: spring damping must not be negative, got -1"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
