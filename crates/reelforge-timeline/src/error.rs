//! Error types for reelforge-timeline.

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when a timeline violates a model invariant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A time value carries a zero, negative or non-finite rate.
    #[error("non-positive rate {rate} in {context}")]
    NonPositiveRate { rate: f64, context: String },

    /// A range has a negative duration.
    #[error("negative duration {value} in {context}")]
    NegativeDuration { value: f64, context: String },

    /// A clip has no source range and its media reference has no available range.
    #[error("{item} has neither a source range nor an available range")]
    MissingRange { item: String },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a non-positive rate error.
    pub fn non_positive_rate(rate: f64, context: impl Into<String>) -> Self {
        Self::NonPositiveRate {
            rate,
            context: context.into(),
        }
    }

    /// Create a negative duration error.
    pub fn negative_duration(value: f64, context: impl Into<String>) -> Self {
        Self::NegativeDuration {
            value,
            context: context.into(),
        }
    }

    /// Create a missing range error.
    pub fn missing_range(item: impl Into<String>) -> Self {
        Self::MissingRange { item: item.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_range_display() {
        let err = Error::missing_range("shot 3");
        assert_eq!(
            err.to_string(),
            "shot 3 has neither a source range nor an available range"
        );
    }

    #[test]
    fn rate_display_names_context() {
        let err = Error::non_positive_rate(0.0, "clip 'a'");
        assert_eq!(err.to_string(), "non-positive rate 0 in clip 'a'");
    }
}
