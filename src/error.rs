use thiserror::Error;

pub type ChainSourceError = Box<dyn std::error::Error + Send + Sync>;

/// Failure taxonomy for every exposed operation. Mutating flows never
/// downgrade errors; only the yield estimator catches `Telemetry` and
/// reports a zero estimate instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("chain read failed ({context}): {source}")]
    ChainRead {
        context: String,
        source: ChainSourceError,
    },

    #[error("chain write failed ({context}): {source}")]
    ChainWrite {
        context: String,
        source: ChainSourceError,
    },

    #[error("telemetry unavailable: {0}")]
    Telemetry(anyhow::Error),
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation(message.into())
    }

    pub fn read(context: impl Into<String>, source: impl Into<ChainSourceError>) -> Self {
        EngineError::ChainRead {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn write(context: impl Into<String>, source: impl Into<ChainSourceError>) -> Self {
        EngineError::ChainWrite {
            context: context.into(),
            source: source.into(),
        }
    }
}

impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        EngineError::Telemetry(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_context() {
        let err = EngineError::read("decimals() on 0x11", "connection refused");
        let text = err.to_string();
        assert!(text.contains("chain read failed"));
        assert!(text.contains("decimals() on 0x11"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn test_validation_display() {
        let err = EngineError::validation("percentage must be between 0 and 100");
        assert_eq!(
            err.to_string(),
            "validation failed: percentage must be between 0 and 100"
        );
    }
}
