//! Error types for kalendi-core operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KalendiError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, KalendiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_detail() {
        let err = KalendiError::InvalidRule("interval must be positive, got 0".to_string());
        assert_eq!(err.to_string(), "Invalid recurrence rule: interval must be positive, got 0");
        let err = KalendiError::InvalidDate("no such month: 2024-13".to_string());
        assert_eq!(err.to_string(), "Invalid date: no such month: 2024-13");
    }
}
