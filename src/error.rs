use std::fmt;

/// Errors raised outside the numeric core.
///
/// Arithmetic itself never fails: invalid domains map to zero and overflow
/// wraps. The only numeric error is a narrowing conversion that would lose
/// integer bits; the rest concern the sweep tool's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixedError {
    /// A 32.32 value whose integer part does not fit in 16.16.
    NarrowingOverflow { raw: i64 },
    InvalidConfig { reason: String },
}

impl fmt::Display for FixedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixedError::NarrowingOverflow { raw } => write!(
                f,
                "value {} (raw {:#x}) is outside the 16.16 range",
                *raw as f64 / 4_294_967_296.0,
                raw
            ),
            FixedError::InvalidConfig { reason } => write!(f, "invalid sweep config: {}", reason),
        }
    }
}

impl std::error::Error for FixedError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = FixedError::NarrowingOverflow { raw: 1 << 48 };
        assert_eq!(err.to_string(), "value 65536 (raw 0x1000000000000) is outside the 16.16 range");

        let err = FixedError::InvalidConfig { reason: "samples must be > 0".into() };
        assert_eq!(err.to_string(), "invalid sweep config: samples must be > 0");
    }

    #[test]
    fn test_boxes_as_std_error() {
        let boxed: Box<dyn std::error::Error> = Box::new(FixedError::NarrowingOverflow { raw: -1 });
        assert!(boxed.to_string().contains("16.16"));
    }
}
