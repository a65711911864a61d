//! Error macros for openqa-review

/// Macro for creating invalid value errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::ReviewError::invalid_value($context, $value))
    };
}

/// Macro for creating usage errors
#[macro_export]
macro_rules! bail_usage {
    ($msg:expr) => {
        return Err($crate::error::ReviewError::UsageError($msg.to_string()))
    };
}

/// Macro for creating malformed result errors
#[macro_export]
macro_rules! bail_malformed {
    ($source:expr, $reason:expr) => {
        return Err($crate::error::ReviewError::malformed($source, $reason))
    };
}
