//! Sarco sdk error kinds.
//!
//! All sdk apis return [`one_err::OneErr`]. Errors raised by the sdk
//! itself carry one of the kind strings below; errors produced by an
//! injected collaborator are passed through unchanged.

use one_err::OneErr;

/// Kind string for malformed input (bad settings, negative grace
/// period, unparseable config, ...).
pub const VALIDATION_ERROR: &str = "ValidationError";

/// Kind string for failures reported by a chain / index / executor
/// collaborator.
pub const FETCH_ERROR: &str = "FetchError";

/// Build a [`VALIDATION_ERROR`] kind error with given message.
pub fn validation_err<M: std::fmt::Display>(message: M) -> OneErr {
    OneErr::with_message(VALIDATION_ERROR, message.to_string())
}

/// Build a [`FETCH_ERROR`] kind error with given message.
/// Intended for collaborator implementations.
pub fn fetch_err<M: std::fmt::Display>(message: M) -> OneErr {
    OneErr::with_message(FETCH_ERROR, message.to_string())
}

/// Returns true if this error was raised by input validation.
pub fn is_validation_err(err: &OneErr) -> bool {
    err.str_kind() == VALIDATION_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds() {
        let err = validation_err("bad threshold");
        assert_eq!(VALIDATION_ERROR, err.str_kind());
        assert!(is_validation_err(&err));

        let err = fetch_err("rpc unavailable");
        assert_eq!(FETCH_ERROR, err.str_kind());
        assert!(!is_validation_err(&err));
    }
}
