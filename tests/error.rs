// Unit tests for error handling
use std::io;
use stringreplacer::ReplacerError;

#[test]
fn test_error_from_io() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: ReplacerError = io_err.into();

    assert!(matches!(err, ReplacerError::Io(_)));
    assert!(err.to_string().contains("I/O error"));
}

#[test]
fn test_error_invalid_config() {
    let err = ReplacerError::invalid_config("no file patterns configured");
    assert_eq!(
        err.to_string(),
        "Invalid configuration: no file patterns configured"
    );
}

#[test]
fn test_error_encoding() {
    let err = ReplacerError::encoding(7, "invalid byte sequence");
    assert_eq!(
        err.to_string(),
        "Invalid UTF-8 in content stream at byte 7: invalid byte sequence"
    );
}

#[test]
fn test_error_from_str() {
    let err: ReplacerError = "something went wrong".into();
    assert!(matches!(err, ReplacerError::Other(_)));
    assert_eq!(err.to_string(), "something went wrong");
}
