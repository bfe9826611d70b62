use super::*;
use std::error::Error as StdError;

#[test]
fn test_config_error() {
    let error = Error::Config("missing base_url".to_string());

    assert_eq!(error.to_string(), "Configuration error: missing base_url");
    assert!(error.source().is_none());
}

#[test]
fn test_request_error_includes_status() {
    let error = Error::Request(FetchError::Status { status: 500 });

    assert_eq!(error.to_string(), "Request failed: HTTP error! status: 500");
}

#[test]
fn test_setup_error_from_library() {
    let error: Error = fetch_state::Error::NoRuntime.into();

    assert!(matches!(error, Error::Setup(fetch_state::Error::NoRuntime)));
    assert!(error.source().is_some());
}

#[test]
fn test_invalid_command_error() {
    let error = Error::InvalidCommand("jump".to_string());

    assert_eq!(error.to_string(), "Invalid command: jump");
}

#[test]
fn test_io_error_conversion() {
    let error: Error = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed").into();

    assert!(error.to_string().contains("pipe closed"));
}
