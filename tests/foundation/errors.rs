//! Integration tests for error types

use parity_foundation::{Error, ErrorContext, ErrorKind};

#[test]
fn user_visible_message_names_version_and_source() {
    let err = Error::source_load("theia/master.d.ts", "permission denied")
        .with_context(ErrorContext::new().with_source("theia/master.d.ts"))
        .in_version("master");
    let message = err.to_string();
    assert!(message.starts_with("failed to load source 'theia/master.d.ts'"));
    assert!(message.ends_with("(version master, source theia/master.d.ts)"));
}

#[test]
fn in_version_without_context_creates_one() {
    let err = Error::config("bad").in_version("1.0");
    assert_eq!(err.context.unwrap().version.as_deref(), Some("1.0"));
}

#[test]
fn parse_errors_show_position() {
    let err = Error::new(ErrorKind::Parse {
        message: "expected type".to_string(),
        line: 3,
        column: 14,
        context: "  const x: = 1;".to_string(),
    })
    .with_context(
        ErrorContext::new()
            .with_source("api.d.ts")
            .with_position(3, 14),
    );
    let message = err.to_string();
    assert!(message.contains("parse error at 3:14"));
    assert!(message.contains("source api.d.ts:3:14"));
}

#[test]
fn errors_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}
