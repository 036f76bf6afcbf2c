//! Tests for the callscope error handling system.

use std::path::PathBuf;

use callscope_core::errors::*;

#[test]
fn test_all_errors_have_error_code() {
    let scan = ScanError::RootNotFound { path: PathBuf::from("/nope") };
    assert_eq!(scan.error_code(), "ROOT_NOT_FOUND");

    let utf8 = ParseError::NotUtf8 { path: PathBuf::from("bin.py") };
    assert_eq!(utf8.error_code(), "PARSE_ERROR");

    let syntax = ParseError::Syntax { path: PathBuf::from("a.py"), error_nodes: 2 };
    assert_eq!(syntax.error_code(), "SYNTAX_ERROR");

    let graph = CallGraphError::Export { message: "bad key".into() };
    assert_eq!(graph.error_code(), "CALL_GRAPH_ERROR");

    let config = ConfigError::Read {
        path: PathBuf::from("/tmp/callscope.toml"),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    };
    assert_eq!(config.error_code(), "CONFIG_ERROR");

    let impact = ImpactError::Git { message: "bad revision".into() };
    assert_eq!(impact.error_code(), "GIT_ERROR");
}

#[test]
fn test_from_conversions() {
    let pipeline: PipelineError = ScanError::PermissionDenied { path: PathBuf::from("/root") }.into();
    assert!(matches!(pipeline, PipelineError::Scan(ScanError::PermissionDenied { .. })));
    assert_eq!(pipeline.error_code(), "PERMISSION_DENIED");

    let pipeline: PipelineError = ConfigError::Invalid {
        field: "impact.max_depth",
        message: "x".into(),
    }
    .into();
    assert!(matches!(pipeline, PipelineError::Config(_)));

    let pipeline: PipelineError = ImpactError::Render { message: "x".into() }.into();
    assert_eq!(pipeline.error_code(), "IMPACT_ERROR");
}

#[test]
fn test_coded_string_format() {
    let err = ImpactError::Git { message: "bad revision HEAD~9".into() };
    assert_eq!(err.coded_string(), "[GIT_ERROR] Git error: bad revision HEAD~9");
}

#[test]
fn test_scan_error_classifies_io_kinds() {
    let missing = ScanError::from_io(
        "/missing",
        std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    );
    assert!(matches!(missing, ScanError::RootNotFound { .. }));

    let denied = ScanError::from_io(
        "/locked",
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no"),
    );
    assert!(matches!(denied, ScanError::PermissionDenied { .. }));

    let other = ScanError::from_io("/x", std::io::Error::new(std::io::ErrorKind::Other, "boom"));
    assert!(matches!(other, ScanError::IoError { .. }));
    assert_eq!(other.error_code(), "SCAN_ERROR");
}
