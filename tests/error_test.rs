use std::io;

use pkgbaker::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::TemplateError("unclosed tag at offset 3".to_string());
    assert_eq!(err.to_string(), "Template error: unclosed tag at offset 3.");

    let err = Error::OutputDirectoryExistsError { output_dir: "/out/Foo".to_string() };
    assert_eq!(
        err.to_string(),
        "Cannot proceed: output directory '/out/Foo' already exists. Use --force to overwrite it."
    );
}

#[test]
fn test_errors_name_the_failing_path() {
    let err = Error::WriteError {
        path: "/out/Foo/README.md".to_string(),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    };
    assert!(err.to_string().contains("/out/Foo/README.md"));
}
