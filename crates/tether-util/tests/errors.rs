use tether_util::errors::TetherError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = TetherError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_descriptor_error_display() {
    let err = TetherError::Descriptor {
        message: "empty dependency name".to_string(),
    };
    assert_eq!(err.to_string(), "Descriptor error: empty dependency name");
}

#[test]
fn test_version_error_display() {
    let err = TetherError::Version {
        message: "`1.x` is not a version".to_string(),
    };
    assert_eq!(err.to_string(), "Invalid version: `1.x` is not a version");
}

#[test]
fn test_config_error_display() {
    let err = TetherError::Config {
        message: "bad toml".to_string(),
    };
    assert_eq!(err.to_string(), "Configuration error: bad toml");
}

#[test]
fn test_repository_error_display() {
    let err = TetherError::Repository {
        message: "unreadable".to_string(),
    };
    assert_eq!(err.to_string(), "Repository error: unreadable");
}

#[test]
fn test_resolution_error_display() {
    let err = TetherError::Resolution {
        message: "conflict".to_string(),
    };
    assert_eq!(err.to_string(), "Dependency resolution failed: conflict");
}

#[test]
fn test_generic_error_display() {
    let err = TetherError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: TetherError = io_err.into();
    assert!(matches!(err, TetherError::Io(_)));
}
