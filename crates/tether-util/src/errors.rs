use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all tether operations.
#[derive(Debug, Error, Diagnostic)]
pub enum TetherError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A descriptor line or file could not be parsed.
    #[error("Descriptor error: {message}")]
    #[diagnostic(help("Check the `depends:` and `override:` lines of the descriptor"))]
    Descriptor { message: String },

    /// A version token is not a dotted sequence of non-negative integers.
    #[error("Invalid version: {message}")]
    #[diagnostic(help("Versions look like `1.0` or `2.1.3`"))]
    Version { message: String },

    /// Global configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check ~/.tether/config.toml for syntax errors"))]
    Config { message: String },

    /// A package repository could not be opened or scanned.
    #[error("Repository error: {message}")]
    Repository { message: String },

    /// Dependency resolution failed (unsatisfiable or conflicting requirements).
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type TetherResult<T> = miette::Result<T>;
