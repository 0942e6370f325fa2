use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON. Original error: {0}")]
    JSONParseError(#[from] serde_json::Error),

    #[error("Failed to parse YAML. Original error: {0}")]
    YAMLParseError(#[from] serde_yaml::Error),

    #[error("Failed to decode base64. Original error: {0}")]
    Base64DecodeError(#[from] base64::DecodeError),

    #[error("Decoded text is not valid UTF-8. Original error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    #[error("Cannot proceed: '{path}' already exists.")]
    DestinationExists { path: String },

    #[error("Cannot proceed: '{path}' does not exist.")]
    SourceMissing { path: String },

    #[error("Cannot proceed: '{path}' has no parent directory.")]
    NoParentDirectory { path: String },

    #[error("Invalid filename: '{filename}'.")]
    InvalidFilename { filename: String },

    /// Preferences file could not be read or written in the expected format.
    #[error("Preferences error: {0}.")]
    PreferencesError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience type alias for Results with this crate's Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(crate::constants::exit_codes::FAILURE);
}
