/// Handles argument parsing.
pub mod cli;

/// Shared constants: file suffixes, date formats, exit codes.
pub mod constants;

/// Defines custom error types.
pub mod error;

/// Extension traits for sequences, dictionaries, strings, dates and paths.
pub mod ext;

/// Key paths, equivalence and coercions for JSON values.
pub mod value;

/// Helpers blanket-implemented for every type.
pub mod object;

/// File-backed preferences with registered defaults.
pub mod defaults;

pub use defaults::Preferences;
pub use value::{Dictionary, TimeInterval, Value};
