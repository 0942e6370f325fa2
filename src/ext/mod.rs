/// Extension traits for standard and `serde_json`/`chrono` types.
///
/// Each extension trait lives in its own file named after what it extends:
/// - `slice.rs` - `[T]` and `Vec<T>` (search, filtered copies, queue/stack helpers)
/// - `records.rs` - `[Value]` holding records addressed by key path
/// - `dictionary.rs` - `Dictionary` typed reads with defaults
/// - `date.rs` - `chrono::DateTime` arithmetic, parsing and formatting
/// - `path.rs` - `std::path::Path` file operations and searches
/// - `string.rs` - `str` and `String`
///
/// # Example
///
/// ```rust
/// use valuekit::ext::{SliceExt, StrExt};
///
/// let words = ["kiwi", "apple", "fig"];
/// assert_eq!(words.index_of_matching_by(&5, |w| w.len()), Some(1));
/// assert_eq!("Hello".rotate13().rotate13(), "Hello");
/// ```
pub mod date;
pub mod dictionary;
pub mod path;
pub mod records;
pub mod slice;
pub mod string;

// Re-export all extension traits for convenience
pub use date::{DateExt, DateStyle, UnitsStyle};
pub use dictionary::DictionaryExt;
pub use path::{PathExt, PathSearch};
pub use records::{RecordsExt, RecordsVecExt};
pub use slice::{FinderSortExt, SliceExt, VecExt};
pub use string::{StrExt, StringExt, Version};
