pub mod company;
pub mod employee;
pub mod registration;
pub mod session;
pub mod time_entry;

// Re-export models for easier access
pub use company::*;
pub use employee::*;
pub use registration::*;
pub use session::*;
pub use time_entry::*;

/// Request bodies treat an explicit `null` like a missing field, so
/// validation reports it instead of the JSON parser.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    Ok(<Option<T> as serde::Deserialize>::deserialize(deserializer)?.unwrap_or_default())
}
