use serde::{Deserialize, Deserializer};

/// Deserializes a present option value into `Some`.
///
/// The values of an option map are plain strings, which the default
/// [`Option`] implementation does not accept. Absent keys are handled
/// by `#[serde(default)]` on the field.
pub(crate) fn deserialize_some_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}
