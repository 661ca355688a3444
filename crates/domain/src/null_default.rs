use serde::{Deserialize, Deserializer};

/// Deserializes a field that publishers may send as JSON `null`, falling back
/// to the type's default value in that case.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
