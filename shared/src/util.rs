use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default value.
///
/// Older writers emitted `null` for empty lists; readers must treat it the
/// same as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Returns true for zero, used to omit unset amounts when serializing.
pub fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// Today's date in local time, ISO formatted (`YYYY-MM-DD`)
pub fn today_iso() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
