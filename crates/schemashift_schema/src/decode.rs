//! Serde decoding with located errors.
//!
//! Locations use a JSON-path-like notation rooted at `$`, e.g. `$[0].fields[2].mode`.

use crate::error::{ConvertError, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) const ROOT: &str = "$";

pub(crate) fn child(location: &str, key: &str) -> String {
    format!("{}.{}", location, key)
}

pub(crate) fn index(location: &str, idx: usize) -> String {
    format!("{}[{}]", location, idx)
}

/// Dotted path of a field by name, used in conversion errors and logs.
pub(crate) fn field_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

pub(crate) fn check_depth(depth: usize, max_depth: usize, location: &str) -> Result<()> {
    if depth > max_depth {
        return Err(ConvertError::DepthExceeded {
            location: location.to_string(),
            max_depth,
        });
    }
    Ok(())
}

/// Deserialize `value`, reporting where in the document decoding failed.
pub(crate) fn from_value<'de, T: Deserialize<'de>>(value: &'de Value) -> Result<T> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let location = location(&err.path().to_string());
        let reason = err.into_inner().to_string();
        match reason
            .strip_prefix("missing field `")
            .and_then(|rest| rest.strip_suffix('`'))
        {
            Some(field) => ConvertError::MissingField {
                location,
                field: field.to_string(),
            },
            None => ConvertError::InvalidField { location, reason },
        }
    })
}

fn location(path: &str) -> String {
    match path {
        "." => ROOT.to_string(),
        p if p.starts_with('[') => format!("{}{}", ROOT, p),
        p => child(ROOT, p),
    }
}

/// `#[serde(deserialize_with)]` helper: JSON `null` counts as absent.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
