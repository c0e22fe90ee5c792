use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;

use super::FetchResult;

/// Entries accepted from a `Results` envelope plus the number rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub items: Vec<T>,
    pub rejected: usize,
}

/// Decode a vPIC `{ "Results": [...] }` envelope entry by entry.
///
/// The envelope itself must be an object with a `Results` array; individual
/// entries that do not match `T` are skipped and counted.
pub fn decode_results<T: DeserializeOwned>(body: &str, what: &str) -> FetchResult<Decoded<T>> {
    let root: Value = serde_json::from_str(body)?;

    let entries = root
        .get("Results")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::decode(format!("{what} payload has no `Results` array")))?;

    let mut items = Vec::with_capacity(entries.len());
    let mut rejected = 0usize;
    for (index, entry) in entries.iter().enumerate() {
        match T::deserialize(entry) {
            Ok(item) => items.push(item),
            Err(err) => {
                rejected += 1;
                warn!("Rejected {what} entry #{index}: {err}");
            }
        }
    }

    Ok(Decoded { items, rejected })
}
