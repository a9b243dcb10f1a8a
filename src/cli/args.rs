//! `key=value` argument parsing for `--parameter` and `--data`.

use crate::error::ErrorInfo;
use std::collections::BTreeMap;

/// Split each entry at its first `=`. Later duplicates overwrite earlier ones.
pub fn parse_key_values(entries: &[String]) -> Result<BTreeMap<String, String>, ErrorInfo> {
    let mut map = BTreeMap::new();
    for entry in entries {
        let Some((key, value)) = entry.split_once('=') else {
            return Err(ErrorInfo::precondition(format!(
                "Invalid argument '{}', expected key=value",
                entry
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ErrorInfo::precondition(format!(
                "Invalid argument '{}', key must not be empty",
                entry
            )));
        }
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}
