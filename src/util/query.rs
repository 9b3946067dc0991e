use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Raw query string parameters. Lookups accept the name as written or with
/// its first letter upper-cased, so `pageSize` also finds `PageSize`.
#[derive(Debug, Default)]
pub struct QueryParams {
    map: HashMap<String, String>,
}

impl<'de> Deserialize<'de> for QueryParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = HashMap::<String, String>::deserialize(deserializer)?;
        Ok(QueryParams { map })
    }
}

impl QueryParams {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        QueryParams { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(val) = self.map.get(key) {
            return Some(val);
        }

        let mut chars = key.chars();
        let first = chars.next()?;
        if !first.is_ascii_lowercase() {
            return None;
        }
        let capitalized: String = first.to_ascii_uppercase().to_string() + chars.as_str();
        self.map.get(&capitalized).map(|x| x.as_str())
    }

    /// Parse a value, treating anything that does not parse as absent.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|s| s.trim().parse().ok())
    }

    /// `true` only for `true` (any case) or `1`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|s| {
                let s = s.trim();
                s.eq_ignore_ascii_case("true") || s == "1"
            })
            .unwrap_or(false)
    }
}
