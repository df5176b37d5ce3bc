// src/discovery/tags.rs
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::Error;

/// Required `key:value` tag pairs, all of which must match exactly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    pairs: Vec<(String, String)>,
}

impl TagFilter {
    /// Parse `"key1:value1;key2:value2"`. The empty string matches everything.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        if raw.is_empty() {
            return Ok(Self::default());
        }

        let pairs = raw
            .split(';')
            .map(|pair| {
                let parts: Vec<&str> = pair.split(':').collect();
                match parts.as_slice() {
                    [key, value] => Ok((key.to_string(), value.to_string())),
                    _ => Err(Error::TagFilter(format!(
                        "'{}' is not a key:value pair",
                        pair
                    ))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { pairs })
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// True when `tags` holds every required pair. Untagged resources never
    /// match a non-empty filter.
    pub fn matches(&self, tags: Option<&HashMap<String, String>>) -> bool {
        if self.pairs.is_empty() {
            return true;
        }
        match tags {
            Some(tags) if !tags.is_empty() => self
                .pairs
                .iter()
                .all(|(key, value)| tags.get(key) == Some(value)),
            _ => false,
        }
    }
}

impl FromStr for TagFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
