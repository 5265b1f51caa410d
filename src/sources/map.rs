//! In-memory configuration source.

use super::ConfigSource;
use crate::error::Result;
use std::collections::HashMap;

/// Fixed `NAME -> value` pairs held in memory.
///
/// Useful when the hosting process already took its own environment
/// snapshot, or for overrides layered on top of a file.
///
/// # Examples
///
/// ```rust
/// use podwatch_config::sources::{ConfigSource, MapSource};
///
/// let source = MapSource::new([("PODWATCH_PORT", "3000")]);
/// assert_eq!(source.load().unwrap()["PODWATCH_PORT"], "3000");
/// ```
pub struct MapSource {
    values: HashMap<String, String>,
    priority: i32,
}

impl MapSource {
    /// Create a source from `(name, value)` pairs.
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            priority: 200,
        }
    }

    /// Set the priority for this source.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigSource for MapSource {
    fn load(&self) -> Result<HashMap<String, String>> {
        Ok(self.values.clone())
    }

    fn name(&self) -> String {
        format!("map:{} entries", self.values.len())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_source() {
        let source = MapSource::new(vec![("A", "1"), ("B", "2")]);
        assert_eq!(source.priority(), 200);
        assert_eq!(source.name(), "map:2 entries");
        assert_eq!(source.load().unwrap().len(), 2);
    }

    #[test]
    fn test_with_priority() {
        let source = MapSource::new(Vec::<(String, String)>::new()).with_priority(50);
        assert_eq!(source.priority(), 50);
    }
}
