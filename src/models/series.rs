use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A `label -> value` mapping as the backend sends it.
///
/// Entries keep the order in which they appear in the JSON object. The
/// backend lists annual returns oldest first, and every consumer of this
/// type relies on that order surviving deserialization, which a
/// `HashMap` or `BTreeMap` would not guarantee.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledSeries {
    entries: Vec<(String, f64)>,
    // label -> position in `entries`
    index: HashMap<String, usize>,
}

impl LabeledSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. A repeated label replaces the earlier value in place.
    pub fn insert(&mut self, label: impl Into<String>, value: f64) {
        let label = label.into();
        match self.index.get(&label) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(label.clone(), self.entries.len());
                self.entries.push((label, value));
            }
        }
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.index.get(label).map(|&pos| self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(l, v)| (l.as_str(), *v))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, f64)> for LabeledSeries {
    fn from_iter<I: IntoIterator<Item = (L, f64)>>(iter: I) -> Self {
        let mut series = LabeledSeries::new();
        for (label, value) in iter {
            series.insert(label, value);
        }
        series
    }
}

impl Serialize for LabeledSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

struct LabeledSeriesVisitor;

impl<'de> Visitor<'de> for LabeledSeriesVisitor {
    type Value = LabeledSeries;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object of label -> number")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut series = LabeledSeries::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((label, value)) = access.next_entry::<String, f64>()? {
            series.insert(label, value);
        }
        Ok(series)
    }
}

impl<'de> Deserialize<'de> for LabeledSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LabeledSeriesVisitor)
    }
}
