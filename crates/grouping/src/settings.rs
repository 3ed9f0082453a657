//! Per-directory grouping configuration.
//!
//! ```
//! use shelf_grouping::{DirectorySettings, GroupingMethod};
//!
//! let settings: DirectorySettings = serde_json::from_str(r#"{
//!     "blacklist": ["^Thumbs\\.db$"],
//!     "specific_filetemplates": {
//!         "regex:^run": {"group_by": ["run\\d+"], "elements_per_row": 4},
//!         ".png": {"group_by": ["^[a-z]+"], "elements_per_row": 3, "grouping_method": "alphabetical"}
//!     }
//! }"#).unwrap();
//!
//! let keys: Vec<_> = settings.specific_filetemplates.keys().collect();
//! assert_eq!(keys, ["regex:^run", ".png"]);
//! assert_eq!(settings.specific_filetemplates.get(".png").unwrap().grouping_method, GroupingMethod::Alphabetical);
//! ```

use crate::group::GroupingMethod;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Formatter, Result as FmtResult};

/// Settings for grouping one directory listing. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorySettings {
    /// Patterns (searched anywhere in the name) whose matches are dropped.
    pub blacklist: Vec<String>,
    /// Bucket rules, keyed by extension, `mimetype:<pattern>` or `regex:<pattern>`.
    pub specific_filetemplates: FileTemplates,
}

/// How the names of one bucket are partitioned and packed.
///
/// `group_by` and `elements_per_row` are required for a bucket to be grouped,
/// but their absence only affects that bucket, so both are optional here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements_per_row: Option<usize>,
    #[serde(default)]
    pub grouping_method: GroupingMethod,
}

impl FileTemplate {
    pub fn new(group_by: impl IntoIterator<Item = impl Into<String>>, elements_per_row: usize) -> Self {
        Self {
            group_by: Some(group_by.into_iter().map(Into::into).collect()),
            elements_per_row: Some(elements_per_row),
            grouping_method: GroupingMethod::default(),
        }
    }

    pub fn with_method(mut self, method: impl Into<GroupingMethod>) -> Self {
        self.grouping_method = method.into();
        self
    }
}

/// File templates in declared order.
///
/// Criteria keys are tried in this order when bucketing, so the map keeps the
/// order in which a document listed them. A repeated key replaces the earlier
/// template in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTemplates(Vec<(String, FileTemplate)>);

impl FileTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FileTemplate> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, template)| template)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Adds a template, replacing (in place) any template with the same key.
    pub fn insert(&mut self, key: impl Into<String>, template: FileTemplate) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = template,
            None => self.0.push((key, template)),
        }
    }

    /// Moves the templates named in `order` to the front, in that order. The
    /// others keep their relative order behind them.
    pub fn reorder<'a>(&mut self, order: impl IntoIterator<Item = &'a str>) {
        let order: Vec<&str> = order.into_iter().collect();
        self.0.sort_by_key(|(key, _)| order.iter().position(|declared| *declared == key.as_str()).unwrap_or(order.len()));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileTemplate)> {
        self.0.iter().map(|(key, template)| (key.as_str(), template))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FileTemplate)> for FileTemplates {
    fn from_iter<I: IntoIterator<Item = (K, FileTemplate)>>(iter: I) -> Self {
        let mut templates = Self::new();
        iter.into_iter().for_each(|(key, template)| templates.insert(key, template));
        templates
    }
}

impl Serialize for FileTemplates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(key, template)| (key, template)))
    }
}

impl<'de> Deserialize<'de> for FileTemplates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = FileTemplates;

            fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
                f.write_str("a map of file templates")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut templates = FileTemplates::new();
                while let Some((key, template)) = map.next_entry::<String, FileTemplate>()? {
                    templates.insert(key, template);
                }
                Ok(templates)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}
