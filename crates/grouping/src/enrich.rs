use crate::tree::GroupTree;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Per-file attributes supplied by the caller (for example `{"label": "..."}`).
pub type Metadata = Map<String, Value>;

/// Attribute name reserved for the file name itself.
pub const FILENAME_KEY: &str = "filename";

/// A display record for a single name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub filename: String,
    #[serde(flatten)]
    pub metadata: Metadata,
}

impl FileEntry {
    pub fn new(filename: impl Into<String>) -> Self {
        Self { filename: filename.into(), metadata: Metadata::new() }
    }

    /// Copies `metadata` into the record. A `filename` attribute is ignored; the
    /// record's name always comes from the listing.
    pub fn merge(&mut self, metadata: &Metadata) {
        self.metadata.extend(
            metadata.iter().filter(|(key, _)| key.as_str() != FILENAME_KEY).map(|(key, value)| (key.clone(), value.clone())),
        );
    }
}

/// Replaces every name in the tree with a [`FileEntry`], merging in the
/// metadata stored under exactly that name, if any.
pub fn enrich(tree: GroupTree<String>, metadata: Option<&HashMap<String, Metadata>>) -> GroupTree<FileEntry> {
    tree.map(&mut |name| {
        let mut entry = FileEntry::new(name);
        if let Some(found) = metadata.and_then(|metadata| metadata.get(&entry.filename)) {
            entry.merge(found);
        }
        entry
    })
}

/// Builds the metadata map for `names` from a label lookup, e.g. a query for
/// the newest persisted label of each file. Names without a label are left out.
pub fn labels_for<I, S, F>(names: I, mut lookup: F) -> HashMap<String, Metadata>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(&str) -> Option<String>,
{
    names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            let label = lookup(name)?;
            let mut metadata = Metadata::new();
            metadata.insert("label".to_string(), Value::String(label));
            Some((name.to_string(), metadata))
        })
        .collect()
}
