use crate::classify::{Classification, Classifier};
use crate::diagnostics::Diagnostics;
use crate::enrich::{FileEntry, Metadata, enrich};
use crate::error::ErrorKind;
use crate::partition::Partitioner;
use crate::settings::{DirectorySettings, FileTemplate};
use crate::split::split_into_rows;
use crate::tree::GroupTree;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroUsize;
use tracing::instrument;

/// Bucket holding visible entries without an extension, which a directory
/// view presents as sub-folders.
pub const FOLDER_BUCKET: &str = "";

/// A grouped directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderGrouping {
    /// Buckets keyed by extension or criteria key. Buckets with a file
    /// template are partitioned and packed into rows; the rest hold their names
    /// as a flat list.
    pub buckets: BTreeMap<String, GroupTree<String>>,
    pub visible: Vec<String>,
    pub invisible: Vec<String>,
    /// Everything that had to be skipped or degraded along the way.
    pub diagnostics: Diagnostics,
}

/// A bucket ready for presentation: plain names, or display records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Bucket {
    Names(GroupTree<String>),
    Entries(GroupTree<FileEntry>),
}

impl FolderGrouping {
    /// The entries without an extension.
    pub fn folders(&self) -> Option<&GroupTree<String>> {
        self.buckets.get(FOLDER_BUCKET)
    }

    /// Every bucket except [`FOLDER_BUCKET`].
    pub fn files(&self) -> impl Iterator<Item = (&str, &GroupTree<String>)> {
        self.buckets.iter().filter(|(key, _)| key.as_str() != FOLDER_BUCKET).map(|(key, tree)| (key.as_str(), tree))
    }

    /// Converts the names of every templated bucket into [`FileEntry`] records
    /// carrying their metadata. Other buckets stay plain names.
    pub fn enrich(&self, settings: &DirectorySettings, metadata: Option<&HashMap<String, Metadata>>) -> BTreeMap<String, Bucket> {
        self.buckets
            .iter()
            .map(|(key, tree)| {
                let bucket = match settings.specific_filetemplates.contains_key(key) {
                    true => Bucket::Entries(enrich(tree.clone(), metadata)),
                    false => Bucket::Names(tree.clone()),
                };
                (key.clone(), bucket)
            })
            .collect()
    }
}

/// Groups a directory listing according to its settings.
///
/// Names are classified into buckets (see [`Classifier`]), then every bucket
/// with a file template is partitioned by the template's `group_by` rules and
/// each resulting list is packed into rows.
///
/// Never fails: a broken template is recorded in
/// [`FolderGrouping::diagnostics`] and its bucket degrades gracefully. Without
/// usable `group_by` rules the bucket is packed unpartitioned; without a usable
/// `elements_per_row` it is left as a flat list.
#[instrument(skip_all, fields(names = names.len(), templates = settings.specific_filetemplates.len()))]
pub fn group_folder<S: AsRef<str>>(names: &[S], settings: &DirectorySettings) -> FolderGrouping {
    let mut diagnostics = Diagnostics::new();
    let classifier = Classifier::new(settings.specific_filetemplates.keys(), &settings.blacklist, &mut diagnostics);
    let Classification { buckets, visible, invisible } = classifier.classify(names);

    let buckets = buckets
        .into_iter()
        .map(|(key, names)| {
            let tree = match settings.specific_filetemplates.get(&key) {
                Some(template) => group_bucket(&key, names, template, &mut diagnostics),
                None => GroupTree::Items(names),
            };
            (key, tree)
        })
        .collect();
    FolderGrouping { buckets, visible, invisible, diagnostics }
}

fn group_bucket(key: &str, names: Vec<String>, template: &FileTemplate, diagnostics: &mut Diagnostics) -> GroupTree<String> {
    let Some(elements_per_row) = template.elements_per_row else {
        diagnostics.configuration(key, ErrorKind::MissingField("elements_per_row"));
        return GroupTree::Items(names);
    };
    let Some(per_row) = NonZeroUsize::new(elements_per_row) else {
        diagnostics.configuration(key, ErrorKind::InvalidRowCapacity);
        return GroupTree::Items(names);
    };

    let tree = match template.group_by.as_deref().map(Partitioner::new) {
        Some(Ok(partitioner)) => partitioner.partition(names, diagnostics),
        Some(Err(e)) => {
            diagnostics.configuration(key, (*e).clone());
            GroupTree::Items(names)
        },
        None => {
            diagnostics.configuration(key, ErrorKind::MissingField("group_by"));
            GroupTree::Items(names)
        },
    };
    tracing::debug!(bucket = key, depth = tree.depth(), method = %template.grouping_method, "packing bucket into rows");
    split_into_rows(tree, per_row, &template.grouping_method, diagnostics)
}
