//! Groups a flat directory listing into a nested, display-ready structure.
//!
//! The pipeline, driven by [`group_folder`]:
//!
//! 1. **Classify** ([`Classifier`]): drop blacklisted names, set hidden names
//!    aside, and put every visible name in exactly one bucket: the first
//!    `mimetype:`/`regex:` criterion that claims it, otherwise its extension.
//! 2. **Partition** ([`Partitioner`]): for buckets with a [`FileTemplate`],
//!    split the names into a nested mapping, one level per `group_by` rule.
//! 3. **Pack** ([`split_into_rows`]): cut every terminal list into rows,
//!    either by edit-distance similarity ([`pack_by_distance`]) or sorted
//!    ([`pack_alphabetical`]).
//! 4. **Enrich** ([`enrich`]): turn names into [`FileEntry`] records carrying
//!    caller-supplied metadata such as labels.
//!
//! Nothing here performs I/O and nothing is fatal: problems are collected in
//! [`Diagnostics`] next to a best-effort result.
//!
//! ```
//! use shelf_grouping::{DirectorySettings, FileTemplate, GroupTree, group_folder};
//!
//! let mut settings = DirectorySettings::default();
//! settings.specific_filetemplates.insert(".jpg", FileTemplate::new(["^[a-z]+"], 1));
//!
//! let grouping = group_folder(&["cat.jpg", "dog.jpg", ".hidden"], &settings);
//! assert_eq!(grouping.invisible, [".hidden"]);
//! assert_eq!(
//!     grouping.buckets[".jpg"].get("cat"),
//!     Some(&GroupTree::Rows(vec![vec!["cat.jpg".to_string()]])),
//! );
//! ```

mod classify;
mod diagnostics;
mod enrich;
pub mod error;
mod folder;
mod group;
mod matrix;
mod pack;
mod partition;
mod settings;
mod split;
mod tree;

pub use crate::classify::{Classification, Classifier, Criterion, HIDDEN_MARKER, PARENT_ENTRY, extension};
pub use crate::diagnostics::{Diagnostics, Problem};
pub use crate::enrich::{FILENAME_KEY, FileEntry, Metadata, enrich, labels_for};
pub use crate::folder::{Bucket, FOLDER_BUCKET, FolderGrouping, group_folder};
pub use crate::group::{GroupingMethod, group};
pub use crate::matrix::{DistanceMatrix, EXHAUSTED, levenshtein};
pub use crate::pack::{pack_alphabetical, pack_by_distance};
pub use crate::partition::Partitioner;
pub use crate::settings::{DirectorySettings, FileTemplate, FileTemplates};
pub use crate::split::split_into_rows;
pub use crate::tree::GroupTree;
