//! Sorting a raw directory listing into visible buckets.

use crate::diagnostics::Diagnostics;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::instrument;

/// Names starting with this character are hidden.
pub const HIDDEN_MARKER: char = '.';
/// Key (and sole entry) of the synthetic parent-directory bucket.
pub const PARENT_ENTRY: &str = "..";

const MIMETYPE_PREFIX: &str = "mimetype:";
const REGEX_PREFIX: &str = "regex:";

/// A bucket rule taken from a `specific_filetemplates` key.
#[derive(Debug, Clone)]
pub enum Criterion {
    /// `mimetype:<pattern>`, matched against the guessed mimetype of a name.
    Mimetype(Regex),
    /// `regex:<pattern>`, matched against the name itself.
    Name(Regex),
    /// Any other key is a plain extension; it is reached through the
    /// extension fallback rather than tested.
    Extension(String),
}

impl Criterion {
    pub fn parse(key: &str) -> Result<Self> {
        let compile = |rule: &'static str, pattern: &str| {
            Regex::new(pattern).or_raise(|| ErrorKind::InvalidPattern { rule, pattern: pattern.to_string() })
        };
        if let Some(pattern) = key.strip_prefix(MIMETYPE_PREFIX) {
            return compile("mimetype", pattern).map(Self::Mimetype);
        }
        if let Some(pattern) = key.strip_prefix(REGEX_PREFIX) {
            return compile("regex", pattern).map(Self::Name);
        }
        Ok(Self::Extension(key.to_string()))
    }

    /// Whether `name` is claimed by this criterion. Names without a known
    /// mimetype never match a `mimetype:` rule.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Mimetype(pattern) => mime_guess::from_path(name).first_raw().is_some_and(|mime| pattern.is_match(mime)),
            Self::Name(pattern) => pattern.is_match(name),
            Self::Extension(_) => false,
        }
    }
}

/// Extension of `name` including its dot, or `""` if it has none. Leading dots
/// do not start an extension (`".profile"` has none).
pub fn extension(name: &str) -> &str {
    let stem_start = name.len() - name.trim_start_matches(HIDDEN_MARKER).len();
    name[stem_start..].rfind('.').map(|dot| &name[stem_start + dot..]).unwrap_or("")
}

/// The outcome of classifying a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Visible names keyed by the criterion that claimed them, or by extension.
    /// Always contains the [`PARENT_ENTRY`] bucket.
    pub buckets: BTreeMap<String, Vec<String>>,
    /// Every visible name, in input order.
    pub visible: Vec<String>,
    /// Every hidden name that survived the blacklist, in input order.
    pub invisible: Vec<String>,
}

/// Compiled blacklist and bucket criteria.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    blacklist: Vec<Regex>,
    criteria: Vec<(String, Criterion)>,
}

impl Classifier {
    /// Compiles the rules. Empty blacklist entries are ignored; rules that fail
    /// to compile are recorded in `diagnostics` and skipped.
    pub fn new<K, B>(criteria: K, blacklist: B, diagnostics: &mut Diagnostics) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        let blacklist = blacklist
            .into_iter()
            .filter(|pattern| !pattern.as_ref().is_empty())
            .filter_map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern)
                    .map_err(|_| {
                        diagnostics.configuration(
                            "blacklist",
                            ErrorKind::InvalidPattern { rule: "blacklist", pattern: pattern.to_string() },
                        )
                    })
                    .ok()
            })
            .collect();
        let mut compiled = Vec::new();
        for key in criteria {
            let key = key.as_ref();
            match Criterion::parse(key) {
                Ok(criterion) => compiled.push((key.to_string(), criterion)),
                Err(e) => diagnostics.configuration(key, (*e).clone()),
            }
        }
        Self { blacklist, criteria: compiled }
    }

    pub fn is_blacklisted(&self, name: &str) -> bool {
        self.blacklist.iter().any(|pattern| pattern.is_match(name))
    }

    /// The bucket a visible name belongs to: the first criterion (in declared
    /// order) that claims it, otherwise its extension.
    pub fn bucket_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.criteria
            .iter()
            .find(|(_, criterion)| criterion.matches(name))
            .map(|(key, _)| key.as_str())
            .unwrap_or_else(|| extension(name))
    }

    /// Splits `names` into blacklisted (dropped), hidden and bucketed visible names.
    #[instrument(skip_all, fields(names = names.len()))]
    pub fn classify<S: AsRef<str>>(&self, names: &[S]) -> Classification {
        let mut classification = Classification::default();
        for name in names {
            let name = name.as_ref();
            if self.is_blacklisted(name) {
                tracing::trace!(name, "blacklisted");
                continue;
            }
            if name.starts_with(HIDDEN_MARKER) {
                classification.invisible.push(name.to_string());
                continue;
            }
            classification.visible.push(name.to_string());
            classification.buckets.entry(self.bucket_for(name).to_string()).or_default().push(name.to_string());
        }
        classification.buckets.insert(PARENT_ENTRY.to_string(), vec![PARENT_ENTRY.to_string()]);
        classification
    }
}
