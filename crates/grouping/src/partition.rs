use crate::diagnostics::{Diagnostics, Problem};
use crate::error::{ErrorKind, Result};
use crate::tree::GroupTree;
use exn::ResultExt;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::instrument;

/// Splits names into a nested mapping, one level per `group_by` rule.
///
/// At each level the text matched by that level's rule (searched anywhere in
/// the name) becomes the key; names sharing a key keep their relative order.
/// Names a rule does not match are reported as [`Problem::Unassignable`] and
/// left out of that branch.
#[derive(Debug, Clone)]
pub struct Partitioner {
    rules: Vec<Regex>,
}

impl Partitioner {
    /// Compiles the rules, failing on the first invalid pattern or on an empty
    /// rule list.
    pub fn new<I>(patterns: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).or_raise(|| ErrorKind::InvalidPattern { rule: "group_by", pattern: pattern.into() })
            })
            .collect::<Result<Vec<_>>>()?;
        if rules.is_empty() {
            exn::bail!(ErrorKind::EmptyRules);
        }
        Ok(Self { rules })
    }

    /// Number of levels in every tree this partitioner produces.
    pub fn depth(&self) -> usize {
        self.rules.len()
    }

    #[instrument(skip_all, fields(names = names.len(), depth = self.rules.len()))]
    pub fn partition(&self, names: Vec<String>, diagnostics: &mut Diagnostics) -> GroupTree<String> {
        Self::partition_level(&self.rules, names, diagnostics)
    }

    fn partition_level(rules: &[Regex], names: Vec<String>, diagnostics: &mut Diagnostics) -> GroupTree<String> {
        let Some((rule, rest)) = rules.split_first() else {
            return GroupTree::Items(names);
        };
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for name in names {
            match rule.find(&name).map(|found| found.as_str().to_string()) {
                Some(key) => groups.entry(key).or_default().push(name),
                None => diagnostics.record(Problem::Unassignable { name, pattern: rule.as_str().to_string() }),
            }
        }
        GroupTree::Branch(
            groups.into_iter().map(|(key, names)| (key, Self::partition_level(rest, names, diagnostics))).collect(),
        )
    }
}
