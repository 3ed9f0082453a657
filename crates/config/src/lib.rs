//! Layered loading of [`DirectorySettings`].
//!
//! Settings for a directory are assembled with [figment] from, lowest priority
//! first:
//!
//! 1. built-in defaults (no blacklist, no file templates),
//! 2. an optional global settings file (`json`, `yaml`/`yml` or `toml`, picked
//!    by extension), by default `settings.json` in the platform config
//!    directory,
//! 3. the directory's own settings document (default [`DEFAULT_LOCAL_FILE`]),
//! 4. environment variables prefixed with [`ENV_PREFIX`], nested with `__`
//!    (e.g. `SHELF_BLACKLIST='["^tmp"]'`).
//!
//! Later layers replace earlier values key by key; file templates present in
//! several layers are merged field by field. Missing files are skipped.
//!
//! Criteria in `specific_filetemplates` are tried in declared order. figment
//! keeps dictionaries sorted, so after merging the templates are put back in
//! the order the JSON documents list them: local keys first, then keys only
//! the global file declares. Templates from YAML or TOML files, and from the
//! environment, follow in key order.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use shelf_grouping::DirectorySettings;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Name of the per-directory settings document.
pub const DEFAULT_LOCAL_FILE: &str = ".settings.json";
/// Prefix of environment variables overriding settings.
pub const ENV_PREFIX: &str = "SHELF_";
const GLOBAL_FILE: &str = "settings.json";

/// Location of the global settings file in the platform config directory.
pub fn default_global_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "shelf").map(|dirs| dirs.config_dir().join(GLOBAL_FILE))
}

/// Builds the settings for individual directories.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    global: Option<PathBuf>,
    local_file: String,
    env: bool,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self { global: default_global_path(), local_file: DEFAULT_LOCAL_FILE.to_string(), env: true }
    }
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global(mut self, path: impl Into<PathBuf>) -> Self {
        self.global = Some(path.into());
        self
    }

    pub fn without_global(mut self) -> Self {
        self.global = None;
        self
    }

    pub fn with_local_file(mut self, name: impl Into<String>) -> Self {
        self.local_file = name.into();
        self
    }

    pub fn without_env(mut self) -> Self {
        self.env = false;
        self
    }

    pub fn local_file(&self) -> &str {
        &self.local_file
    }

    /// Whether a directory listing contains the local settings document.
    pub fn has_local_settings<S: AsRef<str>>(&self, listing: &[S]) -> bool {
        listing.iter().any(|name| name.as_ref() == self.local_file)
    }

    /// The layered figment for `directory`, before extraction.
    pub fn figment(&self, directory: impl AsRef<Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(DirectorySettings::default()));
        if let Some(global) = &self.global {
            figment = merge_file(figment, global)?;
        }
        figment = merge_file(figment, &directory.as_ref().join(&self.local_file))?;
        if self.env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }
        Ok(figment)
    }

    #[instrument(skip(self, directory), fields(directory = %directory.as_ref().display()))]
    pub fn load(&self, directory: impl AsRef<Path>) -> Result<DirectorySettings> {
        let directory = directory.as_ref();
        let mut settings: DirectorySettings = self.figment(directory)?.extract().or_raise(|| ErrorKind::Extract)?;
        let declared = self.declared_order(directory);
        settings.specific_filetemplates.reorder(declared.iter().map(String::as_str));
        tracing::debug!(
            blacklist = settings.blacklist.len(),
            templates = settings.specific_filetemplates.len(),
            "loaded directory settings"
        );
        Ok(settings)
    }

    /// Template keys in the order the local document, then the global file,
    /// declare them.
    fn declared_order(&self, directory: &Path) -> Vec<String> {
        let mut keys = declared_templates(&directory.join(&self.local_file));
        if let Some(global) = &self.global {
            keys.extend(declared_templates(global));
        }
        keys
    }
}

/// Template keys of a JSON settings document, in document order. Empty for
/// other formats and for documents that cannot be read.
fn declared_templates(path: &Path) -> Vec<String> {
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let Some(document) = is_json.then(|| fs::read_to_string(path).ok()).flatten() else {
        return Vec::new();
    };
    match serde_json::from_str::<DirectorySettings>(&document) {
        Ok(settings) => settings.specific_filetemplates.keys().map(str::to_string).collect(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cannot recover template order");
            Vec::new()
        },
    }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_lowercase);
    Ok(match extension.as_deref() {
        Some("json") => figment.merge(Json::file(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("toml") => figment.merge(Toml::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use shelf_grouping::{GroupingMethod, group_folder};
    use std::fs;
    use tempfile::TempDir;

    fn loader() -> SettingsLoader {
        SettingsLoader::new().without_global().without_env()
    }

    #[test]
    fn test_defaults_without_any_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(loader().load(dir.path()).unwrap(), DirectorySettings::default());
    }

    #[test]
    fn test_local_document() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEFAULT_LOCAL_FILE),
            r#"{"blacklist": ["^tmp"], "specific_filetemplates": {".png": {"group_by": ["^run\\d+"], "elements_per_row": 3}}}"#,
        )
        .unwrap();

        let settings = loader().load(dir.path()).unwrap();
        assert_eq!(settings.blacklist, vec!["^tmp".to_string()]);
        let png = settings.specific_filetemplates.get(".png").unwrap();
        assert_eq!(png.group_by, Some(vec![r"^run\d+".to_string()]));
        assert_eq!(png.elements_per_row, Some(3));
        assert_eq!(png.grouping_method, GroupingMethod::Numerical);
    }

    #[test]
    fn test_local_overrides_global() {
        let global_dir = TempDir::new().unwrap();
        let global = global_dir.path().join("settings.yaml");
        fs::write(
            &global,
            "blacklist: ['^a']\nspecific_filetemplates:\n  .png:\n    group_by: ['^x']\n    elements_per_row: 2\n",
        )
        .unwrap();
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEFAULT_LOCAL_FILE),
            r#"{"blacklist": ["^b"], "specific_filetemplates": {".png": {"elements_per_row": 5}, ".jpg": {"elements_per_row": 1}}}"#,
        )
        .unwrap();

        let settings = loader().with_global(&global).load(dir.path()).unwrap();
        assert_eq!(settings.blacklist, vec!["^b".to_string()]);
        assert_eq!(settings.specific_filetemplates.keys().collect::<Vec<_>>(), vec![".png", ".jpg"]);
        let png = settings.specific_filetemplates.get(".png").unwrap();
        assert_eq!(png.group_by, Some(vec!["^x".to_string()]));
        assert_eq!(png.elements_per_row, Some(5));
    }

    #[test]
    fn test_templates_keep_declared_order() {
        let global_dir = TempDir::new().unwrap();
        let global = global_dir.path().join("settings.json");
        fs::write(&global, r#"{"specific_filetemplates": {"regex:y": {"elements_per_row": 1}, ".png": {}, "regex:^a": {}}}"#)
            .unwrap();
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEFAULT_LOCAL_FILE),
            r#"{"specific_filetemplates": {"regex:z": {"group_by": ["."], "elements_per_row": 1}, "regex:^a": {"group_by": ["."], "elements_per_row": 1}}}"#,
        )
        .unwrap();

        let settings = loader().with_global(&global).load(dir.path()).unwrap();
        let keys: Vec<_> = settings.specific_filetemplates.keys().collect();
        assert_eq!(keys, vec!["regex:z", "regex:^a", "regex:y", ".png"]);

        // "az" matches both local criteria; the first declared one wins.
        let grouping = group_folder(&["az"], &settings);
        assert!(grouping.buckets.contains_key("regex:z"));
        assert!(!grouping.buckets.contains_key("regex:^a"));
    }

    #[test]
    fn test_custom_local_file_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("shelf.toml"), "blacklist = ['~$']\n").unwrap();
        let settings = loader().with_local_file("shelf.toml").load(dir.path()).unwrap();
        assert_eq!(settings.blacklist, vec!["~$".to_string()]);
    }

    #[test]
    fn test_invalid_document() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DEFAULT_LOCAL_FILE), r#"{"blacklist": 12}"#).unwrap();
        let err = loader().load(dir.path()).unwrap_err();
        assert_eq!(*err, ErrorKind::Extract);
    }

    #[rstest]
    #[case("settings.ini")]
    #[case("settings")]
    fn test_unsupported_global_format(#[case] name: &str) {
        let dir = TempDir::new().unwrap();
        let err = loader().with_global(dir.path().join(name)).load(dir.path()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(path) if path.ends_with(name)));
    }

    #[test]
    fn test_has_local_settings() {
        let loader = loader();
        assert!(loader.has_local_settings(&["a.txt", ".settings.json"]));
        assert!(!loader.has_local_settings(&["a.txt", "settings.json"]));
    }
}
