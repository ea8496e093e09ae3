// src/config/options.rs
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::consts::*;
use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    pub merge: MergeDefaults,
    pub selection: SelectionOptions,
    pub events: Vec<EventDef>,
    pub store: StoreOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            merge: MergeDefaults::default(),
            selection: SelectionOptions::default(),
            events: DEFAULT_EVENTS
                .iter()
                .map(|(code, name)| EventDef { code: s!(*code), name: s!(*name) })
                .collect(),
            store: StoreOptions::default(),
        }
    }
}

impl AppOptions {
    /// Read a TOML options file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Known event codes, configured order.
    pub fn event_codes(&self) -> Vec<String> {
        self.events.iter().map(|e| e.code.clone()).collect()
    }
}

/// Values given to an entity the first time a startlist mentions it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MergeDefaults {
    /// Points recorded for "appears on this event's startlist".
    pub presence_points: f64,
    pub default_cost: f64,
    pub default_group: String,
    pub default_category: String,
}

impl Default for MergeDefaults {
    fn default() -> Self {
        Self {
            presence_points: PRESENCE_POINTS,
            default_cost: DEFAULT_COST,
            default_group: s!(DEFAULT_GROUP),
            default_category: s!(DEFAULT_CATEGORY),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MandatoryPolicy {
    /// Drop names missing from the catalog, report them back.
    Ignore,
    /// Fail with `Error::UnknownMandatoryKey`.
    Reject,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    Bnb,
    Exhaustive,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelectionOptions {
    pub budget: f64,
    pub roster_size: usize,
    pub mandatory_policy: MandatoryPolicy,
    pub solver: SolverKind,
    /// Unset = run to proven optimum.
    pub time_limit_ms: Option<u64>,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            roster_size: DEFAULT_ROSTER_SIZE,
            mandatory_policy: MandatoryPolicy::Ignore,
            solver: SolverKind::Bnb,
            time_limit_ms: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct EventDef {
    pub code: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    pub catalog_path: PathBuf,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { catalog_path: PathBuf::from(STORE_DIR).join(DEFAULT_CATALOG_FILE) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_all_defaults() {
        let opts = AppOptions::from_toml("").unwrap();
        assert_eq!(opts, AppOptions::default());
        assert_eq!(opts.event_codes().len(), DEFAULT_EVENTS.len());
    }

    #[test]
    fn partial_toml_overrides_only_given_keys() {
        let opts = AppOptions::from_toml(
            r#"
            [merge]
            default_cost = 1000.0

            [selection]
            roster_size = 12
            mandatory_policy = "reject"
            solver = "exhaustive"

            [[events]]
            code = "RVV"
            "#,
        )
        .unwrap();
        assert_eq!(opts.merge.default_cost, 1000.0);
        assert_eq!(opts.merge.presence_points, PRESENCE_POINTS);
        assert_eq!(opts.selection.roster_size, 12);
        assert_eq!(opts.selection.budget, DEFAULT_BUDGET);
        assert_eq!(opts.selection.mandatory_policy, MandatoryPolicy::Reject);
        assert_eq!(opts.selection.solver, SolverKind::Exhaustive);
        assert_eq!(opts.event_codes(), vec!["RVV"]);
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = AppOptions::from_toml("[selection]\nroster_size = \"many\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
