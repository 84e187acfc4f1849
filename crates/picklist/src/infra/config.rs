//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".picklist/config.toml";

const ENV_THRESHOLD: &str = "PICKLIST_PICK_LIST_THRESHOLD";
const ENV_SPLIT_ESCAPED: &str = "PICKLIST_SPLIT_ESCAPED_NEWLINES";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scan: Scan,
    #[serde(default)]
    pub messages: Messages,
}

/// How incoming scan text is classified and parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
    #[serde(default)]
    pick_list_threshold: Option<usize>,
    #[serde(default)]
    split_escaped_newlines: Option<bool>,
}

impl Scan {
    fn default_pick_list_threshold() -> usize {
        12
    }

    fn default_split_escaped_newlines() -> bool {
        true
    }

    /// Scans with more characters than this are treated as a new pick-list.
    pub fn pick_list_threshold(&self) -> usize {
        self.pick_list_threshold
            .unwrap_or_else(Self::default_pick_list_threshold)
    }

    pub fn split_escaped_newlines(&self) -> bool {
        self.split_escaped_newlines
            .unwrap_or_else(Self::default_split_escaped_newlines)
    }

    pub fn set_pick_list_threshold(&mut self, threshold: usize) {
        self.pick_list_threshold = Some(threshold);
    }

    pub fn set_split_escaped_newlines(&mut self, enabled: bool) {
        self.split_escaped_newlines = Some(enabled);
    }
}

impl Default for Scan {
    fn default() -> Self {
        Self {
            pick_list_threshold: Some(Self::default_pick_list_threshold()),
            split_escaped_newlines: Some(Self::default_split_escaped_newlines()),
        }
    }
}

/// Operator-facing message table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    #[serde(default)]
    completion: Option<Vec<String>>,
    #[serde(default)]
    no_pick_list: Option<String>,
}

impl Messages {
    fn default_completion() -> Vec<String> {
        vec![
            "Einde van pickbon.".into(),
            "Je bent klaar.".into(),
            "Pak de volgende pickbon.".into(),
        ]
    }

    fn default_no_pick_list() -> String {
        "Scan a pick-list first.".into()
    }

    /// Lines shown once every line of the pick-list has been picked.
    pub fn completion(&self) -> Vec<String> {
        self.completion
            .clone()
            .unwrap_or_else(Self::default_completion)
    }

    /// Shown when an item is scanned before any pick-list.
    pub fn no_pick_list(&self) -> String {
        self.no_pick_list
            .clone()
            .unwrap_or_else(Self::default_no_pick_list)
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            completion: Some(Self::default_completion()),
            no_pick_list: Some(Self::default_no_pick_list()),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pick_list_threshold: Option<usize>,
    split_escaped_newlines: Option<bool>,
}

impl EnvOverrides {
    fn from_env() -> Result<Self> {
        let pick_list_threshold = env::var(ENV_THRESHOLD)
            .ok()
            .map(|raw| {
                raw.trim()
                    .parse::<usize>()
                    .with_context(|| format!("{ENV_THRESHOLD} must be a whole number, got {raw:?}"))
            })
            .transpose()?;
        let split_escaped_newlines = env::var(ENV_SPLIT_ESCAPED)
            .ok()
            .map(|raw| {
                raw.trim()
                    .parse::<bool>()
                    .with_context(|| format!("{ENV_SPLIT_ESCAPED} must be true or false, got {raw:?}"))
            })
            .transpose()?;
        Ok(Self {
            pick_list_threshold,
            split_escaped_newlines,
        })
    }

    #[cfg(test)]
    fn for_tests(pick_list_threshold: usize, split_escaped_newlines: bool) -> Self {
        Self {
            pick_list_threshold: Some(pick_list_threshold),
            split_escaped_newlines: Some(split_escaped_newlines),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, the workspace
    /// config under `root`, and env overrides.
    pub fn load(root: &Path) -> Result<Self> {
        let env = EnvOverrides::from_env()?;
        let global = global_config_path();
        let workspace = Some(workspace_config_path(root));
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        let config = apply_env_overrides(merged, env_overrides);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            scan: merge_scan(self.scan, other.scan),
            messages: merge_messages(self.messages, other.messages),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.messages.completion().is_empty() {
            bail!("messages.completion must contain at least one line");
        }
        Ok(())
    }
}

fn merge_scan(mut base: Scan, overlay: Scan) -> Scan {
    if let Some(value) = overlay.pick_list_threshold {
        base.pick_list_threshold = Some(value);
    }
    if let Some(value) = overlay.split_escaped_newlines {
        base.split_escaped_newlines = Some(value);
    }
    base
}

fn merge_messages(mut base: Messages, overlay: Messages) -> Messages {
    if let Some(value) = overlay.completion {
        base.completion = Some(value);
    }
    if let Some(value) = overlay.no_pick_list {
        base.no_pick_list = Some(value);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("picklist/config.toml"))
}

fn workspace_config_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_WORKSPACE_CONFIG_PATH)
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(threshold) = env.pick_list_threshold {
        config.scan.pick_list_threshold = Some(threshold);
    }
    if let Some(enabled) = env.split_escaped_newlines {
        config.scan.split_escaped_newlines = Some(enabled);
    }
    config
}
