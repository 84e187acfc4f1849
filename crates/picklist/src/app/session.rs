//! Session persistence utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const SESSION_DIR: &str = ".picklist";
const SESSION_FILE: &str = "session.json";
const SESSION_TMP_FILE: &str = "session.json.tmp";

/// Engine state that survives between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Raw text of the active pick-list, if one was loaded.
    pub source_text: Option<String>,
    /// Most recently picked line, `-1` when nothing has been picked.
    pub last_picked_index: i64,
    /// Instruction that was on screen when the session was saved.
    pub instruction_text: String,
    /// Whether `source_text` was split on literal `\r` / `\n`. Sessions
    /// written before this field existed were always split that way.
    #[serde(default = "SessionSnapshot::default_split_escaped_newlines")]
    pub split_escaped_newlines: bool,
}

impl SessionSnapshot {
    fn default_split_escaped_newlines() -> bool {
        true
    }

    /// Structural checks that do not need the list to be re-parsed. Range
    /// checks against the parsed list happen on restore.
    pub fn validate(&self) -> Result<()> {
        if self.last_picked_index < -1 {
            bail!(
                "last_picked_index must be -1 or greater, got {}",
                self.last_picked_index
            );
        }
        if self.source_text.is_none() && self.last_picked_index != -1 {
            bail!(
                "session has picked index {} but no pick-list",
                self.last_picked_index
            );
        }
        Ok(())
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            source_text: None,
            last_picked_index: -1,
            instruction_text: String::new(),
            split_escaped_newlines: Self::default_split_escaped_newlines(),
        }
    }
}

/// Reads and writes the engine snapshot at `<root>/.picklist/session.json`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
    path: PathBuf,
}

impl SessionStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let dir = root.as_ref().join(SESSION_DIR);
        let path = dir.join(SESSION_FILE);
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate the saved snapshot. A missing file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<SessionSnapshot>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read session file at {}", self.path.display())
                });
            }
        };

        let snapshot: SessionSnapshot = serde_json::from_str(&data)
            .with_context(|| format!("invalid session data in {}", self.path.display()))?;
        snapshot
            .validate()
            .inspect_err(|err| warn!(%err, "rejecting session file"))
            .with_context(|| format!("inconsistent session in {}", self.path.display()))?;
        Ok(Some(snapshot))
    }

    /// Write the snapshot next to the session file, then rename it over the
    /// old one so an interrupted save never leaves half a file behind.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create session directory {}", self.dir.display())
        })?;

        let data = serde_json::to_string_pretty(snapshot)
            .context("failed to serialize session snapshot")?;
        let tmp = self.dir.join(SESSION_TMP_FILE);
        fs::write(&tmp, data)
            .with_context(|| format!("failed to write session file to {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to move session into {}", self.path.display()))?;
        debug!(path = %self.path.display(), index = snapshot.last_picked_index, "saved session");
        Ok(())
    }

    /// Remove the persisted session. Returns whether a file existed.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| {
                format!("failed to remove session file {}", self.path.display())
            }),
        }
    }
}
