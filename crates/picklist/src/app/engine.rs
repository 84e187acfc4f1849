//! Pick-list engine: routes scans, checks picks, and projects what the
//! operator should see next.
//!
//! The engine is synchronous and holds no locks. Hosts that receive scans on
//! more than one thread must serialize calls themselves.

use tracing::{debug, info, warn};

use crate::app::parse::{self, ParseOptions};
use crate::app::session::SessionSnapshot;
use crate::domain::errors::DomainError;
use crate::domain::model::PickList;
use crate::infra::config::{Config, Messages};

/// What a single scan did to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A new pick-list replaced whatever was loaded before.
    Loaded { lines: usize },
    /// The code matched the expected line, which is now picked.
    Picked { index: usize, complete: bool },
    /// The code did not match; the same line is still expected.
    Mismatch,
    /// An item was scanned before any pick-list.
    NoPickList,
    /// An item was scanned after the last line was picked.
    AlreadyComplete,
}

/// Everything a renderer needs, recomputed after each state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineView {
    pub instruction_text: String,
    pub progress_percent: u8,
    pub picked: usize,
    pub total: usize,
    pub last_outcome: Option<ScanOutcome>,
}

/// Owns the active [`PickList`] and the instruction/progress derived from it.
#[derive(Debug, Clone)]
pub struct PickListEngine {
    pick_list_threshold: usize,
    parse_options: ParseOptions,
    messages: Messages,
    pick_list: Option<PickList>,
    /// Options the active list was parsed with; these travel with snapshots
    /// so a config change cannot reshape a list mid-pick.
    list_parse_options: ParseOptions,
    instruction_text: String,
    progress_percent: u8,
    last_outcome: Option<ScanOutcome>,
}

impl Default for PickListEngine {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl PickListEngine {
    pub fn new(config: &Config) -> Self {
        let mut engine = Self {
            pick_list_threshold: config.scan.pick_list_threshold(),
            parse_options: ParseOptions::from_config(config),
            messages: config.messages.clone(),
            pick_list: None,
            list_parse_options: ParseOptions::from_config(config),
            instruction_text: String::new(),
            progress_percent: 0,
            last_outcome: None,
        };
        engine.refresh();
        engine
    }

    pub fn pick_list(&self) -> Option<&PickList> {
        self.pick_list.as_ref()
    }

    pub fn instruction_text(&self) -> &str {
        &self.instruction_text
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    /// Whether `text` is long enough to be read as a pick-list.
    pub fn is_pick_list_scan(&self, text: &str) -> bool {
        text.chars().count() > self.pick_list_threshold
    }

    /// Lines to show for `list`: the expected line's tokens, or the
    /// completion message once every line is picked.
    pub fn item_to_scan(&self, list: &PickList) -> Vec<String> {
        match list.next_item() {
            Some(item) => item.tokens().to_vec(),
            None => self.messages.completion(),
        }
    }

    /// Pure check of `code` against the line `list` expects next.
    pub fn pick(&self, list: &PickList, code: &str) -> bool {
        list.matches_next(code)
    }

    /// Route one decoded scan: long text loads a pick-list, short text is
    /// an item pick. Never fails; the outcome describes what happened.
    pub fn handle_scan(&mut self, text: &str) -> ScanOutcome {
        if self.is_pick_list_scan(text) {
            self.load(text)
        } else {
            self.scan_item(text)
        }
    }

    /// Replace the active pick-list with one parsed from `text`.
    pub fn load(&mut self, text: &str) -> ScanOutcome {
        let list = parse::parse(text, self.parse_options);
        let lines = list.len();
        if self.pick_list.is_some() {
            debug!("replacing active pick-list");
        }
        info!(lines, "loaded pick-list");
        self.pick_list = Some(list);
        self.list_parse_options = self.parse_options;
        self.record(ScanOutcome::Loaded { lines })
    }

    /// Check `code` against the expected line and advance on a match.
    pub fn scan_item(&mut self, code: &str) -> ScanOutcome {
        let outcome = match self.pick_list.as_mut() {
            None => {
                warn!(code, "item scanned before any pick-list");
                ScanOutcome::NoPickList
            }
            Some(list) if list.is_complete() => {
                warn!(code, "item scanned after pick-list was completed");
                ScanOutcome::AlreadyComplete
            }
            Some(list) if !list.matches_next(code) => {
                warn!(code, expected = list.next_index(), "scan does not match expected line");
                ScanOutcome::Mismatch
            }
            Some(list) => match list.advance() {
                Ok(index) => {
                    let complete = list.is_complete();
                    info!(code, index, complete, "picked line");
                    ScanOutcome::Picked { index, complete }
                }
                // The completion guard above runs first, so this only fires
                // if the list changed between the check and the advance.
                Err(err) => {
                    warn!(code, %err, "pick could not advance");
                    ScanOutcome::AlreadyComplete
                }
            },
        };
        self.record(outcome)
    }

    /// Step back over the most recent pick. Returns the index that is
    /// expected again.
    pub fn undo(&mut self) -> Result<usize, DomainError> {
        let list = self.pick_list.as_mut().ok_or(DomainError::NoPickList)?;
        let index = list.retreat().ok_or(DomainError::NothingPicked)?;
        info!(index, "undid pick");
        self.last_outcome = None;
        self.refresh();
        Ok(index)
    }

    pub fn view(&self) -> EngineView {
        let (picked, total) = self
            .pick_list
            .as_ref()
            .map_or((0, 0), |list| (list.next_index().min(list.len()), list.len()));
        EngineView {
            instruction_text: self.instruction_text.clone(),
            progress_percent: self.progress_percent,
            picked,
            total,
            last_outcome: self.last_outcome.clone(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            source_text: self
                .pick_list
                .as_ref()
                .map(|list| list.source_text().to_owned()),
            last_picked_index: self
                .pick_list
                .as_ref()
                .map_or(-1, PickList::last_picked_index),
            instruction_text: self.instruction_text.clone(),
            split_escaped_newlines: self.list_parse_options.split_escaped_newlines,
        }
    }

    /// Rebuild state from a snapshot by re-parsing its source text with the
    /// options it was originally parsed with, not the current config. On
    /// error the engine keeps its previous state.
    pub fn restore(&mut self, snapshot: &SessionSnapshot) -> Result<(), DomainError> {
        let options = ParseOptions {
            split_escaped_newlines: snapshot.split_escaped_newlines,
        };
        let list = match &snapshot.source_text {
            Some(text) => Some(
                parse::restore(text, snapshot.last_picked_index, options)
                    .inspect_err(|err| warn!(%err, "rejecting persisted session"))?,
            ),
            None => None,
        };
        if options != self.parse_options {
            debug!(
                split_escaped_newlines = options.split_escaped_newlines,
                "restored list keeps the parse options it was loaded with"
            );
        }
        self.pick_list = list;
        self.list_parse_options = options;
        self.last_outcome = None;
        self.refresh();
        if self.instruction_text != snapshot.instruction_text {
            debug!("persisted instruction differs from recomputed one");
        }
        Ok(())
    }

    fn record(&mut self, outcome: ScanOutcome) -> ScanOutcome {
        self.last_outcome = Some(outcome.clone());
        self.refresh();
        outcome
    }

    fn refresh(&mut self) {
        let (lines, progress) = match &self.pick_list {
            Some(list) => (self.item_to_scan(list), list.progress_percent()),
            None => (vec![self.messages.no_pick_list()], 0),
        };
        self.instruction_text = lines.join("\n");
        self.progress_percent = progress;
    }
}
