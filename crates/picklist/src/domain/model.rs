//! Domain models for pick-lists and their line items.

use crate::domain::errors::DomainError;

/// One line of a pick-list. Any of its tokens is an acceptable scan code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineItem {
    tokens: Vec<String>,
}

impl LineItem {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Exact string comparison against every token on the line.
    pub fn contains(&self, code: &str) -> bool {
        self.tokens.iter().any(|token| token == code)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// An order being picked: the verbatim scanned text, its parsed lines, and
/// how far the operator has progressed through them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickList {
    source_text: String,
    items: Vec<LineItem>,
    last_picked: Option<usize>,
}

impl PickList {
    /// Build an unstarted pick-list. Parsing lives in [`crate::app::parse`].
    pub fn new(source_text: impl Into<String>, items: Vec<LineItem>) -> Self {
        Self {
            source_text: source_text.into(),
            items,
            last_picked: None,
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the most recently picked line.
    pub fn last_picked(&self) -> Option<usize> {
        self.last_picked
    }

    /// Integer form of [`Self::last_picked`], `-1` when nothing is picked yet.
    pub fn last_picked_index(&self) -> i64 {
        self.last_picked
            .and_then(|index| i64::try_from(index).ok())
            .unwrap_or(-1)
    }

    /// Restore progress from its persisted integer form.
    ///
    /// Accepts `-1 ..= len - 1`; anything else is rejected rather than
    /// clamped so a stale session never silently skips lines.
    pub fn with_last_picked_index(mut self, index: i64) -> Result<Self, DomainError> {
        let len = self.items.len();
        let out_of_range = || DomainError::IndexOutOfRange { index, len };
        self.last_picked = match index {
            -1 => None,
            value if value < -1 => return Err(out_of_range()),
            value => {
                let position = usize::try_from(value).map_err(|_| out_of_range())?;
                if position >= len {
                    return Err(out_of_range());
                }
                Some(position)
            }
        };
        Ok(self)
    }

    /// Position of the line expected next.
    pub fn next_index(&self) -> usize {
        self.last_picked.map_or(0, |index| index + 1)
    }

    /// The line expected next, or `None` once every line is picked.
    pub fn next_item(&self) -> Option<&LineItem> {
        self.items.get(self.next_index())
    }

    pub fn is_complete(&self) -> bool {
        self.next_item().is_none()
    }

    /// Whether `code` satisfies the line expected next. Never matches a
    /// completed list.
    pub fn matches_next(&self, code: &str) -> bool {
        self.next_item().is_some_and(|item| item.contains(code))
    }

    /// Commit a successful pick. Returns the index that was picked.
    pub fn advance(&mut self) -> Result<usize, DomainError> {
        if self.is_complete() {
            return Err(DomainError::ListComplete);
        }
        let picked = self.next_index();
        self.last_picked = Some(picked);
        Ok(picked)
    }

    /// Undo the most recent pick. Returns the undone index, which is also
    /// the new [`Self::next_index`], or `None` when nothing had been picked.
    pub fn retreat(&mut self) -> Option<usize> {
        let undone = self.last_picked?;
        self.last_picked = undone.checked_sub(1);
        Some(undone)
    }

    /// Share of picked lines as a whole percentage in `0..=100`.
    pub fn progress_percent(&self) -> u8 {
        if self.items.is_empty() {
            return 0;
        }
        let picked = self.next_index().min(self.items.len());
        let percent = picked * 100 / self.items.len();
        u8::try_from(percent.min(100)).unwrap_or(100)
    }
}
