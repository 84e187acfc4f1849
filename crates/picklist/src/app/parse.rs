//! Turning scanned pick-list text into line items.

use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::model::{LineItem, PickList};
use crate::infra::config::Config;

const TOKEN_SEPARATORS: [char; 2] = [' ', '\t'];

/// Knobs controlling how scanned text is split into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Also break lines on the literal two-character sequences `\r` and `\n`.
    ///
    /// Scanners that encode pick-lists as a single barcode payload emit the
    /// escape text instead of control characters, and the app has always
    /// accepted it.
    pub split_escaped_newlines: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            split_escaped_newlines: true,
        }
    }
}

impl ParseOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            split_escaped_newlines: config.scan.split_escaped_newlines(),
        }
    }
}

/// Parse scanned text into an unstarted [`PickList`]. Never fails: text with
/// no usable lines yields an empty list.
///
/// Lines empty before tokenizing are dropped. A line made only of spaces or
/// tabs survives as a line item with no tokens.
pub fn parse(text: &str, options: ParseOptions) -> PickList {
    let items: Vec<LineItem> = split_lines(text, options)
        .into_iter()
        .filter(|line| !line.is_empty())
        .map(tokenize)
        .collect();
    debug!(lines = items.len(), bytes = text.len(), "parsed pick-list");
    PickList::new(text, items)
}

/// Re-parse persisted text and restore the picked index on top of it.
pub fn restore(
    source_text: &str,
    last_picked_index: i64,
    options: ParseOptions,
) -> Result<PickList, DomainError> {
    parse(source_text, options).with_last_picked_index(last_picked_index)
}

fn split_lines(text: &str, options: ParseOptions) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut cursor = 0;

    while cursor < text.len() {
        let rest = &text[cursor..];
        let separator_len = if rest.starts_with("\r\n") {
            2
        } else if rest.starts_with('\r') || rest.starts_with('\n') {
            1
        } else if options.split_escaped_newlines
            && (rest.starts_with("\\r") || rest.starts_with("\\n"))
        {
            2
        } else {
            0
        };

        if separator_len == 0 {
            // Advance by a whole char so slicing stays on UTF-8 boundaries.
            cursor += rest.chars().next().map_or(1, char::len_utf8);
            continue;
        }

        lines.push(&text[start..cursor]);
        cursor += separator_len;
        start = cursor;
    }

    lines.push(&text[start..]);
    lines
}

fn tokenize(line: &str) -> LineItem {
    LineItem::new(
        line.split(TOKEN_SEPARATORS)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .collect(),
    )
}
