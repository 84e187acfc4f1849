//! Plain-text rendering of the engine view for terminal hosts.

use std::fmt::Write as _;

use crate::app::engine::{EngineView, ScanOutcome};

const BAR_WIDTH: usize = 20;

/// Renders an [`EngineView`] as the block of text the CLI prints after each
/// scan. Holds no state of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct Console;

impl Console {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, view: &EngineView) -> String {
        let mut out = String::new();
        if let Some(outcome) = &view.last_outcome {
            let _ = writeln!(out, "{}", status_line(outcome));
        }
        let _ = writeln!(
            out,
            "[{}] {:>3}% ({}/{})",
            progress_bar(view.progress_percent),
            view.progress_percent,
            view.picked,
            view.total
        );
        out.push_str(&view.instruction_text);
        out
    }
}

fn status_line(outcome: &ScanOutcome) -> String {
    match outcome {
        ScanOutcome::Loaded { lines } => format!("LOADED    pick-list with {lines} line(s)"),
        ScanOutcome::Picked {
            index,
            complete: false,
        } => format!("OK        line {} picked", index + 1),
        ScanOutcome::Picked {
            index,
            complete: true,
        } => format!("COMPLETE  line {} picked, list done", index + 1),
        ScanOutcome::Mismatch => "MISMATCH  scan again".to_owned(),
        ScanOutcome::NoPickList => "NO LIST   no pick-list loaded".to_owned(),
        ScanOutcome::AlreadyComplete => "DONE      list already complete".to_owned(),
    }
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_is_fixed_width() {
        assert_eq!(progress_bar(0), "-".repeat(BAR_WIDTH));
        assert_eq!(progress_bar(100), "#".repeat(BAR_WIDTH));
        assert_eq!(progress_bar(50).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn omits_status_before_any_scan() {
        let view = EngineView {
            instruction_text: "Scan a pick-list first.".into(),
            progress_percent: 0,
            picked: 0,
            total: 0,
            last_outcome: None,
        };
        let rendered = Console::new().render(&view);
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.ends_with("Scan a pick-list first."));
    }
}
