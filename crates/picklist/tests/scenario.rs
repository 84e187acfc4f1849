use picklist::app::engine::{PickListEngine, ScanOutcome};
use picklist::app::parse::{ParseOptions, parse};
use picklist::app::session::SessionStore;
use picklist::infra::config::Config;

const SENTINEL: [&str; 3] = ["Einde van pickbon.", "Je bent klaar.", "Pak de volgende pickbon."];

#[test]
fn n_picks_walk_the_whole_list() {
    let text = "SKU-A BIN-1\nSKU-B\nSKU-C BIN-3\nSKU-D";
    let mut engine = PickListEngine::new(&Config::default());
    assert_eq!(engine.handle_scan(text), ScanOutcome::Loaded { lines: 4 });

    for (expected_index, code) in ["BIN-1", "SKU-B", "SKU-C", "SKU-D"].iter().enumerate() {
        let list = engine.pick_list().expect("list loaded").clone();
        assert!(engine.pick(&list, code));
        let outcome = engine.handle_scan(code);
        assert!(matches!(outcome, ScanOutcome::Picked { index, .. } if index == expected_index));
    }

    let list = engine.pick_list().expect("list loaded");
    assert_eq!(list.last_picked_index(), 3);
    assert_eq!(engine.item_to_scan(list), SENTINEL);
    assert_eq!(engine.progress_percent(), 100);
}

#[test]
fn engine_state_survives_a_session_file() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = SessionStore::new(temp.path());
    let config = Config::default();

    let mut before = PickListEngine::new(&config);
    before.handle_scan("SKU1 LOC1\nSKU2\nSKU3");
    before.handle_scan("SKU1");
    before.handle_scan("SKU2");
    store.save(&before.snapshot())?;

    let mut after = PickListEngine::new(&config);
    let snapshot = store.load()?.expect("session saved");
    after.restore(&snapshot)?;

    assert_eq!(after.instruction_text(), "SKU3");
    assert_eq!(after.progress_percent(), before.progress_percent());
    for code in ["SKU1", "SKU2", "SKU3", "LOC1"] {
        let lhs = before.pick_list().expect("list");
        let rhs = after.pick_list().expect("list");
        assert_eq!(before.pick(lhs, code), after.pick(rhs, code));
    }
    Ok(())
}

#[test]
fn parse_keeps_source_verbatim() {
    let text = "A B\r\n\r\nC\\nD";
    let list = parse(text, ParseOptions::default());
    assert_eq!(list.source_text(), text);
    assert_eq!(list.len(), 3);
}
