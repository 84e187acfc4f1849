use insta::assert_snapshot;
use picklist::app::engine::PickListEngine;
use picklist::infra::config::Config;
use picklist::ui::console::Console;

#[test]
fn console_renders_mid_list() {
    let mut engine = PickListEngine::new(&Config::default());
    engine.load("SKU1 LOC1\nSKU2 LOC2");
    engine.scan_item("SKU1");
    let rendered = Console::new().render(&engine.view());
    assert_snapshot!(rendered, @r"
    OK        line 1 picked
    [##########----------]  50% (1/2)
    SKU2
    LOC2
    ");
}

#[test]
fn console_renders_completion() {
    let mut engine = PickListEngine::new(&Config::default());
    engine.load("SKU1");
    engine.scan_item("SKU1");
    let rendered = Console::new().render(&engine.view());
    assert_snapshot!(rendered, @r"
    COMPLETE  line 1 picked, list done
    [####################] 100% (1/1)
    Einde van pickbon.
    Je bent klaar.
    Pak de volgende pickbon.
    ");
}
