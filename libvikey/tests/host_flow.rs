//! Host-side flows: IBus events through the controller, the line-driven
//! session and command-line configuration edits against a real file.

use std::io::Cursor;

use libvikey::keymap::{self, IBUS_CONTROL_MASK, IBUS_LOCK_MASK, IBUS_RELEASE_MASK, IBUS_SHIFT_MASK};
use libvikey::{
    commands, keycode, repl, ConfigurationStore, EngineGateway, EngineOption, EngineRecord,
    EventController, InputMethod, KeyResult, MemoryStore, MirrorEngine, TextBuffer, TomlFileStore,
    FLAG_KEY_CONSUMED,
};

fn controller() -> EventController<MirrorEngine> {
    let settings =
        ConfigurationStore::new(MemoryStore::new(), EngineGateway::shared(MirrorEngine::new()));
    EventController::new(&settings)
}

fn script(ctl: &EventController<MirrorEngine>, response: Option<EngineRecord>) {
    ctl.gateway().borrow_mut().backend_mut().push_response(response);
}

#[test]
fn test_ibus_press_reaches_engine_with_caps() {
    let mut ctl = controller();
    let mut buf = TextBuffer::new();

    // X11 38 is "a"; shift plus caps lock cancel out.
    let event = keymap::event_from_ibus(38, IBUS_SHIFT_MASK | IBUS_LOCK_MASK).unwrap();
    script(&ctl, Some(EngineRecord::send("a", 0, 0)));
    assert_eq!(ctl.handle(&event, &mut buf), KeyResult::Handled);
    assert_eq!(buf.text(), "a");

    let gateway = ctl.gateway().borrow();
    let call = gateway.backend().keys()[0];
    assert_eq!(call.key_code, keycode::A);
    assert!(!call.caps);
    assert!(call.shift);
}

#[test]
fn test_ibus_release_and_hotkey() {
    let mut ctl = controller();
    let mut buf = TextBuffer::new();

    let release = keymap::event_from_ibus(38, IBUS_RELEASE_MASK).unwrap();
    assert_eq!(ctl.handle(&release, &mut buf), KeyResult::NotHandled);

    let hotkey = keymap::event_from_ibus(65, IBUS_CONTROL_MASK).unwrap();
    assert_eq!(ctl.handle(&hotkey, &mut buf), KeyResult::Handled);
    assert!(!ctl.is_enabled());
    assert!(!ctl.gateway().borrow().backend().state().enabled);
    assert!(ctl.gateway().borrow().backend().keys().is_empty());
}

#[test]
fn test_repl_session() {
    let mut ctl = controller();
    script(&ctl, Some(EngineRecord::send("d", 0, 0)));
    script(&ctl, Some(EngineRecord::send("đ", 1, FLAG_KEY_CONSUMED)));

    let input = "d\nd\n\ncmd+c\nbogus+x\nctrl+space\na\nactivate\n";
    let mut out = Vec::new();
    let buf = repl::run(&mut ctl, Cursor::new(input), &mut out).unwrap();

    assert_eq!(buf.text(), "đ");
    assert!(!ctl.is_enabled());
    assert_eq!(ctl.gateway().borrow().backend().clear_all_calls(), 1);

    let out = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[1].contains("consumed") && lines[1].contains("text='đ'"));
    assert!(lines[2].starts_with("cmd+c") && lines[2].contains("passthrough"));
    assert!(lines[3].starts_with("error: unknown modifier"));
    assert!(lines[5].ends_with("[off]"));
    assert_eq!(lines[6], "session activated");
}

#[test]
fn test_config_edits_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vikey").join("config.toml");

    {
        let store = TomlFileStore::open(&path).unwrap();
        let mut config =
            ConfigurationStore::new(store, EngineGateway::shared(MirrorEngine::new()));
        commands::set_value(&mut config, "InputMethod", "vni").unwrap();
        commands::set_value(&mut config, "autocapitalize", "yes").unwrap();
        commands::add_presets(&mut config).unwrap();
        config.remove_shortcut(":)").unwrap();
    }

    let store = TomlFileStore::open(&path).unwrap();
    let config = ConfigurationStore::new(store, EngineGateway::shared(MirrorEngine::new()));
    assert_eq!(config.input_method(), InputMethod::Vni);
    assert!(config.option(EngineOption::AutoCapitalize));
    let shortcuts = config.shortcuts();
    assert_eq!(shortcuts.len(), 5);
    assert!(shortcuts.iter().all(|s| s.trigger != ":)"));

    let shown = config.snapshot().to_toml_string().unwrap();
    assert!(shown.contains("input_method = \"VNI\""));
}
