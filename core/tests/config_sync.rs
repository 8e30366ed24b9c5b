//! Configuration persistence and engine synchronization through a TOML file.

use libvikey_core::{
    ConfigurationStore, EngineGateway, EngineOption, EventController, InputMethod, KeyValueStore,
    MirrorEngine, SettingValue, Shortcut, TomlFileStore,
};

fn open(path: &std::path::Path) -> ConfigurationStore<TomlFileStore, MirrorEngine> {
    let store = TomlFileStore::open(path).expect("open settings");
    ConfigurationStore::new(store, EngineGateway::shared(MirrorEngine::new()))
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = open(&dir.path().join("config.toml"));
    assert_eq!(settings.input_method(), InputMethod::Telex);
    assert!(settings.modern_tone());
    assert!(settings.enabled());
}

#[test]
fn test_values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    {
        let mut settings = open(&path);
        settings.set_input_method(InputMethod::Vni).unwrap();
        settings.set_bracket_shortcut(true).unwrap();
        settings.set_modern_tone(false).unwrap();
        settings.add_shortcut("vn", "Việt Nam").unwrap();
        settings.add_shortcut("->", "→").unwrap();
    }

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("InputMethod = 1"));
    assert!(content.contains("BracketShortcut = true"));

    let settings = open(&path);
    assert_eq!(settings.input_method(), InputMethod::Vni);
    assert!(settings.bracket_shortcut());
    assert!(!settings.modern_tone());
    assert_eq!(
        settings.shortcuts(),
        vec![Shortcut::new("vn", "Việt Nam"), Shortcut::new("->", "→")]
    );
}

#[test]
fn test_controller_start_pushes_file_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "InputMethod = 1\nFreeTone = true\nEnabled = false\nShortcuts = [[\"hn\", \"Hà Nội\"]]\n",
    )
    .unwrap();

    let settings = open(&path);
    let controller = EventController::new(&settings);
    assert!(!controller.is_enabled());

    let gw = controller.gateway().borrow();
    let state = gw.backend().state();
    assert_eq!(state.method, InputMethod::Vni);
    assert!(state.option(EngineOption::FreeTone));
    assert!(state.option(EngineOption::ModernTone));
    assert_eq!(state.shortcut("hn"), Some("Hà Nội"));
}

#[test]
fn test_invalid_values_fall_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "InputMethod = 42\nModernTone = 3\n").unwrap();

    let settings = open(&path);
    assert_eq!(settings.input_method(), InputMethod::Telex);
    assert!(settings.modern_tone());
}

#[test]
fn test_unparsable_file_is_ignored_then_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is = = not toml").unwrap();

    let mut settings = open(&path);
    assert!(settings.enabled());
    settings.set_free_tone(true).unwrap();

    let store = TomlFileStore::open(&path).unwrap();
    assert_eq!(store.get("FreeTone"), Some(SettingValue::Bool(true)));
}

#[test]
fn test_round_trip_every_option() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = open(&dir.path().join("config.toml"));
    for option in EngineOption::ALL {
        let flipped = !option.default_value();
        settings.set_option(option, flipped).unwrap();
        assert_eq!(settings.option(option), flipped, "{:?}", option);
        assert_eq!(
            settings.gateway().borrow().backend().state().option(option),
            flipped
        );
    }
}
