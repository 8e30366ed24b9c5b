// libvikey/src/commands.rs
//
// Configuration edits driven by the command line. Keys are the persisted names
// ("InputMethod", "Enabled", "ModernTone", ...), matched case-insensitively.

use anyhow::{bail, Context, Result};

use libvikey_core::settings::{KEY_ENABLED, KEY_INPUT_METHOD};
use libvikey_core::{ConfigurationStore, EngineBackend, EngineOption, InputMethod, KeyValueStore};

/// Parse a boolean the way users tend to type one.
pub fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => bail!("expected a boolean, got '{}'", other),
    }
}

/// Set one configuration key from its textual value.
pub fn set_value<S, B>(config: &mut ConfigurationStore<S, B>, key: &str, value: &str) -> Result<()>
where
    S: KeyValueStore,
    B: EngineBackend,
{
    if key.eq_ignore_ascii_case(KEY_INPUT_METHOD) {
        let method: InputMethod = value
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .with_context(|| format!("invalid value for {}", KEY_INPUT_METHOD))?;
        return config.set_input_method(method);
    }

    if key.eq_ignore_ascii_case(KEY_ENABLED) {
        let enabled = parse_bool(value).with_context(|| format!("invalid value for {}", KEY_ENABLED))?;
        return config.set_enabled(enabled);
    }

    let Some(option) = EngineOption::from_key(key) else {
        bail!("unknown setting '{}'", key);
    };
    let flag = parse_bool(value).with_context(|| format!("invalid value for {}", option.key()))?;
    config.set_option(option, flag)
}

/// Install every preset shortcut, keeping existing entries for other triggers.
/// Returns how many presets were added or changed.
pub fn add_presets<S, B>(config: &mut ConfigurationStore<S, B>) -> Result<usize>
where
    S: KeyValueStore,
    B: EngineBackend,
{
    let mut shortcuts = config.shortcuts();
    let mut changed = 0;
    for preset in libvikey_core::Shortcut::presets() {
        if shortcuts.contains(&preset) {
            continue;
        }
        shortcuts.retain(|s| s.trigger != preset.trigger);
        shortcuts.push(preset);
        changed += 1;
    }
    if changed > 0 {
        config.set_shortcuts(shortcuts)?;
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use libvikey_core::{EngineGateway, MemoryStore, MirrorEngine};

    fn config() -> ConfigurationStore<MemoryStore, MirrorEngine> {
        ConfigurationStore::new(MemoryStore::new(), EngineGateway::shared(MirrorEngine::new()))
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("On").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_set_value_keys() {
        let mut config = config();
        set_value(&mut config, "inputmethod", "vni").unwrap();
        set_value(&mut config, "Enabled", "off").unwrap();
        set_value(&mut config, "FreeTone", "true").unwrap();

        assert_eq!(config.input_method(), InputMethod::Vni);
        assert!(!config.enabled());
        assert!(config.free_tone());

        let gateway = config.gateway().borrow();
        assert_eq!(gateway.backend().state().method, InputMethod::Vni);
        assert!(gateway.backend().state().option(EngineOption::FreeTone));
    }

    #[test]
    fn test_set_value_rejects_unknown() {
        let mut config = config();
        assert!(set_value(&mut config, "Turbo", "true").is_err());
        assert!(set_value(&mut config, "FreeTone", "sometimes").is_err());
        assert!(set_value(&mut config, "InputMethod", "qwerty").is_err());
        assert!(!config.free_tone());
    }

    #[test]
    fn test_add_presets_is_idempotent() {
        let mut config = config();
        config.add_shortcut("vn", "vietnam").unwrap();
        let added = add_presets(&mut config).unwrap();
        assert_eq!(added, libvikey_core::Shortcut::presets().len());
        assert_eq!(add_presets(&mut config).unwrap(), 0);

        let shortcuts = config.shortcuts();
        assert_eq!(shortcuts.len(), libvikey_core::Shortcut::presets().len());
        assert!(shortcuts.iter().any(|s| s.trigger == "vn" && s.replacement == "Việt Nam"));
    }
}
