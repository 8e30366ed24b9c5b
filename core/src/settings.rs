//! Persisted configuration, kept in lockstep with the live engine.
//!
//! `ConfigurationStore` exposes one getter/setter pair per option. Every
//! setter writes the value to its `KeyValueStore` and then pushes the same
//! value to the engine through the shared gateway. If the write fails the push
//! is skipped, so the persisted and live values never diverge.

use serde::{Deserialize, Serialize};

use crate::backend::{EngineBackend, EngineOption, InputMethod};
use crate::gateway::SharedGateway;
use crate::store::{KeyValueStore, SettingValue};

pub const KEY_INPUT_METHOD: &str = "InputMethod";
pub const KEY_ENABLED: &str = "Enabled";
pub const KEY_SHORTCUTS: &str = "Shortcuts";

/// A text shortcut: typing `trigger` expands to `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub trigger: String,
    pub replacement: String,
}

impl Shortcut {
    pub fn new(trigger: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            replacement: replacement.into(),
        }
    }

    /// A stock set of common expansions.
    pub fn presets() -> Vec<Shortcut> {
        vec![
            Shortcut::new("vn", "Việt Nam"),
            Shortcut::new("hn", "Hà Nội"),
            Shortcut::new("hcm", "Hồ Chí Minh"),
            Shortcut::new("->", "→"),
            Shortcut::new("=>", "⇒"),
            Shortcut::new(":)", "😊"),
        ]
    }
}

/// Plain snapshot of every option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub input_method: String,
    pub enabled: bool,
    pub modern_tone: bool,
    pub esc_restore: bool,
    pub skip_w_shortcut: bool,
    pub bracket_shortcut: bool,
    pub free_tone: bool,
    pub english_auto_restore: bool,
    pub auto_capitalize: bool,
    pub allow_foreign_consonants: bool,
    pub shortcuts: Vec<Shortcut>,
}

impl Settings {
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

pub struct ConfigurationStore<S, B> {
    store: S,
    gateway: SharedGateway<B>,
}

impl<S: KeyValueStore, B: EngineBackend> ConfigurationStore<S, B> {
    pub fn new(store: S, gateway: SharedGateway<B>) -> Self {
        Self { store, gateway }
    }

    pub fn gateway(&self) -> &SharedGateway<B> {
        &self.gateway
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ========== Input method / enabled ==========

    /// Stored input method; unknown codes read as Telex.
    pub fn input_method(&self) -> InputMethod {
        InputMethod::from_code(self.store.get_int(KEY_INPUT_METHOD, 0))
    }

    pub fn set_input_method(&mut self, method: InputMethod) -> anyhow::Result<()> {
        self.store
            .set(KEY_INPUT_METHOD, SettingValue::Int(i64::from(method.code())))?;
        self.gateway.borrow_mut().set_method(method);
        tracing::info!(%method, "input method changed");
        Ok(())
    }

    pub fn enabled(&self) -> bool {
        self.store.get_bool(KEY_ENABLED, true)
    }

    pub fn set_enabled(&mut self, enabled: bool) -> anyhow::Result<()> {
        self.store.set(KEY_ENABLED, SettingValue::Bool(enabled))?;
        self.gateway.borrow_mut().set_enabled(enabled);
        tracing::info!(enabled, "enabled setting changed");
        Ok(())
    }

    // ========== Boolean options ==========

    pub fn option(&self, option: EngineOption) -> bool {
        self.store.get_bool(option.key(), option.default_value())
    }

    pub fn set_option(&mut self, option: EngineOption, value: bool) -> anyhow::Result<()> {
        self.store.set(option.key(), SettingValue::Bool(value))?;
        self.gateway.borrow_mut().set_option(option, value);
        tracing::info!(option = option.key(), value, "option changed");
        Ok(())
    }

    pub fn modern_tone(&self) -> bool {
        self.option(EngineOption::ModernTone)
    }

    pub fn set_modern_tone(&mut self, value: bool) -> anyhow::Result<()> {
        self.set_option(EngineOption::ModernTone, value)
    }

    pub fn esc_restore(&self) -> bool {
        self.option(EngineOption::EscRestore)
    }

    pub fn set_esc_restore(&mut self, value: bool) -> anyhow::Result<()> {
        self.set_option(EngineOption::EscRestore, value)
    }

    pub fn skip_w_shortcut(&self) -> bool {
        self.option(EngineOption::SkipWShortcut)
    }

    pub fn set_skip_w_shortcut(&mut self, value: bool) -> anyhow::Result<()> {
        self.set_option(EngineOption::SkipWShortcut, value)
    }

    pub fn bracket_shortcut(&self) -> bool {
        self.option(EngineOption::BracketShortcut)
    }

    pub fn set_bracket_shortcut(&mut self, value: bool) -> anyhow::Result<()> {
        self.set_option(EngineOption::BracketShortcut, value)
    }

    pub fn free_tone(&self) -> bool {
        self.option(EngineOption::FreeTone)
    }

    pub fn set_free_tone(&mut self, value: bool) -> anyhow::Result<()> {
        self.set_option(EngineOption::FreeTone, value)
    }

    pub fn english_auto_restore(&self) -> bool {
        self.option(EngineOption::EnglishAutoRestore)
    }

    pub fn set_english_auto_restore(&mut self, value: bool) -> anyhow::Result<()> {
        self.set_option(EngineOption::EnglishAutoRestore, value)
    }

    pub fn auto_capitalize(&self) -> bool {
        self.option(EngineOption::AutoCapitalize)
    }

    pub fn set_auto_capitalize(&mut self, value: bool) -> anyhow::Result<()> {
        self.set_option(EngineOption::AutoCapitalize, value)
    }

    pub fn allow_foreign_consonants(&self) -> bool {
        self.option(EngineOption::AllowForeignConsonants)
    }

    pub fn set_allow_foreign_consonants(&mut self, value: bool) -> anyhow::Result<()> {
        self.set_option(EngineOption::AllowForeignConsonants, value)
    }

    // ========== Shortcuts ==========

    /// Stored shortcut table. Entries that are not exactly a
    /// `[trigger, replacement]` pair are skipped.
    pub fn shortcuts(&self) -> Vec<Shortcut> {
        let Some(value) = self.store.get(KEY_SHORTCUTS) else {
            return Vec::new();
        };
        value
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(|pair| match pair.as_slice() {
                [trigger, replacement] => Some(Shortcut::new(trigger.clone(), replacement.clone())),
                _ => None,
            })
            .collect()
    }

    /// Replace the whole table, then rewrite the engine's table from it.
    pub fn set_shortcuts(&mut self, shortcuts: Vec<Shortcut>) -> anyhow::Result<()> {
        let list = shortcuts
            .iter()
            .map(|s| vec![s.trigger.clone(), s.replacement.clone()])
            .collect();
        self.store.set(KEY_SHORTCUTS, SettingValue::List(list))?;
        self.push_shortcuts(&shortcuts);
        Ok(())
    }

    /// Add or replace the shortcut for `trigger`. The new entry moves to the end.
    pub fn add_shortcut(&mut self, trigger: &str, replacement: &str) -> anyhow::Result<()> {
        let mut current = self.shortcuts();
        current.retain(|s| s.trigger != trigger);
        current.push(Shortcut::new(trigger, replacement));
        self.set_shortcuts(current)
    }

    pub fn remove_shortcut(&mut self, trigger: &str) -> anyhow::Result<()> {
        let mut current = self.shortcuts();
        current.retain(|s| s.trigger != trigger);
        self.set_shortcuts(current)
    }

    fn push_shortcuts(&self, shortcuts: &[Shortcut]) {
        let mut gateway = self.gateway.borrow_mut();
        gateway.clear_shortcuts();
        for s in shortcuts {
            gateway.add_shortcut(&s.trigger, &s.replacement);
        }
        tracing::debug!(count = shortcuts.len(), "shortcut table pushed");
    }

    // ========== Bulk operations ==========

    /// Push every stored option and the whole shortcut table to the engine.
    pub fn apply_all(&self) {
        {
            let mut gateway = self.gateway.borrow_mut();
            gateway.set_method(self.input_method());
            for option in EngineOption::ALL {
                gateway.set_option(option, self.option(option));
            }
            gateway.set_enabled(self.enabled());
        }
        self.push_shortcuts(&self.shortcuts());
        tracing::info!("settings applied to engine");
    }

    /// Write every default back to the store and push it.
    pub fn reset(&mut self) -> anyhow::Result<()> {
        self.set_input_method(InputMethod::default())?;
        for option in EngineOption::ALL {
            self.set_option(option, option.default_value())?;
        }
        self.set_enabled(true)?;
        self.set_shortcuts(Vec::new())
    }

    pub fn snapshot(&self) -> Settings {
        Settings {
            input_method: self.input_method().to_string(),
            enabled: self.enabled(),
            modern_tone: self.modern_tone(),
            esc_restore: self.esc_restore(),
            skip_w_shortcut: self.skip_w_shortcut(),
            bracket_shortcut: self.bracket_shortcut(),
            free_tone: self.free_tone(),
            english_auto_restore: self.english_auto_restore(),
            auto_capitalize: self.auto_capitalize(),
            allow_foreign_consonants: self.allow_foreign_consonants(),
            shortcuts: self.shortcuts(),
        }
    }
}
