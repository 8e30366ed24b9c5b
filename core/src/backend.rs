// core/src/backend.rs
//
// The seam between the gateway and whatever actually implements the typing
// engine: the linked native library, or the in-process mirror used by tests.

use std::ffi::CStr;
use std::fmt;
use std::str::FromStr;

use crate::record::EngineRecord;

/// Keystroke-to-diacritic convention used by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMethod {
    #[default]
    Telex,
    Vni,
}

impl InputMethod {
    /// Map a stored code. Anything other than 1 falls back to Telex.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Vni,
            _ => Self::Telex,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Telex => 0,
            Self::Vni => 1,
        }
    }
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Telex => f.write_str("Telex"),
            Self::Vni => f.write_str("VNI"),
        }
    }
}

impl FromStr for InputMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "telex" | "0" => Ok(Self::Telex),
            "vni" | "1" => Ok(Self::Vni),
            other => Err(format!("unknown input method '{}' (expected telex or vni)", other)),
        }
    }
}

/// The independent boolean engine options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineOption {
    /// Modern tone placement (hoà vs hòa)
    ModernTone,
    /// ESC restores the raw keystrokes of the current word
    EscRestore,
    /// `w` at word start stays `w` instead of becoming `ư`
    SkipWShortcut,
    /// `]` -> `ư`, `[` -> `ơ`
    BracketShortcut,
    /// Skip tone placement validation
    FreeTone,
    /// Restore English words that were mangled by transformation
    EnglishAutoRestore,
    /// Capitalize after sentence end
    AutoCapitalize,
    /// Accept f, j, w, z as consonants
    AllowForeignConsonants,
}

impl EngineOption {
    pub const ALL: [EngineOption; 8] = [
        Self::ModernTone,
        Self::EscRestore,
        Self::SkipWShortcut,
        Self::BracketShortcut,
        Self::FreeTone,
        Self::EnglishAutoRestore,
        Self::AutoCapitalize,
        Self::AllowForeignConsonants,
    ];

    /// Name of the option in the persisted store.
    pub fn key(self) -> &'static str {
        match self {
            Self::ModernTone => "ModernTone",
            Self::EscRestore => "EscRestore",
            Self::SkipWShortcut => "SkipWShortcut",
            Self::BracketShortcut => "BracketShortcut",
            Self::FreeTone => "FreeTone",
            Self::EnglishAutoRestore => "EnglishAutoRestore",
            Self::AutoCapitalize => "AutoCapitalize",
            Self::AllowForeignConsonants => "AllowForeignConsonants",
        }
    }

    pub fn default_value(self) -> bool {
        matches!(
            self,
            Self::ModernTone | Self::EscRestore | Self::EnglishAutoRestore
        )
    }

    /// Look an option up by its persisted key name (case-insensitive).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|opt| opt.key().eq_ignore_ascii_case(key))
    }
}

/// Raw engine entry points, one method per foreign call.
///
/// Implementations must treat `init` as the first call. `process_key` hands
/// back an owned copy of the engine's record; a backend that receives a
/// borrowed pointer releases it before returning, on every path.
pub trait EngineBackend {
    fn init(&mut self);

    fn process_key(&mut self, key_code: u16, caps: bool, ctrl: bool, shift: bool)
        -> Option<EngineRecord>;

    fn set_enabled(&mut self, enabled: bool);

    /// 0 = Telex, 1 = VNI
    fn set_method(&mut self, method: u8);

    fn set_option(&mut self, option: EngineOption, value: bool);

    fn add_shortcut(&mut self, trigger: &CStr, replacement: &CStr);

    fn remove_shortcut(&mut self, trigger: &CStr);

    fn clear_shortcuts(&mut self);

    /// Reset the composition buffer at a word boundary.
    fn clear(&mut self);

    /// Reset the composition buffer and word history.
    fn clear_all(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_method_fallback() {
        assert_eq!(InputMethod::from_code(0), InputMethod::Telex);
        assert_eq!(InputMethod::from_code(1), InputMethod::Vni);
        assert_eq!(InputMethod::from_code(2), InputMethod::Telex);
        assert_eq!(InputMethod::from_code(-1), InputMethod::Telex);
    }

    #[test]
    fn test_input_method_parse() {
        assert_eq!("VNI".parse::<InputMethod>(), Ok(InputMethod::Vni));
        assert_eq!("0".parse::<InputMethod>(), Ok(InputMethod::Telex));
        assert!("qwerty".parse::<InputMethod>().is_err());
    }

    #[test]
    fn test_option_defaults() {
        let on: Vec<_> = EngineOption::ALL
            .into_iter()
            .filter(|o| o.default_value())
            .collect();
        assert_eq!(
            on,
            vec![
                EngineOption::ModernTone,
                EngineOption::EscRestore,
                EngineOption::EnglishAutoRestore
            ]
        );
    }

    #[test]
    fn test_option_key_lookup() {
        assert_eq!(EngineOption::from_key("freetone"), Some(EngineOption::FreeTone));
        assert_eq!(EngineOption::from_key("Enabled"), None);
        for opt in EngineOption::ALL {
            assert_eq!(EngineOption::from_key(opt.key()), Some(opt));
        }
    }
}
