//! In-process engine backend that mirrors the engine's live state.
//!
//! `MirrorEngine` implements every entry point of `EngineBackend` by recording
//! what it was told: the configuration pushes land in an `EngineState`, the
//! lifecycle calls are counted, and processed keys are logged. Key results are
//! replayed from a script queued with `push_response`.
//!
//! It stands in for the native engine in tests and in builds that do not link
//! the engine library (every key then passes through untouched).

use std::collections::{HashMap, VecDeque};
use std::ffi::CStr;

use crate::backend::{EngineBackend, EngineOption, InputMethod};
use crate::record::EngineRecord;

/// Live engine configuration as the engine would hold it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub enabled: bool,
    pub method: InputMethod,
    pub options: HashMap<EngineOption, bool>,
    /// Shortcut table in insertion order, triggers unique
    pub shortcuts: Vec<(String, String)>,
}

impl EngineState {
    pub fn option(&self, option: EngineOption) -> bool {
        self.options.get(&option).copied().unwrap_or(false)
    }

    pub fn shortcut(&self, trigger: &str) -> Option<&str> {
        self.shortcuts
            .iter()
            .find(|(t, _)| t == trigger)
            .map(|(_, r)| r.as_str())
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            enabled: true,
            method: InputMethod::Telex,
            options: HashMap::new(),
            shortcuts: Vec::new(),
        }
    }
}

/// A key as it reached the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCall {
    pub key_code: u16,
    pub caps: bool,
    pub ctrl: bool,
    pub shift: bool,
}

#[derive(Debug, Default)]
pub struct MirrorEngine {
    state: EngineState,
    responses: VecDeque<Option<EngineRecord>>,
    keys: Vec<KeyCall>,
    init_calls: usize,
    clear_calls: usize,
    clear_all_calls: usize,
}

impl MirrorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the engine's answer for the next processed key.
    /// `None` simulates the engine returning no result pointer.
    pub fn push_response(&mut self, response: Option<EngineRecord>) {
        self.responses.push_back(response);
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Keys received so far, oldest first.
    pub fn keys(&self) -> &[KeyCall] {
        &self.keys
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls
    }

    pub fn clear_calls(&self) -> usize {
        self.clear_calls
    }

    pub fn clear_all_calls(&self) -> usize {
        self.clear_all_calls
    }
}

impl EngineBackend for MirrorEngine {
    fn init(&mut self) {
        self.init_calls += 1;
    }

    fn process_key(
        &mut self,
        key_code: u16,
        caps: bool,
        ctrl: bool,
        shift: bool,
    ) -> Option<EngineRecord> {
        self.keys.push(KeyCall { key_code, caps, ctrl, shift });
        self.responses.pop_front().flatten()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled = enabled;
    }

    fn set_method(&mut self, method: u8) {
        self.state.method = InputMethod::from_code(i64::from(method));
    }

    fn set_option(&mut self, option: EngineOption, value: bool) {
        self.state.options.insert(option, value);
    }

    fn add_shortcut(&mut self, trigger: &CStr, replacement: &CStr) {
        let trigger = trigger.to_string_lossy().into_owned();
        let replacement = replacement.to_string_lossy().into_owned();
        match self.state.shortcuts.iter_mut().find(|(t, _)| *t == trigger) {
            Some(entry) => entry.1 = replacement,
            None => self.state.shortcuts.push((trigger, replacement)),
        }
    }

    fn remove_shortcut(&mut self, trigger: &CStr) {
        let trigger = trigger.to_string_lossy();
        self.state.shortcuts.retain(|(t, _)| *t != trigger);
    }

    fn clear_shortcuts(&mut self) {
        self.state.shortcuts.clear();
    }

    fn clear(&mut self) {
        self.clear_calls += 1;
    }

    fn clear_all(&mut self) {
        self.clear_all_calls += 1;
    }
}
