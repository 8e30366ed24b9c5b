//! The only door to the typing engine.
//!
//! `EngineGateway` owns an `EngineBackend` and is responsible for calling it
//! correctly: the engine is initialized exactly once before any other call,
//! strings cross the boundary as NUL-terminated bytes, and key results are
//! decoded into `ProcessResult` values.
//!
//! Key events arrive serialized on a single callback context, so the gateway
//! is shared between the configuration store and the controller through a
//! `SharedGateway` (`Rc<RefCell<_>>`) without any locking.

use std::cell::RefCell;
use std::ffi::CString;
use std::rc::Rc;

use crate::backend::{EngineBackend, EngineOption, InputMethod};
use crate::record::{self, ProcessResult};

/// Single-threaded shared handle to a gateway.
pub type SharedGateway<B> = Rc<RefCell<EngineGateway<B>>>;

pub struct EngineGateway<B> {
    backend: B,
    initialized: bool,
}

impl<B: EngineBackend> EngineGateway<B> {
    /// Wrap a backend. The engine itself is initialized lazily on first use.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            initialized: false,
        }
    }

    /// Wrap a backend into a shared handle.
    pub fn shared(backend: B) -> SharedGateway<B> {
        Rc::new(RefCell::new(Self::new(backend)))
    }

    /// Initialize the engine. Only the first call reaches the backend.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.backend.init();
        self.initialized = true;
        tracing::info!("typing engine initialized");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Run one key through the engine.
    ///
    /// `caps`, `ctrl` and `shift` are already-resolved booleans, not raw
    /// modifier masks.
    pub fn process_key(
        &mut self,
        key_code: u16,
        caps: bool,
        ctrl: bool,
        shift: bool,
    ) -> Option<ProcessResult> {
        self.init();
        let record = self.backend.process_key(key_code, caps, ctrl, shift)?;
        tracing::trace!(key_code, ?record, "engine record");
        record::decode(&record)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.init();
        self.backend.set_enabled(enabled);
    }

    pub fn set_method(&mut self, method: InputMethod) {
        self.init();
        self.backend.set_method(method.code());
    }

    pub fn set_option(&mut self, option: EngineOption, value: bool) {
        self.init();
        self.backend.set_option(option, value);
    }

    pub fn set_modern_tone(&mut self, value: bool) {
        self.set_option(EngineOption::ModernTone, value);
    }

    pub fn set_esc_restore(&mut self, value: bool) {
        self.set_option(EngineOption::EscRestore, value);
    }

    pub fn set_skip_w_shortcut(&mut self, value: bool) {
        self.set_option(EngineOption::SkipWShortcut, value);
    }

    pub fn set_bracket_shortcut(&mut self, value: bool) {
        self.set_option(EngineOption::BracketShortcut, value);
    }

    pub fn set_free_tone(&mut self, value: bool) {
        self.set_option(EngineOption::FreeTone, value);
    }

    pub fn set_english_auto_restore(&mut self, value: bool) {
        self.set_option(EngineOption::EnglishAutoRestore, value);
    }

    pub fn set_auto_capitalize(&mut self, value: bool) {
        self.set_option(EngineOption::AutoCapitalize, value);
    }

    pub fn set_allow_foreign_consonants(&mut self, value: bool) {
        self.set_option(EngineOption::AllowForeignConsonants, value);
    }

    pub fn add_shortcut(&mut self, trigger: &str, replacement: &str) {
        self.init();
        let trigger = to_c_string(trigger);
        let replacement = to_c_string(replacement);
        self.backend.add_shortcut(&trigger, &replacement);
    }

    pub fn remove_shortcut(&mut self, trigger: &str) {
        self.init();
        let trigger = to_c_string(trigger);
        self.backend.remove_shortcut(&trigger);
    }

    pub fn clear_shortcuts(&mut self) {
        self.init();
        self.backend.clear_shortcuts();
    }

    /// Drop the engine's in-progress word. Configuration is untouched.
    pub fn clear(&mut self) {
        self.init();
        self.backend.clear();
    }

    /// Drop the in-progress word and word history. Configuration is untouched.
    pub fn clear_all(&mut self) {
        self.init();
        self.backend.clear_all();
    }
}

/// Convert to a C string, truncating at the first embedded NUL.
pub fn to_c_string(s: &str) -> CString {
    let head = match s.find('\0') {
        Some(pos) => {
            tracing::debug!(len = s.len(), pos, "truncating string at embedded NUL");
            &s[..pos]
        }
        None => s,
    };
    // `head` has no NUL bytes left.
    CString::new(head).unwrap_or_default()
}
