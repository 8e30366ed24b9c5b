//! Backend calling the linked `vikey_core` engine library.
//!
//! The engine keeps one process-wide state behind its C entry points. Results
//! of `ime_key_ext` are heap records owned by the engine; they are copied into
//! an `EngineRecord` and handed back with `ime_free` before `process_key`
//! returns, whatever happens in between.

use std::ffi::CStr;
use std::marker::PhantomData;
use std::ptr::NonNull;

use libvikey_core::{CodepointBuffer, EngineBackend, EngineOption, EngineRecord};

mod ffi {
    use std::os::raw::c_char;

    /// Result layout of the engine (1028 bytes, natural alignment).
    #[repr(C)]
    pub struct NativeResult {
        pub chars: [u32; 256],
        pub action: u8,
        pub backspace: u8,
        pub count: u8,
        pub flags: u8,
    }

    const _: () = assert!(std::mem::size_of::<NativeResult>() == 1028);

    #[link(name = "vikey_core")]
    extern "C" {
        pub fn ime_init();
        pub fn ime_key_ext(key: u16, caps: bool, ctrl: bool, shift: bool) -> *mut NativeResult;
        pub fn ime_free(result: *mut NativeResult);

        pub fn ime_enabled(enabled: bool);
        pub fn ime_method(method: u8);
        pub fn ime_clear();
        pub fn ime_clear_all();

        pub fn ime_modern(modern: bool);
        pub fn ime_esc_restore(enabled: bool);
        pub fn ime_skip_w_shortcut(skip: bool);
        pub fn ime_bracket_shortcut(enabled: bool);
        pub fn ime_free_tone(enabled: bool);
        pub fn ime_english_auto_restore(enabled: bool);
        pub fn ime_auto_capitalize(enabled: bool);
        pub fn ime_allow_foreign_consonants(enabled: bool);

        pub fn ime_add_shortcut(trigger: *const c_char, replacement: *const c_char);
        pub fn ime_remove_shortcut(trigger: *const c_char);
        pub fn ime_clear_shortcuts();
    }
}

/// Engine-owned result record, released on drop.
struct ResultHandle(NonNull<ffi::NativeResult>);

impl ResultHandle {
    fn acquire(ptr: *mut ffi::NativeResult) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    fn to_record(&self) -> EngineRecord {
        // SAFETY: the pointer came from ime_key_ext and is not freed until drop.
        let native = unsafe { self.0.as_ref() };
        EngineRecord {
            action: native.action,
            flags: native.flags,
            codepoints: CodepointBuffer::from_slice(&native.chars),
            count: u32::from(native.count),
            backspace: u32::from(native.backspace),
        }
    }
}

impl Drop for ResultHandle {
    fn drop(&mut self) {
        // SAFETY: acquired from ime_key_ext, released exactly once.
        unsafe { ffi::ime_free(self.0.as_ptr()) }
    }
}

/// The native engine. Not `Send`: the engine state is bound to the thread
/// that delivers key events.
#[derive(Debug, Default)]
pub struct NativeEngine {
    _not_send: PhantomData<*const ()>,
}

impl NativeEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EngineBackend for NativeEngine {
    fn init(&mut self) {
        unsafe { ffi::ime_init() }
    }

    fn process_key(
        &mut self,
        key_code: u16,
        caps: bool,
        ctrl: bool,
        shift: bool,
    ) -> Option<EngineRecord> {
        let handle = ResultHandle::acquire(unsafe { ffi::ime_key_ext(key_code, caps, ctrl, shift) })?;
        Some(handle.to_record())
    }

    fn set_enabled(&mut self, enabled: bool) {
        unsafe { ffi::ime_enabled(enabled) }
    }

    fn set_method(&mut self, method: u8) {
        unsafe { ffi::ime_method(method) }
    }

    fn set_option(&mut self, option: EngineOption, value: bool) {
        unsafe {
            match option {
                EngineOption::ModernTone => ffi::ime_modern(value),
                EngineOption::EscRestore => ffi::ime_esc_restore(value),
                EngineOption::SkipWShortcut => ffi::ime_skip_w_shortcut(value),
                EngineOption::BracketShortcut => ffi::ime_bracket_shortcut(value),
                EngineOption::FreeTone => ffi::ime_free_tone(value),
                EngineOption::EnglishAutoRestore => ffi::ime_english_auto_restore(value),
                EngineOption::AutoCapitalize => ffi::ime_auto_capitalize(value),
                EngineOption::AllowForeignConsonants => ffi::ime_allow_foreign_consonants(value),
            }
        }
    }

    fn add_shortcut(&mut self, trigger: &CStr, replacement: &CStr) {
        unsafe { ffi::ime_add_shortcut(trigger.as_ptr(), replacement.as_ptr()) }
    }

    fn remove_shortcut(&mut self, trigger: &CStr) {
        unsafe { ffi::ime_remove_shortcut(trigger.as_ptr()) }
    }

    fn clear_shortcuts(&mut self) {
        unsafe { ffi::ime_clear_shortcuts() }
    }

    fn clear(&mut self) {
        unsafe { ffi::ime_clear() }
    }

    fn clear_all(&mut self) {
        unsafe { ffi::ime_clear_all() }
    }
}
