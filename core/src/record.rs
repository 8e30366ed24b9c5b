//! Engine result records and their decoding.
//!
//! Every processed key yields at most one fixed-layout record from the engine:
//! an action code, a flag byte, a fixed-capacity buffer of UTF-32 codepoints,
//! the number of valid codepoints and the number of characters to delete.
//! `decode` turns that record into a `ProcessResult` the controller can apply.
//!
//! Decoding never fails. Oversized counts are clamped to the buffer capacity
//! and codepoints that are not Unicode scalar values are skipped one by one.

use std::ops::Index;

/// Number of codepoint slots in an engine record.
pub const CAPACITY: usize = 256;

/// Flag bit set by the engine when it wants the key swallowed even though
/// there is nothing to insert (e.g. shortcut triggers like `->`).
pub const FLAG_KEY_CONSUMED: u8 = 0x01;

/// Action requested by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineAction {
    /// Nothing to do, pass the key through
    #[default]
    None,
    /// Delete `backspace` characters and insert the codepoints
    Send,
    /// Restore the raw keystrokes (decoded but inert)
    Restore,
}

impl EngineAction {
    /// Map a raw action code. Unknown codes are treated as `None`.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Send,
            2 => Self::Restore,
            _ => Self::None,
        }
    }

    /// Raw action code as used on the wire.
    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Send => 1,
            Self::Restore => 2,
        }
    }
}

/// Fixed-capacity codepoint buffer of an engine record.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CodepointBuffer([u32; CAPACITY]);

impl CodepointBuffer {
    /// An all-zero buffer.
    pub fn new() -> Self {
        Self([0; CAPACITY])
    }

    /// Copy up to `CAPACITY` codepoints from a slice; the rest stay zero.
    pub fn from_slice(codepoints: &[u32]) -> Self {
        let mut buf = Self::new();
        let n = codepoints.len().min(CAPACITY);
        buf.0[..n].copy_from_slice(&codepoints[..n]);
        buf
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl Default for CodepointBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for CodepointBuffer {
    type Output = u32;

    fn index(&self, index: usize) -> &u32 {
        &self.0[index]
    }
}

impl std::fmt::Debug for CodepointBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Trailing zeros are noise in logs.
        let used = self.0.iter().rposition(|&cp| cp != 0).map_or(0, |i| i + 1);
        f.debug_list().entries(&self.0[..used]).finish()
    }
}

/// One result record produced by the engine for a single key.
///
/// This is the layout-neutral view; backends copy whatever the engine hands
/// them into this shape before releasing the engine's memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineRecord {
    /// Raw action code (see `EngineAction::from_code`)
    pub action: u8,
    /// Flag bits (`FLAG_KEY_CONSUMED`)
    pub flags: u8,
    /// Output codepoints, only the first `count` are meaningful
    pub codepoints: CodepointBuffer,
    /// Number of valid codepoints as reported by the engine
    pub count: u32,
    /// Characters to delete before inserting
    pub backspace: u32,
}

impl EngineRecord {
    /// A `Send` record carrying `text`, deleting `backspace` characters first.
    pub fn send(text: &str, backspace: u32, flags: u8) -> Self {
        let codepoints: Vec<u32> = text.chars().map(u32::from).collect();
        Self {
            action: EngineAction::Send.code(),
            flags,
            codepoints: CodepointBuffer::from_slice(&codepoints),
            count: codepoints.len().min(CAPACITY) as u32,
            backspace,
        }
    }

    /// A record with no text, only an action and flags.
    pub fn bare(action: EngineAction, flags: u8) -> Self {
        Self {
            action: action.code(),
            flags,
            ..Self::default()
        }
    }

    pub fn action(&self) -> EngineAction {
        EngineAction::from_code(self.action)
    }

    pub fn key_consumed(&self) -> bool {
        self.flags & FLAG_KEY_CONSUMED != 0
    }
}

/// Application-level outcome of processing one key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessResult {
    pub action: EngineAction,
    /// Text to insert after the deletions
    pub text: String,
    /// Single-character backward deletions to issue first
    pub backspace_count: usize,
    /// Whether the host should swallow the key
    pub consumed: bool,
}

impl ProcessResult {
    /// The "swallow the key, change nothing" result.
    pub fn consumed_only() -> Self {
        Self {
            action: EngineAction::None,
            text: String::new(),
            backspace_count: 0,
            consumed: true,
        }
    }

    /// Whether applying this result mutates the text client.
    pub fn has_mutation(&self) -> bool {
        self.backspace_count > 0 || !self.text.is_empty()
    }
}

/// Decode one engine record.
///
/// Returns `None` when the engine has nothing to say about the key. A `Send`
/// record always decodes to `Some`, even when it carries neither text nor
/// deletions, so pure-deletion restores are never dropped.
pub fn decode(record: &EngineRecord) -> Option<ProcessResult> {
    let consumed_flag = record.key_consumed();

    if record.action() != EngineAction::Send {
        return consumed_flag.then(ProcessResult::consumed_only);
    }

    let mut count = record.count as usize;
    if count > CAPACITY {
        tracing::warn!(count, capacity = CAPACITY, "engine reported oversized count, clamping");
        count = CAPACITY;
    }

    let mut text = String::with_capacity(count);
    for &cp in &record.codepoints.as_slice()[..count] {
        match char::from_u32(cp) {
            Some(ch) => text.push(ch),
            None => tracing::trace!(codepoint = cp, "skipping invalid codepoint"),
        }
    }

    Some(ProcessResult {
        action: EngineAction::Send,
        text,
        backspace_count: record.backspace as usize,
        consumed: consumed_flag || count > 0,
    })
}
