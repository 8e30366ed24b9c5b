//! libvikey-core
//!
//! Engine-independent half of the vikey input method host:
//! - `record` - engine result records and their decoding
//! - `backend` - the engine seam (`EngineBackend`) plus input methods and options
//! - `gateway` - the single owner of engine calls, with lazy init
//! - `store` / `settings` - persisted configuration kept in sync with the engine
//! - `controller` - the per-keystroke decision tree driving a `TextClient`
//!
//! `MirrorEngine` is an in-process backend that records configuration and
//! replays scripted results; tests and engine-less builds use it.

// Core modules
pub mod backend;
pub use backend::{EngineBackend, EngineOption, InputMethod};

pub mod record;
pub use record::{
    decode, CodepointBuffer, EngineAction, EngineRecord, ProcessResult, CAPACITY, FLAG_KEY_CONSUMED,
};

pub mod gateway;
pub use gateway::{to_c_string, EngineGateway, SharedGateway};

pub mod mirror;
pub use mirror::{EngineState, KeyCall, MirrorEngine};

// Configuration
pub mod store;
pub use store::{KeyValueStore, MemoryStore, SettingValue, TomlFileStore};

pub mod settings;
pub use settings::{ConfigurationStore, Settings, Shortcut};

// Event handling
pub mod keycode;

pub mod client;
pub use client::{ClientOp, TextBuffer, TextClient};

pub mod controller;
pub use controller::{calculate_caps, EventController, KeyEvent, KeyEventKind, KeyResult, Modifiers};
