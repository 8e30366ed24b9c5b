//! libvikey
//!
//! Host-side glue around the Vietnamese typing engine: the native engine
//! binding, Linux key translation, configuration file location, logging setup
//! and the interactive key session behind the `vikey` binary.
//!
//! The engine-independent pieces (result decoding, gateway, configuration
//! store, event controller) live in `libvikey-core` and are re-exported here.

pub use libvikey_core::*;

pub mod commands;
pub mod keymap;
pub mod logging;
pub mod paths;
pub mod repl;

#[cfg(feature = "native")]
pub mod native;

/// Backend used by the binary: the linked engine when built with the
/// `native` feature, otherwise the in-process mirror (every key passes
/// through untouched).
#[cfg(feature = "native")]
pub type DefaultEngine = native::NativeEngine;

#[cfg(not(feature = "native"))]
pub type DefaultEngine = libvikey_core::MirrorEngine;
