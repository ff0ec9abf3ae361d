//! The engine: a registry of named collections.
//!
//! An [`Engine`](engine::Engine) is constructed explicitly and owns its
//! collections; there is no global state. All per-document operations are
//! addressed by collection name and delegated to the
//! [`Collection`](crate::collection::Collection).

pub mod config;
#[allow(clippy::module_inception)]
pub mod engine;

pub use config::{CollectionSettings, EngineConfig};
pub use engine::Engine;
