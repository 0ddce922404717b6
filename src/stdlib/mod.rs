//! Standard library definitions

pub mod builtins;

pub use builtins::BUILTIN_CLASSES;
