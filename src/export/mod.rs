//! Model persistence
//!
//! The trained model is stored as a single bincode file that is overwritten
//! on every successful training run and read back lazily after a restart.

mod serializer;

pub use serializer::{ModelStore, FORMAT_VERSION};
