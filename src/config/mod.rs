// src/config/mod.rs
//! Runtime configuration (JSON file + environment overrides).

pub mod classifier;

pub use classifier::ClassifierConfig;
