//! gtranslate command-line driver: one-shot translation, URL preview and REPL.

pub mod config;
pub mod output;
pub mod repl;
pub mod translator;

pub use config::{prepare_data_dirs, resolve_data_dir, resolve_endpoint};
pub use translator::{Translator, TranslatorError, TranslatorOptions};
