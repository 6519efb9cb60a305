mod chunk_order;
mod classifier;
mod consolidate;
mod extraction;
mod hooks;
mod modes;
mod plugin;
mod registry;
mod synthesizer;
mod utils;

pub use crate::{
  classifier::{Classification, RequestClassifier},
  extraction::ExtractionCache,
  hooks::PluginHooks,
  modes::{development::DevelopmentMode, production::ProductionMode},
  plugin::IntlPlugin,
  registry::SynthesizedModules,
  synthesizer::{BeforeCompileHook, CompiledDataSynthesizer},
};
pub use intlpack_common::*;
pub use intlpack_error::{BuildError, BuildResult, BuildWarning};
