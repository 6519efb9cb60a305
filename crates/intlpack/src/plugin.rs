use std::sync::Arc;

use intlpack_common::{ModuleGraph, ModuleId, ModuleIdx, PluginOptions, SyntaxTree};
use intlpack_error::{BuildResult, BuildWarning};

use crate::{
  hooks::PluginHooks,
  modes::{development::DevelopmentMode, production::ProductionMode},
  synthesizer::BeforeCompileHook,
  utils::normalize_options::normalize_options,
};

/// The user-facing entry point. Validates the options once and dispatches
/// every hook to the selected mode.
pub enum IntlPlugin {
  Development(DevelopmentMode),
  Production(ProductionMode),
}

impl std::fmt::Debug for IntlPlugin {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Development(_) => f.write_str("IntlPlugin::Development"),
      Self::Production(_) => f.write_str("IntlPlugin::Production"),
    }
  }
}

impl IntlPlugin {
  pub fn new(options: PluginOptions) -> BuildResult<Self> {
    let production = options.production;
    let options = Arc::new(normalize_options(options)?);
    Ok(if production {
      Self::Production(ProductionMode::new(&options)?)
    } else {
      Self::Development(DevelopmentMode::new(&options)?)
    })
  }

  /// Installs the pre-compilation extension point. Development mode has no
  /// compilation step, so the hook only takes effect in production mode.
  pub fn set_before_compile(&mut self, hook: BeforeCompileHook) {
    if let Self::Production(mode) = self {
      mode.set_before_compile(hook);
    }
  }

  /// Resolution-time replacement for a module request. Production builds
  /// bind whole-library requests to the runtime flavor; development builds
  /// resolve everything as-is.
  pub fn resolve(&self, request: &ModuleId) -> ModuleId {
    match self {
      Self::Development(_) => request.clone(),
      Self::Production(mode) => mode.resolve(request),
    }
  }
}

impl PluginHooks for IntlPlugin {
  fn entry_option(&mut self, graph: &mut ModuleGraph) -> BuildResult<()> {
    match self {
      Self::Development(mode) => mode.entry_option(graph),
      Self::Production(mode) => mode.entry_option(graph),
    }
  }

  fn module_parsed(
    &mut self,
    graph: &mut ModuleGraph,
    module: ModuleIdx,
    tree: &SyntaxTree,
  ) -> BuildResult<()> {
    match self {
      Self::Development(mode) => mode.module_parsed(graph, module, tree),
      Self::Production(mode) => mode.module_parsed(graph, module, tree),
    }
  }

  fn after_optimize_chunks(&mut self, graph: &mut ModuleGraph) -> BuildResult<()> {
    match self {
      Self::Development(mode) => mode.after_optimize_chunks(graph),
      Self::Production(mode) => mode.after_optimize_chunks(graph),
    }
  }

  fn after_optimize_module_ids(&mut self, graph: &mut ModuleGraph) -> BuildResult<()> {
    match self {
      Self::Development(mode) => mode.after_optimize_module_ids(graph),
      Self::Production(mode) => mode.after_optimize_module_ids(graph),
    }
  }

  fn optimize_chunk_order(&mut self, graph: &mut ModuleGraph) -> BuildResult<()> {
    match self {
      Self::Development(mode) => mode.optimize_chunk_order(graph),
      Self::Production(mode) => mode.optimize_chunk_order(graph),
    }
  }

  fn take_warnings(&mut self) -> Vec<BuildWarning> {
    match self {
      Self::Development(mode) => mode.take_warnings(),
      Self::Production(mode) => mode.take_warnings(),
    }
  }
}
