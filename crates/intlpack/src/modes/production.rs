use std::sync::Arc;

use rustc_hash::FxHashMap;

use intlpack_common::{
  COMPILED_DATA_CHUNK_PREFIX, Dependency, ModuleGraph, ModuleId, ModuleIdx,
  NormalizedPluginOptions, SyntaxTree, runtime_replacement,
};
use intlpack_error::{BuildResult, BuildWarning};

use crate::{
  chunk_order,
  classifier::{Classification, RequestClassifier},
  consolidate,
  extraction::ExtractionCache,
  hooks::PluginHooks,
  registry::SynthesizedModules,
  synthesizer::{BeforeCompileHook, CompiledDataSynthesizer},
  utils::read_messages::read_messages,
};

/// Production mode: library references resolve to runtime modules,
/// formatters and parsers are statically extracted from user code and
/// precompiled into per-locale compiled-data chunks.
pub struct ProductionMode {
  options: Arc<NormalizedPluginOptions>,
  classifier: RequestClassifier,
  cache: ExtractionCache,
  synthesizer: CompiledDataSynthesizer,
  registry: SynthesizedModules,
  warnings: Vec<BuildWarning>,
}

impl ProductionMode {
  pub fn new(options: &Arc<NormalizedPluginOptions>) -> BuildResult<Self> {
    let mut warnings = vec![];
    let mut messages = FxHashMap::default();
    for locale in &options.supported_locales {
      if let Some(catalog) = read_messages(&options.messages, locale, &mut warnings)? {
        messages.insert(locale.clone(), catalog);
      }
    }

    Ok(Self {
      options: Arc::clone(options),
      classifier: RequestClassifier::new(options.module_filter.clone()),
      cache: ExtractionCache::default(),
      synthesizer: CompiledDataSynthesizer::new(Arc::clone(options), messages),
      registry: SynthesizedModules::default(),
      warnings,
    })
  }

  /// Extension point mutating the compile attributes right before each
  /// compilation.
  pub fn set_before_compile(&mut self, hook: BeforeCompileHook) {
    self.synthesizer.set_before_compile(hook);
  }

  /// Whole-library requests resolve to the runtime flavor of the library.
  pub fn resolve(&self, request: &ModuleId) -> ModuleId {
    runtime_replacement(request).map_or_else(|| request.clone(), ModuleId::new)
  }
}

impl PluginHooks for ProductionMode {
  /// One compiled-data chunk per supported locale, declared as a synthetic
  /// entry so the host creates it before any module lands anywhere.
  fn entry_option(&mut self, graph: &mut ModuleGraph) -> BuildResult<()> {
    for locale in &self.options.supported_locales {
      graph.declare_synthetic_entry(format!("{COMPILED_DATA_CHUNK_PREFIX}{locale}"));
    }
    Ok(())
  }

  fn module_parsed(
    &mut self,
    graph: &mut ModuleGraph,
    module: ModuleIdx,
    tree: &SyntaxTree,
  ) -> BuildResult<()> {
    let request = graph.module(module).request.clone();
    self.cache.record_syntax_tree(&request, tree.clone(), &mut self.warnings);

    if !self.classifier.should_process(&request)
      || RequestClassifier::classify(&request, &self.registry) == Classification::OwnArtifact
    {
      return Ok(());
    }
    let references_library = tree.require_calls().any(|call| {
      call.string_literal_arg(0).is_some_and(|argument| {
        RequestClassifier::classify(&ModuleId::new(argument), &self.registry)
          == Classification::I18nLibrary
      })
    });
    if !references_library {
      return Ok(());
    }

    let extract = self.cache.extract(&request)?.clone();

    // One artifact per supported locale, so the id allocator reserves a
    // distinct, stable module id for each of them and run-time locale
    // switching can address any locale by id. Only the development
    // locale's artifact substitutes the call site; the rest ride along as
    // graph-only dependencies.
    for locale in self.options.supported_locales.clone() {
      let (artifact, source) =
        self.synthesizer.create_artifact_file(&request, &locale, &extract, &mut self.registry)?;
      graph.add_module(artifact.clone(), source);
      let is_development_locale = locale == self.options.development_locale;
      graph.add_dependency(
        module,
        Dependency {
          request: artifact,
          replaces_call_site: is_development_locale,
          internal_require: is_development_locale,
        },
      );
    }
    Ok(())
  }

  fn after_optimize_chunks(&mut self, graph: &mut ModuleGraph) -> BuildResult<()> {
    consolidate::assign_compiled_data_chunks(
      graph,
      &self.registry,
      &self.options.output,
      &mut self.warnings,
    )
  }

  fn after_optimize_module_ids(&mut self, graph: &mut ModuleGraph) -> BuildResult<()> {
    let Self { cache, synthesizer, registry, .. } = self;
    consolidate::consolidate_locale_chunks(graph, registry, |locale| {
      synthesizer.compile(locale, None, cache.global_extract())
    })
  }

  fn optimize_chunk_order(&mut self, graph: &mut ModuleGraph) -> BuildResult<()> {
    chunk_order::sort_chunks(graph, &self.registry);
    Ok(())
  }

  fn take_warnings(&mut self) -> Vec<BuildWarning> {
    std::mem::take(&mut self.warnings)
  }
}
