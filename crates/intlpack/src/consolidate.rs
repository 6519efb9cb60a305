use arcstr::ArcStr;
use regex::{Captures, Regex};
use std::sync::OnceLock;

use intlpack_common::{
  ChunkIdx, ChunkKind, GLOBALIZE_RUNTIME, INTERNAL_REQUIRE, Locale, ModuleGraph, ModuleIdx,
  canonical_runtime_name, is_globalize_runtime_module,
};
use intlpack_error::{BuildError, BuildResult, BuildWarning};
use intlpack_utils::{indexmap::FxIndexMap, xxhash::xxhash_hex};

use crate::registry::SynthesizedModules;

/// Moves every synthesized compiled-data module out of whatever chunks the
/// host put it in and into the locale chunk it belongs to, then stamps
/// each locale chunk's output filename. Runs after chunk optimization.
pub fn assign_compiled_data_chunks(
  graph: &mut ModuleGraph,
  registry: &SynthesizedModules,
  output_template: &str,
  warnings: &mut Vec<BuildWarning>,
) -> BuildResult<()> {
  // Insertion-ordered so locale chunks are assigned and stamped in the
  // order they were declared.
  let locale_chunks: FxIndexMap<Locale, ChunkIdx> = graph
    .chunks
    .iter_enumerated()
    .filter_map(|(idx, chunk)| chunk.compiled_data_locale().map(|locale| (locale, idx)))
    .collect();

  let mut any_module_included = false;
  let module_indices: Vec<ModuleIdx> =
    graph.modules.iter_enumerated().map(|(idx, _)| idx).collect();
  for module in module_indices {
    let request = graph.module(module).request.clone();
    let Some(locale) = registry.locale_of(&request).cloned() else { continue };
    any_module_included = true;

    for chunk in graph.module(module).chunks.clone() {
      if !graph.remove_module_from_chunk(module, chunk) {
        return Err(BuildError::graph_invariant(format!(
          "failed to remove chunk {} for module `{request}`",
          chunk.index()
        )));
      }
    }
    if let Some(target) = locale_chunks.get(&locale) {
      graph.add_module_to_chunk(module, *target);
    }
  }

  for (locale, chunk) in &locale_chunks {
    graph.chunks[*chunk].filename_template =
      Some(output_template.replace("[locale]", locale));
  }

  if !any_module_included {
    warnings.push(BuildWarning::NoCompiledDataModules);
  }
  Ok(())
}

struct ChunkRewrite {
  chunk: ChunkIdx,
  placeholder: ModuleIdx,
  entry: ModuleIdx,
  contents: Vec<(ModuleIdx, String)>,
}

/// Consolidates each locale chunk down to one real payload. The entry
/// module receives the whole-build compiled payload with its internal
/// requires rewritten to module-id references; every sibling becomes a
/// one-line proxy through the runtime's id. Planned as a whole, applied
/// atomically at the end.
///
/// Up to this point each locale chunk holds one precompiled module per
/// referencing source file. Those duplicates were needed so the host
/// could figure out the runtime dependencies and reserve module ids, but
/// the emitted chunk wants a single deduplicated payload, and sibling ids
/// must stay loadable side by side across locales for run-time switching.
pub fn consolidate_locale_chunks(
  graph: &mut ModuleGraph,
  registry: &SynthesizedModules,
  mut compile_whole: impl FnMut(&Locale) -> BuildResult<ArcStr>,
) -> BuildResult<()> {
  if !graph.ids_finalized() {
    return Err(BuildError::graph_invariant(
      "module ids must be finalized before locale chunks are consolidated",
    ));
  }
  let runtime_ids = runtime_module_ids(graph)?;

  let mut rewrites: Vec<ChunkRewrite> = vec![];
  for (chunk_idx, chunk) in graph.chunks.iter_enumerated() {
    let Some(locale) = chunk.compiled_data_locale() else { continue };
    let Some(placeholder) = chunk.entry_module_idx() else {
      return Err(BuildError::graph_invariant(format!(
        "locale chunk `{locale}` has no entry module"
      )));
    };

    // The true entry is the compiled-data module synthesized into the
    // temp directory; the placeholder entry is an empty artifact of the
    // synthetic entry-point declaration.
    let Some(entry) = chunk
      .modules
      .iter()
      .copied()
      .find(|member| registry.contains(&graph.module(*member).request))
    else {
      // Nothing ever landed here; the empty-build warning was already
      // issued during chunk assignment.
      continue;
    };

    let payload = compile_whole(&locale)?;
    let mut contents = vec![];
    for member in chunk.modules.iter().copied().filter(|member| *member != placeholder) {
      let content = if member == entry {
        rewrite_requires(&payload, &runtime_ids.by_feature)
      } else {
        proxy_source(&runtime_ids)
      };
      contents.push((member, content));
    }
    rewrites.push(ChunkRewrite { chunk: chunk_idx, placeholder, entry, contents });
  }

  for rewrite in rewrites {
    apply_rewrite(graph, rewrite)?;
  }
  Ok(())
}

fn apply_rewrite(graph: &mut ModuleGraph, rewrite: ChunkRewrite) -> BuildResult<()> {
  let ChunkRewrite { chunk, placeholder, entry, contents } = rewrite;

  if !graph.remove_module_from_chunk(placeholder, chunk) {
    return Err(BuildError::graph_invariant(format!(
      "failed to remove placeholder entry {} from chunk {}",
      placeholder.index(),
      chunk.index()
    )));
  }
  let members: Vec<ModuleIdx> = graph.chunks[chunk].modules.clone();
  for member in members {
    if !graph.remove_module_from_chunk(member, chunk) {
      let request = graph.module(member).request.clone();
      return Err(BuildError::graph_invariant(format!(
        "failed to remove chunk {} for module `{request}`",
        chunk.index()
      )));
    }
  }

  for (member, content) in contents {
    let module = graph.module_mut(member);
    module.source = content.into();
    // Content identity, not original module identity, drives caching in
    // incremental rebuilds.
    module.hash = Some(xxhash_hex(module.source.as_bytes()));
    graph.add_module_to_chunk(member, chunk);
  }
  graph.chunks[chunk].kind = ChunkKind::EntryPoint { module: entry };
  Ok(())
}

struct RuntimeModuleIds {
  /// Canonical feature path to rendered id, in discovery order.
  by_feature: FxIndexMap<String, String>,
}

impl RuntimeModuleIds {
  /// The id sibling proxies re-export through: the runtime's own module
  /// when the graph carries it, otherwise the first runtime feature
  /// discovered.
  fn proxy_id(&self) -> Option<&String> {
    self.by_feature.get(GLOBALIZE_RUNTIME).or_else(|| self.by_feature.values().next())
  }
}

fn runtime_module_ids(graph: &ModuleGraph) -> BuildResult<RuntimeModuleIds> {
  let mut by_feature = FxIndexMap::default();
  for chunk in graph.chunks.iter() {
    for member in chunk.modules.iter().copied() {
      let module = graph.module(member);
      if !is_globalize_runtime_module(&module.request) {
        continue;
      }
      let Some(canonical) = canonical_runtime_name(&module.request) else { continue };
      let Some(assigned) = &module.assigned_id else {
        return Err(BuildError::graph_invariant(format!(
          "module ids not finalized before consolidation (module `{}`)",
          module.request
        )));
      };
      by_feature.entry(canonical).or_insert_with(|| assigned.render());
    }
  }
  Ok(RuntimeModuleIds { by_feature })
}

fn proxy_source(runtime_ids: &RuntimeModuleIds) -> String {
  match runtime_ids.proxy_id() {
    Some(id) => format!("module.exports = {INTERNAL_REQUIRE}({id});\n"),
    // No runtime module made it into the graph at all, so there is no id
    // to indirect through; the payload's own requires stay plain too.
    None => format!("module.exports = require(\"{GLOBALIZE_RUNTIME}\");\n"),
  }
}

/// Rewrites `require("<feature>")` calls in a compiled payload into the
/// host's internal id references, preserving the exact id representation
/// the host assigned. Unknown requests are left untouched.
fn rewrite_requires(source: &str, by_feature: &FxIndexMap<String, String>) -> String {
  static REQUIRE: OnceLock<Regex> = OnceLock::new();
  let require_re = REQUIRE
    .get_or_init(|| Regex::new(r#"require\(\s*"([^"]+)"\s*\)"#).expect("valid require regex"));
  require_re
    .replace_all(source, |captures: &Captures| match by_feature.get(&captures[1]) {
      Some(id) => format!("{INTERNAL_REQUIRE}({id})"),
      None => captures[0].to_owned(),
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
  use super::{RuntimeModuleIds, consolidate_locale_chunks, proxy_source, rewrite_requires};
  use crate::registry::SynthesizedModules;
  use intlpack_common::ModuleGraph;
  use intlpack_error::BuildError;
  use intlpack_utils::indexmap::FxIndexMap;

  #[test]
  fn require_rewrites_preserve_the_host_id_representation() {
    let mut numeric = FxIndexMap::default();
    numeric.insert("globalize/dist/globalize-runtime/date".to_owned(), "7".to_owned());
    assert_eq!(
      rewrite_requires(r#"require( "globalize/dist/globalize-runtime/date" );"#, &numeric),
      "__webpack_require__(7);"
    );

    let mut hashed = FxIndexMap::default();
    hashed.insert("globalize/dist/globalize-runtime/date".to_owned(), "\"a1b2\"".to_owned());
    assert_eq!(
      rewrite_requires(r#"require("globalize/dist/globalize-runtime/date");"#, &hashed),
      "__webpack_require__(\"a1b2\");"
    );
  }

  #[test]
  fn unknown_requests_are_left_untouched() {
    let empty = FxIndexMap::default();
    let source = r#"require("./sibling");"#;
    assert_eq!(rewrite_requires(source, &empty), source);
  }

  #[test]
  fn proxies_prefer_the_runtime_module_id() {
    let mut by_feature = FxIndexMap::default();
    by_feature.insert("globalize/dist/globalize-runtime/date".to_owned(), "3".to_owned());
    by_feature.insert("globalize/dist/globalize-runtime".to_owned(), "9".to_owned());
    let ids = RuntimeModuleIds { by_feature };
    assert_eq!(proxy_source(&ids), "module.exports = __webpack_require__(9);\n");
  }

  #[test]
  fn proxies_fall_back_to_the_first_feature_id() {
    let mut by_feature = FxIndexMap::default();
    by_feature.insert("globalize/dist/globalize-runtime/date".to_owned(), "3".to_owned());
    by_feature.insert("globalize/dist/globalize-runtime/number".to_owned(), "4".to_owned());
    let ids = RuntimeModuleIds { by_feature };
    assert_eq!(proxy_source(&ids), "module.exports = __webpack_require__(3);\n");
  }

  #[test]
  fn consolidation_requires_finalized_module_ids() {
    let mut graph = ModuleGraph::default();
    let err =
      consolidate_locale_chunks(&mut graph, &SynthesizedModules::default(), |_| Ok("".into()))
        .unwrap_err();
    assert!(matches!(err, BuildError::GraphInvariant(_)));
  }
}
