use intlpack_common::{ChunkIdx, ModuleGraph, is_globalize_runtime_module};

use crate::registry::SynthesizedModules;

/// Orders chunks so that at load time the runtime is defined before the
/// compiled data that references it, and the compiled data before the
/// application code that formats with it. Chunks carrying runtime modules
/// load first, chunks carrying synthesized compiled-data modules second,
/// everything else last. Ties keep the host's original order.
pub fn sort_chunks(graph: &mut ModuleGraph, registry: &SynthesizedModules) {
  let mut scored: Vec<(ChunkIdx, i8)> = graph
    .chunks
    .iter_enumerated()
    .map(|(idx, _)| (idx, chunk_score(graph, registry, idx)))
    .collect();
  scored.sort_by_key(|(_, score)| std::cmp::Reverse(*score));

  for (position, (chunk, _)) in scored.into_iter().enumerate() {
    graph.chunks[chunk].exec_order =
      u32::try_from(position).expect("chunk count exceeds u32::MAX");
  }
}

/// A chunk ranks as high as its highest-ranking member, so a vendor chunk
/// that happens to carry the runtime still loads ahead of the locale
/// chunks referencing it.
fn chunk_score(graph: &ModuleGraph, registry: &SynthesizedModules, chunk: ChunkIdx) -> i8 {
  graph.chunks[chunk]
    .modules
    .iter()
    .map(|member| {
      let request = &graph.module(*member).request;
      if is_globalize_runtime_module(request) {
        1
      } else if registry.contains(request) {
        0
      } else {
        -1
      }
    })
    .max()
    .unwrap_or(-1)
}

#[cfg(test)]
mod tests {
  use super::sort_chunks;
  use crate::registry::SynthesizedModules;
  use intlpack_common::{Chunk, ChunkKind, Locale, ModuleGraph, ModuleId};

  #[test]
  fn runtime_loads_before_compiled_data_before_application_code() {
    let mut graph = ModuleGraph::default();
    let app = graph.add_module(ModuleId::new("./app.js"), "");
    let artifact = graph.add_module(ModuleId::new(".tmp/app-0000-en.js"), "");
    let runtime =
      graph.add_module(ModuleId::new("node_modules/globalize/dist/globalize-runtime.js"), "");

    let main = graph.add_chunk(Chunk::new(Some("main".into()), ChunkKind::Common, vec![app]));
    let locale = graph.add_chunk(Chunk::new(
      Some("globalize-compiled-data-en".into()),
      ChunkKind::Common,
      vec![artifact],
    ));
    let vendor =
      graph.add_chunk(Chunk::new(Some("vendor".into()), ChunkKind::Common, vec![runtime, app]));

    let mut registry = SynthesizedModules::default();
    registry.insert(ModuleId::new(".tmp/app-0000-en.js"), Locale::new("en"));

    sort_chunks(&mut graph, &registry);
    assert!(graph.chunks[vendor].exec_order < graph.chunks[locale].exec_order);
    assert!(graph.chunks[locale].exec_order < graph.chunks[main].exec_order);
  }

  #[test]
  fn chunks_of_equal_rank_keep_their_original_order() {
    let mut graph = ModuleGraph::default();
    let a = graph.add_module(ModuleId::new("./a.js"), "");
    let b = graph.add_module(ModuleId::new("./b.js"), "");
    let first = graph.add_chunk(Chunk::new(Some("first".into()), ChunkKind::Common, vec![a]));
    let second = graph.add_chunk(Chunk::new(Some("second".into()), ChunkKind::Common, vec![b]));

    sort_chunks(&mut graph, &SynthesizedModules::default());
    assert!(graph.chunks[first].exec_order < graph.chunks[second].exec_order);
  }
}
