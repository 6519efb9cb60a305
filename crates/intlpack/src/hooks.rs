use intlpack_common::{ModuleGraph, ModuleIdx, SyntaxTree};
use intlpack_error::{BuildResult, BuildWarning};

/// The stable internal interface a host adapter drives, in strict phase
/// order: `entry_option`, then `module_parsed` for every module as it is
/// parsed, then `after_optimize_chunks`, then (once module ids are final)
/// `after_optimize_module_ids`, then `optimize_chunk_order` before
/// emission.
pub trait PluginHooks {
  /// Entry-point declaration time; synthetic entries are declared here.
  fn entry_option(&mut self, graph: &mut ModuleGraph) -> BuildResult<()> {
    let _ = graph;
    Ok(())
  }

  /// One module has been parsed; its syntax tree is observable and its
  /// import expressions may still be rewritten.
  fn module_parsed(
    &mut self,
    graph: &mut ModuleGraph,
    module: ModuleIdx,
    tree: &SyntaxTree,
  ) -> BuildResult<()>;

  /// Chunk optimization is done; chunk membership may be rearranged.
  fn after_optimize_chunks(&mut self, graph: &mut ModuleGraph) -> BuildResult<()> {
    let _ = graph;
    Ok(())
  }

  /// Module ids are final; module payloads may be rewritten against them.
  fn after_optimize_module_ids(&mut self, graph: &mut ModuleGraph) -> BuildResult<()> {
    let _ = graph;
    Ok(())
  }

  /// Last call before emission; decides final chunk load order.
  fn optimize_chunk_order(&mut self, graph: &mut ModuleGraph) -> BuildResult<()> {
    let _ = graph;
    Ok(())
  }

  /// Drains the non-fatal warnings accumulated so far.
  fn take_warnings(&mut self) -> Vec<BuildWarning>;
}
