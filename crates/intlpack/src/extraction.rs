use rustc_hash::FxHashMap;

use intlpack_common::{Extract, ModuleId, SyntaxTree};
use intlpack_error::{BuildError, BuildResult, BuildWarning};

/// Per-build cache mapping each source module to its syntax tree and its
/// lazily computed extract, plus the running whole-build union. Owned by
/// one build session; watch-mode rebuilds start from a fresh cache.
#[derive(Debug, Default)]
pub struct ExtractionCache {
  trees: FxHashMap<ModuleId, SyntaxTree>,
  extracts: FxHashMap<ModuleId, Extract>,
  global: Extract,
}

impl ExtractionCache {
  /// Stores the parsed tree for `request`. Last write wins; a duplicate
  /// record is a consistency warning, since a well-formed build parses
  /// each module once.
  pub fn record_syntax_tree(
    &mut self,
    request: &ModuleId,
    tree: SyntaxTree,
    warnings: &mut Vec<BuildWarning>,
  ) {
    if self.trees.insert(request.clone(), tree).is_some() {
      warnings.push(BuildWarning::DuplicateSyntaxTree(request.to_string()));
    }
  }

  /// The memoized extract for `request`, computed on first call. Each
  /// module contributes to the global extract exactly once.
  pub fn extract(&mut self, request: &ModuleId) -> BuildResult<&Extract> {
    if !self.extracts.contains_key(request) {
      let tree = self.trees.get(request).ok_or_else(|| {
        BuildError::extraction(format!("no syntax tree recorded for module `{request}`"))
      })?;
      let extract = intlpack_compiler::extract(tree);
      self.global.merge(&extract);
      self.extracts.insert(request.clone(), extract);
    }
    Ok(&self.extracts[request])
  }

  /// The union of every per-module extract computed so far. Build-order
  /// dependent; whole-build callers must only read this after the full
  /// module graph has been walked.
  pub fn global_extract(&self) -> &Extract {
    &self.global
  }
}
