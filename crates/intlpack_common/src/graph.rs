use arcstr::ArcStr;
use oxc_index::IndexVec;
use rustc_hash::FxHashMap;

use intlpack_utils::xxhash::xxhash_hex;

use crate::{Chunk, ChunkIdx, ChunkKind, ChunkTable, ModuleId, ModuleIdx};

/// The module id the host allocator assigned. Some hosts remap numeric ids
/// to hashed strings; the rendered form must round-trip exactly into
/// generated require rewrites (`42` vs `"a1b2"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignedModuleId {
  Numeric(u32),
  Hashed(String),
}

impl AssignedModuleId {
  pub fn render(&self) -> String {
    match self {
      Self::Numeric(id) => itoa::Buffer::new().format(*id).to_owned(),
      Self::Hashed(id) => format!("\"{id}\""),
    }
  }
}

/// One dependency edge, as the host's dependency machinery sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
  pub request: ModuleId,
  /// Whether this dependency substitutes the original require expression's
  /// argument at the call site.
  pub replaces_call_site: bool,
  /// Whether the call is rendered through the host's internal
  /// runtime-require mechanism instead of a plain `require`.
  pub internal_require: bool,
}

/// A module as the narrowed host module-graph API exposes it.
#[derive(Debug)]
pub struct HostModule {
  pub request: ModuleId,
  pub source: ArcStr,
  pub dependencies: Vec<Dependency>,
  pub assigned_id: Option<AssignedModuleId>,
  pub hash: Option<String>,
  pub chunks: Vec<ChunkIdx>,
}

impl HostModule {
  pub fn new(request: ModuleId, source: ArcStr) -> Self {
    Self { request, source, dependencies: vec![], assigned_id: None, hash: None, chunks: vec![] }
  }
}

/// The host bundler's module graph, narrowed to what this plugin needs:
/// module registration and lookup, dependency edges, synthetic entry
/// points, chunk membership mutation and a module-id space with an
/// explicit finalization point.
#[derive(Debug, Default)]
pub struct ModuleGraph {
  pub modules: IndexVec<ModuleIdx, HostModule>,
  pub chunks: ChunkTable,
  module_by_request: FxHashMap<ModuleId, ModuleIdx>,
  ids_finalized: bool,
}

impl ModuleGraph {
  pub fn add_module(&mut self, request: ModuleId, source: impl Into<ArcStr>) -> ModuleIdx {
    if let Some(idx) = self.module_by_request.get(&request) {
      return *idx;
    }
    let idx = self.modules.push(HostModule::new(request.clone(), source.into()));
    self.module_by_request.insert(request, idx);
    idx
  }

  pub fn module_idx(&self, request: &ModuleId) -> Option<ModuleIdx> {
    self.module_by_request.get(request).copied()
  }

  pub fn module(&self, idx: ModuleIdx) -> &HostModule {
    &self.modules[idx]
  }

  pub fn module_mut(&mut self, idx: ModuleIdx) -> &mut HostModule {
    &mut self.modules[idx]
  }

  pub fn add_chunk(&mut self, chunk: Chunk) -> ChunkIdx {
    let members = chunk.modules.clone();
    let idx = self.chunks.push(chunk);
    for member in members {
      self.modules[member].chunks.push(idx);
    }
    idx
  }

  /// Declares an additional synthetic entry point: a placeholder entry
  /// module with no content plus a chunk named after it.
  pub fn declare_synthetic_entry(&mut self, name: impl Into<ArcStr>) -> ChunkIdx {
    let name: ArcStr = name.into();
    let placeholder = self.add_module(ModuleId::new(format!("multi {name}")), "");
    self.add_chunk(Chunk::new(
      Some(name),
      ChunkKind::EntryPoint { module: placeholder },
      vec![placeholder],
    ))
  }

  pub fn add_dependency(&mut self, from: ModuleIdx, dependency: Dependency) {
    let deps = &mut self.modules[from].dependencies;
    if !deps.contains(&dependency) {
      deps.push(dependency);
    }
  }

  pub fn add_module_to_chunk(&mut self, module: ModuleIdx, chunk: ChunkIdx) {
    if !self.chunks[chunk].modules.contains(&module) {
      self.chunks[chunk].modules.push(module);
    }
    if !self.modules[module].chunks.contains(&chunk) {
      self.modules[module].chunks.push(chunk);
    }
  }

  /// Removes `module` from `chunk` on both sides of the membership
  /// relation. Returns whether the module was actually a member.
  pub fn remove_module_from_chunk(&mut self, module: ModuleIdx, chunk: ChunkIdx) -> bool {
    let members = &mut self.chunks[chunk].modules;
    let Some(position) = members.iter().position(|member| *member == module) else {
      return false;
    };
    members.remove(position);
    self.modules[module].chunks.retain(|idx| *idx != chunk);
    true
  }

  /// Assigns every module an id and finalizes the id space. `hashed`
  /// mirrors hosts whose id-hashing step remaps numeric ids to strings.
  pub fn finalize_module_ids(&mut self, hashed: bool) {
    let mut next_id = 0u32;
    for module in &mut self.modules {
      module.assigned_id = Some(if hashed {
        AssignedModuleId::Hashed(xxhash_hex(module.request.as_bytes())[..4].to_owned())
      } else {
        let id = AssignedModuleId::Numeric(next_id);
        next_id += 1;
        id
      });
    }
    self.ids_finalized = true;
  }

  pub fn ids_finalized(&self) -> bool {
    self.ids_finalized
  }
}

#[cfg(test)]
mod tests {
  use super::{AssignedModuleId, ModuleGraph};
  use crate::ModuleId;

  #[test]
  fn module_registration_dedupes_by_request() {
    let mut graph = ModuleGraph::default();
    let a = graph.add_module(ModuleId::new("./app.js"), "a");
    let b = graph.add_module(ModuleId::new("./app.js"), "b");
    assert_eq!(a, b);
    assert_eq!(graph.module(a).source.as_str(), "a");
  }

  #[test]
  fn membership_removal_is_two_sided() {
    let mut graph = ModuleGraph::default();
    let chunk = graph.declare_synthetic_entry("globalize-compiled-data-en");
    let placeholder = graph.chunks[chunk].entry_module_idx().expect("placeholder entry");
    assert!(graph.remove_module_from_chunk(placeholder, chunk));
    assert!(graph.chunks[chunk].modules.is_empty());
    assert!(graph.module(placeholder).chunks.is_empty());
    assert!(!graph.remove_module_from_chunk(placeholder, chunk));
  }

  #[test]
  fn finalization_assigns_sequential_ids_and_closes_the_id_space() {
    let mut graph = ModuleGraph::default();
    let a = graph.add_module(ModuleId::new("./a.js"), "");
    let b = graph.add_module(ModuleId::new("./b.js"), "");
    assert!(!graph.ids_finalized());

    graph.finalize_module_ids(false);
    assert!(graph.ids_finalized());
    assert_eq!(graph.module(a).assigned_id, Some(AssignedModuleId::Numeric(0)));
    assert_eq!(graph.module(b).assigned_id, Some(AssignedModuleId::Numeric(1)));
  }

  #[test]
  fn rendered_ids_match_the_host_representation() {
    assert_eq!(AssignedModuleId::Numeric(42).render(), "42");
    assert_eq!(AssignedModuleId::Hashed("a1b2".into()).render(), "\"a1b2\"");
  }
}
