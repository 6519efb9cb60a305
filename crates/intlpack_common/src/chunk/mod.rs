pub mod chunk_table;

use arcstr::ArcStr;

use crate::{Locale, ModuleIdx, globalize::COMPILED_DATA_CHUNK_PREFIX};

#[derive(Debug, Default)]
pub enum ChunkKind {
  EntryPoint { module: ModuleIdx },
  #[default]
  Common,
}

/// A named, ordered collection of modules slated for one output artifact.
/// Host-owned; the consolidation pass is the only place this plugin
/// mutates chunk membership.
#[derive(Debug, Default)]
pub struct Chunk {
  pub exec_order: u32,
  pub kind: ChunkKind,
  pub modules: Vec<ModuleIdx>,
  pub name: Option<ArcStr>,
  pub filename_template: Option<String>,
}

impl Chunk {
  pub fn new(name: Option<ArcStr>, kind: ChunkKind, modules: Vec<ModuleIdx>) -> Self {
    Self { exec_order: u32::MAX, kind, modules, name, filename_template: None }
  }

  pub fn entry_module_idx(&self) -> Option<ModuleIdx> {
    match self.kind {
      ChunkKind::EntryPoint { module } => Some(module),
      ChunkKind::Common => None,
    }
  }

  /// The locale this chunk carries compiled data for, if it follows the
  /// locale-chunk naming convention.
  pub fn compiled_data_locale(&self) -> Option<Locale> {
    let name = self.name.as_ref()?;
    name.strip_prefix(COMPILED_DATA_CHUNK_PREFIX).map(Locale::new)
  }
}
