mod chunk;
mod compile_attributes;
mod extract;
mod globalize;
mod graph;
mod locale;
mod module_id;
mod options;
mod raw_idx;
mod syntax_tree;

pub use crate::{
  chunk::{Chunk, ChunkKind, chunk_table::ChunkTable},
  compile_attributes::CompileAttributes,
  extract::{Extract, FeatureKind, FeatureUse},
  globalize::{
    COMPILED_DATA_CHUNK_PREFIX, GLOBALIZE, GLOBALIZE_RUNTIME, INTERNAL_REQUIRE,
    canonical_runtime_name, is_globalize_module, is_globalize_runtime_module, runtime_replacement,
  },
  graph::{AssignedModuleId, Dependency, HostModule, ModuleGraph},
  locale::Locale,
  module_id::ModuleId,
  options::{
    LocaleDataProvider, MinimalCldrProvider, ModuleFilter, NormalizedPluginOptions, PluginOptions,
  },
  raw_idx::{ChunkIdx, ModuleIdx},
  syntax_tree::{CallSite, SyntaxTree},
};
