use std::path::PathBuf;

/// Build-breaking failures. Everything here aborts the build; recoverable
/// conditions are surfaced as [`BuildWarning`]s instead.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
  /// Pre-build configuration problem, e.g. an uncreatable temp directory or
  /// a malformed output filename template.
  #[error("configuration error: {0}")]
  Configuration(String),

  /// Static extraction failed, or a whole-build compiled payload was
  /// requested while zero formatter/parser usage was found anywhere.
  #[error("extraction error: {0}")]
  Extraction(String),

  /// A chunk/module membership operation that was expected to succeed did
  /// not. Indicates a violated module-graph invariant.
  #[error("graph invariant violated: {0}")]
  GraphInvariant(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),

  #[error(transparent)]
  Other(#[from] anyhow::Error),
}

impl BuildError {
  pub fn configuration(msg: impl Into<String>) -> Self {
    Self::Configuration(msg.into())
  }

  pub fn extraction(msg: impl Into<String>) -> Self {
    Self::Extraction(msg.into())
  }

  pub fn graph_invariant(msg: impl Into<String>) -> Self {
    Self::GraphInvariant(msg.into())
  }
}

pub type BuildResult<T> = Result<T, BuildError>;

/// Non-fatal conditions accumulated on the build session and handed back to
/// the host together with the build result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildWarning {
  /// A syntax tree was recorded twice for the same module request.
  #[error("syntax tree recorded twice for module `{0}`")]
  DuplicateSyntaxTree(String),

  /// A message catalog file was missing; an empty catalog is used instead.
  #[error("unable to find messages file: `{0}`")]
  MissingMessagesFile(PathBuf),

  /// No module was ever assigned to any locale chunk. Usually means the
  /// application never references the i18n library.
  #[error("no compiled data module found")]
  NoCompiledDataModules,
}
