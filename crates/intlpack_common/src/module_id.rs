use std::path::Path;

use arcstr::ArcStr;
use sugar_path::SugarPath;

/// `ModuleId` is the unique string identifier for each module.
/// - It identifies the module in the whole module graph.
/// - The host owns the request string; this plugin only reads, classifies
///   and interpolates it.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct ModuleId(ArcStr);

impl ModuleId {
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }

  pub fn stabilize(&self, cwd: &Path) -> String {
    if self.as_path().is_absolute() {
      self.relative(cwd).as_path().to_slash_lossy().into_owned()
    } else {
      self.to_string()
    }
  }
}

impl std::ops::Deref for ModuleId {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ModuleId {
  fn as_ref(&self) -> &str {
    self
  }
}

impl std::fmt::Display for ModuleId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<ArcStr> for ModuleId {
  fn from(value: ArcStr) -> Self {
    Self::new(value)
  }
}

impl From<&str> for ModuleId {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}
