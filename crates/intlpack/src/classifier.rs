use intlpack_common::{ModuleFilter, ModuleId, is_globalize_module};

use crate::registry::SynthesizedModules;

/// What a module request refers to, from this plugin's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
  /// The i18n library itself.
  I18nLibrary,
  /// One of this plugin's own generated artifacts.
  OwnArtifact,
  Unrelated,
}

/// Classifies module requests. Pure function of the request, the
/// synthesized-module registry and the user-supplied filter.
pub struct RequestClassifier {
  filter: Option<ModuleFilter>,
}

impl RequestClassifier {
  pub fn new(filter: Option<ModuleFilter>) -> Self {
    Self { filter }
  }

  /// The registry wins over path shape: an artifact whose generated path
  /// happens to look like a library path must still classify as ours,
  /// otherwise interception would recurse forever.
  pub fn classify(request: &ModuleId, registry: &SynthesizedModules) -> Classification {
    if registry.contains(request) {
      Classification::OwnArtifact
    } else if is_globalize_module(request) {
      Classification::I18nLibrary
    } else {
      Classification::Unrelated
    }
  }

  /// Whether a referencing module should be processed at all: not the
  /// library itself, and not excluded by the user-supplied filter.
  pub fn should_process(&self, request: &ModuleId) -> bool {
    if is_globalize_module(request) {
      return false;
    }
    match &self.filter {
      Some(filter) => !filter(request.as_ref()),
      None => true,
    }
  }
}
