use rustc_hash::FxHashMap;

use intlpack_common::{Locale, ModuleId};

/// The set of generated-artifact identifiers, populated at synthesis time
/// and consulted by identity lookup. A generated module must never be
/// re-classified as an i18n-library reference, so every synthesized path
/// lands here the moment it exists.
#[derive(Debug, Default)]
pub struct SynthesizedModules {
  by_request: FxHashMap<ModuleId, Locale>,
}

impl SynthesizedModules {
  pub fn insert(&mut self, request: ModuleId, locale: Locale) {
    self.by_request.insert(request, locale);
  }

  pub fn contains(&self, request: &ModuleId) -> bool {
    self.by_request.contains_key(request)
  }

  pub fn locale_of(&self, request: &ModuleId) -> Option<&Locale> {
    self.by_request.get(request)
  }

  pub fn is_empty(&self) -> bool {
    self.by_request.is_empty()
  }
}
