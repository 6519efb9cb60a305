use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::Locale;

/// User-supplied predicate excluding module requests the plugin must leave
/// untouched. Returning `true` excludes the request.
pub type ModuleFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Supplies raw locale data tables per locale. The real tables come from a
/// CLDR distribution; the supplier is pluggable so hosts can narrow or
/// vendor them.
pub trait LocaleDataProvider: Send + Sync {
  /// Supplemental tables plus the main calendar/number/currency/timezone
  /// tables for `locale`.
  fn cldr(&self, locale: &Locale) -> Value;

  /// IANA timezone data.
  fn time_zone_data(&self) -> Value;
}

/// Built-in fallback provider carrying the minimal table shape the
/// compiled runtime expects. Real applications configure a full CLDR
/// supplier instead.
#[derive(Debug, Default)]
pub struct MinimalCldrProvider;

impl LocaleDataProvider for MinimalCldrProvider {
  fn cldr(&self, locale: &Locale) -> Value {
    json!({
      "supplemental": {
        "likelySubtags": {},
        "plurals-type-cardinal": {},
      },
      "main": {
        (locale.as_ref()): {
          "ca-gregorian": {},
          "currencies": {},
          "dateFields": {},
          "numbers": {},
          "timeZoneNames": {},
          "units": {},
        }
      }
    })
  }

  fn time_zone_data(&self) -> Value {
    json!({ "zoneData": {} })
  }
}

/// The recognized configuration surface, prior to normalization.
#[derive(Default)]
pub struct PluginOptions {
  /// Selects production mode (static extraction + per-locale chunks)
  /// instead of development mode (one full-data locale).
  pub production: bool,
  pub development_locale: Option<Locale>,
  /// Locales that receive dedicated chunks. Production mode only.
  pub supported_locales: Option<Vec<Locale>>,
  pub cldr: Option<Arc<dyn LocaleDataProvider>>,
  /// Message catalog path(s); `[locale]` in a path is substituted per
  /// locale, multiple files are shallow-merged.
  pub messages: Option<Vec<PathBuf>>,
  /// Output filename template for locale chunks; must contain `[locale]`.
  pub output: Option<String>,
  pub module_filter: Option<ModuleFilter>,
  pub tmpdir_base: Option<PathBuf>,
}

/// Options after validation and defaulting; what the pipeline actually
/// consumes.
pub struct NormalizedPluginOptions {
  pub development_locale: Locale,
  pub supported_locales: Vec<Locale>,
  pub cldr: Arc<dyn LocaleDataProvider>,
  pub messages: Vec<PathBuf>,
  pub output: String,
  pub module_filter: Option<ModuleFilter>,
  /// The created temporary directory generated artifacts are written to.
  pub tmpdir: PathBuf,
}

impl std::fmt::Debug for NormalizedPluginOptions {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NormalizedPluginOptions")
      .field("development_locale", &self.development_locale)
      .field("supported_locales", &self.supported_locales)
      .field("messages", &self.messages)
      .field("output", &self.output)
      .field("tmpdir", &self.tmpdir)
      .finish_non_exhaustive()
  }
}
