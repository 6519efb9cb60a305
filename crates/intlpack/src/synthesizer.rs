use std::path::{Path, PathBuf};
use std::sync::Arc;

use arcstr::ArcStr;
use rustc_hash::FxHashMap;
use serde_json::Value;

use intlpack_common::{
  CompileAttributes, Extract, GLOBALIZE, Locale, ModuleId, NormalizedPluginOptions,
};
use intlpack_compiler::CompileError;
use intlpack_error::{BuildError, BuildResult};
use intlpack_utils::{sanitize_file_name::sanitize_file_name, xxhash::xxhash_hex};

/// Extension point invoked synchronously, exactly once per compilation,
/// right before the attributes are handed to the compile function.
pub type BeforeCompileHook = Box<dyn Fn(&Locale, &mut CompileAttributes, Option<&ModuleId>) + Send + Sync>;

const RETURN_ANCHOR: &str = "return Globalize;";

/// Produces (and caches) compiled-data artifacts: source text exporting a
/// locale-bound runtime instance carrying exactly the features named by
/// the governing extract, with the locale-activation side effect injected.
pub struct CompiledDataSynthesizer {
  options: Arc<NormalizedPluginOptions>,
  /// Message catalogs by locale, read once at mode construction.
  messages: FxHashMap<Locale, Value>,
  cache: FxHashMap<(Option<ModuleId>, Locale), ArcStr>,
  before_compile: Option<BeforeCompileHook>,
}

impl CompiledDataSynthesizer {
  pub fn new(options: Arc<NormalizedPluginOptions>, messages: FxHashMap<Locale, Value>) -> Self {
    Self { options, messages, cache: FxHashMap::default(), before_compile: None }
  }

  pub fn set_before_compile(&mut self, hook: BeforeCompileHook) {
    self.before_compile = Some(hook);
  }

  /// Compiles the payload for `locale` governed by `extracts`. `request`
  /// is the source module a narrow extract belongs to, or `None` for the
  /// whole-build payload. Cached by `(request, locale)` for the build.
  ///
  /// A narrow extract with zero features is expected and recoverable: the
  /// stub payload re-exports the plain library, and the real validation
  /// happens when the whole-build payload is compiled. An empty
  /// whole-build extract is a hard error.
  pub fn compile(
    &mut self,
    locale: &Locale,
    request: Option<&ModuleId>,
    extracts: &Extract,
  ) -> BuildResult<ArcStr> {
    let key = (request.cloned(), locale.clone());
    if let Some(cached) = self.cache.get(&key) {
      return Ok(cached.clone());
    }

    let mut attributes = CompileAttributes {
      default_locale: locale.clone(),
      cldr: self.options.cldr.cldr(locale),
      extracts: extracts.clone(),
      messages: self.messages.get(locale).cloned(),
      time_zone_data: Some(self.options.cldr.time_zone_data()),
    };
    if let Some(hook) = &self.before_compile {
      hook(locale, &mut attributes, request);
    }

    let content = match intlpack_compiler::compile_extracts(&attributes) {
      Ok(content) => inject_locale_activation(&content, locale),
      Err(CompileError::NoFormattersOrParsers) if request.is_some() => {
        format!("module.exports = require(\"{GLOBALIZE}\");\n")
      }
      Err(error @ CompileError::NoFormattersOrParsers) => {
        return Err(BuildError::extraction(error.to_string()));
      }
    };

    let content: ArcStr = content.into();
    self.cache.insert(key, content.clone());
    Ok(content)
  }

  /// The deterministic, collision-resistant generated file path for a
  /// per-(module, locale) artifact. The request hash keeps distinct
  /// requests apart even when sanitization folds their characters
  /// together.
  pub fn artifact_path(&self, request: &ModuleId, locale: &Locale) -> PathBuf {
    // Loader prefixes (`style!./a.js`) are not part of the module identity.
    let bare = request.rsplit('!').next().unwrap_or(request);
    // Absolute requests are relativized against the artifact base dir so
    // generated names do not vary with the checkout location.
    let base = self.options.tmpdir.parent().unwrap_or(Path::new("."));
    let stable = ModuleId::new(bare).stabilize(base);
    let stem = sanitize_file_name(&stable);
    let hash = &xxhash_hex(stable.as_bytes())[..8];
    // Always .js, to cater for non-JS source files as well.
    self.options.tmpdir.join(format!("{stem}-{hash}-{locale}.js"))
  }

  /// Compiles and persists the artifact for `(request, locale)`, and
  /// registers the generated path so it is never re-intercepted.
  pub fn create_artifact_file(
    &mut self,
    request: &ModuleId,
    locale: &Locale,
    extracts: &Extract,
    registry: &mut crate::registry::SynthesizedModules,
  ) -> BuildResult<(ModuleId, ArcStr)> {
    let content = self.compile(locale, Some(request), extracts)?;
    let path = self.artifact_path(request, locale);
    std::fs::write(&path, content.as_bytes())?;
    let artifact = ModuleId::new(path.to_string_lossy().into_owned());
    registry.insert(artifact.clone(), locale.clone());
    Ok((artifact, content))
  }
}

/// Splices the locale-activation call immediately before the compiled
/// text's final return-the-instance statement. Stub payloads carry no
/// anchor and pass through unchanged.
fn inject_locale_activation(content: &str, locale: &Locale) -> String {
  match content.rfind(RETURN_ANCHOR) {
    Some(anchor) => {
      format!("{}Globalize.locale(\"{locale}\"); {}", &content[..anchor], &content[anchor..])
    }
    None => content.to_owned(),
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::CompiledDataSynthesizer;
  use crate::registry::SynthesizedModules;
  use intlpack_common::{
    Extract, FeatureKind, FeatureUse, Locale, MinimalCldrProvider, ModuleId,
    NormalizedPluginOptions,
  };
  use intlpack_error::BuildError;
  use rustc_hash::FxHashMap;

  fn options() -> Arc<NormalizedPluginOptions> {
    Arc::new(NormalizedPluginOptions {
      development_locale: Locale::new("en"),
      supported_locales: vec![Locale::new("en")],
      cldr: Arc::new(MinimalCldrProvider),
      messages: vec![],
      output: "i18n-[locale].js".into(),
      module_filter: None,
      tmpdir: std::env::temp_dir(),
    })
  }

  fn date_extract() -> Extract {
    [FeatureUse::new(FeatureKind::DateFormatter, r#"{ skeleton: "yMd" }"#)].into_iter().collect()
  }

  #[test]
  fn compiling_the_same_key_twice_is_byte_identical() {
    let mut synthesizer = CompiledDataSynthesizer::new(options(), FxHashMap::default());
    let locale = Locale::new("en");
    let extract = date_extract();
    let first = synthesizer.compile(&locale, None, &extract).expect("compile");
    let second = synthesizer.compile(&locale, None, &extract).expect("compile");
    assert_eq!(first, second);
  }

  #[test]
  fn locale_activation_precedes_the_final_export() {
    let mut synthesizer = CompiledDataSynthesizer::new(options(), FxHashMap::default());
    let text =
      synthesizer.compile(&Locale::new("en"), None, &date_extract()).expect("compile");
    let activation = text.find("Globalize.locale(\"en\");").expect("activation call");
    let ret = text.rfind("return Globalize;").expect("return statement");
    assert!(activation < ret);
  }

  #[test]
  fn empty_per_module_extract_falls_back_to_a_stub() {
    let mut synthesizer = CompiledDataSynthesizer::new(options(), FxHashMap::default());
    let request = ModuleId::new("./no-formatters.js");
    let text = synthesizer
      .compile(&Locale::new("en"), Some(&request), &Extract::default())
      .expect("stub payload");
    assert_eq!(text.as_str(), "module.exports = require(\"globalize\");\n");
  }

  #[test]
  fn empty_whole_build_extract_is_a_hard_error() {
    let mut synthesizer = CompiledDataSynthesizer::new(options(), FxHashMap::default());
    let err = synthesizer.compile(&Locale::new("en"), None, &Extract::default()).unwrap_err();
    assert!(matches!(err, BuildError::Extraction(_)));
  }

  #[test]
  fn distinct_requests_never_collide_on_artifact_paths() {
    let synthesizer = CompiledDataSynthesizer::new(options(), FxHashMap::default());
    let locale = Locale::new("en");
    // Sanitization alone folds these two into the same stem.
    let a = synthesizer.artifact_path(&ModuleId::new("./src/app.js"), &locale);
    let b = synthesizer.artifact_path(&ModuleId::new("./src-app.js"), &locale);
    assert_ne!(a, b);
  }

  #[test]
  fn absolute_and_relative_forms_of_a_request_share_one_artifact_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut options = options();
    Arc::get_mut(&mut options).expect("sole owner").tmpdir = dir.path().join(".tmp-intlpack");
    let synthesizer = CompiledDataSynthesizer::new(options, FxHashMap::default());
    let locale = Locale::new("en");

    let absolute = dir.path().join("src").join("app.js");
    let a = synthesizer
      .artifact_path(&ModuleId::new(absolute.to_string_lossy().into_owned()), &locale);
    let b = synthesizer.artifact_path(&ModuleId::new("src/app.js"), &locale);
    assert_eq!(a.file_name(), b.file_name());
  }

  #[test]
  fn hook_can_mutate_attributes_before_compilation() {
    let mut synthesizer = CompiledDataSynthesizer::new(options(), FxHashMap::default());
    synthesizer.set_before_compile(Box::new(|_, attributes, _| {
      attributes.extracts.insert(FeatureUse::new(FeatureKind::NumberFormatter, "{}"));
    }));
    let text =
      synthesizer.compile(&Locale::new("en"), None, &date_extract()).expect("compile");
    assert!(text.contains("numberFormatter"));
  }

  #[test]
  fn created_artifacts_are_registered() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut options = options();
    Arc::get_mut(&mut options).expect("sole owner").tmpdir = dir.path().to_path_buf();
    let mut synthesizer = CompiledDataSynthesizer::new(options, FxHashMap::default());
    let mut registry = SynthesizedModules::default();
    let (artifact, content) = synthesizer
      .create_artifact_file(&ModuleId::new("./app.js"), &Locale::new("en"), &date_extract(), &mut registry)
      .expect("artifact");
    assert!(registry.contains(&artifact));
    assert_eq!(std::fs::read_to_string(artifact.as_ref()).expect("read back"), content.as_str());
  }
}
