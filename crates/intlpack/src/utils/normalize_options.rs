use std::path::PathBuf;
use std::sync::Arc;

use intlpack_common::{MinimalCldrProvider, NormalizedPluginOptions, PluginOptions};
use intlpack_error::{BuildError, BuildResult};

const TMPDIR_NAME: &str = ".tmp-intlpack";
const DEFAULT_OUTPUT: &str = "i18n-[locale].js";

/// Validates and defaults the user-facing options. The temp directory is
/// created here, so a broken base path fails the build before any module
/// is touched.
pub fn normalize_options(options: PluginOptions) -> BuildResult<NormalizedPluginOptions> {
  let development_locale = options
    .development_locale
    .ok_or_else(|| BuildError::configuration("`development_locale` must be provided"))?;

  if options.production && options.supported_locales.as_ref().is_none_or(Vec::is_empty) {
    return Err(BuildError::configuration(
      "`supported_locales` must be provided in production mode",
    ));
  }
  let supported_locales =
    options.supported_locales.unwrap_or_else(|| vec![development_locale.clone()]);

  let output = options.output.unwrap_or_else(|| DEFAULT_OUTPUT.to_owned());
  if !output.contains("[locale]") {
    return Err(BuildError::configuration(format!(
      "output filename template `{output}` must contain a `[locale]` placeholder"
    )));
  }

  let tmpdir = tmpdir(options.tmpdir_base.unwrap_or_else(|| PathBuf::from(".")))?;

  Ok(NormalizedPluginOptions {
    development_locale,
    supported_locales,
    cldr: options.cldr.unwrap_or_else(|| Arc::new(MinimalCldrProvider)),
    messages: options.messages.unwrap_or_default(),
    output,
    module_filter: options.module_filter,
    tmpdir,
  })
}

fn tmpdir(base: PathBuf) -> BuildResult<PathBuf> {
  let tmpdir = base.join(TMPDIR_NAME);
  if tmpdir.exists() {
    if !tmpdir.is_dir() {
      return Err(BuildError::configuration(format!(
        "unable to create temporary directory: `{}`",
        tmpdir.display()
      )));
    }
  } else {
    std::fs::create_dir_all(&tmpdir)?;
  }
  Ok(tmpdir)
}

#[cfg(test)]
mod tests {
  use super::normalize_options;
  use intlpack_common::{Locale, PluginOptions};
  use intlpack_error::BuildError;

  fn base_options(dir: &std::path::Path) -> PluginOptions {
    PluginOptions {
      development_locale: Some(Locale::new("en")),
      tmpdir_base: Some(dir.to_path_buf()),
      ..PluginOptions::default()
    }
  }

  #[test]
  fn output_template_must_carry_the_locale_placeholder() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut options = base_options(dir.path());
    options.output = Some("i18n.js".into());
    assert!(matches!(normalize_options(options).unwrap_err(), BuildError::Configuration(_)));
  }

  #[test]
  fn a_file_squatting_the_tmpdir_path_is_a_configuration_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(".tmp-intlpack"), "not a directory").expect("write squatter");
    let err = normalize_options(base_options(dir.path())).unwrap_err();
    assert!(matches!(err, BuildError::Configuration(_)));
  }

  #[test]
  fn production_mode_requires_supported_locales() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut options = base_options(dir.path());
    options.production = true;
    assert!(matches!(normalize_options(options).unwrap_err(), BuildError::Configuration(_)));
  }

  #[test]
  fn defaults_are_filled_in() {
    let dir = tempfile::tempdir().expect("tempdir");
    let normalized = normalize_options(base_options(dir.path())).expect("normalize");
    assert_eq!(normalized.output, "i18n-[locale].js");
    assert_eq!(normalized.supported_locales, vec![Locale::new("en")]);
    assert!(normalized.tmpdir.is_dir());
  }
}
