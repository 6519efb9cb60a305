use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use intlpack_common::Locale;
use intlpack_error::{BuildResult, BuildWarning};

/// Reads and shallow-merges the message catalog for one locale. Each file
/// is a JSON document keyed by locale; `[locale]` in a path is substituted
/// first. A missing file downgrades to a warning and an absent catalog,
/// because partial localization beats aborting the build. Malformed JSON
/// still fails.
pub fn read_messages(
  paths: &[PathBuf],
  locale: &Locale,
  warnings: &mut Vec<BuildWarning>,
) -> BuildResult<Option<Value>> {
  if paths.is_empty() {
    return Ok(None);
  }

  let mut merged = Map::new();
  for path in paths {
    let path = substitute_locale(path, locale);
    if !path.is_file() {
      warnings.push(BuildWarning::MissingMessagesFile(path));
      return Ok(None);
    }
    let document: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    if let Some(Value::Object(entries)) = document.get(locale.as_ref()) {
      for (key, value) in entries {
        merged.insert(key.clone(), value.clone());
      }
    }
  }

  let mut catalog = Map::new();
  catalog.insert(locale.to_string(), Value::Object(merged));
  Ok(Some(Value::Object(catalog)))
}

fn substitute_locale(path: &Path, locale: &Locale) -> PathBuf {
  PathBuf::from(path.to_string_lossy().replace("[locale]", locale))
}
