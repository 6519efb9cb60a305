use serde_json::Value;

use crate::{Extract, Locale};

/// Everything the external compile function needs to produce one
/// compiled-data payload. Mutable via the before-compile hook right until
/// compilation starts.
#[derive(Debug, Clone)]
pub struct CompileAttributes {
  pub default_locale: Locale,
  pub cldr: Value,
  pub extracts: Extract,
  pub messages: Option<Value>,
  pub time_zone_data: Option<Value>,
}
