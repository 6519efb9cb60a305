use std::fmt::Write;

use intlpack_common::{CompileAttributes, FeatureKind, GLOBALIZE_RUNTIME};

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
  /// The supplied extract names no formatter or parser usage at all.
  #[error("no formatters or parsers found")]
  NoFormattersOrParsers,
}

/// Compiles an extract plus locale data into the source text of a
/// self-contained module exporting a locale-bound runtime instance. The
/// text ends with the runtime's return-the-instance statement, which
/// callers use as the anchor for post-processing.
pub fn compile_extracts(attributes: &CompileAttributes) -> Result<String, CompileError> {
  if attributes.extracts.is_empty() {
    return Err(CompileError::NoFormattersOrParsers);
  }

  let locale = &attributes.default_locale;
  let mut out = String::new();
  out.push_str("module.exports = (function( Globalize ) {\n\n");

  for feature in attributes.extracts.runtime_features() {
    writeln!(out, "require(\"{feature}\");").expect("writing to a String cannot fail");
  }
  out.push('\n');

  if let Some(messages) = &attributes.messages {
    writeln!(out, "Globalize.loadMessages({messages});").expect("writing to a String cannot fail");
  }
  let needs_time_zone = attributes.extracts.iter().any(|usage| {
    matches!(
      usage.kind,
      FeatureKind::DateFormatter | FeatureKind::DateToPartsFormatter | FeatureKind::DateParser
    )
  });
  if needs_time_zone {
    if let Some(time_zone_data) = &attributes.time_zone_data {
      writeln!(out, "Globalize.loadTimeZone({time_zone_data});")
        .expect("writing to a String cannot fail");
    }
  }

  for (i, usage) in attributes.extracts.iter().enumerate() {
    writeln!(
      out,
      "var b{i} = Globalize(\"{locale}\").{method}({options});",
      method = usage.kind.runtime_fn(),
      options = usage.options,
    )
    .expect("writing to a String cannot fail");
  }

  out.push_str("\nreturn Globalize;\n\n");
  writeln!(out, "}}( require( \"{GLOBALIZE_RUNTIME}\" ) ));").expect("writing to a String cannot fail");
  Ok(out)
}
