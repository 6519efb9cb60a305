//! Request-path helpers for recognizing the Globalize library and its
//! runtime modules inside host-owned request strings.

/// The bare library request application code writes.
pub const GLOBALIZE: &str = "globalize";

/// The runtime flavor of the library that compiled data binds against.
pub const GLOBALIZE_RUNTIME: &str = "globalize/dist/globalize-runtime";

/// The host's internal runtime-require mechanism. Generated module-id
/// indirections must exactly match the host's own reference syntax.
pub const INTERNAL_REQUIRE: &str = "__webpack_require__";

/// Naming convention for the per-locale chunks declared at entry-option
/// time: `<prefix><locale>`.
pub const COMPILED_DATA_CHUNK_PREFIX: &str = "globalize-compiled-data-";

fn segments(filepath: &str) -> Vec<&str> {
  filepath.split(['/', '\\']).collect()
}

/// Whether `filepath` refers to the Globalize library itself: the path
/// contains a `globalize` segment either at the end (`../globalize`) or
/// right before the end (`../globalize/date`).
pub fn is_globalize_module(filepath: &str) -> bool {
  let segments = segments(filepath);
  match segments.iter().rposition(|segment| *segment == GLOBALIZE) {
    Some(i) => segments.len() - i <= 2,
    None => false,
  }
}

/// Whether `filepath` refers to one of the library's runtime feature
/// modules: `.../globalize-runtime/<feature>` or a trailing
/// `globalize-runtime.js`.
pub fn is_globalize_runtime_module(filepath: &str) -> bool {
  let segments = segments(filepath);
  let dir = segments
    .iter()
    .rposition(|segment| *segment == "globalize-runtime")
    .is_some_and(|i| segments.len() - i == 2);
  let file = segments.last().is_some_and(|segment| *segment == "globalize-runtime.js");
  dir || file
}

/// Strips build-system path decoration from a runtime module request,
/// leaving the stable feature path, e.g.
/// `node_modules/globalize/dist/globalize-runtime/date.js` becomes
/// `globalize/dist/globalize-runtime/date`.
pub fn canonical_runtime_name(filepath: &str) -> Option<String> {
  let segments = segments(filepath);
  let i = segments.iter().rposition(|segment| *segment == GLOBALIZE)?;
  let joined = segments[i..].join("/");
  Some(joined.strip_suffix(".js").unwrap_or(&joined).to_owned())
}

/// The whole-library replacement production mode applies at resolution
/// time: `globalize` (or any request ending in `/globalize`) resolves to
/// the runtime flavor instead.
pub fn runtime_replacement(request: &str) -> Option<&'static str> {
  let is_bare = request == GLOBALIZE
    || request.ends_with("/globalize")
    || request.ends_with("\\globalize");
  is_bare.then_some(GLOBALIZE_RUNTIME)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn recognizes_globalize_modules() {
    assert!(is_globalize_module("globalize"));
    assert!(is_globalize_module("node_modules/globalize/date"));
    assert!(!is_globalize_module("node_modules/globalize/dist/globalize-runtime/date"));
    assert!(!is_globalize_module("src/app.js"));
  }

  #[test]
  fn recognizes_runtime_modules() {
    assert!(is_globalize_runtime_module("node_modules/globalize/dist/globalize-runtime/date.js"));
    assert!(is_globalize_runtime_module("node_modules/globalize/dist/globalize-runtime.js"));
    assert!(!is_globalize_runtime_module("node_modules/globalize/date.js"));
  }

  #[test]
  fn canonical_name_strips_path_decoration() {
    assert_eq!(
      canonical_runtime_name("node_modules/globalize/dist/globalize-runtime/date.js").as_deref(),
      Some("globalize/dist/globalize-runtime/date")
    );
    assert_eq!(
      canonical_runtime_name("node_modules\\globalize\\dist\\globalize-runtime.js").as_deref(),
      Some("globalize/dist/globalize-runtime")
    );
  }

  #[test]
  fn replaces_whole_library_requests_only() {
    assert_eq!(runtime_replacement("globalize"), Some(GLOBALIZE_RUNTIME));
    assert_eq!(runtime_replacement("node_modules/globalize"), Some(GLOBALIZE_RUNTIME));
    assert_eq!(runtime_replacement("globalize/date"), None);
  }
}
