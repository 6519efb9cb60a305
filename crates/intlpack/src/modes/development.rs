use std::fmt::Write;
use std::sync::Arc;

use arcstr::ArcStr;

use intlpack_common::{
  Dependency, GLOBALIZE, ModuleGraph, ModuleId, ModuleIdx, NormalizedPluginOptions, SyntaxTree,
};
use intlpack_error::{BuildResult, BuildWarning};

use crate::{
  classifier::{Classification, RequestClassifier},
  hooks::PluginHooks,
  registry::SynthesizedModules,
  utils::read_messages::read_messages,
};

const DEV_ARTIFACT_NAME: &str = "dev-i18n-data.js";

/// Development mode: one generated module loads the development locale's
/// full locale data, defines the default locale and exports the library.
/// Every library reference is redirected there. No extraction, no
/// feature pruning.
pub struct DevelopmentMode {
  classifier: RequestClassifier,
  registry: SynthesizedModules,
  artifact: ModuleId,
  artifact_source: ArcStr,
  warnings: Vec<BuildWarning>,
}

impl DevelopmentMode {
  pub fn new(options: &Arc<NormalizedPluginOptions>) -> BuildResult<Self> {
    let mut warnings = vec![];
    let locale = &options.development_locale;
    let messages = read_messages(&options.messages, locale, &mut warnings)?;

    let mut source = String::new();
    writeln!(source, "var Globalize = require(\"{GLOBALIZE}\");\n")
      .expect("writing to a String cannot fail");
    writeln!(source, "Globalize.load({});", options.cldr.cldr(locale))
      .expect("writing to a String cannot fail");
    if let Some(messages) = messages {
      writeln!(source, "Globalize.loadMessages({messages});")
        .expect("writing to a String cannot fail");
    }
    writeln!(source, "Globalize.loadTimeZone({});", options.cldr.time_zone_data())
      .expect("writing to a String cannot fail");
    writeln!(source, "Globalize.locale(\"{locale}\");\n").expect("writing to a String cannot fail");
    source.push_str("module.exports = Globalize;\n");

    let path = options.tmpdir.join(DEV_ARTIFACT_NAME);
    std::fs::write(&path, &source)?;

    let artifact = ModuleId::new(path.to_string_lossy().into_owned());
    let mut registry = SynthesizedModules::default();
    registry.insert(artifact.clone(), locale.clone());

    Ok(Self {
      classifier: RequestClassifier::new(options.module_filter.clone()),
      registry,
      artifact,
      artifact_source: source.into(),
      warnings,
    })
  }

  pub fn artifact(&self) -> &ModuleId {
    &self.artifact
  }
}

impl PluginHooks for DevelopmentMode {
  fn module_parsed(
    &mut self,
    graph: &mut ModuleGraph,
    module: ModuleIdx,
    tree: &SyntaxTree,
  ) -> BuildResult<()> {
    let request = graph.module(module).request.clone();
    if !self.classifier.should_process(&request)
      || RequestClassifier::classify(&request, &self.registry) == Classification::OwnArtifact
    {
      return Ok(());
    }

    let references_library = tree.require_calls().any(|call| {
      call.string_literal_arg(0).is_some_and(|argument| {
        RequestClassifier::classify(&ModuleId::new(argument), &self.registry)
          == Classification::I18nLibrary
      })
    });
    if references_library {
      graph.add_module(self.artifact.clone(), self.artifact_source.clone());
      graph.add_dependency(
        module,
        Dependency {
          request: self.artifact.clone(),
          replaces_call_site: true,
          internal_require: true,
        },
      );
    }
    Ok(())
  }

  fn take_warnings(&mut self) -> Vec<BuildWarning> {
    std::mem::take(&mut self.warnings)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::DevelopmentMode;
  use crate::hooks::PluginHooks;
  use intlpack_common::{
    Locale, MinimalCldrProvider, ModuleGraph, ModuleId, NormalizedPluginOptions, SyntaxTree,
  };

  fn options(tmpdir: &std::path::Path) -> Arc<NormalizedPluginOptions> {
    Arc::new(NormalizedPluginOptions {
      development_locale: Locale::new("en"),
      supported_locales: vec![Locale::new("en")],
      cldr: Arc::new(MinimalCldrProvider),
      messages: vec![],
      output: "i18n-[locale].js".into(),
      module_filter: None,
      tmpdir: tmpdir.to_path_buf(),
    })
  }

  #[test]
  fn the_dev_artifact_loads_full_data_and_activates_the_locale() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mode = DevelopmentMode::new(&options(dir.path())).expect("mode");
    let source = std::fs::read_to_string(mode.artifact().as_ref()).expect("artifact on disk");
    assert!(source.contains("Globalize.load("));
    assert!(source.contains("Globalize.loadTimeZone("));
    assert!(source.contains("Globalize.locale(\"en\");"));
    assert!(source.trim_end().ends_with("module.exports = Globalize;"));
  }

  #[test]
  fn library_references_are_redirected_to_the_dev_artifact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut mode = DevelopmentMode::new(&options(dir.path())).expect("mode");
    let mut graph = ModuleGraph::default();
    let app = graph.add_module(ModuleId::new("./app.js"), "");
    let tree = SyntaxTree::from_source(r#"var Globalize = require("globalize");"#);
    mode.module_parsed(&mut graph, app, &tree).expect("hook");

    let deps = &graph.module(app).dependencies;
    assert_eq!(deps.len(), 1);
    assert_eq!(&deps[0].request, mode.artifact());
    assert!(deps[0].replaces_call_site);
    assert!(deps[0].internal_require);
  }

  #[test]
  fn the_dev_artifact_itself_is_never_intercepted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut mode = DevelopmentMode::new(&options(dir.path())).expect("mode");
    let mut graph = ModuleGraph::default();
    let artifact = graph.add_module(mode.artifact().clone(), "");
    let tree = SyntaxTree::from_source(r#"var Globalize = require("globalize");"#);
    mode.module_parsed(&mut graph, artifact, &tree).expect("hook");
    assert!(graph.module(artifact).dependencies.is_empty());
  }
}
