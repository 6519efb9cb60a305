use itertools::Itertools;

use intlpack_common::{CallSite, Extract, FeatureKind, FeatureUse, SyntaxTree};

/// Statically extracts every formatter/parser usage from one parsed source
/// module. Pure; extracting the same tree twice yields equal extracts.
pub fn extract(tree: &SyntaxTree) -> Extract {
  tree.calls().iter().filter_map(feature_use).collect()
}

fn feature_use(call: &CallSite) -> Option<FeatureUse> {
  let method = call.callee.rsplit('.').next().unwrap_or(&call.callee);
  // Usage forms carry the value being formatted as their first argument;
  // only the trailing arguments identify the formatter.
  let (kind, options) = match method {
    "formatDate" | "dateFormatter" => (FeatureKind::DateFormatter, skip_value(call, method)),
    "formatDateToParts" | "dateToPartsFormatter" => {
      (FeatureKind::DateToPartsFormatter, skip_value(call, method))
    }
    "parseDate" | "dateParser" => (FeatureKind::DateParser, skip_value(call, method)),
    "formatNumber" | "numberFormatter" => (FeatureKind::NumberFormatter, skip_value(call, method)),
    "parseNumber" | "numberParser" => (FeatureKind::NumberParser, skip_value(call, method)),
    "formatCurrency" | "currencyFormatter" => {
      (FeatureKind::CurrencyFormatter, skip_value(call, method))
    }
    "formatUnit" | "unitFormatter" => (FeatureKind::UnitFormatter, skip_value(call, method)),
    "formatRelativeTime" | "relativeTimeFormatter" => {
      (FeatureKind::RelativeTimeFormatter, skip_value(call, method))
    }
    "plural" | "pluralGenerator" => (FeatureKind::PluralGenerator, skip_value(call, method)),
    "formatMessage" | "messageFormatter" => {
      (FeatureKind::MessageFormatter, call.args.first().map_or_else(String::new, ToString::to_string))
    }
    _ => return None,
  };
  Some(FeatureUse::new(kind, options))
}

/// Formatter options for a call site. Usage forms (`formatDate(value,
/// options)`) drop the leading value argument; factory forms
/// (`dateFormatter(options)`) keep the whole argument list.
fn skip_value(call: &CallSite, method: &str) -> String {
  let skip = usize::from(method.starts_with("format") || method.starts_with("parse") || method == "plural");
  call.args.iter().skip(skip).join(", ")
}

#[cfg(test)]
mod tests {
  use super::extract;
  use intlpack_common::{FeatureKind, FeatureUse, SyntaxTree};

  #[test]
  fn usage_and_factory_forms_extract_the_same_feature() {
    let usage = SyntaxTree::from_source(r#"Globalize.formatDate(date, { skeleton: "yMd" });"#);
    let factory = SyntaxTree::from_source(r#"Globalize.dateFormatter({ skeleton: "yMd" });"#);
    assert_eq!(extract(&usage), extract(&factory));
  }

  #[test]
  fn currency_keeps_the_currency_code() {
    let tree = SyntaxTree::from_source(r#"Globalize.formatCurrency(total, "EUR");"#);
    assert!(extract(&tree).contains(&FeatureUse::new(FeatureKind::CurrencyFormatter, "\"EUR\"")));
  }

  #[test]
  fn message_paths_are_part_of_the_extract() {
    let tree = SyntaxTree::from_source(r#"Globalize.formatMessage("greetings/hello");"#);
    assert!(extract(&tree).contains(&FeatureUse::new(
      FeatureKind::MessageFormatter,
      "\"greetings/hello\""
    )));
  }

  #[test]
  fn unrelated_calls_extract_nothing() {
    let tree = SyntaxTree::from_source(r#"console.log(require("globalize"));"#);
    assert!(extract(&tree).is_empty());
  }
}
