use std::collections::BTreeSet;

use arcstr::ArcStr;

/// One formatter/parser capability of the i18n library's runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureKind {
  DateFormatter,
  DateToPartsFormatter,
  DateParser,
  NumberFormatter,
  NumberParser,
  CurrencyFormatter,
  UnitFormatter,
  RelativeTimeFormatter,
  PluralGenerator,
  MessageFormatter,
}

impl FeatureKind {
  /// Runtime feature modules this capability needs at run time, as stable
  /// feature paths. Composite formatters pull in their building blocks,
  /// mirroring the runtime's own dependency graph.
  pub fn runtime_features(self) -> &'static [&'static str] {
    match self {
      Self::DateFormatter | Self::DateToPartsFormatter | Self::DateParser => {
        &["globalize/dist/globalize-runtime/date"]
      }
      Self::NumberFormatter | Self::NumberParser => &["globalize/dist/globalize-runtime/number"],
      Self::CurrencyFormatter => &[
        "globalize/dist/globalize-runtime/currency",
        "globalize/dist/globalize-runtime/number",
        "globalize/dist/globalize-runtime/plural",
      ],
      Self::UnitFormatter => &[
        "globalize/dist/globalize-runtime/unit",
        "globalize/dist/globalize-runtime/number",
        "globalize/dist/globalize-runtime/plural",
      ],
      Self::RelativeTimeFormatter => &[
        "globalize/dist/globalize-runtime/relative-time",
        "globalize/dist/globalize-runtime/number",
        "globalize/dist/globalize-runtime/plural",
      ],
      Self::PluralGenerator => &["globalize/dist/globalize-runtime/plural"],
      Self::MessageFormatter => &["globalize/dist/globalize-runtime/message"],
    }
  }

  /// The runtime constructor name, e.g. `dateFormatter`.
  pub fn runtime_fn(self) -> &'static str {
    match self {
      Self::DateFormatter => "dateFormatter",
      Self::DateToPartsFormatter => "dateToPartsFormatter",
      Self::DateParser => "dateParser",
      Self::NumberFormatter => "numberFormatter",
      Self::NumberParser => "numberParser",
      Self::CurrencyFormatter => "currencyFormatter",
      Self::UnitFormatter => "unitFormatter",
      Self::RelativeTimeFormatter => "relativeTimeFormatter",
      Self::PluralGenerator => "pluralGenerator",
      Self::MessageFormatter => "messageFormatter",
    }
  }
}

/// One statically detected formatter/parser usage: a capability plus the
/// raw option arguments it was invoked with.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureUse {
  pub kind: FeatureKind,
  pub options: ArcStr,
}

impl FeatureUse {
  pub fn new(kind: FeatureKind, options: impl Into<ArcStr>) -> Self {
    Self { kind, options: options.into() }
  }
}

/// The mergeable descriptor of which formatter/parser features a set of
/// source modules uses. Union is commutative, associative and idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extract {
  features: BTreeSet<FeatureUse>,
}

impl Extract {
  pub fn is_empty(&self) -> bool {
    self.features.is_empty()
  }

  pub fn len(&self) -> usize {
    self.features.len()
  }

  pub fn insert(&mut self, feature: FeatureUse) {
    self.features.insert(feature);
  }

  pub fn contains(&self, feature: &FeatureUse) -> bool {
    self.features.contains(feature)
  }

  pub fn merge(&mut self, other: &Extract) {
    self.features.extend(other.features.iter().cloned());
  }

  pub fn iter(&self) -> impl Iterator<Item = &FeatureUse> {
    self.features.iter()
  }

  /// The union of runtime feature paths every contained usage needs,
  /// deterministically ordered.
  pub fn runtime_features(&self) -> BTreeSet<&'static str> {
    self.features.iter().flat_map(|usage| usage.kind.runtime_features().iter().copied()).collect()
  }
}

impl FromIterator<FeatureUse> for Extract {
  fn from_iter<I: IntoIterator<Item = FeatureUse>>(iter: I) -> Self {
    Self { features: iter.into_iter().collect() }
  }
}
