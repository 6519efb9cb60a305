use arcstr::ArcStr;

/// An opaque locale tag, e.g. a BCP-47-like code such as `en` or `pt-BR`.
/// No internal structure is assumed beyond equality, hashing and use as a
/// filename/string-interpolation fragment.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct Locale(ArcStr);

impl Locale {
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }
}

impl std::ops::Deref for Locale {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for Locale {
  fn as_ref(&self) -> &str {
    self
  }
}

impl std::fmt::Display for Locale {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for Locale {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

impl From<ArcStr> for Locale {
  fn from(value: ArcStr) -> Self {
    Self(value)
  }
}
