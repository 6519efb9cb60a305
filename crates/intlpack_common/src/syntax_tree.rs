use arcstr::ArcStr;
use regex::Regex;
use std::sync::OnceLock;

/// One call expression the host parser observed: a (possibly dotted)
/// callee path and the raw text of each top-level argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
  pub callee: ArcStr,
  pub args: Vec<ArcStr>,
}

impl CallSite {
  pub fn new(callee: impl Into<ArcStr>, args: Vec<ArcStr>) -> Self {
    Self { callee: callee.into(), args }
  }

  /// The argument at `index` if it is a plain string literal, with the
  /// quotes stripped.
  pub fn string_literal_arg(&self, index: usize) -> Option<&str> {
    let arg = self.args.get(index)?.trim();
    let mut chars = arg.chars();
    let quote = chars.next()?;
    if !matches!(quote, '"' | '\'') || !arg.ends_with(quote) || arg.len() < 2 {
      return None;
    }
    let inner = &arg[1..arg.len() - 1];
    (!inner.contains(quote)).then_some(inner)
  }
}

/// The immutable parsed representation of one source module, supplied by
/// the host after parsing. Only the call expressions matter to this
/// plugin, so that is all the representation carries.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
  calls: Vec<CallSite>,
}

impl SyntaxTree {
  pub fn new(calls: Vec<CallSite>) -> Self {
    Self { calls }
  }

  pub fn calls(&self) -> &[CallSite] {
    &self.calls
  }

  /// Single-argument `require(...)` call sites.
  pub fn require_calls(&self) -> impl Iterator<Item = &CallSite> {
    self.calls.iter().filter(|call| call.callee.as_str() == "require" && call.args.len() == 1)
  }

  /// Convenience scanner for hosts (and tests) that do not hand over their
  /// own parsed program: finds every call expression in `source` with
  /// balanced-bracket argument extraction.
  pub fn from_source(source: &str) -> Self {
    static CALLEE: OnceLock<Regex> = OnceLock::new();
    let callee_re = CALLEE.get_or_init(|| {
      Regex::new(r"([A-Za-z_$][A-Za-z0-9_$]*(?:\s*\.\s*[A-Za-z_$][A-Za-z0-9_$]*)*)\s*\(")
        .expect("valid callee regex")
    });

    let mut calls = vec![];
    for captures in callee_re.captures_iter(source) {
      let whole = captures.get(0).expect("capture 0 always present");
      let callee = captures.get(1).expect("callee capture present").as_str();
      let normalized: String = callee.split_whitespace().collect();
      if is_keyword(normalized.split('.').next().unwrap_or_default()) {
        continue;
      }
      if let Some(args) = scan_arguments(&source[whole.end()..]) {
        calls.push(CallSite::new(normalized, args));
      }
    }
    Self { calls }
  }
}

fn is_keyword(word: &str) -> bool {
  matches!(word, "if" | "for" | "while" | "switch" | "catch" | "function" | "return" | "typeof")
}

/// Scans the argument list starting right after an opening parenthesis,
/// splitting on top-level commas and respecting nested brackets and string
/// literals. Returns `None` on an unterminated list.
fn scan_arguments(rest: &str) -> Option<Vec<ArcStr>> {
  let mut depth = 1usize;
  let mut args: Vec<ArcStr> = vec![];
  let mut current = String::new();
  let mut in_string: Option<char> = None;
  let mut chars = rest.chars();

  while let Some(char) = chars.next() {
    if let Some(quote) = in_string {
      current.push(char);
      if char == '\\' {
        if let Some(escaped) = chars.next() {
          current.push(escaped);
        }
      } else if char == quote {
        in_string = None;
      }
      continue;
    }
    match char {
      '"' | '\'' | '`' => {
        in_string = Some(char);
        current.push(char);
      }
      '(' | '[' | '{' => {
        depth += 1;
        current.push(char);
      }
      ')' | ']' | '}' => {
        depth -= 1;
        if depth == 0 {
          let trimmed = current.trim();
          if !trimmed.is_empty() {
            args.push(trimmed.into());
          }
          return Some(args);
        }
        current.push(char);
      }
      ',' if depth == 1 => {
        args.push(current.trim().into());
        current.clear();
      }
      _ => current.push(char),
    }
  }
  None
}
