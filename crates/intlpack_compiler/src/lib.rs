//! The extraction/compilation boundary: a pure function turning syntax
//! trees into feature extracts, and a pure function turning an extract
//! plus locale data into the source text of a locale-bound runtime module.

mod compile;
mod extract;

pub use crate::{
  compile::{CompileError, compile_extracts},
  extract::extract,
};
