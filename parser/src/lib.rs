//! A resilient recursive-descent parser: tokenizer, cursor, and the grammar
//! productions that build a [`Tree`] from source text.
//!
//! Parsing never aborts. Every malformed construct becomes one diagnostic in
//! `Tree::errors` and the parser resynchronises at the nearest container
//! member or statement boundary, so a single typo never prevents the rest of
//! the file from producing an AST.

mod cursor;
mod parser;
mod tokenizer;

pub use corec_ast as ast;
pub use corec_diagnostics as diagnostics;
pub use parser::{parse, ParseError, Tree};
pub use tokenizer::{tokenize, TokenizedSource};
