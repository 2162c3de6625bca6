//! Front end of the Functional scripting language, where every construct
//! (printing, variables, conditionals, loops, comparisons) is a call to a
//! named built-in.
//!
//! Source text goes through the [`scanner`] with a [`grammar::PatternTable`];
//! tokens naming built-ins come out as `RESERVED` and can be dispatched into
//! the [`stdlib`], which works on a shared [`environment::Environment`].

pub mod block;
pub mod config;
pub mod environment;
pub mod error;
pub mod grammar;
pub mod reserved;
pub mod scanner;
pub mod stdlib;
pub mod token;
pub mod value;

pub use block::{block_tokenize, Block, BlockTokenizer};
pub use environment::{Admission, Environment};
pub use error::{ErrorKind, ScanError};
pub use grammar::PatternTable;
pub use scanner::{scan, ScanOptions, Scanner};
pub use stdlib::{Builtin, Context, Evaluator, Outcome, StubEvaluator};
pub use token::Token;
pub use value::{UserFunction, Value};
