#![forbid(missing_docs)]
//! The `scanlex` crate provides a lexical analyzer generator.
//! Pattern/action rules, macros and start conditions are compiled into an engine that can be
//! used to scan input directly or that can be emitted as Rust source.
//!
//! ```
//! use scanlex::{compile, Lexer, Rule, RuleSet, Token};
//!
//! let rule_set = RuleSet::new()
//!     .add_macro("digit", "[0-9]")
//!     .add_rule(Rule::new("\\s+", "/* skip whitespace */"))
//!     .add_rule(Rule::new("{digit}+", "return 'NUMBER'"))
//!     .add_rule(Rule::new("\\+", "return 'PLUS'"));
//! let engine = compile(&rule_set, None).unwrap();
//! let mut scanner = engine.scanner("1 + 22");
//! assert_eq!(scanner.lex().unwrap(), Token::name("NUMBER"));
//! assert_eq!(scanner.lex().unwrap(), Token::name("PLUS"));
//! assert_eq!(scanner.lex().unwrap(), Token::name("NUMBER"));
//! assert_eq!(scanner.yytext(), "22");
//! assert_eq!(scanner.lex().unwrap(), Token::Eof);
//! ```

/// Module with error definitions
mod errors;
pub use errors::{LexicalError, Result, ScanLexError, ScanLexErrorKind};

/// Module with types used at compile time as well as at run time
mod common;
pub use common::{
    ConditionData, EngineData, Location, Match, ModuleType, Options, RuleData, RuleId,
    ScanOptions, Span, Token, TokenTable,
};

/// Module with the rule compiler, the module emitter and the graphviz renderer
pub mod compiletime;
pub use compiletime::{compile, Pattern, Rule, RuleSet, Scope};
#[cfg(feature = "generate")]
pub use compiletime::{generate_code, render_to};

/// Module with the compiled engine and the scanner
mod runtime;
pub use runtime::{
    Action, ActionTable, Command, CompiledEngine, CompiledRule, Dispatch, ErrorHandler, Lexer,
    ScanState, Scanner, SharedContext, StartCondition, Tokens, INITIAL,
};
