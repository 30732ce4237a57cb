/// The action module contains the parser for rule actions.
mod action;
pub(crate) use action::parse_action;

/// The macro expander substitutes macro references in macros and rule patterns.
mod macro_expander;
pub use macro_expander::{expand_macros, expand_pattern};

/// The parser module validates rule patterns with the regex syntax parser.
mod parser;

/// The rule compiler builds a compiled engine from a rule set.
mod rule_compiler;
pub use rule_compiler::{compile, CATCH_ALL_ACTION, CATCH_ALL_PATTERN};

/// The types a rule set is made of.
mod rule_set;
pub use rule_set::{Pattern, Rule, RuleSet, Scope};

/// The generator module contains the module emitter.
#[cfg(feature = "generate")]
mod generator;
#[cfg(feature = "generate")]
pub use generator::generate_code;

/// Module with conversion to graphviz dot format
#[cfg(feature = "generate")]
mod dot;
#[cfg(feature = "generate")]
pub use dot::render_to;
