use thiserror::Error;

use crate::Token;

/// The result type for the `scanlex` crate.
pub type Result<T> = std::result::Result<T, ScanLexError>;

/// A macro that constructs a new ScanLexError::UnsupportedAction variant.
#[macro_export]
macro_rules! unsupported {
    ($rule:expr, $action:expr, $reason:expr) => {
        $crate::ScanLexError::new($crate::ScanLexErrorKind::UnsupportedAction {
            rule: $rule,
            action: $action.to_string(),
            reason: $reason.to_string(),
        })
    };
}

/// The error type for the `scanlex` crate.
#[derive(Error, Debug)]
pub struct ScanLexError {
    /// The source of the error.
    pub source: Box<ScanLexErrorKind>,
}

impl ScanLexError {
    /// Create a new `ScanLexError`.
    pub fn new(kind: ScanLexErrorKind) -> Self {
        ScanLexError {
            source: Box::new(kind),
        }
    }

    /// Returns the lexical error if this is one.
    pub fn as_lexical_error(&self) -> Option<&LexicalError> {
        match &*self.source {
            ScanLexErrorKind::LexicalError(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScanLexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum ScanLexErrorKind {
    /// A rule pattern could not be parsed.
    #[error(transparent)]
    RegexSyntaxError(#[from] regex_syntax::Error),

    /// The matcher for a rule pattern could not be built.
    #[error(transparent)]
    RegexError(#[from] regex::Error),

    /// A std::io error occurred.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// A start condition was referenced that has not been declared.
    #[error("Unknown start condition '{0}'")]
    UnknownStartCondition(String),

    /// Macro substitution did not reach a fixed point.
    #[error("Macro expansion does not terminate, cyclic macros: {}", .0.join(", "))]
    MacroExpansionError(Vec<String>),

    /// The action of a rule uses statements outside the supported instruction set.
    #[error("Unsupported action in rule #{rule} '{action}': {reason}")]
    UnsupportedAction {
        /// The index of the rule.
        rule: usize,
        /// The offending statement.
        action: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The scanner could not recognize the input.
    #[error(transparent)]
    LexicalError(LexicalError),

    /// The scanner would repeat the same step forever.
    #[error("Scanner makes no progress on line {} in start condition '{}'", .line + 1, .condition)]
    NoProgress {
        /// The 0-based line where scanning stalled.
        line: usize,
        /// The active start condition.
        condition: String,
    },
}

impl From<regex_syntax::Error> for ScanLexError {
    fn from(error: regex_syntax::Error) -> Self {
        ScanLexError::new(ScanLexErrorKind::RegexSyntaxError(error))
    }
}

impl From<regex::Error> for ScanLexError {
    fn from(error: regex::Error) -> Self {
        ScanLexError::new(ScanLexErrorKind::RegexError(error))
    }
}

impl From<std::io::Error> for ScanLexError {
    fn from(error: std::io::Error) -> Self {
        ScanLexError::new(ScanLexErrorKind::IoError(error))
    }
}

impl From<LexicalError> for ScanLexError {
    fn from(error: LexicalError) -> Self {
        ScanLexError::new(ScanLexErrorKind::LexicalError(error))
    }
}

/// An error raised while scanning.
///
/// The `text` and `token` fields form a zero-width placeholder a parser can use for error
/// recovery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct LexicalError {
    /// The diagnostic message including the rendered error position.
    pub message: String,
    /// The placeholder text, always empty.
    pub text: String,
    /// The placeholder token, always `None`.
    pub token: Option<Token>,
    /// The 0-based line number where the error occurred.
    pub line: usize,
}

impl LexicalError {
    /// Create a new lexical error with empty placeholder text and token.
    pub fn new(message: String, line: usize) -> Self {
        LexicalError {
            message,
            text: String::new(),
            token: None,
            line,
        }
    }
}
