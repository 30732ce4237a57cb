use std::collections::BTreeMap;

/// A token produced by a rule action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Token {
    /// The designated end-of-stream token.
    Eof,
    /// A numeric token code, usually taken from a token table.
    Code(usize),
    /// A symbolic token name.
    Name(String),
}

impl Token {
    /// Create a symbolic token.
    pub fn name<S: Into<String>>(name: S) -> Self {
        Token::Name(name.into())
    }

    /// Returns true for the end-of-stream token.
    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Eof => write!(f, "EOF"),
            Token::Code(code) => write!(f, "{}", code),
            Token::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Maps declared token names to their codes.
///
/// The table is only consulted when actions are compiled: `return 'NAME'` is rewritten to
/// return the code found here. Names missing from the table stay symbolic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTable(BTreeMap<String, Token>);

impl TokenTable {
    /// Creates an empty token table.
    pub fn new() -> Self {
        TokenTable::default()
    }

    /// Assigns a numeric code to a token name.
    pub fn insert_code<S: Into<String>>(&mut self, name: S, code: usize) -> &mut Self {
        self.0.insert(name.into(), Token::Code(code));
        self
    }

    /// Assigns a symbolic code to a token name.
    pub fn insert_symbol<S: Into<String>, T: Into<String>>(&mut self, name: S, symbol: T) -> &mut Self {
        self.0.insert(name.into(), Token::Name(symbol.into()));
        self
    }

    /// Resolves a token name, falling back to the name itself.
    pub fn resolve(&self, name: &str) -> Token {
        self.0
            .get(name)
            .cloned()
            .unwrap_or_else(|| Token::name(name))
    }

    /// The number of declared tokens.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no tokens are declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds a table from `(code, name)` pairs, the way a parser generator lists its terminals.
impl<S: Into<String>> FromIterator<(usize, S)> for TokenTable {
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        let mut table = TokenTable::new();
        for (code, name) in iter {
            table.insert_code(name, code);
        }
        table
    }
}
