use super::{Location, Span, Token};

/// A token produced by the scanner together with where it was found.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Match {
    /// The token returned by the rule action.
    token: Token,
    /// The characters covered by the token text.
    span: Span,
    /// The line and column location of the token text.
    location: Location,
}

impl Match {
    /// Create a new match.
    pub fn new(token: Token, span: Span, location: Location) -> Self {
        Self {
            token,
            span,
            location,
        }
    }

    /// Get the start of the match.
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// Get the end of the match.
    pub fn end(&self) -> usize {
        self.span.end
    }

    /// Get the span of the match.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the token.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Get the location.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Consumes the match and returns the token.
    pub fn into_token(self) -> Token {
        self.token
    }
}
