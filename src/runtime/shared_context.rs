use log::trace;

use crate::{LexicalError, Result, ScanLexError, ScanLexErrorKind, Token};

/// Receives the lexical errors of a scanner, typically implemented by a parser.
pub trait ErrorHandler {
    /// Handles a lexical error.
    ///
    /// The returned token is handed to the caller of the failing scan step in place of a
    /// regular token. Returning an error aborts scanning.
    fn parse_error(&mut self, error: LexicalError) -> Result<Option<Token>>;
}

impl<F> ErrorHandler for F
where
    F: FnMut(LexicalError) -> Result<Option<Token>>,
{
    fn parse_error(&mut self, error: LexicalError) -> Result<Option<Token>> {
        (self)(error)
    }
}

/// The context a scanner shares with its user, e.g. the parser that drives it.
#[derive(Default)]
pub struct SharedContext {
    error_handler: Option<Box<dyn ErrorHandler>>,
    echoed: String,
}

impl SharedContext {
    /// Creates a context without error handler.
    pub fn new() -> Self {
        SharedContext::default()
    }

    /// Creates a context that delegates lexical errors to `handler`.
    pub fn with_error_handler<H: ErrorHandler + 'static>(handler: H) -> Self {
        SharedContext {
            error_handler: Some(Box::new(handler)),
            echoed: String::new(),
        }
    }

    /// Returns true if an error handler is attached.
    pub fn has_error_handler(&self) -> bool {
        self.error_handler.is_some()
    }

    /// Reports a lexical error to the attached handler, or fails with it if there is none.
    pub fn parse_error(&mut self, error: LexicalError) -> Result<Option<Token>> {
        match self.error_handler.as_mut() {
            Some(handler) => handler.parse_error(error),
            None => Err(ScanLexError::new(ScanLexErrorKind::LexicalError(error))),
        }
    }

    /// Appends text to the echo buffer.
    pub fn echo(&mut self, text: &str) {
        trace!("ECHO '{}'", text);
        self.echoed.push_str(text);
    }

    /// The text written by `ECHO` actions so far.
    pub fn echoed(&self) -> &str {
        &self.echoed
    }

    /// Takes the echoed text, leaving the buffer empty.
    pub fn take_echoed(&mut self) -> String {
        std::mem::take(&mut self.echoed)
    }
}

impl std::fmt::Debug for SharedContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedContext")
            .field("error_handler", &self.error_handler.is_some())
            .field("echoed", &self.echoed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_without_handler() {
        let mut yy = SharedContext::new();
        let result = yy.parse_error(LexicalError::new("boom".to_string(), 3));
        let error = result.unwrap_err();
        assert_eq!(error.to_string(), "boom");
        assert_eq!(error.as_lexical_error().map(|e| e.line), Some(3));
    }

    #[test]
    fn test_parse_error_with_handler() {
        let mut yy = SharedContext::with_error_handler(|error: LexicalError| {
            Ok(Some(Token::name(format!("ERROR@{}", error.line))))
        });
        assert!(yy.has_error_handler());
        let result = yy.parse_error(LexicalError::new("boom".to_string(), 3));
        assert_eq!(result.unwrap(), Some(Token::name("ERROR@3")));
    }

    #[test]
    fn test_echo() {
        let mut yy = SharedContext::new();
        yy.echo("a");
        yy.echo("b");
        assert_eq!(yy.echoed(), "ab");
        assert_eq!(yy.take_echoed(), "ab");
        assert_eq!(yy.echoed(), "");
    }
}
