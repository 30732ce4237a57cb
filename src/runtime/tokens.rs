use crate::{Lexer, Match, Result, Span, Token};

/// An iterator over the tokens of a lexer.
///
/// The iterator yields a [`Match`] for every token up to the end-of-stream token, which is not
/// yielded. An error is yielded once and ends the iteration.
///
/// The lifetime parameter `'s` represents the lifetime of the lexer that produced this
/// iterator.
///
/// This iterator can be created with the [`crate::Scanner::tokens`] method.
#[derive(Debug)]
pub struct Tokens<'s, L: Lexer + ?Sized> {
    lexer: &'s mut L,
    finished: bool,
}

impl<'s, L: Lexer + ?Sized> Tokens<'s, L> {
    /// Creates a new `Tokens` iterator.
    pub fn new(lexer: &'s mut L) -> Self {
        Tokens {
            lexer,
            finished: false,
        }
    }

    /// Returns the next token together with its position.
    ///
    /// The span covers the current token text including text kept by `more`.
    #[inline]
    pub fn next_token(&mut self) -> Option<Result<Match>> {
        if self.finished {
            return None;
        }
        match self.lexer.lex() {
            Ok(Token::Eof) => {
                self.finished = true;
                None
            }
            Ok(token) => {
                let state = self.lexer.scan_state();
                let end = state.offset();
                let span = Span::new(end.saturating_sub(state.yyleng()), end);
                Some(Ok(Match::new(token, span, *state.yylloc())))
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

impl<L: Lexer + ?Sized> Iterator for Tokens<'_, L> {
    type Item = Result<Match>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use crate::{compile, Rule, RuleSet, Token};

    #[test]
    fn test_tokens_stop_at_error() {
        let rule_set = RuleSet::new()
            .add_rule(Rule::new("[a-z]+", "return 'ID'"))
            .add_rule(Rule::new(" +", ""));
        let engine = compile(&rule_set, None).unwrap();
        let mut scanner = engine.scanner("ab cd !ef");
        let mut tokens = scanner.tokens();
        let first = tokens.next().unwrap().unwrap();
        assert_eq!(first.token(), &Token::name("ID"));
        assert_eq!((first.start(), first.end()), (0, 2));
        let second = tokens.next().unwrap().unwrap();
        assert_eq!((second.start(), second.end()), (3, 5));
        assert!(tokens.next().unwrap().is_err());
        assert!(tokens.next().is_none());
    }
}
