//! The scanner runs the compiled engine over an input.

use log::trace;

use crate::{
    ActionTable, CompiledEngine, Dispatch, Location, Result, RuleId, ScanLexError,
    ScanLexErrorKind, ScanState, SharedContext, Token,
};

use super::Tokens;

/// The operations a parser uses to pull tokens from a scanner.
pub trait Lexer {
    /// Restarts scanning over a new input.
    ///
    /// The shared context is replaced if one is given, otherwise the current one is kept.
    fn set_input(&mut self, input: &str, yy: Option<SharedContext>);

    /// Performs one scan step.
    ///
    /// Returns `None` if a rule matched but its action produced no token. After the input is
    /// exhausted the end-of-stream token is returned on every call.
    fn next_match(&mut self) -> Result<Option<Token>>;

    /// The current scan state.
    fn scan_state(&self) -> &ScanState;

    /// Returns the next token, skipping scan steps that produce none.
    ///
    /// Fails with `NoProgress` if a step produces no token while leaving the input, the
    /// offset and the start condition stack unchanged.
    fn lex(&mut self) -> Result<Token> {
        loop {
            let before = self.scan_state().progress();
            if let Some(token) = self.next_match()? {
                return Ok(token);
            }
            let state = self.scan_state();
            if !state.is_done() && state.progress() == before {
                return Err(ScanLexError::new(ScanLexErrorKind::NoProgress {
                    line: state.yylineno(),
                    condition: state.active_condition().to_string(),
                }));
            }
        }
    }
}

// The outcome of committing a candidate match.
enum Attempt {
    Token(Token),
    NoToken,
    Rejected,
}

/// A scanner over one input.
///
/// The scanner borrows the immutable engine and owns its scan state, so any number of scanners
/// can work on the same engine at the same time.
pub struct Scanner<'e, D: Dispatch + ?Sized = ActionTable> {
    engine: &'e CompiledEngine,
    dispatch: &'e D,
    state: ScanState,
    yy: SharedContext,
}

impl<'e, D: Dispatch + ?Sized> Scanner<'e, D> {
    /// Creates a scanner over `input`.
    pub fn new(engine: &'e CompiledEngine, dispatch: &'e D, input: &str) -> Self {
        Scanner {
            engine,
            dispatch,
            state: ScanState::new(input, engine.options()),
            yy: SharedContext::new(),
        }
    }

    /// Replaces the shared context.
    pub fn with_context(mut self, yy: SharedContext) -> Self {
        self.yy = yy;
        self
    }

    /// The engine this scanner runs.
    pub fn engine(&self) -> &'e CompiledEngine {
        self.engine
    }

    /// The shared context.
    pub fn context(&self) -> &SharedContext {
        &self.yy
    }

    /// The shared context for modification.
    pub fn context_mut(&mut self) -> &mut SharedContext {
        &mut self.yy
    }

    /// The scan state for modification, e.g. to push a start condition before scanning.
    pub fn state_mut(&mut self) -> &mut ScanState {
        &mut self.state
    }

    /// Returns an iterator over the tokens up to the end-of-stream token.
    pub fn tokens(&mut self) -> Tokens<'_, Self> {
        Tokens::new(self)
    }

    /// The text of the current token.
    pub fn yytext(&self) -> &str {
        self.state.yytext()
    }

    /// The length of the current token text in characters.
    pub fn yyleng(&self) -> usize {
        self.state.yyleng()
    }

    /// The 0-based line number.
    pub fn yylineno(&self) -> usize {
        self.state.yylineno()
    }

    /// The location of the current token.
    pub fn yylloc(&self) -> &Location {
        self.state.yylloc()
    }

    /// Consumes one character and adds it to the current token.
    pub fn input(&mut self) -> Option<char> {
        self.state.input()
    }

    /// Pushes `text` back onto the input.
    pub fn unput(&mut self, text: &str) -> &mut Self {
        self.state.unput(text);
        self
    }

    /// Keeps the current token text for the next match.
    pub fn more(&mut self) -> &mut Self {
        self.state.more();
        self
    }

    /// Rejects the current match, see [`ScanState::reject`].
    pub fn reject(&mut self) -> Result<Option<Token>> {
        self.state.reject(&mut self.yy)
    }

    /// Keeps the first `n` characters of the current match.
    pub fn less(&mut self, n: usize) {
        self.state.less(n)
    }

    /// Renders the consumed input before the current token.
    pub fn past_input(&self) -> String {
        self.state.past_input()
    }

    /// Renders the current token and the input after it.
    pub fn upcoming_input(&self) -> String {
        self.state.upcoming_input()
    }

    /// Renders the input around the current position with a marker line.
    pub fn show_position(&self) -> String {
        self.state.show_position()
    }

    /// Pushes a start condition.
    pub fn begin(&mut self, condition: &str) {
        self.state.begin(condition)
    }

    /// Pushes a start condition.
    pub fn push_state(&mut self, condition: &str) {
        self.state.push_state(condition)
    }

    /// Pops the active start condition.
    pub fn pop_state(&mut self) -> String {
        self.state.pop_state()
    }

    /// The n-th start condition from the top.
    pub fn top_state(&self, n: usize) -> &str {
        self.state.top_state(n)
    }

    /// The depth of the start condition stack.
    pub fn state_stack_size(&self) -> usize {
        self.state.state_stack_size()
    }

    // Commits the match of `rule` and runs its action. With backtracking a rejected match is
    // undone completely.
    fn test_match(&mut self, rule: RuleId, len: usize) -> Result<Attempt> {
        let backup = self
            .engine
            .options()
            .backtrack_lexer
            .then(|| self.state.clone());
        let text = self.state.remaining()[..len].to_string();
        self.state.commit(&text);
        let token = self.dispatch.perform(rule, &mut self.state, &mut self.yy)?;
        self.state.check_resumed();
        if let Some(token) = token {
            return Ok(Attempt::Token(token));
        }
        if self.state.is_rejected() {
            if let Some(backup) = backup {
                trace!("Rule #{} rejected '{}'", rule, text);
                self.state = backup;
                return Ok(Attempt::Rejected);
            }
        }
        Ok(Attempt::NoToken)
    }
}

impl<D: Dispatch + ?Sized> Lexer for Scanner<'_, D> {
    fn set_input(&mut self, input: &str, yy: Option<SharedContext>) {
        self.state = ScanState::new(input, self.engine.options());
        if let Some(yy) = yy {
            self.yy = yy;
        }
    }

    fn next_match(&mut self) -> Result<Option<Token>> {
        if self.state.is_done() {
            return Ok(Some(Token::Eof));
        }
        self.state.check_exhausted();
        self.state.prepare_match();

        let engine = self.engine;
        let options = engine.options();
        let rules = engine.current_rules(self.state.active_condition())?;

        // The best candidate so far, the longest match wins and ties go to the earlier rule.
        let mut best: Option<(RuleId, usize)> = None;
        for &rule in rules {
            let Some(len) = engine.match_len(rule, self.state.remaining()) else {
                continue;
            };
            if best.map_or(true, |(_, best_len)| len > best_len) {
                best = Some((rule, len));
                if options.backtrack_lexer {
                    match self.test_match(rule, len)? {
                        Attempt::Token(token) => return Ok(Some(token)),
                        Attempt::Rejected => best = None,
                        Attempt::NoToken => return Ok(None),
                    }
                } else if !options.flex {
                    break;
                }
            }
        }

        if let Some((rule, len)) = best {
            trace!("Rule #{} matches {} bytes", rule, len);
            return match self.test_match(rule, len)? {
                Attempt::Token(token) => Ok(Some(token)),
                Attempt::NoToken | Attempt::Rejected => Ok(None),
            };
        }
        if self.state.remaining().is_empty() {
            return Ok(Some(Token::Eof));
        }
        let error = self.state.unrecognized_text();
        self.yy.parse_error(error)
    }

    fn scan_state(&self) -> &ScanState {
        &self.state
    }
}

impl<D: Dispatch + ?Sized> std::fmt::Debug for Scanner<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("state", &self.state)
            .field("yy", &self.yy)
            .finish()
    }
}
