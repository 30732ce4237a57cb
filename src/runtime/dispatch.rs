//! The dispatch routine executes the action of the rule that won a match.
//!
//! Actions are lists of [`Command`]s that operate on the [`ScanState`]. Alternatively any
//! closure with the signature of [`Dispatch::perform`] can be used as dispatch routine.

use std::fmt::{self, Display, Formatter};

use log::trace;

use crate::{Result, RuleId, ScanState, SharedContext, Token};

/// The interface of a dispatch routine.
pub trait Dispatch {
    /// Executes the action of `rule`.
    ///
    /// Returns the token produced by the action or `None` if the match produced no token and
    /// the scanner should continue.
    fn perform(
        &self,
        rule: RuleId,
        state: &mut ScanState,
        yy: &mut SharedContext,
    ) -> Result<Option<Token>>;
}

impl<F> Dispatch for F
where
    F: Fn(RuleId, &mut ScanState, &mut SharedContext) -> Result<Option<Token>>,
{
    fn perform(
        &self,
        rule: RuleId,
        state: &mut ScanState,
        yy: &mut SharedContext,
    ) -> Result<Option<Token>> {
        (self)(rule, state, yy)
    }
}

/// A single statement of a rule action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ends the action and yields the token.
    Return(Token),
    /// Ends the action without a token.
    Skip,
    /// Pushes a start condition.
    Begin(String),
    /// Pops the current start condition.
    PopState,
    /// Keeps the matched text for the next match.
    More,
    /// Rejects the match so that the next matching rule is tried.
    Reject,
    /// Keeps only the first n characters of the match.
    Less(usize),
    /// Pushes text back onto the input.
    Unput(String),
    /// Consumes one more character.
    Input,
    /// Writes the matched text to the echo buffer.
    Echo,
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Command::Return(Token::Eof) => write!(f, "return this.EOF"),
            Command::Return(Token::Code(code)) => write!(f, "return {}", code),
            Command::Return(Token::Name(name)) => write!(f, "return {}", quote(name)),
            Command::Skip => write!(f, "return"),
            Command::Begin(condition) => write!(f, "this.begin({})", quote(condition)),
            Command::PopState => write!(f, "this.popState()"),
            Command::More => write!(f, "this.more()"),
            Command::Reject => write!(f, "this.reject()"),
            Command::Less(n) => write!(f, "this.less({})", n),
            Command::Unput(text) => write!(f, "this.unput({})", quote(text)),
            Command::Input => write!(f, "this.input()"),
            Command::Echo => write!(f, "ECHO"),
        }
    }
}

// Renders a single quoted string literal that the action parser reads back unchanged.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for c in text.chars() {
        match c {
            '\'' => quoted.push_str("\\'"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// The normalized action of one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Action {
    commands: Vec<Command>,
}

impl Action {
    /// Creates an action from its commands.
    pub fn new(commands: Vec<Command>) -> Self {
        Action { commands }
    }

    /// The commands of the action.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Executes the commands until one of them ends the action.
    pub fn execute(&self, state: &mut ScanState, yy: &mut SharedContext) -> Result<Option<Token>> {
        for command in &self.commands {
            match command {
                Command::Return(token) => return Ok(Some(token.clone())),
                Command::Skip => return Ok(None),
                Command::Begin(condition) => state.begin(condition),
                Command::PopState => {
                    state.pop_state();
                }
                Command::More => {
                    state.more();
                }
                Command::Reject => {
                    if let Some(token) = state.reject(yy)? {
                        return Ok(Some(token));
                    }
                }
                Command::Less(n) => state.less(*n),
                Command::Unput(text) => {
                    state.unput(text);
                }
                Command::Input => {
                    state.input();
                }
                Command::Echo => yy.echo(state.yytext()),
            }
        }
        Ok(None)
    }
}

/// The canonical text of the action, statements terminated by `;`.
impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{};", command)?;
        }
        Ok(())
    }
}

/// The dispatch routine of a compiled engine: one action per rule, selected by rule id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionTable {
    actions: Vec<Action>,
}

impl ActionTable {
    /// Creates a table from the actions in rule order.
    pub fn new(actions: Vec<Action>) -> Self {
        ActionTable { actions }
    }

    /// The action of a rule.
    pub fn get(&self, rule: RuleId) -> Option<&Action> {
        self.actions.get(rule.as_usize())
    }

    /// The number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if the table has no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterates over the actions in rule order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }
}

impl Dispatch for ActionTable {
    fn perform(
        &self,
        rule: RuleId,
        state: &mut ScanState,
        yy: &mut SharedContext,
    ) -> Result<Option<Token>> {
        trace!(
            "Rule #{} action in condition '{}' on '{}'",
            rule,
            state.top_state(0),
            state.yytext()
        );
        match self.get(rule) {
            Some(action) => action.execute(state, yy),
            None => Ok(None),
        }
    }
}
