//! The mutable state of one scanning session.
//!
//! The state shares the complete input and tracks what has been consumed, the text of the
//! current match, line and column bookkeeping and the stack of start conditions. Positions
//! are counted in characters.

use std::sync::Arc;

use crate::{Location, LexicalError, Result, ScanOptions, SharedContext, Token};

/// The name of the start condition that always exists.
pub const INITIAL: &str = "INITIAL";

// The maximum number of characters shown on each side of a diagnostic excerpt.
const CONTEXT_WIDTH: usize = 20;

/// The scan state of a scanner.
///
/// Cloning the state yields a complete snapshot, which is how backtracking restores the state
/// after a rejected match. The input is shared between snapshots and the consumed text and
/// the current match are ranges of it, so a snapshot doesn't grow with the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanState {
    /// The input, possibly modified by `unput`. `input[..cursor]` is the consumed text.
    input: Arc<str>,
    /// The byte position in `input` where the remaining input starts.
    cursor: usize,
    /// The byte position in `input` where the current match starts, including text kept by
    /// `more`.
    match_start: usize,
    /// The number of characters consumed so far.
    offset: usize,
    /// The length of the current match in characters.
    yyleng: usize,
    /// The 0-based number of the current line.
    yylineno: usize,
    /// The location of the current match.
    yylloc: Location,
    /// The start conditions, the active one on top. Never empty.
    condition_stack: Vec<String>,
    /// Set by `more`, the next match appends to `yytext`.
    more: bool,
    /// Set by `reject`, the scanner restores the state and tries the next rule.
    backtrack: bool,
    /// Set once the input is exhausted.
    done: bool,
    /// The flags of the engine that created this state.
    options: ScanOptions,
}

/// A snapshot of the parts of the scan state that change when the scanner makes progress.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Progress {
    remaining: usize,
    offset: usize,
    conditions: Vec<String>,
}

impl ScanState {
    /// Creates the state for scanning `input`.
    pub fn new(input: &str, options: ScanOptions) -> Self {
        ScanState {
            input: Arc::from(input),
            cursor: 0,
            match_start: 0,
            offset: 0,
            yyleng: 0,
            yylineno: 0,
            yylloc: Location::start(options.ranges),
            condition_stack: vec![INITIAL.to_string()],
            more: false,
            backtrack: false,
            done: false,
            options,
        }
    }

    /// The input that has not been consumed yet.
    pub fn remaining(&self) -> &str {
        &self.input[self.cursor..]
    }

    /// The text of the current token.
    pub fn yytext(&self) -> &str {
        &self.input[self.match_start..self.cursor]
    }

    /// The length of the current token text in characters.
    pub fn yyleng(&self) -> usize {
        self.yyleng
    }

    /// The 0-based line number.
    pub fn yylineno(&self) -> usize {
        self.yylineno
    }

    /// The location of the current match.
    pub fn yylloc(&self) -> &Location {
        &self.yylloc
    }

    /// The number of characters consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// All text consumed so far.
    pub fn matched(&self) -> &str {
        &self.input[..self.cursor]
    }

    /// The text of the match in progress, the same text as `yytext`.
    pub fn current_match(&self) -> &str {
        self.yytext()
    }

    /// Returns true once the input is exhausted.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Returns true if the last action called `more`.
    pub fn is_more(&self) -> bool {
        self.more
    }

    /// Returns true if the last action called `reject`.
    pub fn is_rejected(&self) -> bool {
        self.backtrack
    }

    /// The scanning flags.
    pub fn options(&self) -> ScanOptions {
        self.options
    }

    /// Consumes one character and adds it to the current match.
    ///
    /// Returns `None` if the input is exhausted.
    pub fn input(&mut self) -> Option<char> {
        let ch = self.remaining().chars().next()?;
        let continues_line_break = ch == '\n' && self.matched().ends_with('\r');
        self.cursor += ch.len_utf8();
        self.yyleng += 1;
        self.offset += 1;
        if ch == '\n' || ch == '\r' {
            if !continues_line_break {
                self.yylineno += 1;
            }
            self.yylloc.last_line = self.yylineno + 1;
            self.yylloc.last_column = 0;
        } else {
            self.yylloc.last_column += 1;
        }
        if let Some((_, end)) = self.yylloc.range.as_mut() {
            *end += 1;
        }
        Some(ch)
    }

    /// Pushes `text` back onto the input.
    ///
    /// The same number of characters is removed from the end of the current token, the
    /// current match and the consumed text, and the location is moved back accordingly.
    pub fn unput(&mut self, text: &str) -> &mut Self {
        let len = char_len(text);
        let lines = split_lines(text);
        let old_lines = split_lines(self.current_match());

        let last_column = match old_lines.len().checked_sub(lines.len()) {
            Some(index) => {
                let base = if lines.len() == old_lines.len() {
                    self.yylloc.first_column
                } else {
                    0
                };
                base + char_len(old_lines[index]).saturating_sub(char_len(lines[0]))
            }
            None => self.yylloc.first_column,
        };
        let line_breaks = lines.len() - 1;

        let keep = tail_start(self.matched(), len);
        let mut input = String::with_capacity(keep + text.len() + self.remaining().len());
        input.push_str(&self.input[..keep]);
        input.push_str(text);
        input.push_str(self.remaining());
        self.input = Arc::from(input);
        self.cursor = keep;
        self.match_start = self.match_start.min(keep);
        self.offset = self.offset.saturating_sub(len);
        self.yylineno = self.yylineno.saturating_sub(line_breaks);

        self.yylloc = Location {
            first_line: self.yylloc.first_line,
            last_line: self.yylineno + 1,
            first_column: self.yylloc.first_column,
            last_column,
            range: self
                .yylloc
                .range
                .map(|(start, end)| (start, end.saturating_sub(len).max(start))),
        };
        self.yyleng = char_len(self.yytext());
        self
    }

    /// Keeps the current match text for the next match instead of replacing it.
    pub fn more(&mut self) -> &mut Self {
        self.more = true;
        self
    }

    /// Rejects the current match so that the next matching rule is tried.
    ///
    /// Only valid if the engine was compiled with `backtrack_lexer`. Otherwise a lexical error
    /// is reported through the shared context and the token returned by its error handler, if
    /// any, is returned here. The action ends with that token.
    pub fn reject(&mut self, yy: &mut SharedContext) -> Result<Option<Token>> {
        if self.options.backtrack_lexer {
            self.backtrack = true;
            return Ok(None);
        }
        let message = format!(
            "Lexical error on line {}. You can only invoke reject() in the lexer when the lexer is of the backtracking persuasion (options.backtrack_lexer = true).\n{}",
            self.yylineno + 1,
            self.show_position()
        );
        yy.parse_error(LexicalError::new(message, self.yylineno))
    }

    /// Keeps the first `n` characters of the current match and pushes the rest back.
    pub fn less(&mut self, n: usize) {
        let rest: String = self.current_match().chars().skip(n).collect();
        self.unput(&rest);
    }

    /// Renders the already consumed input before the current match.
    pub fn past_input(&self) -> String {
        let past = &self.input[..self.match_start];
        let start = tail_start(past, CONTEXT_WIDTH);
        let prefix = if start > 0 { "..." } else { "" };
        format!("{}{}", prefix, &past[start..]).replace('\n', "")
    }

    /// Renders the current match followed by the upcoming input.
    pub fn upcoming_input(&self) -> String {
        let mut next = self.current_match().to_string();
        let len = char_len(&next);
        if len < CONTEXT_WIDTH {
            next.extend(self.remaining().chars().take(CONTEXT_WIDTH - len));
        }
        let suffix = if char_len(&next) > CONTEXT_WIDTH {
            "..."
        } else {
            ""
        };
        let head: String = next.chars().take(CONTEXT_WIDTH).collect();
        format!("{}{}", head, suffix).replace('\n', "")
    }

    /// Renders the input around the current position with a marker line below it.
    pub fn show_position(&self) -> String {
        let pre = self.past_input();
        format!(
            "{}{}\n{}^",
            pre,
            self.upcoming_input(),
            "-".repeat(char_len(&pre))
        )
    }

    /// Pushes a start condition.
    pub fn begin(&mut self, condition: &str) {
        self.condition_stack.push(condition.to_string());
    }

    /// Pushes a start condition, alias of `begin`.
    pub fn push_state(&mut self, condition: &str) {
        self.begin(condition);
    }

    /// Pops the active start condition and returns it.
    ///
    /// The bottom condition is never popped, it is returned instead.
    pub fn pop_state(&mut self) -> String {
        let popped = if self.condition_stack.len() > 1 {
            self.condition_stack.pop()
        } else {
            None
        };
        popped.unwrap_or_else(|| {
            self.condition_stack
                .first()
                .cloned()
                .unwrap_or_else(|| INITIAL.to_string())
        })
    }

    /// Returns the n-th start condition counted from the top, `INITIAL` if the stack is not
    /// that deep.
    pub fn top_state(&self, n: usize) -> &str {
        self.condition_stack
            .len()
            .checked_sub(1)
            .and_then(|top| top.checked_sub(n))
            .and_then(|index| self.condition_stack.get(index))
            .map_or(INITIAL, String::as_str)
    }

    /// The number of start conditions on the stack.
    pub fn state_stack_size(&self) -> usize {
        self.condition_stack.len()
    }

    /// The start condition whose rules are active.
    pub(crate) fn active_condition(&self) -> &str {
        match self.condition_stack.last() {
            Some(condition) if !condition.is_empty() => condition.as_str(),
            _ => INITIAL,
        }
    }

    /// Starts a new match, keeping the previous text if `more` was requested.
    pub(crate) fn prepare_match(&mut self) {
        if !self.more {
            self.match_start = self.cursor;
            self.yyleng = 0;
        }
    }

    /// Marks the input as exhausted if nothing remains.
    pub(crate) fn check_exhausted(&mut self) {
        if self.remaining().is_empty() {
            self.done = true;
        }
    }

    /// Clears the exhausted flag if an action put input back.
    pub(crate) fn check_resumed(&mut self) {
        if self.done && !self.remaining().is_empty() {
            self.done = false;
        }
    }

    /// Consumes `text`, which must be a prefix of the remaining input, as the next match.
    pub(crate) fn commit(&mut self, text: &str) {
        debug_assert!(self.remaining().starts_with(text));
        let lines = split_lines(text);
        let line_breaks = lines.len() - 1;
        let len = char_len(text);

        self.yylineno += line_breaks;
        let last_column = if line_breaks > 0 {
            char_len(lines[line_breaks])
        } else {
            self.yylloc.last_column + len
        };
        self.cursor += text.len();
        self.yyleng += len;
        self.offset += len;
        self.yylloc = Location {
            first_line: self.yylloc.last_line,
            last_line: self.yylineno + 1,
            first_column: self.yylloc.last_column,
            last_column,
            range: self
                .options
                .ranges
                .then(|| (self.offset.saturating_sub(self.yyleng), self.offset)),
        };
        self.more = false;
        self.backtrack = false;
    }

    /// The error for input that no rule matches.
    pub(crate) fn unrecognized_text(&self) -> LexicalError {
        LexicalError::new(
            format!(
                "Lexical error on line {}. Unrecognized text.\n{}",
                self.yylineno + 1,
                self.show_position()
            ),
            self.yylineno,
        )
    }

    pub(crate) fn progress(&self) -> Progress {
        Progress {
            remaining: self.remaining().len(),
            offset: self.offset,
            conditions: self.condition_stack.clone(),
        }
    }
}

impl Default for ScanState {
    fn default() -> Self {
        ScanState::new("", ScanOptions::default())
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

// The byte position where the last `n` characters of `text` start, 0 if it is shorter.
fn tail_start(text: &str, n: usize) -> usize {
    text.char_indices()
        .rev()
        .take(n)
        .last()
        .map_or(text.len(), |(i, _)| i)
}

// Splits at `\r\n`, `\r` and `\n`, like the line accounting of the scanner expects.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            '\r' => {
                lines.push(&text[start..i]);
                start = i + 1;
                if chars.next_if(|(_, c)| *c == '\n').is_some() {
                    start += 1;
                }
            }
            _ => {}
        }
    }
    lines.push(&text[start..]);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges() -> ScanOptions {
        ScanOptions {
            ranges: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("abc"), vec!["abc"]);
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\nb\rc\n"), vec!["a", "b", "c", ""]);
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn test_commit_accounting() {
        let mut state = ScanState::new("ab\ncd ef", ranges());
        state.prepare_match();
        state.commit("ab\nc");
        assert_eq!(state.yylineno(), 1);
        assert_eq!(
            state.yylloc(),
            &Location {
                first_line: 1,
                last_line: 2,
                first_column: 0,
                last_column: 1,
                range: Some((0, 4)),
            }
        );
        state.prepare_match();
        state.commit("d");
        assert_eq!(
            state.yylloc(),
            &Location {
                first_line: 2,
                last_line: 2,
                first_column: 1,
                last_column: 2,
                range: Some((4, 5)),
            }
        );
        assert_eq!(state.yytext(), "d");
        assert_eq!(state.matched(), "ab\ncd");
        assert_eq!(state.remaining(), " ef");
        assert_eq!(state.offset(), 5);
    }

    #[test]
    fn test_more_accumulates() {
        let mut state = ScanState::new("abcd", ranges());
        state.prepare_match();
        state.commit("ab");
        state.more();
        state.prepare_match();
        state.commit("cd");
        assert_eq!(state.yytext(), "abcd");
        assert_eq!(state.yyleng(), 4);
        assert_eq!(state.yylloc().range, Some((0, 4)));
        assert!(!state.is_more());
    }

    #[test]
    fn test_input() {
        let mut state = ScanState::new("a\r\nb", ranges());
        state.prepare_match();
        assert_eq!(state.input(), Some('a'));
        assert_eq!(state.input(), Some('\r'));
        assert_eq!(state.input(), Some('\n'));
        assert_eq!(state.yylineno(), 1);
        assert_eq!(state.yylloc().last_line, 2);
        assert_eq!(state.yylloc().last_column, 0);
        assert_eq!(state.input(), Some('b'));
        assert_eq!(state.yylloc().last_column, 1);
        assert_eq!(state.yytext(), "a\r\nb");
        assert_eq!(state.yyleng(), 4);
        assert_eq!(state.yylloc().range, Some((0, 4)));
        assert_eq!(state.input(), None);
    }

    #[test]
    fn test_unput_reverses_commit() {
        let mut state = ScanState::new("abc\ndef", ranges());
        state.prepare_match();
        state.commit("abc\nde");
        assert_eq!(state.yylloc().last_column, 2);
        state.unput("c\nde");
        assert_eq!(state.yytext(), "ab");
        assert_eq!(state.yyleng(), 2);
        assert_eq!(state.current_match(), "ab");
        assert_eq!(state.matched(), "ab");
        assert_eq!(state.remaining(), "c\ndef");
        assert_eq!(state.offset(), 2);
        assert_eq!(state.yylineno(), 0);
        assert_eq!(
            state.yylloc(),
            &Location {
                first_line: 1,
                last_line: 1,
                first_column: 0,
                last_column: 2,
                range: Some((0, 2)),
            }
        );
    }

    #[test]
    fn test_less() {
        let mut state = ScanState::new("abcdef", ScanOptions::default());
        state.prepare_match();
        state.commit("ab");
        state.prepare_match();
        state.commit("cde");
        state.less(1);
        assert_eq!(state.yytext(), "c");
        assert_eq!(state.remaining(), "def");
        assert_eq!(state.yylloc().first_column, 2);
        assert_eq!(state.yylloc().last_column, 3);
        assert_eq!(state.offset(), 3);
    }

    #[test]
    fn test_condition_stack() {
        let mut state = ScanState::default();
        assert_eq!(state.state_stack_size(), 1);
        assert_eq!(state.top_state(0), INITIAL);
        state.begin("STR");
        state.push_state("ESC");
        assert_eq!(state.state_stack_size(), 3);
        assert_eq!(state.top_state(0), "ESC");
        assert_eq!(state.top_state(1), "STR");
        assert_eq!(state.top_state(2), INITIAL);
        assert_eq!(state.top_state(5), INITIAL);
        assert_eq!(state.top_state(usize::MAX), INITIAL);
        assert_eq!(state.active_condition(), "ESC");
        assert_eq!(state.pop_state(), "ESC");
        assert_eq!(state.pop_state(), "STR");
        assert_eq!(state.pop_state(), INITIAL);
        assert_eq!(state.pop_state(), INITIAL);
        assert_eq!(state.state_stack_size(), 1);
        state.begin("");
        assert_eq!(state.active_condition(), INITIAL);
    }

    #[test]
    fn test_diagnostics() {
        let input = "0123456789012345678901234\nabc";
        let mut state = ScanState::new(input, ScanOptions::default());
        state.prepare_match();
        state.commit("0123456789012345678901234\n");
        state.prepare_match();
        state.commit("a");
        assert_eq!(state.past_input(), "...6789012345678901234");
        assert_eq!(state.upcoming_input(), "abc");
        assert_eq!(
            state.show_position(),
            format!("...6789012345678901234abc\n{}^", "-".repeat(22))
        );
    }

    #[test]
    fn test_upcoming_input_truncated() {
        let state = ScanState::new("abcdefghijklmnopqrstuvwxyz", ScanOptions::default());
        assert_eq!(state.past_input(), "");
        assert_eq!(state.upcoming_input(), "abcdefghijklmnopqrst");
        let mut state = state;
        state.prepare_match();
        state.commit("abcdefghijklmnopqrstuvwxy");
        assert_eq!(state.upcoming_input(), "abcdefghijklmnopqrst...");
    }

    #[test]
    fn test_reject_without_backtracking() {
        let mut state = ScanState::new("a", ScanOptions::default());
        let mut yy = SharedContext::new();
        let error = state.reject(&mut yy).unwrap_err();
        let lexical = error.as_lexical_error().unwrap();
        assert!(lexical.message.starts_with("Lexical error on line 1. You can only invoke reject()"));
        assert_eq!(lexical.line, 0);
        assert_eq!(lexical.text, "");
        assert_eq!(lexical.token, None);
    }

    #[test]
    fn test_reject_with_backtracking() {
        let mut state = ScanState::new(
            "a",
            ScanOptions {
                backtrack_lexer: true,
                ..Default::default()
            },
        );
        let mut yy = SharedContext::new();
        assert_eq!(state.reject(&mut yy).unwrap(), None);
        assert!(state.is_rejected());
    }

    #[test]
    fn test_reject_token_from_error_handler() {
        let mut state = ScanState::new("a", ScanOptions::default());
        let mut yy = SharedContext::with_error_handler(|_: LexicalError| -> Result<Option<Token>> {
            Ok(Some(Token::name("REJECTED")))
        });
        assert_eq!(state.reject(&mut yy).unwrap(), Some(Token::name("REJECTED")));
        assert!(!state.is_rejected());
    }

    #[test]
    fn test_snapshot_shares_input() {
        let mut state = ScanState::new("abc\ndef", ScanOptions::default());
        state.prepare_match();
        state.commit("abc");
        let snapshot = state.clone();
        assert!(Arc::ptr_eq(&state.input, &snapshot.input));
        state.prepare_match();
        state.commit("\nd");
        assert_eq!(snapshot.matched(), "abc");
        assert_eq!(snapshot.remaining(), "\ndef");
        state = snapshot;
        assert_eq!(state.yytext(), "abc");
        assert_eq!(state.offset(), 3);
        assert_eq!(state.yylineno(), 0);
    }

    #[test]
    fn test_unput_longer_than_match() {
        let mut state = ScanState::new("abcd", ScanOptions::default());
        state.prepare_match();
        state.commit("ab");
        state.prepare_match();
        state.commit("c");
        state.unput("xy");
        assert_eq!(state.yytext(), "");
        assert_eq!(state.yyleng(), 0);
        assert_eq!(state.matched(), "a");
        assert_eq!(state.remaining(), "xyd");
        assert_eq!(state.offset(), 1);
    }
}
