//! This module contains the parser for rule actions.
//! An action is reduced to its bare statement body and every statement is translated into a
//! [`Command`]. Statements outside the supported instruction set are rejected.

use crate::{unsupported, Action, Command, Result, Token, TokenTable};

/// Parses the action text of a rule.
///
/// The body of a `function name() { ... }` or `{ ... }` wrapper is used if the action has one.
/// Statements are separated by `;` or line breaks, `//` and `/* */` comments are ignored.
/// Quoted token names in `return` statements are resolved through the token table if one is
/// given.
/// # Errors
/// `UnsupportedAction` for a statement that is not part of the instruction set.
pub fn parse_action(rule: usize, text: &str, tokens: Option<&TokenTable>) -> Result<Action> {
    let body = strip_wrappers(text);
    let commands = split_statements(body)
        .iter()
        .map(|statement| parse_statement(rule, statement, tokens))
        .collect::<Result<Vec<_>>>()?;
    Ok(Action::new(commands))
}

// Removes function and block wrappers around the statement body.
fn strip_wrappers(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("function") {
        if let Some(open) = rest.find('{') {
            if rest[..open].trim_end().ends_with(')') {
                body = rest[open..].trim();
            }
        }
    }
    while body.starts_with('{') && closing_brace(body) == Some(body.len() - 1) {
        body = body[1..body.len() - 1].trim();
    }
    body
}

// Finds the brace that closes the one at the start of `text`, skipping quoted text.
fn closing_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote = None;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

// Splits the body into trimmed, non-empty statements and drops comments.
fn split_statements(body: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote = None;
    let mut escaped = false;
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => {
                quote = Some(c);
                current.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                while chars.next_if(|c| *c != '\n').is_some() {}
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut last = ' ';
                for c in chars.by_ref() {
                    if last == '*' && c == '/' {
                        break;
                    }
                    last = c;
                }
            }
            ';' | '\n' | '\r' => statements.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    statements.push(current);
    statements
        .into_iter()
        .map(|statement| statement.trim().to_string())
        .filter(|statement| !statement.is_empty())
        .collect()
}

fn parse_statement(rule: usize, statement: &str, tokens: Option<&TokenTable>) -> Result<Command> {
    if statement == "ECHO" || without_whitespace(statement) == "console.log(yytext)" {
        return Ok(Command::Echo);
    }
    if let Some(rest) = statement.strip_prefix("return") {
        if rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
            return parse_return(rule, statement, rest.trim(), tokens);
        }
    }

    let call = statement.strip_prefix("this.").unwrap_or(statement);
    let (name, args) = match (call.find('('), call.strip_suffix(')')) {
        (Some(open), Some(call)) => (call[..open].trim(), call[open + 1..].trim()),
        _ => return Err(unsupported!(rule, statement, "not a supported statement")),
    };
    match name {
        "begin" | "pushState" => parse_string(args)
            .map(Command::Begin)
            .ok_or_else(|| unsupported!(rule, statement, "expected a quoted start condition")),
        "unput" => parse_string(args)
            .map(Command::Unput)
            .ok_or_else(|| unsupported!(rule, statement, "expected a quoted text")),
        "less" => args
            .parse::<usize>()
            .map(Command::Less)
            .map_err(|_| unsupported!(rule, statement, "expected a character count")),
        "popState" | "more" | "reject" | "input" if !args.is_empty() => {
            Err(unsupported!(rule, statement, "unexpected arguments"))
        }
        "popState" => Ok(Command::PopState),
        "more" => Ok(Command::More),
        "reject" => Ok(Command::Reject),
        "input" => Ok(Command::Input),
        _ => Err(unsupported!(rule, statement, "unknown function")),
    }
}

fn parse_return(
    rule: usize,
    statement: &str,
    value: &str,
    tokens: Option<&TokenTable>,
) -> Result<Command> {
    if value.is_empty() {
        return Ok(Command::Skip);
    }
    if value == "EOF" || value == "this.EOF" {
        return Ok(Command::Return(Token::Eof));
    }
    if let Some(name) = parse_string(value) {
        let token = match tokens {
            Some(tokens) => tokens.resolve(&name),
            None => Token::Name(name),
        };
        return Ok(Command::Return(token));
    }
    value
        .parse::<usize>()
        .map(|code| Command::Return(Token::Code(code)))
        .map_err(|_| unsupported!(rule, statement, "expected a token name or code"))
}

// Parses a complete single or double quoted string literal.
fn parse_string(text: &str) -> Option<String> {
    let mut chars = text.chars();
    let quote = chars.next().filter(|c| *c == '\'' || *c == '"')?;
    let mut value = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => value.push(match chars.next()? {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                other => other,
            }),
            c if c == quote => return chars.as_str().is_empty().then_some(value),
            c => value.push(c),
        }
    }
    None
}

fn without_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
