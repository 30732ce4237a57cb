//! This module contains the module emitter.
//! The emitter writes the data of a compiled engine as Rust source in one of the wrappings of
//! [`ModuleType`]. Every wrapping contains the same `EngineData` expression, the generated code
//! turns it back into an engine with `CompiledEngine::try_from`.

use std::time::Instant;

use itertools::Itertools;
use log::trace;

use crate::{CompiledEngine, ModuleType, Result};

const INDENT: &str = "    ";

/// Generate the source of a compiled engine.
/// The wrapping and the names are taken from the options the engine was compiled with.
/// # Arguments
/// * `engine` - The compiled engine.
/// * `output` - The writer that receives the source.
/// # Errors
/// An error is returned if writing to `output` fails.
pub fn generate_code(engine: &CompiledEngine, output: &mut dyn std::io::Write) -> Result<()> {
    let now = Instant::now();

    writeln!(
        output,
        "// Generated by scanlex {}",
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(output)?;

    let name = identifier(engine.module_name());
    match engine.module_type() {
        ModuleType::Bare => {
            generate_engine_data(engine, "", output)?;
            writeln!(output)?;
        }
        ModuleType::Named => {
            writeln!(output, "use scanlex::{{EngineData, ScanOptions}};")?;
            writeln!(output)?;
            write!(
                output,
                "pub static {}: EngineData<'static> = ",
                name.to_uppercase()
            )?;
            generate_engine_data(engine, "", output)?;
            writeln!(output, ";")?;
        }
        ModuleType::Module => {
            writeln!(output, "pub mod {} {{", name)?;
            writeln!(
                output,
                "{INDENT}use scanlex::{{CompiledEngine, EngineData, Lexer, ScanOptions, Token}};"
            )?;
            writeln!(output)?;
            write!(output, "{INDENT}pub static ENGINE: EngineData<'static> = ")?;
            generate_engine_data(engine, INDENT, output)?;
            writeln!(output, ";")?;
            writeln!(output)?;
            writeln!(
                output,
                "{INDENT}pub fn lexer() -> scanlex::Result<CompiledEngine> {{"
            )?;
            writeln!(output, "{INDENT}{INDENT}CompiledEngine::try_from(&ENGINE)")?;
            writeln!(output, "{INDENT}}}")?;
            writeln!(output)?;
            generate_lex_function("lexer", INDENT, output)?;
            writeln!(output, "}}")?;
        }
        ModuleType::Factory => {
            writeln!(
                output,
                "use scanlex::{{CompiledEngine, EngineData, Lexer, ScanOptions, Token}};"
            )?;
            writeln!(output)?;
            writeln!(
                output,
                "pub fn {}() -> scanlex::Result<CompiledEngine> {{",
                name
            )?;
            write!(output, "{INDENT}static ENGINE: EngineData<'static> = ")?;
            generate_engine_data(engine, INDENT, output)?;
            writeln!(output, ";")?;
            writeln!(output, "{INDENT}CompiledEngine::try_from(&ENGINE)")?;
            writeln!(output, "}}")?;
            writeln!(output)?;
            generate_lex_function(&name, "", output)?;
        }
    }

    if !engine.module_include().is_empty() {
        writeln!(output)?;
        writeln!(output, "{}", engine.module_include())?;
    }

    trace!(
        "Code generation took {} microseconds.",
        now.elapsed().as_micros()
    );
    Ok(())
}

// Writes the `EngineData` expression. The first line is not indented, the closing brace is not
// followed by a line break.
fn generate_engine_data(
    engine: &CompiledEngine,
    indent: &str,
    output: &mut dyn std::io::Write,
) -> Result<()> {
    writeln!(output, "EngineData {{")?;
    writeln!(output, "{indent}{INDENT}rules: &[")?;
    for (index, (rule, action)) in engine
        .rules()
        .iter()
        .zip(engine.action_texts())
        .enumerate()
    {
        writeln!(
            output,
            "{indent}{INDENT}{INDENT}/* {} */ ({:?}, {:?}),",
            index,
            rule.pattern(),
            action
        )?;
    }
    writeln!(output, "{indent}{INDENT}],")?;
    writeln!(output, "{indent}{INDENT}conditions: &[")?;
    for (name, inclusive, rules) in engine.condition_rows() {
        writeln!(
            output,
            "{indent}{INDENT}{INDENT}({:?}, {}, &[{}]),",
            name,
            inclusive,
            rules.iter().join(", ")
        )?;
    }
    writeln!(output, "{indent}{INDENT}],")?;
    let options = engine.options();
    writeln!(output, "{indent}{INDENT}options: ScanOptions {{")?;
    writeln!(output, "{indent}{INDENT}{INDENT}ranges: {},", options.ranges)?;
    writeln!(output, "{indent}{INDENT}{INDENT}flex: {},", options.flex)?;
    writeln!(
        output,
        "{indent}{INDENT}{INDENT}backtrack_lexer: {},",
        options.backtrack_lexer
    )?;
    writeln!(
        output,
        "{indent}{INDENT}{INDENT}case_insensitive: {},",
        options.case_insensitive
    )?;
    writeln!(output, "{indent}{INDENT}}},")?;
    write!(output, "{indent}}}")?;
    Ok(())
}

// Writes the `lex` entry point that collects all tokens of an input.
fn generate_lex_function(
    constructor: &str,
    indent: &str,
    output: &mut dyn std::io::Write,
) -> Result<()> {
    writeln!(
        output,
        "{indent}pub fn lex(input: &str) -> scanlex::Result<Vec<Token>> {{"
    )?;
    writeln!(output, "{indent}{INDENT}let engine = {}()?;", constructor)?;
    writeln!(output, "{indent}{INDENT}let mut scanner = engine.scanner(input);")?;
    writeln!(output, "{indent}{INDENT}let mut tokens = Vec::new();")?;
    writeln!(output, "{indent}{INDENT}loop {{")?;
    writeln!(output, "{indent}{INDENT}{INDENT}let token = scanner.lex()?;")?;
    writeln!(output, "{indent}{INDENT}{INDENT}if token.is_eof() {{")?;
    writeln!(output, "{indent}{INDENT}{INDENT}{INDENT}return Ok(tokens);")?;
    writeln!(output, "{indent}{INDENT}{INDENT}}}")?;
    writeln!(output, "{indent}{INDENT}{INDENT}tokens.push(token);")?;
    writeln!(output, "{indent}{INDENT}}}")?;
    writeln!(output, "{indent}}}")?;
    Ok(())
}

// Words that can't be used as identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try",
    "type", "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

// Turns a module name into a valid identifier.
fn identifier(name: &str) -> String {
    let mut identifier: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if identifier.is_empty() {
        identifier.push('_');
    }
    if identifier == "_"
        || identifier.starts_with(|c: char| c.is_ascii_digit())
        || KEYWORDS.contains(&identifier.as_str())
    {
        identifier.insert(0, '_');
    }
    identifier
}
