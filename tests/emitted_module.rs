//! Scans with the engine emitted into `data/expected/calc_lexer.rs` and compares the result with
//! the engine compiled from the same rule set.

use scanlex::{compile, CompiledEngine, Lexer, Location, Options, Rule, RuleSet, Token};

include!("../data/expected/calc_lexer.rs");

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn calc_rule_set() -> RuleSet {
    let options: Options = [("moduleType", "commonjs"), ("moduleName", "calc")]
        .into_iter()
        .collect();
    RuleSet::new()
        .add_macro("digit", "[0-9]")
        .add_start_condition("STR", true)
        .add_rule(Rule::new("\\s+", ""))
        .add_rule(Rule::new("{digit}+", "return 'NUMBER'"))
        .add_rule(Rule::new("\"", "this.begin('STR'); return 'QUOTE';"))
        .add_rule(Rule::scoped(["STR"], "[^\"]+", "return 'CHARS'"))
        .add_rule(Rule::scoped(["STR"], "\"", "this.popState(); return 'QUOTE'"))
        .add_rule(Rule::new("\\+", "return 'PLUS'"))
        .add_rule(Rule::new("$", "return 'EOF'"))
        .with_options(options)
        .with_module_include("// end of calc lexer")
}

fn scan(engine: &CompiledEngine, input: &str) -> Vec<(Token, String, Location)> {
    let mut scanner = engine.scanner(input);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.lex().unwrap();
        if token.is_eof() {
            break;
        }
        tokens.push((token, scanner.yytext().to_string(), *scanner.yylloc()));
    }
    tokens
}

#[test]
fn emitted_engine_matches_compiled_engine() {
    init();
    let compiled = compile(&calc_rule_set(), None).unwrap();
    let emitted = calc::lexer().unwrap();
    for input in ["", "1 + 2", "12 +\n\"a b\"+ 345", "\"\n\"\n1"] {
        assert_eq!(scan(&compiled, input), scan(&emitted, input), "{:?}", input);
    }
}

#[test]
fn emitted_lex_entry_point() {
    init();
    assert_eq!(
        calc::lex("1 + \"x\"").unwrap(),
        ["NUMBER", "PLUS", "QUOTE", "CHARS", "QUOTE", "EOF"].map(Token::name)
    );
    let error = calc::lex("1 ?").unwrap_err();
    assert_eq!(error.as_lexical_error().map(|e| e.line), Some(0));
}
