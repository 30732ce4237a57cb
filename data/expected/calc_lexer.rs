// Generated by scanlex 0.1.0

pub mod calc {
    use scanlex::{CompiledEngine, EngineData, Lexer, ScanOptions, Token};

    pub static ENGINE: EngineData<'static> = EngineData {
        rules: &[
            /* 0 */ ("\\s+", ""),
            /* 1 */ ("([0-9])+", "return 'NUMBER';"),
            /* 2 */ ("\"", "this.begin('STR'); return 'QUOTE';"),
            /* 3 */ ("[^\"]+", "return 'CHARS';"),
            /* 4 */ ("\"", "this.popState(); return 'QUOTE';"),
            /* 5 */ ("\\+", "return 'PLUS';"),
            /* 6 */ ("$", "return 'EOF';"),
        ],
        conditions: &[
            ("INITIAL", true, &[0, 1, 2, 5, 6]),
            ("STR", false, &[3, 4]),
        ],
        options: ScanOptions {
            ranges: false,
            flex: false,
            backtrack_lexer: false,
            case_insensitive: false,
        },
    };

    pub fn lexer() -> scanlex::Result<CompiledEngine> {
        CompiledEngine::try_from(&ENGINE)
    }

    pub fn lex(input: &str) -> scanlex::Result<Vec<Token>> {
        let engine = lexer()?;
        let mut scanner = engine.scanner(input);
        let mut tokens = Vec::new();
        loop {
            let token = scanner.lex()?;
            if token.is_eof() {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }
}

// end of calc lexer
