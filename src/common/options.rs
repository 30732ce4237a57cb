use log::warn;

/// The behavioral flags of a compiled engine that matter while scanning.
///
/// All fields are plain booleans so that emitted code can write the value as a constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScanOptions {
    /// Track the character range of each match in `Location::range`.
    pub ranges: bool,
    /// Try every active rule and take the longest match, and add a catch-all rule.
    pub flex: bool,
    /// Allow actions to call `reject()` so that the next matching rule is tried.
    pub backtrack_lexer: bool,
    /// Match patterns without regard to letter case.
    pub case_insensitive: bool,
}

/// The wrapping applied by the module emitter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ModuleType {
    /// The engine data expression alone.
    Bare,
    /// A named static holding the engine data.
    #[default]
    Named,
    /// A module exporting the engine data, a constructor and a `lex` entry point.
    Module,
    /// A factory function building the engine plus a `lex` entry point.
    Factory,
}

impl ModuleType {
    /// Interprets the value of the `moduleType` option.
    pub fn from_option(value: &str) -> Self {
        match value {
            "bare" => ModuleType::Bare,
            "commonjs" | "module" => ModuleType::Module,
            "amd" | "factory" => ModuleType::Factory,
            _ => ModuleType::Named,
        }
    }
}

/// The option set of a rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Flags that are carried into the compiled engine.
    pub scan: ScanOptions,
    /// The wrapping used by the emitter.
    pub module_type: ModuleType,
    /// The name used by the emitter, `lexer` if not given.
    pub module_name: Option<String>,
}

impl Options {
    /// The module name used when none is configured.
    pub const DEFAULT_MODULE_NAME: &'static str = "lexer";

    /// Creates the default option set.
    pub fn new() -> Self {
        Options::default()
    }

    /// Sets an option by its name as it appears in a rule definition.
    ///
    /// Boolean options accept `true`/`false`, `1`/`0` or an empty value meaning `true`.
    /// Unknown options are ignored with a warning.
    pub fn set(&mut self, name: &str, value: &str) -> &mut Self {
        let flag = matches!(value.trim(), "" | "true" | "1");
        match name {
            "ranges" => self.scan.ranges = flag,
            "flex" => self.scan.flex = flag,
            "backtrack_lexer" => self.scan.backtrack_lexer = flag,
            "case-insensitive" => self.scan.case_insensitive = flag,
            "moduleType" => self.module_type = ModuleType::from_option(value.trim()),
            "moduleName" => self.module_name = Some(value.trim().to_string()),
            _ => warn!("Ignoring unknown option '{}'", name),
        }
        self
    }

    /// The configured module name or the default one.
    pub fn module_name(&self) -> &str {
        self.module_name
            .as_deref()
            .unwrap_or(Self::DEFAULT_MODULE_NAME)
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Options {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut options = Options::new();
        for (name, value) in iter {
            options.set(name, value);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_pairs() {
        let options: Options = [
            ("ranges", "true"),
            ("flex", ""),
            ("backtrack_lexer", "false"),
            ("case-insensitive", "1"),
            ("moduleType", "commonjs"),
            ("moduleName", "calc"),
            ("no-such-option", "true"),
        ]
        .into_iter()
        .collect();
        assert!(options.scan.ranges);
        assert!(options.scan.flex);
        assert!(!options.scan.backtrack_lexer);
        assert!(options.scan.case_insensitive);
        assert_eq!(options.module_type, ModuleType::Module);
        assert_eq!(options.module_name(), "calc");
    }

    #[test]
    fn test_module_type_values() {
        assert_eq!(ModuleType::from_option("bare"), ModuleType::Bare);
        assert_eq!(ModuleType::from_option("amd"), ModuleType::Factory);
        assert_eq!(ModuleType::from_option("js"), ModuleType::Named);
        assert_eq!(Options::new().module_name(), "lexer");
    }
}
