//! The structured input of the rule compiler.
//! A rule set is what a rule-definition parser produces: ordered rules, macros, start
//! condition declarations and options.

use std::collections::BTreeMap;

use crate::Options;

/// The start conditions a rule is scoped to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    /// No explicit scope, the rule is active in every inclusive start condition.
    #[default]
    Implicit,
    /// The wildcard scope `*`, the rule is active in every start condition.
    All,
    /// The rule is active in exactly the named start conditions.
    Conditions(Vec<String>),
}

impl Scope {
    /// Creates a scope from condition names, mapping a leading `*` to the wildcard scope.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        match names.first().map(String::as_str) {
            None => Scope::Implicit,
            Some("*") => Scope::All,
            Some(_) => Scope::Conditions(names),
        }
    }
}

/// The pattern of a rule.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Pattern text that may contain `{macro}` references.
    Source(String),
    /// A matcher supplied programmatically. It is used as is, without macro expansion,
    /// anchoring or case folding. Only matches starting at the cursor are accepted. The
    /// emitter writes its pattern text, so flags set through a `RegexBuilder` don't survive
    /// emission while inline flags do.
    Compiled(regex::Regex),
}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Pattern::Source(source.to_string())
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Pattern::Source(source)
    }
}

impl From<regex::Regex> for Pattern {
    fn from(regex: regex::Regex) -> Self {
        Pattern::Compiled(regex)
    }
}

/// A pattern/action rule.
#[derive(Debug, Clone)]
pub struct Rule {
    /// The start conditions the rule participates in.
    pub scope: Scope,
    /// The pattern to match.
    pub pattern: Pattern,
    /// The action text executed when the rule wins.
    pub action: String,
}

impl Rule {
    /// Creates an implicitly scoped rule.
    pub fn new<P: Into<Pattern>, A: Into<String>>(pattern: P, action: A) -> Self {
        Rule {
            scope: Scope::Implicit,
            pattern: pattern.into(),
            action: action.into(),
        }
    }

    /// Creates a rule scoped to the given start conditions.
    pub fn scoped<I, S, P, A>(conditions: I, pattern: P, action: A) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        P: Into<Pattern>,
        A: Into<String>,
    {
        Rule {
            scope: Scope::from_names(conditions),
            pattern: pattern.into(),
            action: action.into(),
        }
    }
}

/// A complete rule set.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    /// The rules in declaration order.
    pub rules: Vec<Rule>,
    /// The macros by name.
    pub macros: BTreeMap<String, String>,
    /// The declared start conditions by name, the value is true for exclusive conditions.
    pub start_conditions: BTreeMap<String, bool>,
    /// The options.
    pub options: Options,
    /// Text appended verbatim after the emitted engine.
    pub module_include: String,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        RuleSet::default()
    }

    /// Appends a rule.
    pub fn add_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends rules.
    pub fn add_rules<I: IntoIterator<Item = Rule>>(mut self, rules: I) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Defines a macro.
    pub fn add_macro<N: Into<String>, F: Into<String>>(mut self, name: N, fragment: F) -> Self {
        self.macros.insert(name.into(), fragment.into());
        self
    }

    /// Declares a start condition.
    pub fn add_start_condition<N: Into<String>>(mut self, name: N, exclusive: bool) -> Self {
        self.start_conditions.insert(name.into(), exclusive);
        self
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Sets the module include text.
    pub fn with_module_include<S: Into<String>>(mut self, include: S) -> Self {
        self.module_include = include.into();
        self
    }
}
