//! The compiled engine: rules with their matchers, the start condition table and the dispatch
//! routine. The engine is immutable and can be shared by any number of scanners.

use std::collections::BTreeMap;

use log::debug;
use regex::{Regex, RegexBuilder};

use crate::{
    compiletime::parse_action, Action, ActionTable, Command, Dispatch, EngineData,
    ModuleType, Result, RuleId, ScanLexError, ScanLexErrorKind, ScanOptions, Scanner, INITIAL,
};

/// A rule whose pattern has been resolved to a matcher.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// The pattern text after macro expansion, without the anchor.
    pub(crate) pattern: String,
    /// The matcher, anchored at the start of the remaining input.
    pub(crate) regex: Regex,
}

impl CompiledRule {
    /// Builds the anchored matcher for an expanded pattern.
    pub fn new(pattern: &str, case_insensitive: bool) -> Result<Self> {
        let regex = RegexBuilder::new(&format!("^(?:{})", pattern))
            .case_insensitive(case_insensitive)
            .build()?;
        Ok(CompiledRule {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Uses a matcher as it is.
    ///
    /// The pattern text is what the emitter writes and what [`CompiledRule::new`] rebuilds on
    /// load. In a case-insensitive engine it turns case folding off again, so the rebuilt
    /// matcher behaves like the given one. Flags set through a `RegexBuilder` are not part of
    /// the pattern text and are lost on load, inline flags like `(?s)` are kept.
    pub fn from_regex(regex: Regex, case_insensitive: bool) -> Self {
        let pattern = if case_insensitive {
            format!("(?-i:{})", regex.as_str())
        } else {
            regex.as_str().to_string()
        };
        CompiledRule { pattern, regex }
    }

    /// The pattern text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the length in bytes of the match at the start of `input`.
    #[inline]
    pub fn match_len(&self, input: &str) -> Option<usize> {
        self.regex
            .find(input)
            .filter(|m| m.start() == 0)
            .map(|m| m.end())
    }
}

/// A start condition with the rules active under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartCondition {
    /// The active rules in activation order.
    pub rules: Vec<RuleId>,
    /// Inclusive conditions also get the rules without explicit scope.
    pub inclusive: bool,
}

impl StartCondition {
    /// Creates a condition without rules.
    pub fn new(inclusive: bool) -> Self {
        StartCondition {
            rules: Vec::new(),
            inclusive,
        }
    }
}

/// The result of the rule compiler.
#[derive(Debug, Clone)]
pub struct CompiledEngine {
    rules: Vec<CompiledRule>,
    conditions: BTreeMap<String, StartCondition>,
    actions: ActionTable,
    options: ScanOptions,
    module_type: ModuleType,
    module_name: String,
    module_include: String,
}

impl CompiledEngine {
    /// Assembles an engine.
    ///
    /// Fails with `UnknownStartCondition` if an action begins a condition that is not part of
    /// the condition table.
    pub fn new(
        rules: Vec<CompiledRule>,
        conditions: BTreeMap<String, StartCondition>,
        actions: ActionTable,
        options: ScanOptions,
    ) -> Result<Self> {
        for command in actions.iter().flat_map(Action::commands) {
            if let Command::Begin(condition) = command {
                if !conditions.contains_key(condition) {
                    return Err(ScanLexError::new(ScanLexErrorKind::UnknownStartCondition(
                        condition.clone(),
                    )));
                }
            }
        }
        debug!(
            "Engine with {} rules in {} start conditions",
            rules.len(),
            conditions.len()
        );
        Ok(CompiledEngine {
            rules,
            conditions,
            actions,
            options,
            module_type: ModuleType::default(),
            module_name: crate::Options::DEFAULT_MODULE_NAME.to_string(),
            module_include: String::new(),
        })
    }

    /// Sets what the emitter needs to wrap the engine.
    pub fn with_module(
        mut self,
        module_type: ModuleType,
        module_name: &str,
        module_include: &str,
    ) -> Self {
        self.module_type = module_type;
        self.module_name = module_name.to_string();
        self.module_include = module_include.to_string();
        self
    }

    /// The compiled rules in declaration order.
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// The start condition table.
    pub fn conditions(&self) -> &BTreeMap<String, StartCondition> {
        &self.conditions
    }

    /// The dispatch routine built from the rule actions.
    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    /// The scanning flags.
    pub fn options(&self) -> ScanOptions {
        self.options
    }

    /// The emitter wrapping.
    pub fn module_type(&self) -> ModuleType {
        self.module_type
    }

    /// The name used by the emitter.
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// The text appended after the emitted engine.
    pub fn module_include(&self) -> &str {
        &self.module_include
    }

    /// The rules active under a start condition.
    pub fn current_rules(&self, condition: &str) -> Result<&[RuleId]> {
        self.conditions
            .get(condition)
            .map(|condition| condition.rules.as_slice())
            .ok_or_else(|| {
                ScanLexError::new(ScanLexErrorKind::UnknownStartCondition(
                    condition.to_string(),
                ))
            })
    }

    /// Returns the length in bytes of the match of `rule` at the start of `input`.
    #[inline]
    pub fn match_len(&self, rule: RuleId, input: &str) -> Option<usize> {
        self.rules
            .get(rule.as_usize())
            .and_then(|compiled| compiled.match_len(input))
    }

    /// Creates a scanner over `input` that executes the compiled actions.
    pub fn scanner(&self, input: &str) -> Scanner<'_> {
        Scanner::new(self, &self.actions, input)
    }

    /// Creates a scanner over `input` that executes the given dispatch routine instead of the
    /// compiled actions.
    pub fn scanner_with_dispatch<'e, D: Dispatch + ?Sized>(
        &'e self,
        dispatch: &'e D,
        input: &str,
    ) -> Scanner<'e, D> {
        Scanner::new(self, dispatch, input)
    }

    /// The canonical action texts in rule order.
    pub fn action_texts(&self) -> Vec<String> {
        self.actions.iter().map(ToString::to_string).collect()
    }

    /// The condition table as `(name, inclusive, rule indices)`.
    pub fn condition_rows(&self) -> Vec<(&str, bool, Vec<usize>)> {
        self.conditions
            .iter()
            .map(|(name, condition)| {
                (
                    name.as_str(),
                    condition.inclusive,
                    condition.rules.iter().map(RuleId::as_usize).collect(),
                )
            })
            .collect()
    }
}

/// Loads an engine from the data written by the emitter.
///
/// The patterns are anchored again and the canonical action texts are parsed again. The
/// condition table is taken as it is, so a catch-all rule added by the `flex` option is not
/// appended a second time.
impl TryFrom<&EngineData<'_>> for CompiledEngine {
    type Error = ScanLexError;

    fn try_from(data: &EngineData<'_>) -> Result<Self> {
        let rules = data
            .rules
            .iter()
            .map(|(pattern, _)| CompiledRule::new(pattern, data.options.case_insensitive))
            .collect::<Result<Vec<_>>>()?;
        let actions = data
            .rules
            .iter()
            .enumerate()
            .map(|(index, (_, action))| parse_action(index, action, None))
            .collect::<Result<Vec<_>>>()?;
        let mut conditions = data
            .conditions
            .iter()
            .map(|(name, inclusive, rules)| {
                (
                    name.to_string(),
                    StartCondition {
                        rules: rules.iter().copied().map(RuleId::new).collect(),
                        inclusive: *inclusive,
                    },
                )
            })
            .collect::<BTreeMap<_, _>>();
        conditions
            .entry(INITIAL.to_string())
            .or_insert_with(|| StartCondition::new(true));
        CompiledEngine::new(rules, conditions, ActionTable::new(actions), data.options)
    }
}

impl TryFrom<EngineData<'_>> for CompiledEngine {
    type Error = ScanLexError;

    fn try_from(data: EngineData<'_>) -> Result<Self> {
        CompiledEngine::try_from(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_engine_is_send_and_sync() {
        assert_send_sync::<CompiledEngine>();
    }

    #[test]
    fn test_anchored_match() {
        let rule = CompiledRule::new("[0-9]+", false).unwrap();
        assert_eq!(rule.match_len("123abc"), Some(3));
        assert_eq!(rule.match_len("abc123"), None);
        let rule = CompiledRule::new("a|ab", false).unwrap();
        assert_eq!(rule.match_len("abc"), Some(1));
        let rule = CompiledRule::new("abc", true).unwrap();
        assert_eq!(rule.match_len("ABC"), Some(3));
    }

    #[test]
    fn test_unanchored_regex_matches_only_at_start() {
        let rule = CompiledRule::from_regex(Regex::new("[a-z]+").unwrap(), false);
        assert_eq!(rule.pattern(), "[a-z]+");
        assert_eq!(rule.match_len("abc1"), Some(3));
        assert_eq!(rule.match_len("1abc"), None);
    }

    #[test]
    fn test_given_regex_keeps_case_after_rebuild() {
        let rule = CompiledRule::from_regex(Regex::new("abc").unwrap(), true);
        assert_eq!(rule.pattern(), "(?-i:abc)");
        assert_eq!(rule.match_len("ABC"), None);
        let rebuilt = CompiledRule::new(rule.pattern(), true).unwrap();
        assert_eq!(rebuilt.match_len("ABC"), None);
        assert_eq!(rebuilt.match_len("abc"), Some(3));
    }

    #[test]
    fn test_load_from_data() {
        static DATA: EngineData<'static> = EngineData {
            rules: &[("[a-z]+", "return 'WORD';"), ("\\s+", "")],
            conditions: &[("INITIAL", true, &[0, 1])],
            options: ScanOptions {
                ranges: false,
                flex: false,
                backtrack_lexer: false,
                case_insensitive: false,
            },
        };
        let engine = CompiledEngine::try_from(&DATA).unwrap();
        assert_eq!(engine.rules().len(), 2);
        assert_eq!(engine.current_rules(INITIAL).unwrap(), &[RuleId::new(0), RuleId::new(1)]);
        assert_eq!(engine.match_len(RuleId::new(0), "abc def"), Some(3));
        assert_eq!(engine.action_texts(), vec!["return 'WORD';", ""]);
        assert!(matches!(
            &*engine.current_rules("STR").unwrap_err().source,
            ScanLexErrorKind::UnknownStartCondition(name) if name == "STR"
        ));
    }

    #[test]
    fn test_unknown_begin_target() {
        let data = EngineData {
            rules: &[("\"", "this.begin('STR');")],
            conditions: &[("INITIAL", true, &[0])],
            options: ScanOptions::default(),
        };
        let result = CompiledEngine::try_from(data);
        assert!(matches!(
            result,
            Err(ref e) if matches!(&*e.source, ScanLexErrorKind::UnknownStartCondition(name) if name == "STR")
        ));
    }
}
