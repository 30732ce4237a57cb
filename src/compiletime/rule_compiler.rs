//! This module contains the rule compiler.
//! It turns a [`RuleSet`] into a [`CompiledEngine`]: macros are expanded, every pattern is
//! validated and compiled into an anchored matcher, every action is parsed and the start
//! condition table is built from the rule scopes.

use std::collections::BTreeMap;
use std::time::Instant;

use log::{debug, trace};

use crate::{
    ActionTable, CompiledEngine, CompiledRule, Pattern, Result, Rule, RuleId, RuleSet,
    ScanLexError, ScanLexErrorKind, Scope, StartCondition, TokenTable, INITIAL,
};

use super::{
    action::parse_action,
    macro_expander::{expand_macros, expand_pattern},
    parser::{matches_empty, parse_regex_syntax},
};

/// The pattern of the catch-all rule added by the `flex` option.
pub const CATCH_ALL_PATTERN: &str = ".";

/// The action of the catch-all rule added by the `flex` option.
pub const CATCH_ALL_ACTION: &str = "ECHO";

/// Compiles a rule set into an engine.
/// # Arguments
/// * `rule_set` - The rules, macros, start conditions and options.
/// * `tokens` - An optional token table used to rewrite `return 'NAME'` actions.
/// # Errors
/// * `UnknownStartCondition` if a rule scope or a `begin` action names an undeclared condition.
/// * `MacroExpansionError` if the macros are cyclic.
/// * `RegexSyntaxError` or `RegexError` if a pattern is invalid.
/// * `UnsupportedAction` if an action can't be parsed.
pub fn compile(rule_set: &RuleSet, tokens: Option<&TokenTable>) -> Result<CompiledEngine> {
    let now = Instant::now();
    let scan = rule_set.options.scan;
    let macros = expand_macros(rule_set.macros.clone())?;

    let mut rules: Vec<Rule> = rule_set.rules.clone();
    if scan.flex {
        rules.push(Rule::new(CATCH_ALL_PATTERN, CATCH_ALL_ACTION));
    }

    let conditions = build_conditions(&rules, &rule_set.start_conditions)?;

    let compiled_rules = rules
        .iter()
        .enumerate()
        .map(|(index, rule)| -> Result<CompiledRule> {
            match &rule.pattern {
                Pattern::Source(source) => {
                    let expanded = expand_pattern(source, &macros);
                    let hir = parse_regex_syntax(&expanded, scan.case_insensitive)?;
                    if matches_empty(&hir) {
                        debug!("Rule #{} '{}' can match the empty string", index, expanded);
                    }
                    CompiledRule::new(&expanded, scan.case_insensitive)
                }
                Pattern::Compiled(regex) => {
                    Ok(CompiledRule::from_regex(regex.clone(), scan.case_insensitive))
                }
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let actions = rules
        .iter()
        .enumerate()
        .map(|(index, rule)| parse_action(index, &rule.action, tokens))
        .collect::<Result<Vec<_>>>()?;

    let engine = CompiledEngine::new(compiled_rules, conditions, ActionTable::new(actions), scan)?
        .with_module(
            rule_set.options.module_type,
            rule_set.options.module_name(),
            &rule_set.module_include,
        );
    trace!(
        "Compiling {} rules took {} microseconds.",
        rules.len(),
        now.elapsed().as_micros()
    );
    Ok(engine)
}

// Assigns every rule to the start conditions of its scope.
fn build_conditions(
    rules: &[Rule],
    declared: &BTreeMap<String, bool>,
) -> Result<BTreeMap<String, StartCondition>> {
    let mut conditions: BTreeMap<String, StartCondition> = declared
        .iter()
        .map(|(name, exclusive)| (name.clone(), StartCondition::new(!exclusive)))
        .collect();
    conditions.insert(INITIAL.to_string(), StartCondition::new(true));

    for (index, rule) in rules.iter().enumerate() {
        let id = RuleId::new(index);
        match &rule.scope {
            Scope::Implicit => conditions
                .values_mut()
                .filter(|condition| condition.inclusive)
                .for_each(|condition| condition.rules.push(id)),
            Scope::All => conditions
                .values_mut()
                .for_each(|condition| condition.rules.push(id)),
            Scope::Conditions(names) => {
                for name in names {
                    let condition = conditions.get_mut(name).ok_or_else(|| {
                        ScanLexError::new(ScanLexErrorKind::UnknownStartCondition(name.clone()))
                    })?;
                    if condition.rules.last() != Some(&id) {
                        condition.rules.push(id);
                    }
                }
            }
        }
    }

    for (name, condition) in &conditions {
        debug!(
            "Start condition '{}' ({}): rules {:?}",
            name,
            if condition.inclusive {
                "inclusive"
            } else {
                "exclusive"
            },
            condition.rules.iter().map(RuleId::as_usize).collect::<Vec<_>>()
        );
    }
    Ok(conditions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Options, ScanOptions};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn ids(ids: &[usize]) -> Vec<RuleId> {
        ids.iter().copied().map(RuleId::new).collect()
    }

    #[test]
    fn test_condition_scoping() {
        init();
        let rule_set = RuleSet::new()
            .add_start_condition("INC", false)
            .add_start_condition("EXC", true)
            .add_rule(Rule::new("a", "return 'A'"))
            .add_rule(Rule::scoped(["EXC"], "b", "return 'B'"))
            .add_rule(Rule::scoped(["*"], "c", "return 'C'"))
            .add_rule(Rule::scoped(["INC", "EXC"], "d", "return 'D'"));
        let engine = compile(&rule_set, None).unwrap();
        let conditions = engine.conditions();
        assert_eq!(conditions.len(), 3);
        assert_eq!(conditions[INITIAL].rules, ids(&[0, 2]));
        assert!(conditions[INITIAL].inclusive);
        assert_eq!(conditions["INC"].rules, ids(&[0, 2, 3]));
        assert!(conditions["INC"].inclusive);
        assert_eq!(conditions["EXC"].rules, ids(&[1, 2, 3]));
        assert!(!conditions["EXC"].inclusive);
    }

    #[test]
    fn test_unknown_condition_in_scope() {
        init();
        let rule_set = RuleSet::new().add_rule(Rule::scoped(["STR"], "a", ""));
        let error = compile(&rule_set, None).unwrap_err();
        assert!(matches!(
            &*error.source,
            ScanLexErrorKind::UnknownStartCondition(name) if name == "STR"
        ));
    }

    #[test]
    fn test_unknown_condition_in_action() {
        init();
        let rule_set = RuleSet::new().add_rule(Rule::new("a", "this.begin('STR')"));
        let error = compile(&rule_set, None).unwrap_err();
        assert!(matches!(
            &*error.source,
            ScanLexErrorKind::UnknownStartCondition(name) if name == "STR"
        ));
    }

    #[test]
    fn test_flex_appends_catch_all_rule() {
        init();
        let rule_set = RuleSet::new()
            .add_start_condition("EXC", true)
            .add_rule(Rule::new("a", "return 'A'"))
            .with_options(Options {
                scan: ScanOptions {
                    flex: true,
                    ..Default::default()
                },
                ..Default::default()
            });
        let engine = compile(&rule_set, None).unwrap();
        assert_eq!(engine.rules().len(), 2);
        assert_eq!(engine.rules()[1].pattern(), CATCH_ALL_PATTERN);
        assert_eq!(
            engine.actions().get(RuleId::new(1)),
            Some(&parse_action(1, CATCH_ALL_ACTION, None).unwrap())
        );
        assert_eq!(engine.action_texts()[1], format!("{};", CATCH_ALL_ACTION));
        assert_eq!(engine.conditions()[INITIAL].rules, ids(&[0, 1]));
        assert!(engine.conditions()["EXC"].rules.is_empty());
    }

    #[test]
    fn test_patterns() {
        init();
        let rule_set = RuleSet::new()
            .add_macro("digit", "[0-9]")
            .add_macro("int", "{digit}+")
            .add_rule(Rule::new("{int}\\.{int}", "return 'FLOAT'"))
            .add_rule(Rule::new(regex::Regex::new("[a-z]+").unwrap(), "return 'ID'"));
        let engine = compile(&rule_set, None).unwrap();
        assert_eq!(engine.rules()[0].pattern(), "(([0-9])+)\\.(([0-9])+)");
        assert_eq!(engine.match_len(RuleId::new(0), "1.25x"), Some(4));
        assert_eq!(engine.match_len(RuleId::new(0), "x1.25"), None);
        assert_eq!(engine.rules()[1].pattern(), "[a-z]+");
        assert_eq!(engine.match_len(RuleId::new(1), "ab1"), Some(2));
    }

    #[test]
    fn test_invalid_pattern() {
        init();
        let rule_set = RuleSet::new().add_rule(Rule::new("[a-", ""));
        let error = compile(&rule_set, None).unwrap_err();
        assert!(matches!(
            &*error.source,
            ScanLexErrorKind::RegexSyntaxError(_)
        ));
    }

    #[test]
    fn test_module_settings() {
        init();
        let options: Options = [("moduleType", "amd"), ("moduleName", "calc")]
            .into_iter()
            .collect();
        let rule_set = RuleSet::new()
            .add_rule(Rule::new("a", ""))
            .with_options(options)
            .with_module_include("// tail");
        let engine = compile(&rule_set, None).unwrap();
        assert_eq!(engine.module_type(), crate::ModuleType::Factory);
        assert_eq!(engine.module_name(), "calc");
        assert_eq!(engine.module_include(), "// tail");
    }
}
