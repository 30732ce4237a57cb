//! This module contains the macro expander.
//! Macro references `{name}` in macro bodies are substituted until a fixed point is reached.
//! Each substitution is parenthesized to preserve grouping.

use std::collections::BTreeMap;

use log::trace;

use crate::{Result, ScanLexError, ScanLexErrorKind};

/// Expands the macro references inside the macro bodies.
///
/// A macro never substitutes itself, so a body may contain its own `{name}` literally.
/// Substitution passes are repeated until a pass leaves every body unchanged. An acyclic macro
/// set needs at most one pass per macro plus a final pass without changes, so more passes
/// than that indicate a cycle and fail with a `MacroExpansionError`.
pub fn expand_macros(mut macros: BTreeMap<String, String>) -> Result<BTreeMap<String, String>> {
    let names: Vec<String> = macros.keys().cloned().collect();
    let mut changed = Vec::new();
    for pass in 0..=names.len() {
        changed.clear();
        for name in &names {
            let mut body = macros[name].clone();
            let mut modified = false;
            for other in names.iter().filter(|other| *other != name) {
                let reference = format!("{{{}}}", other);
                if body.contains(&reference) {
                    body = body.replace(&reference, &format!("({})", macros[other]));
                    modified = true;
                }
            }
            if modified {
                macros.insert(name.clone(), body);
                changed.push(name.clone());
            }
        }
        if changed.is_empty() {
            trace!("Macro expansion finished after {} passes", pass + 1);
            return Ok(macros);
        }
    }
    Err(ScanLexError::new(ScanLexErrorKind::MacroExpansionError(
        changed,
    )))
}

/// Substitutes the references to the given, already expanded macros in a rule pattern once.
pub fn expand_pattern(pattern: &str, macros: &BTreeMap<String, String>) -> String {
    macros
        .iter()
        .fold(pattern.to_string(), |pattern, (name, body)| {
            pattern.replace(&format!("{{{}}}", name), &format!("({})", body))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn macros(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(n, b)| (n.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn test_nested_macros() {
        let expanded = expand_macros(macros(&[
            ("digit", "[0-9]"),
            ("2digit", "{digit}{digit}"),
            ("3digit", "{2digit}{digit}"),
        ]))
        .unwrap();
        assert_eq!(expanded["digit"], "[0-9]");
        assert_eq!(expanded["2digit"], "([0-9])([0-9])");
        assert_eq!(expanded["3digit"], "(([0-9])([0-9]))([0-9])");
    }

    #[test]
    fn test_self_reference_is_kept() {
        let expanded = expand_macros(macros(&[("brace", "\\{brace\\}|{brace}")])).unwrap();
        assert_eq!(expanded["brace"], "\\{brace\\}|{brace}");
    }

    #[test]
    fn test_cyclic_macros() {
        let result = expand_macros(macros(&[("a", "{b}x"), ("b", "{a}y")]));
        let error = result.unwrap_err();
        assert!(matches!(
            &*error.source,
            ScanLexErrorKind::MacroExpansionError(names) if names == &["b".to_string()]
        ));
    }

    #[test]
    fn test_expand_pattern() {
        let expanded = expand_macros(macros(&[("digit", "[0-9]"), ("int", "{digit}+")])).unwrap();
        assert_eq!(expand_pattern("{int}\\.{digit}*", &expanded), "(([0-9])+)\\.([0-9])*");
        assert_eq!(expand_pattern("{unknown}", &expanded), "{unknown}");
    }
}
