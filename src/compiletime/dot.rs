//! The `dot` module contains the conversion from a compiled engine to a graphviz dot format.
//! The functions in this module are used for testing and debugging purposes.

use std::collections::BTreeMap;
use std::io::Write;

use dot_writer::{Attributes, Color, DotWriter, RankDirection, Shape};

use crate::{Command, CompiledEngine};

/// Render the start conditions and rules of an engine to a graphviz dot format.
///
/// Every start condition points to its rules in activation order. A rule whose action begins
/// a start condition points back to that condition with a red edge.
pub fn render_to<W: Write>(engine: &CompiledEngine, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);

    let mut condition_nodes = BTreeMap::new();
    for (name, condition) in engine.conditions() {
        let node_id = {
            let mut node = digraph.node_auto();
            node.set_label(name).set_shape(Shape::Circle);
            if condition.inclusive {
                node.set_color(Color::Blue).set_pen_width(3.0);
            }
            node.id()
        };
        condition_nodes.insert(name.as_str(), node_id);
    }

    let mut rule_nodes = Vec::with_capacity(engine.rules().len());
    for (index, rule) in engine.rules().iter().enumerate() {
        let node_id = {
            let mut node = digraph.node_auto();
            node.set_label(&format!(
                "{}: {}",
                index,
                rule.pattern().escape_default()
            ));
            node.id()
        };
        rule_nodes.push(node_id);
    }

    for (name, condition) in engine.conditions() {
        for (position, rule) in condition.rules.iter().enumerate() {
            digraph
                .edge(
                    condition_nodes[name.as_str()].clone(),
                    rule_nodes[rule.as_usize()].clone(),
                )
                .attributes()
                .set_label(&position.to_string());
        }
    }

    for (index, action) in engine.actions().iter().enumerate() {
        for command in action.commands() {
            if let Command::Begin(target) = command {
                if let Some(target_id) = condition_nodes.get(target.as_str()) {
                    digraph
                        .edge(rule_nodes[index].clone(), target_id.clone())
                        .attributes()
                        .set_color(Color::Red)
                        .set_label("begin");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile, Rule, RuleSet};

    #[test]
    fn test_render_to() {
        let rule_set = RuleSet::new()
            .add_start_condition("STR", true)
            .add_rule(Rule::new("\"", "this.begin('STR'); return 'QUOTE'"))
            .add_rule(Rule::scoped(["STR"], "\"", "this.popState(); return 'QUOTE'"));
        let engine = compile(&rule_set, None).unwrap();
        let mut output = Vec::new();
        render_to(&engine, "strings", &mut output);
        let dot = String::from_utf8(output).unwrap();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("label=\"strings\""));
        assert!(dot.contains("label=\"INITIAL\""));
        assert!(dot.contains("label=\"STR\""));
        assert!(dot.contains("label=\"begin\""));
        assert_eq!(dot.matches("->").count(), 3);
    }
}
