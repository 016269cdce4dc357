//! Rendering unified models into engine weight syntax.
//!
//! The output shape is fixed: `base = N` followed by one
//! `modifier = { add = W trigger = { ... } }` block per addend, in
//! resolver order. Rendering is pure; the same model always produces
//! byte-identical text.

use crate::core::resolver::{TriggerNode, UnifiedModel};

pub const DEFAULT_INDENT: &str = "    ";

#[derive(Debug, Clone)]
pub struct TriggerSerializer {
    indent: String,
}

impl Default for TriggerSerializer {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

impl TriggerSerializer {
    pub fn new(indent_unit: impl Into<String>) -> Self {
        Self {
            indent: indent_unit.into(),
        }
    }

    /// Render to a single string, lines joined with `\n`, no trailing
    /// newline.
    pub fn render(&self, model: &UnifiedModel) -> String {
        self.render_lines(model).join("\n")
    }

    /// Render to individual unindented lines; the rewriter prefixes
    /// each with the block's own indentation.
    pub fn render_lines(&self, model: &UnifiedModel) -> Vec<String> {
        let mut lines = vec![format!("base = {}", model.base_weight)];
        for addend in &model.addends {
            lines.push("modifier = {".to_string());
            lines.push(format!("{}add = {}", self.indent, addend.weight));
            lines.push(format!("{}trigger = {{", self.indent));
            for condition in self.condition_lines(&addend.condition) {
                lines.push(format!("{}{}{}", self.indent, self.indent, condition));
            }
            lines.push(format!("{}}}", self.indent));
            lines.push("}".to_string());
        }
        lines
    }

    /// Flatten a trigger tree into condition lines. A negation of a
    /// single-line inner condition stays inline (`NOT = { ... }`); a
    /// multi-line inner block nests with the configured indent unit.
    fn condition_lines(&self, node: &TriggerNode) -> Vec<String> {
        match node {
            TriggerNode::HasTrait(name) => vec![format!("has_trait = {name}")],
            TriggerNode::Raw(text) => text.lines().map(str::to_string).collect(),
            TriggerNode::Not(inner) => {
                let inner_lines = self.condition_lines(inner);
                if let [single] = inner_lines.as_slice() {
                    vec![format!("NOT = {{ {single} }}")]
                } else {
                    let mut lines = vec!["NOT = {".to_string()];
                    lines.extend(
                        inner_lines
                            .into_iter()
                            .map(|l| format!("{}{l}", self.indent)),
                    );
                    lines.push("}".to_string());
                    lines
                }
            }
            TriggerNode::All(parts) => {
                parts.iter().flat_map(|p| self.condition_lines(p)).collect()
            }
        }
    }
}
