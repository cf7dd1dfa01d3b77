//! Template engine for prompt placeholders.
//!
//! # Syntax
//!
//! - `{name}` - Substitutes the value of variable `name`
//! - `{{` - Renders as literal `{`
//! - `}}` - Renders as literal `}`
//!
//! Undefined variables are an error, never an empty substitution, so a
//! half-rendered prompt can not reach the model.

use std::collections::BTreeMap;
use thiserror::Error;

/// Variables available to a template, keyed by placeholder name.
pub type TemplateVars = BTreeMap<String, String>;

/// Error type for template rendering failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A variable was referenced but not provided.
    #[error("undefined variable '{name}' at position {position} in template")]
    UndefinedVariable { name: String, position: usize },

    /// A `{` was found without a matching `}`.
    #[error("unmatched '{{' at position {position} in template")]
    UnmatchedBrace { position: usize },

    /// An empty variable name was found (e.g., `{}`).
    #[error("empty variable name '{{}}' at position {position} in template")]
    EmptyVariableName { position: usize },

    /// A placeholder the caller requires does not appear in the template.
    #[error("template is missing required placeholder '{{{name}}}'")]
    MissingPlaceholder { name: String },
}

/// One lexical piece of a template.
enum Segment<'a> {
    Literal(char),
    Variable { name: &'a str, position: usize },
}

/// Walk `template`, yielding literals and variable references.
fn scan(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let mut segments = Vec::new();
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' => {
                if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    segments.push(Segment::Literal('{'));
                    continue;
                }

                let name_start = pos + 1;
                let name_end = loop {
                    match chars.next() {
                        Some((end, '}')) => break end,
                        Some(_) => {}
                        None => return Err(TemplateError::UnmatchedBrace { position: pos }),
                    }
                };

                let raw = &template[name_start..name_end];
                if raw.is_empty() {
                    return Err(TemplateError::EmptyVariableName { position: pos });
                }
                segments.push(Segment::Variable {
                    name: raw.trim(),
                    position: pos,
                });
            }
            '}' => {
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                }
                segments.push(Segment::Literal('}'));
            }
            _ => segments.push(Segment::Literal(ch)),
        }
    }

    Ok(segments)
}

/// Render a template string by substituting variables.
///
/// ```
/// use promptlab::prompt::{render_template, vars};
///
/// let vars = vars([("name", "Alice"), ("task", "sleep")]);
/// let result = render_template("Hello {name}, let's talk {task}.", &vars).unwrap();
/// assert_eq!(result, "Hello Alice, let's talk sleep.");
/// ```
pub fn render_template(template: &str, variables: &TemplateVars) -> Result<String, TemplateError> {
    let mut result = String::with_capacity(template.len());

    for segment in scan(template)? {
        match segment {
            Segment::Literal(ch) => result.push(ch),
            Segment::Variable { name, position } => match variables.get(name) {
                Some(value) => result.push_str(value),
                None => {
                    return Err(TemplateError::UndefinedVariable {
                        name: name.to_string(),
                        position,
                    });
                }
            },
        }
    }

    Ok(result)
}

/// Placeholder names referenced by `template`, deduplicated, in first-use order.
pub fn placeholders(template: &str) -> Result<Vec<String>, TemplateError> {
    let mut names: Vec<String> = Vec::new();
    for segment in scan(template)? {
        if let Segment::Variable { name, .. } = segment
            && !names.iter().any(|n| n == name)
        {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Fail with `MissingPlaceholder` unless every name in `required` appears in `template`.
pub fn require_placeholders(template: &str, required: &[&str]) -> Result<(), TemplateError> {
    let present = placeholders(template)?;
    for name in required {
        if !present.iter().any(|p| p == name) {
            return Err(TemplateError::MissingPlaceholder {
                name: (*name).to_string(),
            });
        }
    }
    Ok(())
}

/// Escape `{` and `}` so `text` renders back to itself unchanged.
pub fn escape_braces(text: &str) -> String {
    text.replace('{', "{{").replace('}', "}}")
}

/// Helper to create a variables map from a list of key-value pairs.
pub fn vars<I, K, V>(pairs: I) -> TemplateVars
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
