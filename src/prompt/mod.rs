//! Prompt assembler.
//!
//! - [`template`]: `{placeholder}` rendering with `{{`/`}}` escapes
//! - [`catalog`]: markdown rendering of the selected tools
//! - [`assemble`]: validation and rendering into a [`GenerationRequest`]
//! - [`saved`]: named template pairs on disk

mod assemble;
pub mod catalog;
pub mod saved;
pub mod template;

pub use assemble::{
    GenerationRequest, PLACEHOLDERS, PromptConfig, REQUIRED_USER_PLACEHOLDERS, ToolSolutionRatio,
    assemble, check_templates,
};
pub use catalog::render_tool_catalog;
pub use saved::{
    DEFAULT_TEMPLATE_NAME, TemplatePair, load_templates, resolve_template, save_template,
};
pub use template::{
    TemplateError, TemplateVars, escape_braces, placeholders, render_template, vars,
};
