//! Canonical tool descriptor.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One input a tool can provide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub use_cases: Vec<String>,
}

/// Classification tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolTags {
    #[serde(default)]
    pub data_types: BTreeSet<String>,
    #[serde(default)]
    pub domains: BTreeSet<String>,
}

/// A tool in the one shape the rest of the system sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub tool_id: String,
    pub display_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub integration_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    /// Inputs in the order the tool file lists them.
    pub inputs: IndexMap<String, ToolInput>,
    #[serde(default)]
    pub tags: ToolTags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_score: Option<f64>,
    /// `main_system` of the complex source this descriptor was split from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_system: Option<String>,
}

impl ToolDescriptor {
    /// Every use case across all inputs, in file order.
    pub fn use_cases(&self) -> impl Iterator<Item = &str> {
        self.inputs
            .values()
            .flat_map(|input| input.use_cases.iter().map(String::as_str))
    }

    pub fn has_domain(&self, domain: &str) -> bool {
        self.tags.domains.iter().any(|d| d.eq_ignore_ascii_case(domain))
    }
}
