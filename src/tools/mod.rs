//! Tool normalizer.
//!
//! Tool files arrive in two shapes (see [`source`]). Everything downstream
//! works on [`ToolDescriptor`] only.

mod descriptor;
mod load;
mod normalize;
pub mod source;

pub use descriptor::{ToolDescriptor, ToolInput, ToolTags};
pub use load::{ToolLoadReport, load_tools, select};
pub use normalize::{dedup_last_wins, normalize, normalize_entry, slugify};
pub use source::ToolSource;
