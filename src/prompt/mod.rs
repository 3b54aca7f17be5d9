// Declare submodules
mod analysis;
mod common;
mod selection;

pub use analysis::{analysis_prompt, missing_sections, ANALYSIS_SECTIONS, EVENT_TYPES};
pub use common::*;
pub use selection::selection_prompt;
