pub mod extract;
pub mod prompt;

pub use extract::{parse_analysis, strip_code_fences};
pub use prompt::{build_prompt, PromptPair, RECENT_WINDOW};
