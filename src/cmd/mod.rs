pub mod completions;
pub mod extension;
