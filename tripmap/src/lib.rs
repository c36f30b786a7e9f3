pub mod commands;
pub mod handlers;

pub use commands::command_argument_builder;
pub use handlers::{BuildOptions, decode_url, default_output_path, document_title, expand_path, run_build};
