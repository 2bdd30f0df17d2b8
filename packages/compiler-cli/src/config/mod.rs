pub mod fragment;

pub use fragment::{CompilerConfig, CONFIG_FILE_NAME};
