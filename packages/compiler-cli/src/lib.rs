#![deny(clippy::all)]

/**
 * Fragment Compiler CLI
 *
 * Host-file rewriting, configuration and the fragc command line driver
 */
// Re-export compiler for convenience
pub use fragment_compiler as compiler;

pub mod compile;
pub mod config;
pub mod logging;
pub mod rewriter;

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
