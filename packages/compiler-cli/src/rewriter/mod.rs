//! Source Rewriter
//!
//! Compiles every tagged template of one host file and rewrites the file
//! around them: template expressions become render code, observable markers
//! are stripped and the runtime import plus file-level declarations are
//! written next to the existing imports.

pub mod edits;
pub mod free_vars;
pub mod imports;
pub mod scope;
pub mod visitor;


use crate::config::CompilerConfig;
use crate::logging::Logger;
use fragment_compiler::{CompileError, Result};
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;

pub use edits::SourceEdits;
pub use imports::{rewrite_imports, scan_imports, ImportInfo};
pub use scope::ScopeChain;
pub use visitor::{TemplateVisitor, VisitResult};

/// Compile one host file. A file without template sites comes back unchanged.
pub fn compile_source(
    source: &str,
    filename: &str,
    config: &CompilerConfig,
    logger: &dyn Logger,
) -> Result<String> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(filename).unwrap_or_default();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if let Some(error) = ret.errors.first() {
        return Err(CompileError::Parse {
            message: error.to_string(),
            offset: None,
        });
    }
    let program = ret.program;

    let info = scan_imports(&program, source, config);
    let mut visitor = TemplateVisitor::new(source, filename, &info.tag_alias, logger);
    visitor.visit_program(&program)?;
    let VisitResult {
        mut edits,
        state,
        site_count,
        tag_referenced,
    } = visitor.finish();

    if site_count == 0 {
        logger.debug(&format!("{}: no templates", filename));
        return Ok(source.to_string());
    }

    rewrite_imports(
        &info,
        &state.import_names(),
        &state.declarations(),
        tag_referenced,
        config,
        &mut edits,
    );
    logger.info(&format!(
        "{}: compiled {} templates into {} fragments and {} binders",
        filename,
        site_count,
        state.fragment_count(),
        state.binder_count()
    ));
    Ok(edits.apply(source))
}
