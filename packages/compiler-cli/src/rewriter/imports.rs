//! Runtime Import
//!
//! Finds the import that brings the template tag into the file and rewrites
//! it to bring in the runtime helpers compiled code calls instead.

use super::edits::SourceEdits;
use crate::config::CompilerConfig;
use oxc_ast::ast::{ImportDeclarationSpecifier, Program, Statement};

/// Named specifier of the runtime import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSpecifier {
    pub imported: String,
    pub local: String,
    /// Source text of the specifier, e.g. `_ as html`.
    pub text: String,
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ImportInfo {
    /// Local name the tag is called by.
    pub tag_alias: String,
    /// Named specifiers of the runtime import that is rewritten in place.
    pub runtime: Vec<NamedSpecifier>,
    /// End of the last import declaration.
    pub last_import_end: Option<u32>,
}

impl ImportInfo {
    fn is_tag(&self, specifier: &NamedSpecifier) -> bool {
        specifier.local == self.tag_alias
    }
}

pub fn scan_imports(program: &Program, source: &str, config: &CompilerConfig) -> ImportInfo {
    let mut info = ImportInfo {
        tag_alias: config.tag_name.clone(),
        ..ImportInfo::default()
    };
    let mut found_tag = false;

    for statement in &program.body {
        let Statement::ImportDeclaration(decl) = statement else {
            continue;
        };
        info.last_import_end = Some(decl.span.end);
        if decl.source.value.as_str() != config.runtime_module {
            continue;
        }
        let Some(specifiers) = &decl.specifiers else {
            continue;
        };

        let named: Vec<NamedSpecifier> = specifiers
            .iter()
            .filter_map(|specifier| match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(s) => Some(NamedSpecifier {
                    imported: s.imported.name().to_string(),
                    local: s.local.name.to_string(),
                    text: source[s.span.start as usize..s.span.end as usize].to_string(),
                    start: s.span.start,
                    end: s.span.end,
                }),
                _ => None,
            })
            .collect();
        if named.is_empty() || found_tag {
            continue;
        }

        if let Some(tag) = named.iter().find(|s| s.imported == config.tag_name) {
            info.tag_alias = tag.local.clone();
            info.runtime = named;
            found_tag = true;
        } else if info.runtime.is_empty() {
            info.runtime = named;
        }
    }

    info
}

/// Insert file-level declarations and merge helper names into the runtime
/// import, or prepend a new import when the file has none.
pub fn rewrite_imports(
    info: &ImportInfo,
    helpers: &[&str],
    declarations: &[String],
    keep_tag: bool,
    config: &CompilerConfig,
    edits: &mut SourceEdits,
) {
    let declarations = declarations.join("\n");

    if let (Some(first), Some(last)) = (info.runtime.first(), info.runtime.last()) {
        let mut specifiers: Vec<String> = info
            .runtime
            .iter()
            .filter(|s| keep_tag || !info.is_tag(s))
            .map(|s| s.text.clone())
            .collect();
        for name in helpers {
            let present = info.runtime.iter().any(|s| s.local == *name && !info.is_tag(s));
            if !present {
                specifiers.push(name.to_string());
            }
        }
        edits.replace(first.start, last.end, specifiers.join(", "));
        // A runtime import implies at least one import declaration.
        let at = info.last_import_end.unwrap_or(last.end);
        edits.insert(at, format!("\n{}", declarations));
        return;
    }

    let import = format!(
        "import {{ {} }} from '{}';",
        helpers.join(", "),
        config.runtime_module
    );
    match info.last_import_end {
        Some(end) => {
            edits.insert(0, format!("{}\n", import));
            edits.insert(end, format!("\n{}", declarations));
        }
        None => edits.insert(0, format!("{}\n{}\n", import, declarations)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn scan(source: &str) -> ImportInfo {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        scan_imports(&ret.program, source, &CompilerConfig::default())
    }

    #[test]
    fn should_find_aliased_tag() {
        let info = scan("import { a } from 'x';\nimport { _ as html, keep } from 'fragment-runtime';\n");
        assert_eq!(info.tag_alias, "html");
        assert_eq!(info.runtime.len(), 2);
        assert_eq!(info.runtime[0].text, "_ as html");
        assert_eq!(info.last_import_end, Some(74));
    }

    #[test]
    fn should_default_alias_without_import() {
        let info = scan("const x = 1;");
        assert_eq!(info.tag_alias, "_");
        assert!(info.runtime.is_empty());
        assert_eq!(info.last_import_end, None);
    }

    #[test]
    fn should_merge_helpers_and_drop_unused_tag() {
        let source = "import { _, keep } from 'fragment-runtime';\nfoo();";
        let info = scan(source);
        let mut edits = SourceEdits::new();
        rewrite_imports(
            &info,
            &["renderer", "makeFragment"],
            &["const __render0 = renderer(makeFragment(`<p></p>`));".to_string()],
            false,
            &CompilerConfig::default(),
            &mut edits,
        );
        assert_eq!(
            edits.apply(source),
            "import { keep, renderer, makeFragment } from 'fragment-runtime';\nconst __render0 = renderer(makeFragment(`<p></p>`));\nfoo();"
        );
    }

    #[test]
    fn should_prepend_import_when_missing() {
        let source = "foo();";
        let info = scan(source);
        let mut edits = SourceEdits::new();
        rewrite_imports(
            &info,
            &["renderer", "makeFragment"],
            &["const __render0 = renderer(makeFragment(`x`));".to_string()],
            true,
            &CompilerConfig::default(),
            &mut edits,
        );
        assert_eq!(
            edits.apply(source),
            "import { renderer, makeFragment } from 'fragment-runtime';\nconst __render0 = renderer(makeFragment(`x`));\nfoo();"
        );
    }
}
