//! File Compilation
//!
//! Resolves the files a run compiles and compiles them in parallel.

pub mod parallel;

pub use parallel::{compile_files, CompileOutput};

use crate::logging::Logger;
use std::path::{Path, PathBuf};

/// Expand `include` globs under `base_dir`, dropping paths matched by any
/// `exclude` glob. Results are sorted and free of duplicates.
pub fn discover_files(
    base_dir: &Path,
    include: &[String],
    exclude: &[String],
    logger: &dyn Logger,
) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for pattern in include {
        let full_pattern = base_dir.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        let paths = match glob::glob(&pattern_str) {
            Ok(paths) => paths,
            Err(e) => {
                logger.warn(&format!("Invalid glob pattern '{}': {}", pattern, e));
                continue;
            }
        };
        for path in paths.flatten() {
            if path.is_file() && !is_excluded(base_dir, &path, exclude) {
                files.push(path);
            }
        }
    }

    files.sort();
    files.dedup();
    files
}

fn is_excluded(base_dir: &Path, path: &Path, exclude: &[String]) -> bool {
    let path_str = path.to_string_lossy();
    exclude.iter().any(|excl| {
        // node_modules is skipped wherever it sits in the tree.
        if excl.contains("node_modules") && path_str.contains("node_modules") {
            return true;
        }
        let excl_pattern = base_dir.join(excl);
        match glob::Pattern::new(&excl_pattern.to_string_lossy()) {
            Ok(p) => p.matches(&path_str),
            Err(_) => path_str.contains(excl.as_str()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NullLogger;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fragc-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("src/nested")).unwrap();
        fs::create_dir_all(dir.join("node_modules/pkg")).unwrap();
        fs::write(dir.join("src/a.js"), "").unwrap();
        fs::write(dir.join("src/nested/b.js"), "").unwrap();
        fs::write(dir.join("src/c.ts"), "").unwrap();
        fs::write(dir.join("node_modules/pkg/d.js"), "").unwrap();
        dir
    }

    #[test]
    fn should_expand_include_globs() {
        let dir = scratch_dir("include");
        let files = discover_files(&dir, &["src/**/*.js".to_string()], &[], &NullLogger);
        assert_eq!(files, vec![dir.join("src/a.js"), dir.join("src/nested/b.js")]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn should_apply_excludes() {
        let dir = scratch_dir("exclude");
        let files = discover_files(
            &dir,
            &["**/*.js".to_string()],
            &["node_modules/**".to_string(), "src/nested/**".to_string()],
            &NullLogger,
        );
        assert_eq!(files, vec![dir.join("src/a.js")]);
        fs::remove_dir_all(&dir).unwrap();
    }
}
