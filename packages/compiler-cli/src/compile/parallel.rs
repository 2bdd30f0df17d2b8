use crate::config::CompilerConfig;
use crate::logging::Logger;
use crate::rewriter::compile_source;
use anyhow::Context;
use fragment_compiler::format_position;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Outcome of compiling one file.
#[derive(Debug)]
pub struct CompileOutput {
    pub path: PathBuf,
    pub result: anyhow::Result<String>,
}

impl CompileOutput {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Compile every file on the rayon pool. Each file gets its own module state;
/// outputs come back in input order.
pub fn compile_files(
    files: &[PathBuf],
    config: &CompilerConfig,
    logger: &dyn Logger,
) -> Vec<CompileOutput> {
    let start = Instant::now();
    logger.info(&format!("Compiling {} files in parallel...", files.len()));

    let outputs: Vec<CompileOutput> = files
        .par_iter()
        .map(|path| CompileOutput {
            path: path.clone(),
            result: compile_file(path, config, logger),
        })
        .collect();

    let failed = outputs.iter().filter(|o| !o.is_ok()).count();
    logger.info(&format!(
        "Compilation finished in {:?} ({} failed)",
        start.elapsed(),
        failed
    ));
    outputs
}

fn compile_file(
    path: &Path,
    config: &CompilerConfig,
    logger: &dyn Logger,
) -> anyhow::Result<String> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path.to_string_lossy();
    compile_source(&source, &filename, config, logger).map_err(|e| match e.offset() {
        Some(offset) => anyhow::anyhow!(
            "{}:{}: {}",
            filename,
            format_position(&source, offset),
            e
        ),
        None => anyhow::anyhow!("{}: {}", filename, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NullLogger;

    #[test]
    fn should_keep_input_order_and_report_failures() {
        let dir = std::env::temp_dir().join(format!("fragc-parallel-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let good = dir.join("good.js");
        let bad = dir.join("bad.js");
        let plain = dir.join("plain.js");
        fs::write(&good, "const p = t => _`<p>${t}</p>`;\n").unwrap();
        fs::write(&bad, "const p = t => _`<p>${t}</div>`;\n").unwrap();
        fs::write(&plain, "export const x = 1;\n").unwrap();

        let files = vec![good.clone(), bad.clone(), plain.clone(), dir.join("missing.js")];
        let outputs = compile_files(&files, &CompilerConfig::default(), &NullLogger);

        assert_eq!(outputs.len(), 4);
        assert_eq!(outputs[0].path, good);
        assert!(outputs[0].result.as_ref().unwrap().contains("__render0"));
        let message = outputs[1].result.as_ref().unwrap_err().to_string();
        assert!(message.contains("bad.js:1:"));
        assert_eq!(outputs[2].result.as_ref().unwrap(), "export const x = 1;\n");
        assert!(!outputs[3].is_ok());
        fs::remove_dir_all(&dir).unwrap();
    }
}
