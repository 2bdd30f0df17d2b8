/**
 * Fragment Compiler CLI - fragc
 *
 * Compiles tagged template literals in JavaScript/TypeScript sources
 */
use clap::{Arg, ArgAction, Command};
use fragment_compiler_cli::compile::{compile_files, discover_files};
use fragment_compiler_cli::config::CompilerConfig;
use fragment_compiler_cli::logging::{ConsoleLogger, LogLevel, Logger};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    let matches = Command::new("fragc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Fragment template compiler")
        .arg(
            Arg::new("inputs")
                .value_name("FILE")
                .num_args(0..)
                .help("Files or glob patterns to compile (default: config include)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Path to fragment.config.json"),
        )
        .arg(
            Arg::new("out-dir")
                .short('o')
                .long("out-dir")
                .value_name("DIR")
                .help("Write compiled files here instead of stdout"),
        )
        .arg(
            Arg::new("runtime-module")
                .long("runtime-module")
                .value_name("MODULE")
                .help("Module the template tag and runtime helpers come from"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log every compiled template"),
        )
        .get_matches();

    let base_dir = PathBuf::from(".");
    let loaded = match matches.get_one::<String>("config") {
        Some(path) => CompilerConfig::load(Path::new(path)),
        None => CompilerConfig::discover(&base_dir),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[ERROR] {:#}", e);
            process::exit(1);
        }
    };
    if let Some(out_dir) = matches.get_one::<String>("out-dir") {
        config.out_dir = Some(out_dir.clone());
    }
    if let Some(module) = matches.get_one::<String>("runtime-module") {
        config.runtime_module = module.clone();
    }
    if matches.get_flag("verbose") {
        config.log_level = LogLevel::Debug;
    }

    let logger = ConsoleLogger::new(config.log_level);

    let inputs: Vec<String> = matches
        .get_many::<String>("inputs")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let files = if inputs.is_empty() {
        discover_files(&base_dir, &config.include, &config.exclude, &logger)
    } else {
        discover_files(&base_dir, &inputs, &config.exclude, &logger)
    };
    if files.is_empty() {
        logger.warn("No input files");
        return;
    }

    let mut failed = false;
    for output in compile_files(&files, &config, &logger) {
        let result = output.result.and_then(|code| match &config.out_dir {
            Some(out_dir) => write_output(&base_dir, Path::new(out_dir), &output.path, &code),
            None => {
                println!("{}", code);
                Ok(())
            }
        });
        if let Err(e) = result {
            logger.error(&format!("{:#}", e));
            failed = true;
        }
    }

    if failed {
        process::exit(1);
    }
}

/// Mirror `path` (relative to `base_dir`) under `out_dir`.
fn write_output(base_dir: &Path, out_dir: &Path, path: &Path, code: &str) -> anyhow::Result<()> {
    use anyhow::Context;

    let relative = path.strip_prefix(base_dir).unwrap_or(path);
    let target = out_dir.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&target, code).with_context(|| format!("failed to write {}", target.display()))
}
