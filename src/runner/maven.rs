// src/runner/maven.rs
use crate::runner::process::run_command;
use crate::utils::error::RunnerError;
use std::fs;
use std::path::{Path, PathBuf};

/// Packages the benchmark module and the modules it depends on, skipping tests.
pub async fn build_benchmarks(mvnw: &str, module: &str) -> Result<(), RunnerError> {
    tracing::info!("Building Maven module '{}' using {} (this may take a while)...", module, mvnw);
    let args: Vec<String> = ["-pl", module, "-am", "-DskipTests", "package"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    run_command(mvnw, &args, None).await?;
    tracing::info!("Build completed.");
    Ok(())
}

/// Picks the runnable jar under `<module>/target/`.
///
/// Jars whose name contains "original" (the unshaded artifact) are ignored, and jars named
/// after the module are preferred.
pub fn find_benchmarks_jar(module: &Path) -> Result<PathBuf, RunnerError> {
    let target = module.join("target");
    let not_found = || RunnerError::JarNotFound {
        dir: target.display().to_string(),
        pattern: target.join("*.jar").display().to_string(),
    };

    let entries = fs::read_dir(&target).map_err(|_| not_found())?;
    let mut jars: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == "jar"))
        .filter(|path| !file_name(path).contains("original"))
        .collect();
    jars.sort();

    let module_name = module
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let chosen = jars
        .iter()
        .find(|jar| !module_name.is_empty() && file_name(jar).contains(module_name.as_str()))
        .or_else(|| jars.first())
        .cloned()
        .ok_or_else(not_found)?;

    tracing::info!("Using jar: {}", chosen.display());
    Ok(chosen)
}

/// Splits `--jmh-args` with shell quoting rules.
pub fn split_jmh_args(extra_args: &str) -> Result<Vec<String>, RunnerError> {
    if extra_args.trim().is_empty() {
        return Ok(Vec::new());
    }
    shlex::split(extra_args).ok_or_else(|| RunnerError::InvalidArgs(extra_args.to_string()))
}

/// Runs JMH with text result format and returns its merged output.
pub async fn run_jmh(jar: &Path, java: &str, extra_args: &str) -> Result<String, RunnerError> {
    let mut args = vec![
        "-jar".to_string(),
        jar.display().to_string(),
        "-rf".to_string(),
        "text".to_string(),
    ];
    args.extend(split_jmh_args(extra_args)?);

    tracing::info!("Running JMH: {} {}", java, args.join(" "));
    let output = run_command(java, &args, None).await?;
    tracing::info!("JMH run completed.");
    Ok(output)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
