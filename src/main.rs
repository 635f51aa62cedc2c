// src/main.rs
mod docs;
mod jmh;
mod report;
mod runner;
mod sync;
mod utils;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use docs::BlockMarkers;
use jmh::{extract_first_table, TableFormat};
use sync::Synchronizer;
use utils::AppError;

/// Runs the JMH benchmarks of a Maven module and refreshes the example result tables
/// embedded in `<pre>` blocks of its Javadoc comments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the Maven wrapper
    #[arg(long, default_value = "./mvnw")]
    mvnw: String,

    /// Module directory to build, run and update
    #[arg(long, default_value = "benchmarks")]
    module: String,

    /// Java command used to run the benchmark jar
    #[arg(long, default_value = "java")]
    java: String,

    /// Extra arguments passed to the JMH main (e.g. "-f 1 -wi 0 -i 1")
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    jmh_args: String,

    /// Read previously captured JMH output from this file instead of building and running
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// JMH mode column value identifying result rows
    #[arg(long, default_value = "thrpt")]
    mode: String,

    /// Number of runner output lines to echo as a preview
    #[arg(long, default_value_t = 120)]
    preview_lines: usize,

    /// Write a JSON report of the run to this path
    #[arg(short, long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting benchmark sync for args: {:?}", args);

    if args.mode.trim().is_empty() {
        return Err(AppError::Config("--mode must not be empty".to_string()));
    }
    let module = Path::new(&args.module);

    // Ctrl-C aborts the run between steps and between files; the runner kills its own child
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = interrupted.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, aborting");
                interrupted.store(true, Ordering::SeqCst);
            }
        });
    }
    let check_interrupt = || {
        if interrupted.load(Ordering::SeqCst) {
            Err(AppError::Interrupted)
        } else {
            Ok(())
        }
    };

    // 3. Obtain the runner output (nothing is written before this completes)
    let output = match &args.input {
        Some(path) => {
            tracing::info!("Reading JMH output from {}", path.display());
            std::fs::read_to_string(path).map_err(|source| AppError::Input {
                path: path.clone(),
                source,
            })?
        }
        None => {
            runner::build_benchmarks(&args.mvnw, &args.module).await?;
            check_interrupt()?;
            let jar = runner::find_benchmarks_jar(module)?;
            runner::run_jmh(&jar, &args.java, &args.jmh_args).await?
        }
    };

    check_interrupt()?;

    // 4. Print a short preview of the output
    if args.preview_lines > 0 {
        let preview = output
            .lines()
            .take(args.preview_lines)
            .collect::<Vec<_>>()
            .join("\n");
        println!("\n--- JMH output preview ---");
        println!("{}", preview);
        println!("--- end preview ---\n");
    }

    // 5. Extract the first result table
    let format = TableFormat::with_mode_marker(args.mode.clone());
    let table = extract_first_table(&output, &format)?;
    tracing::info!("Parsed result table with {} row(s)", table.rows.len());
    tracing::debug!("Result table:\n{}", table.render());
    if table.is_empty() {
        tracing::warn!("Result table has a header but no rows; nothing will be updated");
    }

    // 6. Rewrite the example blocks under the module
    check_interrupt()?;
    let synchronizer =
        Synchronizer::new(format, BlockMarkers::default())?.with_cancel_flag(interrupted.clone());
    let updated = synchronizer.sync_dir(module, &table)?;

    // 7. Optional report
    if let Some(path) = &args.report {
        let report = report::SyncReport::new(module, &args.mode, table.rows.len(), &updated);
        report::save_report(&report, path)?;
    }

    if updated.is_empty() {
        tracing::info!(
            "No files were updated (no <pre> blocks with \"{}\" found under {}).",
            args.mode,
            module.display()
        );
    } else {
        println!("\nUpdated files:");
        for path in &updated {
            println!(" - {}", path.display());
        }
    }

    Ok(())
}
