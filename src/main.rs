mod config;
mod errors;
mod fastq;
mod pipeline;
mod report;
mod stats;
mod trim;

use std::fs::File;
use std::time::Instant;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use env_logger::Env;
use log::info;

use crate::config::Cli;
use crate::pipeline::PipelineConfig;
use crate::trim::{Adapter, TrimParams};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Missing required arguments print usage and exit cleanly, they are
    // not a processing failure.
    let (input, output, adapter) = match (&cli.input, &cli.output, &cli.adapter) {
        (Some(i), Some(o), Some(a)) => (i.clone(), o.clone(), a.clone()),
        _ => {
            eprintln!("Missing required arguments\n");
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    let cfg = PipelineConfig {
        input,
        output,
        adapter: Adapter::new(&adapter, cli.min5_match),
        params: TrimParams {
            min_len: cli.min_len,
            trim5: cli.trim5,
            trim3: cli.trim3,
            max_error: cli.max_error,
        },
        threads: cli.thread_num(),
        batch_size: cli.effective_batch_size(),
        queue_depth: cli.effective_queue_depth(),
        compression: cli.compression,
    };

    info!(
        "trimming {} -> {} (adapter {}, min_len {}, trim5 {}, trim3 {}, min5_match {}, max_error {}, {} threads)",
        cfg.input, cfg.output, adapter, cli.min_len, cli.trim5, cli.trim3, cli.min5_match,
        cli.max_error, cfg.threads
    );

    let start = Instant::now();
    let snapshot = pipeline::run(&cfg).context("error processing reads")?;
    let elapsed = start.elapsed();

    if let Some(json_path) = &cli.json {
        let f = File::create(json_path)
            .with_context(|| format!("cannot create json report '{json_path}'"))?;
        serde_json::to_writer_pretty(f, &snapshot)?;
    }

    report::print_summary(&snapshot, elapsed);
    println!("\nTrimming completed");
    Ok(())
}
