//! Verification run command

use clap::Args;
use netverify_capture::{FsCaptureSource, Inventory};
use netverify_core::errors::NvError;
use netverify_engine::{execute as execute_run, RunConfig};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Device inventory YAML file
    #[arg(long)]
    pub testbed: PathBuf,

    /// Pre-stage directory
    #[arg(long)]
    pub pre: PathBuf,

    /// Post-stage directory; absence designates a pre-only run
    #[arg(long)]
    pub post: Option<PathBuf>,

    /// Directory the capture collaborator exports state documents to
    #[arg(long)]
    pub source: PathBuf,

    /// Do not require devices to be marked connected
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    /// Upper bound on concurrently processed (device, kind) units
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Output machine-readable JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn execute(args: RunArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let inventory = Inventory::load(&args.testbed).map_err(NvError::from)?;

    // Pre + post selects the post directory as this run's report target
    // and the pre directory as its baseline; pre alone is baseline capture.
    let (report_dir, baseline_dir) = match &args.post {
        Some(post) => (post.clone(), Some(args.pre.clone())),
        None => (args.pre.clone(), None),
    };

    let source = FsCaptureSource::new(&args.source);
    let config = RunConfig {
        report_dir,
        baseline_dir,
        max_concurrency: args.max_concurrency,
        offline: args.offline,
    };
    let report = execute_run(&inventory, &source, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(if report.succeeded() { 0 } else { 1 })
}
