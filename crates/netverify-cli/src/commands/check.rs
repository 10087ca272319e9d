//! Standalone stage check command

use clap::Args;
use netverify_capture::Inventory;
use netverify_core::errors::NvError;
use netverify_engine::check_stage;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Device inventory YAML file
    #[arg(long)]
    pub testbed: PathBuf,

    /// Captured stage directory to evaluate
    #[arg(long)]
    pub dir: PathBuf,

    /// Output machine-readable JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn execute(args: CheckArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let inventory = Inventory::load(&args.testbed).map_err(NvError::from)?;
    let report = check_stage(&inventory, &args.dir)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(if report.succeeded() { 0 } else { 1 })
}
