//! Snapshot diff command

use clap::Args;
use netverify_core::diff::{diff_documents, render_human_summary};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Pre-stage snapshot file
    pub pre: PathBuf,

    /// Post-stage snapshot file
    pub post: PathBuf,

    /// Output machine-readable JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn execute(args: DiffArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let pre: Value = serde_json::from_str(&fs::read_to_string(&args.pre)?)?;
    let post: Value = serde_json::from_str(&fs::read_to_string(&args.post)?)?;

    let diff = diff_documents(&pre, &post);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
    } else {
        print!("{}", render_human_summary(&diff));
    }
    Ok(if diff.is_empty() { 0 } else { 1 })
}
