//! Workflow recommendation command

use crate::app::{OutputFormat, WorkflowArgs};
use crate::output::{self, terminal};
use anyhow::Result;
use georesolve_core::recommend_workflow;

pub fn run(args: WorkflowArgs, format: OutputFormat) -> Result<()> {
    let recommendation = recommend_workflow(&args.text.join(" "));
    let rendered = output::render(&recommendation, format, terminal::format_workflow)?;
    println!("{}", rendered.trim_end());
    Ok(())
}
