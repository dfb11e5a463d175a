//! Config command

use crate::app::{ConfigArgs, OutputFormat};
use anyhow::Result;
use georesolve_core::Config;
use std::path::Path;

pub fn run(args: ConfigArgs, config: &Config, path: &Path, format: OutputFormat) -> Result<()> {
    if args.init {
        config.save_to(path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let mut shown = config.clone();
    if let Some(ref mut llm) = shown.llm {
        if llm.api_key.is_some() {
            llm.api_key = Some("********".to_string());
        }
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
        OutputFormat::Cli => {
            println!("# {}", path.display());
            print!("{}", shown.to_yaml()?);
        }
    }
    Ok(())
}
