use anyhow::{Context, Result};
use postgate::router::{PostRouter, RouterConfig};
use std::path::Path;

use crate::demo;

pub fn run_schematic_command(config: &RouterConfig, output: Option<&Path>) -> Result<()> {
    let ctx = demo::context(demo::DRAWING_POST, None);
    let router = PostRouter::new(&ctx, config).context("Failed to build post router")?;
    let gate = router.gate();

    let mut json = gate.schematic().to_json();
    json["order"] = serde_json::json!(gate.keys().collect::<Vec<_>>());
    let rendered = serde_json::to_string_pretty(&json)?;

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            println!("Schematic saved to: {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
