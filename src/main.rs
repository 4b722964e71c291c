use orbitsim::ScenarioConfig;
use orbitsim::{run_3d, run_headless};

use anyhow::{Context, Result};
use bevy::app::AppExit;
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under scenarios/
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run without a window and print the final state
    #[arg(long)]
    headless: bool,

    /// Frames to run when headless (defaults to the scenario's value)
    #[arg(long)]
    frames: Option<u64>,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("failed to open scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;

    if args.headless {
        let frames = args.frames.unwrap_or(scenario_cfg.parameters.frames);
        let summary = run_headless(&scenario_cfg, frames).context("scene construction failed")?;

        println!("{} frames, t = {:.4}", summary.frames, summary.simulated_time);
        for (i, o) in summary.orbiters.iter().enumerate() {
            println!(
                "orbiter {}: p = [{:.4}, {:.4}, {:.4}], v = [{:.4}, {:.4}, {:.4}]",
                i, o.position.x, o.position.y, o.position.z, o.velocity.x, o.velocity.y, o.velocity.z
            );
        }
    } else {
        let exit = run_3d(&scenario_cfg).context("scene construction failed")?;
        if let AppExit::Error(code) = exit {
            anyhow::bail!("viewer exited with status {}", code);
        }
    }

    Ok(())
}
