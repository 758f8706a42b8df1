use std::fs::File;

use anyhow::{Context, Result};
use cell_tools::cli::SampleArgs;
use cell_tools::data::sample::write_sample;
use clap::Parser;

fn main() -> Result<()> {
    env_logger::init();

    let args = SampleArgs::parse();
    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let rows = write_sample(file, args.rows, args.seed)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!(
        "Wrote {rows} cell rows (seed {}) to {}",
        args.seed,
        args.output.display()
    );
    Ok(())
}
