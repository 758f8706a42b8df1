use anyhow::Result;
use cell_tools::cli::MapArgs;
use cell_tools::render::render_file;
use clap::Parser;

fn main() -> Result<()> {
    env_logger::init();

    let args = MapArgs::parse();
    render_file(&args.input, &args.output, args.timezone)?;

    println!(
        "Map generated successfully and saved to {}.",
        args.output.display()
    );
    Ok(())
}
