use anyhow::Result;
use cell_tools::cli::FilterArgs;
use cell_tools::data::filter::filter_file;
use clap::Parser;

fn main() -> Result<()> {
    env_logger::init();

    let args = FilterArgs::parse();
    let criteria = args.criteria();
    filter_file(&args.input, &args.output, criteria, args.columns)?;

    println!("Filtering completed.");
    Ok(())
}
