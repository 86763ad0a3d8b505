//! The `describe` command: summary statistics for a generated dataset.

use std::path::PathBuf;

use clap::Args;

use storypulse_dataset::SignalsDataset;

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Dataset directory to inspect
    #[arg(long)]
    pub dataset: PathBuf,
}

/// Load a dataset directory and print its summary.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or an artifact fails to
/// parse.
pub fn run_describe(args: &DescribeArgs) -> anyhow::Result<()> {
    let dataset = SignalsDataset::load(&args.dataset)?;
    let summary = dataset.describe();

    println!("dataset: {}", dataset.metadata.name);
    println!("period:  {}", dataset.metadata.period);
    println!("signals: {}", summary.signals);
    println!("periods: {}", summary.periods);
    println!("stories: {}", summary.total_stories);
    println!("volume:  {}", summary.total_volume);
    match (summary.start, summary.end) {
        (Some(start), Some(end)) => println!("range:   {start} .. {end}"),
        _ => println!("range:   (empty)"),
    }

    for signal in dataset.signals() {
        println!(
            "  {} ({}): {} periods",
            signal.config.id,
            signal.config.name,
            signal.buckets.len()
        );
    }

    Ok(())
}
