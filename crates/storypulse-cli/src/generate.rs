//! The `generate` command: load signals, build the API client, and drive the
//! dataset assembler.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Args;

use storypulse_core::AppConfig;
use storypulse_dataset::{generate_dataset, GenerateRequest, DEFAULT_DATASET_NAME};
use storypulse_newsapi::{NewsApiClient, DEFAULT_PERIOD};

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// CSV file of entities to track (one signal per row)
    #[arg(long)]
    pub input: PathBuf,

    /// Directory the dataset is written to
    #[arg(long)]
    pub output: PathBuf,

    /// Range start date (inclusive), YYYY-MM-DD
    #[arg(long)]
    pub start: String,

    /// Range end date (exclusive), YYYY-MM-DD
    #[arg(long)]
    pub end: String,

    /// Column holding the entity id
    #[arg(long, default_value = "wikidata_id")]
    pub id_field: String,

    /// Column holding the display name
    #[arg(long, default_value = "name")]
    pub name_field: String,

    /// Maximum stories sampled per period
    #[arg(long, default_value_t = 20)]
    pub stories_per_period: u32,

    /// Dataset display name stored in metadata
    #[arg(long, default_value = DEFAULT_DATASET_NAME)]
    pub name: String,

    /// Delete an existing output directory and rebuild (asks first)
    #[arg(long)]
    pub overwrite: bool,

    /// Remove per-signal time-series and log files after each signal is
    /// fully realized
    #[arg(long)]
    pub delete_tmp_files: bool,
}

/// Run dataset generation end to end.
///
/// # Errors
///
/// Returns an error if the API key is missing, the input file fails to load,
/// a date does not parse, or the pipeline aborts.
pub async fn run_generate(config: &AppConfig, args: &GenerateArgs) -> anyhow::Result<()> {
    let api_key = config
        .api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("STORYPULSE_API_KEY is not set; cannot run generate"))?;

    let client = NewsApiClient::with_base_url(
        api_key,
        config.request_timeout_secs,
        &config.api_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build news API client: {e}"))?
    .with_retry_policy(config.max_retries, config.retry_backoff_base_ms);

    let signals = storypulse_core::load_signals_csv(&args.input, &args.id_field, &args.name_field)?;
    if signals.is_empty() {
        println!("no signals found in {}; nothing to do", args.input.display());
        return Ok(());
    }
    tracing::info!(
        signals = signals.len(),
        input = %args.input.display(),
        "loaded signal descriptors"
    );

    let request = GenerateRequest {
        signals,
        output_dir: args.output.clone(),
        start: parse_date(&args.start)?,
        end: parse_date(&args.end)?,
        period: DEFAULT_PERIOD.to_string(),
        language: config.language.clone(),
        stories_per_period: args.stories_per_period,
        dataset_name: args.name.clone(),
        overwrite: args.overwrite,
        delete_tmp_files: args.delete_tmp_files,
    };

    let dataset = generate_dataset(&client, &request, confirm_on_stdin).await?;

    let summary = dataset.describe();
    println!(
        "generated dataset '{}': {} signals, {} periods, {} stories ({} total volume)",
        dataset.metadata.name,
        summary.signals,
        summary.periods,
        summary.total_stories,
        summary.total_volume
    );
    Ok(())
}

fn parse_date(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{raw}' (expected YYYY-MM-DD): {e}"))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

/// Interactive guard for the destructive overwrite path: prints the prompt
/// and accepts only an explicit `y`.
fn confirm_on_stdin(prompt: &str) -> bool {
    print!("{prompt}");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    answer.trim() == "y"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_days() {
        let parsed = parse_date("2023-01-15").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2023-01-15T00:00:00+00:00");
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("01/15/2023").is_err());
    }
}
