use anyhow::{Context, Result};

use studybuddy_lib::review::algorithm::format_interval;

use crate::app::App;
use crate::OutputFormat;

pub async fn run(app: &mut App, id: &str, quality: i32, format: &OutputFormat) -> Result<()> {
    if !(1..=5).contains(&quality) {
        log::warn!("Quality {} is outside the usual 1-5 range", quality);
    }

    let item = app
        .scheduler
        .record_review(id, quality)
        .await
        .with_context(|| format!("No review item with ID {}", id))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        OutputFormat::Plain => {
            println!("Reviewed \"{}\" with quality {}", item.question, quality);
            println!(
                "  Next review in {} ({})",
                format_interval(item.interval),
                item.next_review.format("%Y-%m-%d %H:%M")
            );
            println!("  Ease factor: {:.2}", item.ease_factor);
        }
    }

    Ok(())
}

pub fn run_preview(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    let intervals = app
        .scheduler
        .preview_intervals(id)
        .with_context(|| format!("No review item with ID {}", id))?;

    match format {
        OutputFormat::Json => {
            let output: serde_json::Map<String, serde_json::Value> = intervals
                .iter()
                .enumerate()
                .map(|(i, days)| ((i + 1).to_string(), serde_json::json!(days)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            for (i, days) in intervals.iter().enumerate() {
                println!("  {}: {}", i + 1, format_interval(*days));
            }
        }
    }

    Ok(())
}
