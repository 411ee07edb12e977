use anyhow::{bail, Result};

use crate::app::App;
use crate::OutputFormat;

pub async fn run(
    app: &mut App,
    question: String,
    answer: String,
    item_type: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    if question.trim().is_empty() || answer.trim().is_empty() {
        bail!("Question and answer must not be empty");
    }

    let item_type = item_type.unwrap_or_else(|| app.config.default_item_type.clone());
    let item = app.scheduler.add_item(question, answer, item_type).await;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        OutputFormat::Plain => {
            println!("Added to review schedule: \"{}\"", item.question);
            println!("  Type: {}", item.item_type);
            println!("  ID: {}", item.id);
        }
    }

    Ok(())
}
