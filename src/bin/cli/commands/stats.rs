use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let stats = app.scheduler.stats();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("Total:     {}", stats.total_items);
            println!("Due:       {}", stats.due_items);
            println!("New:       {}", stats.new_items);
            println!("Learning:  {}", stats.learning_items);
            println!("Reviewing: {}", stats.reviewing_items);
            println!("Lapsed:    {}", stats.lapsed_items);
        }
    }

    Ok(())
}
