use anyhow::Result;
use chrono::Utc;

use studybuddy_lib::review::ReviewItem;

use crate::app::App;
use crate::render::terminal::{describe_due, paint, truncate, Color};
use crate::OutputFormat;

pub fn run_due(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let due = app.scheduler.due_items();

    if matches!(format, OutputFormat::Plain) && due.is_empty() {
        println!("No items due for review right now!");
        return Ok(());
    }
    print_items(&due, format, use_color)
}

pub fn run_all(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let items: Vec<&ReviewItem> = app.scheduler.items().iter().collect();

    if matches!(format, OutputFormat::Plain) && items.is_empty() {
        println!("No items in the review schedule.");
        return Ok(());
    }
    print_items(&items, format, use_color)
}

fn print_items(items: &[&ReviewItem], format: &OutputFormat, use_color: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
        OutputFormat::Plain => {
            let now = Utc::now();
            let question_width = items
                .iter()
                .map(|i| i.question.chars().count())
                .max()
                .unwrap_or(8)
                .clamp(8, 40);

            println!(
                "{:<36} {:<qw$} {:<10} {:<10}",
                "ID",
                "Question",
                "Phase",
                "Next",
                qw = question_width
            );

            for item in items {
                let next = describe_due(item.next_review, now);
                let next = if item.is_due_at(now) {
                    paint(&next, Color::YELLOW, use_color)
                } else {
                    paint(&next, Color::DIM, use_color)
                };
                println!(
                    "{:<36} {:<qw$} {:<10} {}",
                    item.id,
                    truncate(&item.question, question_width),
                    item.phase().label(),
                    next,
                    qw = question_width
                );
            }
        }
    }

    Ok(())
}
