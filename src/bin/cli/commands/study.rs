use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use studybuddy_lib::review::algorithm::format_interval;
use studybuddy_lib::review::ReviewSession;

use crate::app::App;
use crate::render::terminal::{paint, Color};

/// Walk through the due items: Enter reveals the answer, 1-5 grades it,
/// `q` quits.
pub async fn run(app: &mut App, use_color: bool) -> Result<()> {
    let mut session = ReviewSession::start(&app.scheduler);
    if session.is_empty() {
        println!("No items due for review right now!");
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut graded = 0;

    while graded < session.len() {
        let Some(item) = session.current(&app.scheduler) else {
            break;
        };

        println!();
        println!(
            "{} {}",
            paint(
                &format!("[{}/{}]", session.position(), session.len()),
                Color::DIM,
                use_color
            ),
            paint(&item.question, Color::BOLD, use_color)
        );

        if !session.is_revealed() {
            println!("(Enter to show answer, q to quit)");
            match lines.next_line().await? {
                Some(line) if line.trim() == "q" => break,
                Some(_) => session.reveal(),
                None => break,
            }
            continue;
        }

        println!("{}", paint(&item.answer, Color::CYAN, use_color));
        println!("How well did you know this? (1-5, q to quit)");

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input == "q" {
            break;
        }
        let quality = match input.parse::<i32>() {
            Ok(q) if (1..=5).contains(&q) => q,
            _ => {
                println!("Please enter a number from 1 to 5.");
                continue;
            }
        };

        if let Some(updated) = session.grade(&mut app.scheduler, quality).await {
            graded += 1;
            println!(
                "{}",
                paint(
                    &format!("Next review in {}", format_interval(updated.interval)),
                    Color::GREEN,
                    use_color
                )
            );
        }
    }

    println!();
    println!("Reviewed {} of {} due items.", graded, session.len());
    Ok(())
}
