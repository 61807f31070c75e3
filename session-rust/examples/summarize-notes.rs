//! Summarize a notes file against a running backend.
//!
//! ```sh
//! cargo run --example summarize-notes -- "Weekly sync" notes.txt action a@x.com,b@y.com
//! ```
//! The preset and recipients are optional. The backend is read from
//! `NOTES_API_BASE_URL` (a `.env` file works too).

use dotenvy::dotenv;
use notes_sdk::{NotesClient, NotesClientOptions};
use notes_session::{Session, SessionOptions};
use std::{error::Error, sync::Arc};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(title), Some(path)) = (args.next(), args.next()) else {
        eprintln!("usage: summarize-notes <title> <notes-file> [preset] [recipients]");
        std::process::exit(2);
    };
    let preset = args.next();
    let recipients = args.next();

    let client = Arc::new(NotesClient::new(NotesClientOptions::from_env())?);
    let session = Session::new(client, SessionOptions::default());

    session.composer().set_title(title);
    session.composer().set_notes(std::fs::read_to_string(path)?);
    if let Some(preset) = preset {
        session.composer().apply_quick_prompt(&preset);
    }

    let summary = session.submit().await?;
    println!("{}", summary.body_text);

    if let Some(recipients) = recipients {
        session.distributor().set_recipients(recipients);
        let request = session.send_email().await?;
        println!("\nEmailed to {}", request.recipients.join(", "));
    }

    let history = session.history().refresh().await?;
    println!("\n{} summaries in history:", history.len());
    for record in history {
        println!(
            "- [{}] {} ({})",
            record.id,
            record.title,
            record.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}
