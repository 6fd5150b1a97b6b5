use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::{
    compare::{Selection, compare, print_report},
    context::AppContext,
};

#[derive(Debug, PartialEq)]
pub enum Command<'a> {
    Compare { origin: &'a str, apartment: &'a str },
    Clear,
    Quit,
    Empty,
}

pub fn parse_line(line: &str) -> Result<Command<'_>, String> {
    let line = line.trim();

    match line {
        "" => Ok(Command::Empty),
        ":clear" => Ok(Command::Clear),
        ":quit" | ":q" => Ok(Command::Quit),
        _ => match line.split_once('|') {
            Some((origin, apartment)) if !origin.trim().is_empty() && !apartment.trim().is_empty() => {
                Ok(Command::Compare {
                    origin: origin.trim(),
                    apartment: apartment.trim(),
                })
            }
            _ => Err(format!("expected \"origin | apartment\", got \"{line}\"")),
        },
    }
}

/// Reads selections from stdin until EOF or `:quit`. Caches live for the
/// whole session, so repeating a selection does not hit the providers again.
pub async fn run(context: &AppContext) -> anyhow::Result<()> {
    println!("Enter \"origin | apartment\", :clear to drop cached routes, :quit to exit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(Command::Empty) => {}
            Ok(Command::Quit) => break,
            Ok(Command::Clear) => {
                context.caches.clear();
                info!("Caches cleared");
            }
            Ok(Command::Compare { origin, apartment }) => {
                let selection = Selection {
                    origin,
                    apartment,
                    geocode_missing_gate: false,
                };

                match compare(context, selection).await {
                    Ok(report) => print_report(&report),
                    Err(error) => warn!("{error:#}"),
                }
            }
            Err(message) => warn!("{message}"),
        }
    }

    Ok(())
}
