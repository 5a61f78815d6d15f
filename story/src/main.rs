//! Interactive story CLI.
//!
//! A line-based chat loop over the story engine. Free text advances
//! the story; the commands `status`, `progress`, `endings`, and `save`
//! query or checkpoint it.
//!
//! Run with: `cargo run -p story -- world.json Mira`
//! Resume with: `cargo run -p story -- --resume saves/Mira.json`

use std::io::{self, Write};
use story_core::persist::story_save_path;
use story_core::{StorySession, WorldSeed};

const SAVE_DIR: &str = "saves";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut session = match args.as_slice() {
        [flag, path] if flag == "--resume" => StorySession::load(path).await?,
        [world_path, character] => {
            let seed = WorldSeed::load_json(world_path).await?;
            StorySession::new(seed, character)?
        }
        _ => {
            eprintln!("Usage: story <world.json> <character>");
            eprintln!("       story --resume <save.json>");
            std::process::exit(1);
        }
    };

    println!("Interactive Story");
    println!("=================");
    println!(
        "You are {}. Your choices shape the story.",
        session.player_name()
    );
    println!("Commands: status [name], progress, endings, save, quit.\n");

    let save_path = story_save_path(SAVE_DIR, session.player_name());

    loop {
        print!("[{}] > ", session.player_name());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            println!("Say something to continue the story.");
            continue;
        }

        // Commands match the whole line, so story text like
        // "save my friend" still reaches the engine.
        let lower = input.to_lowercase();
        match lower.as_str() {
            "quit" => break,
            "status" => match session.player_status() {
                Ok(status) => println!("\n{status}"),
                Err(e) => println!("\n{e}"),
            },
            _ if lower.starts_with("status ") => {
                match session.status(input["status ".len()..].trim()) {
                    Ok(status) => println!("\n{status}"),
                    Err(e) => println!("\n{e}"),
                }
            }
            "progress" => {
                println!("\n{}", session.progress());
            }
            "endings" => {
                let endings = session.endings();
                if endings.is_empty() {
                    println!("\nNo story branches discovered yet. Keep making choices!");
                } else {
                    println!("\n=== Story Branches ===");
                    for ending in endings {
                        print!("{ending}");
                    }
                }
            }
            "save" => {
                tokio::fs::create_dir_all(SAVE_DIR).await?;
                match session.save(&save_path).await {
                    Ok(()) => println!("\nSaved to {}.", save_path.display()),
                    Err(e) => println!("\nSave failed: {e}"),
                }
            }
            _ => match session.process_turn(input) {
                Ok(outcome) => println!("\n{}\n", outcome.narrative),
                Err(e) => println!("\nThat didn't land: {e}"),
            },
        }
    }

    // Final checkpoint so the story can be continued later.
    tokio::fs::create_dir_all(SAVE_DIR).await?;
    session.save(&save_path).await?;
    println!(
        "\nThanks for playing, {}. Story saved to {}.",
        session.player_name(),
        save_path.display()
    );

    Ok(())
}
