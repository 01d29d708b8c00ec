//! The `civiquiz init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create civiquiz.toml
    if std::path::Path::new("civiquiz.toml").exists() {
        println!("civiquiz.toml already exists, skipping.");
    } else {
        std::fs::write("civiquiz.toml", SAMPLE_CONFIG)?;
        println!("Created civiquiz.toml");
    }

    // Create example deck
    std::fs::create_dir_all("decks")?;
    let example_path = std::path::Path::new("decks/example.toml");
    if example_path.exists() {
        println!("decks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_DECK)?;
        println!("Created decks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: civiquiz validate --decks decks");
    println!("  2. Run: civiquiz play --category \"Nepal Basics\"");
    println!("  3. Remove decks_dir from civiquiz.toml to play against your quiz server");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# civiquiz configuration

api_base_url = "http://127.0.0.1:8000/api/quize"
chat_base_url = "http://localhost:8000/api"
# user_name = "${USER}"
request_timeout_secs = 30
# Play local deck files instead of the server.
decks_dir = "./decks"

[session]
shuffle_questions = false
shuffle_options = true
# time_limit_secs = 30
free_text = false
"#;

const EXAMPLE_DECK: &str = r#"[deck]
name = "Nepal Basics"
description = "A short example deck to get started"
mode = "quiz"

[[questions]]
id = 1
prompt = "What is the capital of Nepal?"
options = ["Pokhara", "Kathmandu", "Biratnagar", "Lalitpur"]
answer = 1
difficulty = "easy"

[[questions]]
id = 2
prompt = "How many provinces does Nepal have under the 2015 constitution?"
options = ["5", "7", "9", "14"]
answer = 1
difficulty = "easy"
note = "The constitution of 2015 created seven provinces."

[[questions]]
id = 3
prompt = "Which body makes federal laws?"
options = ["Supreme Court", "Federal Parliament", "Election Commission"]
answer = 1
difficulty = "medium"
"#;
