//! The `civiquiz validate` command.

use std::path::PathBuf;

use anyhow::Result;

use civiquiz_core::parser::{load_decks, validate_deck_file};

pub fn execute(decks_path: PathBuf) -> Result<()> {
    let decks = load_decks(&decks_path)?;
    anyhow::ensure!(!decks.is_empty(), "no decks found in {}", decks_path.display());

    let mut total_warnings = 0;

    for deck in &decks {
        println!(
            "Deck: {} ({}, {} items)",
            deck.name,
            deck.mode,
            deck.item_count()
        );

        let warnings = validate_deck_file(deck);
        for w in &warnings {
            let prefix = w
                .item_id
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All decks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
