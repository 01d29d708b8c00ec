//! The `civiquiz categories` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use civiquiz_client::config::load_config_from;
use civiquiz_client::create_content_provider;

pub async fn execute(deck: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let provider = create_content_provider(&config, deck.as_deref())?;
    let categories = provider.categories().await?;

    if categories.is_empty() {
        println!("No categories available.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Category", "Questions", "Description"]);
    for c in &categories {
        table.add_row(vec![
            Cell::new(c.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into())),
            Cell::new(&c.name),
            Cell::new(c.question_count),
            Cell::new(c.description.as_deref().unwrap_or("")),
        ]);
    }

    println!("{table}");
    Ok(())
}
