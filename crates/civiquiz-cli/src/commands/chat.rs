//! The `civiquiz chat` command.

use std::path::PathBuf;

use anyhow::Result;

use civiquiz_client::config::load_config_from;

pub async fn execute(
    question: String,
    session_id: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let client = config.chat_client()?;

    let session_id = session_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let reply = client.send(&question, Some(&session_id)).await?;

    println!("{}", reply.answer);
    if !reply.sources.is_empty() {
        println!("\nSources ({}):", reply.sources.len());
        for source in reply.sources.iter().take(3) {
            let name = source["source"]
                .as_str()
                .and_then(|s| s.rsplit(|c: char| c == '/' || c == '\\').next())
                .unwrap_or("Legal Document");
            let excerpt: String = source["content"]
                .as_str()
                .unwrap_or_default()
                .chars()
                .take(100)
                .collect();
            println!("  {name}: {excerpt}...");
        }
    }
    if !reply.similar_documents.is_empty() {
        println!("\n({} related passages)", reply.similar_documents.len());
    }
    if let Some(model) = reply.model() {
        match reply.sources_found() {
            Some(n) => println!("Model: {model} (sources: {n})"),
            None => println!("Model: {model}"),
        }
    }
    eprintln!("session: {session_id}");

    Ok(())
}
