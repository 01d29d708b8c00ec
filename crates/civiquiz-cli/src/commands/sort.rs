//! The `civiquiz sort` command.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use civiquiz_core::parser::parse_deck_file;
use civiquiz_core::sorting::SortingBoard;

pub async fn execute(deck_path: PathBuf, seed: Option<u64>) -> Result<()> {
    let deck = parse_deck_file(&deck_path)?;
    let mut board = deck.sorting_board()?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = std::io::stdout();
    sort_cards(&mut board, &mut rng, &mut lines, &mut out).await
}

/// Ask for a bin for every card still in the pool, then score the board.
pub async fn sort_cards<R, W>(
    board: &mut SortingBoard,
    rng: &mut StdRng,
    lines: &mut Lines<R>,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut pool: Vec<(u64, String)> = board
        .unplaced()
        .into_iter()
        .map(|c| (c.id, c.text.clone()))
        .collect();
    pool.shuffle(rng);

    let bins = board.bins().to_vec();
    writeln!(out, "{}: sort {} cards", board.category().name, pool.len())?;
    for (i, bin) in bins.iter().enumerate() {
        writeln!(out, "  {}) {}", i + 1, bin)?;
    }

    for (id, text) in pool {
        writeln!(out)?;
        writeln!(out, "Card: {text}")?;
        loop {
            write!(out, "bin> ")?;
            out.flush()?;

            let line = lines
                .next_line()
                .await?
                .context("input ended before every card was placed")?;
            match line.trim().parse::<usize>() {
                Ok(n) if (1..=bins.len()).contains(&n) => {
                    board.place(id, &bins[n - 1])?;
                    break;
                }
                _ => writeln!(out, "Enter a number between 1 and {}", bins.len())?,
            }
        }
    }

    let result = board.check()?;
    writeln!(out)?;
    writeln!(
        out,
        "Sorted correctly: {}/{} ({}%)",
        result.correct, result.total, result.percentage
    )?;
    for mistake in &result.mistakes {
        let text = board
            .bin_contents(&mistake.placed)
            .into_iter()
            .find(|c| c.id == mistake.card_id)
            .map(|c| c.text.clone())
            .unwrap_or_default();
        writeln!(
            out,
            "  '{}' belongs in {}, not {}",
            text, mistake.expected, mistake.placed
        )?;
    }

    Ok(())
}
