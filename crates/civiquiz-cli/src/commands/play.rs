//! The `civiquiz play` command.

use std::io::Write;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use civiquiz_client::config::load_config_from;
use civiquiz_client::create_content_provider;
use civiquiz_core::model::CategoryIndex;
use civiquiz_core::session::{InputMode, Phase, Session, Submission};
use civiquiz_core::traits::{ContentProvider, ResultReporter};

use crate::PlayArgs;

pub async fn execute(args: PlayArgs) -> Result<()> {
    if let Some(secs) = args.time_limit {
        anyhow::ensure!(secs > 0, "time limit must be at least 1 second");
    }

    let config = load_config_from(args.config.as_deref())?;
    let provider = create_content_provider(&config, args.deck.as_deref())?;

    let mut session_config = config.session.to_session_config();
    if args.no_shuffle {
        session_config.shuffle_options = false;
    }
    if args.shuffle_questions {
        session_config.shuffle_questions = true;
    }
    if args.free_text {
        session_config.input = InputMode::FreeText;
    }
    if let Some(secs) = args.time_limit {
        session_config.time_limit = Some(std::time::Duration::from_secs(secs));
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut session = Session::new(session_config);
    let ticket = session.begin_load();
    let deck = provider.deck(&args.category).await;
    session.complete_load(ticket, deck, &mut rng);
    if let Phase::Error(e) = session.phase() {
        anyhow::bail!("failed to load '{}': {e}", args.category);
    }

    let reporter = if args.submit {
        Some(config.reporter()?)
    } else {
        None
    };
    let user_name = args.name.or_else(|| config.user_name.clone());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut out = std::io::stdout();
    loop {
        play_session(&mut session, &mut lines, &mut out).await?;

        if let Some(reporter) = &reporter {
            submit(
                &mut session,
                provider.as_ref(),
                reporter,
                user_name.clone(),
                &mut out,
            )
            .await?;
        }

        if !play_again(&mut lines, &mut out).await? {
            break;
        }
        session.reset(&mut rng)?;
    }

    Ok(())
}

/// Ask whether to replay the deck. Anything but yes, including the end of
/// input, means no.
pub async fn play_again<R, W>(lines: &mut Lines<R>, out: &mut W) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out)?;
    write!(out, "Play again? [y/N] ")?;
    out.flush()?;

    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Drive `session` to completion with answers read from `lines`.
pub async fn play_session<R, W>(
    session: &mut Session,
    lines: &mut Lines<R>,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if let Some(category) = session.category() {
        writeln!(out, "{} ({} questions)", category.name, session.total())?;
    }

    let time_limit = session.config().time_limit;
    let input_mode = session.config().input;

    while let Some(index) = session.current_index() {
        let Some(question) = session.current_question().cloned() else {
            break;
        };

        writeln!(out)?;
        match question.difficulty {
            Some(d) => writeln!(
                out,
                "Question {}/{} [{d}]: {}",
                index + 1,
                session.total(),
                question.prompt
            )?,
            None => writeln!(
                out,
                "Question {}/{}: {}",
                index + 1,
                session.total(),
                question.prompt
            )?,
        }
        if input_mode == InputMode::MultipleChoice {
            for (i, option) in question.options.iter().enumerate() {
                writeln!(out, "  {}) {}", i + 1, option.text)?;
            }
        }

        let correct = loop {
            write!(out, "> ")?;
            out.flush()?;

            let line = match time_limit {
                Some(limit) => match tokio::time::timeout(limit, lines.next_line()).await {
                    Ok(line) => line?,
                    Err(_) => {
                        session.time_out()?;
                        writeln!(out)?;
                        writeln!(out, "Time's up!")?;
                        break false;
                    }
                },
                None => lines.next_line().await?,
            };
            let line = line.context("input ended before the quiz was finished")?;
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            match input_mode {
                InputMode::FreeText => break session.answer_text(input)?,
                InputMode::MultipleChoice => match input.parse::<usize>() {
                    Ok(n) if (1..=question.options.len()).contains(&n) => {
                        break session.select_position(n - 1)?;
                    }
                    _ => writeln!(
                        out,
                        "Enter a number between 1 and {}",
                        question.options.len()
                    )?,
                },
            }
        };

        if correct {
            writeln!(out, "Correct!")?;
        } else if let Some(answer) = question.correct_option() {
            writeln!(out, "Wrong. The answer is: {}", answer.text)?;
        }
        if let Some(note) = &question.note {
            writeln!(out, "Note: {note}")?;
        }

        session.advance()?;
    }

    if let Some(result) = session.result() {
        writeln!(out)?;
        writeln!(
            out,
            "Score: {}/{} ({}%)",
            result.score, result.total, result.percentage
        )?;
        writeln!(out, "{}", result.grade)?;
    }

    Ok(())
}

/// Report a completed session, recovering a missing category id from the
/// provider's listing first.
pub async fn submit<W: Write>(
    session: &mut Session,
    provider: &dyn ContentProvider,
    reporter: &dyn ResultReporter,
    user_name: Option<String>,
    out: &mut W,
) -> Result<()> {
    if let Some(category) = session.category().filter(|c| c.id.is_none()).cloned() {
        match provider.categories().await {
            Ok(listing) => match CategoryIndex::from_listing(listing).resolve(&category.name) {
                Ok(resolved) => session.set_category(resolved),
                Err(e) => tracing::warn!("{e}"),
            },
            Err(e) => tracing::warn!("could not fetch categories: {e}"),
        }
    }

    let ticket = session.begin_submit()?;
    let result = reporter.submit(&session.summary(user_name)).await;
    session.complete_submit(ticket, result);

    match session.submission() {
        Submission::Accepted(ack) => {
            match ack.quiz_id {
                Some(id) => writeln!(out, "Results submitted (quiz #{id}).")?,
                None => writeln!(out, "Results submitted.")?,
            }
            writeln!(
                out,
                "Server score: {}/{} ({:.2}%)",
                ack.score, ack.total_questions, ack.percentage
            )?;
            Ok(())
        }
        Submission::Failed(e) => Err(e.clone()).context("failed to submit results"),
        _ => Ok(()),
    }
}
