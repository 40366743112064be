use std::io::Write as _;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::debug;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::api::models::{Category, Difficulty, ScoreBand};
use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::session::{
    ControllerError, Evaluation, Phase, SessionController, SessionStore, AUTO_ADVANCE_DELAY,
    QUESTIONS_PER_SESSION,
};

type Input = Lines<BufReader<Stdin>>;

pub async fn run() -> Result<()> {
    let config = AppConfig::from_env();
    let api = ApiClient::new(&config.api_base_url);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => interview(api, None, None).await,
        Some("start") => interview(api, args.get(1), args.get(2)).await,
        Some("summary") => summary(api, args.get(1)).await,
        Some("dashboard") => dashboard(api).await,
        Some("leaderboard") => leaderboard(api, args.get(1)).await,
        Some("weak-areas") => weak_areas(api, args.get(1)).await,
        Some("progress") => progress(api, args.get(1)).await,
        Some("health") => health(api).await,
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some(other) => {
            print_usage();
            bail!("unknown command: {}", other);
        }
    }
}

fn print_usage() {
    println!("InterviewIQ - interview practice from your terminal");
    println!();
    println!("USAGE:");
    println!("  interviewiq                         resume (or start) an interview");
    println!("  interviewiq start <category> [difficulty]");
    println!("                                      categories: coding, system_design, behavioral");
    println!("                                      difficulty: easy, medium, hard");
    println!("  interviewiq summary <session_id>    full transcript with scores");
    println!("  interviewiq dashboard               platform stats, recent sessions, top scores");
    println!("  interviewiq leaderboard [category]");
    println!("  interviewiq weak-areas [threshold]");
    println!("  interviewiq progress <user_id>");
    println!("  interviewiq health");
}

async fn interview(
    api: ApiClient,
    category_arg: Option<&String>,
    difficulty_arg: Option<&String>,
) -> Result<()> {
    let store = SessionStore::new(SessionStore::default_path());
    let controller = SessionController::new(api, store);
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    let explicit_start = category_arg.is_some();
    if matches!(controller.phase(), Phase::Uninitialized) || explicit_start {
        let category = match category_arg {
            Some(raw) => Category::from_str(raw)
                .with_context(|| format!("unknown category '{}' (coding, system_design, behavioral)", raw))?,
            None => pick_category(&mut input).await?,
        };
        let difficulty = match difficulty_arg {
            Some(raw) => Some(
                Difficulty::from_str(raw)
                    .with_context(|| format!("unknown difficulty '{}' (easy, medium, hard)", raw))?,
            ),
            None => None,
        };
        controller.start(category, difficulty).await?;
        println!("\nStarting a {} interview. Type 'quit' to exit.", category);
    } else if let Some(session) = controller.active_session() {
        println!(
            "\nResuming your {} interview at question {}. Type 'quit' to exit.",
            session.category, session.question_number
        );
    }

    loop {
        match controller.phase() {
            Phase::AwaitingAnswer => {
                let session = controller.active_session().context("no active session")?;
                println!();
                println!(
                    "── Question {}/{} [{}] ──",
                    session.question_number, QUESTIONS_PER_SESSION, session.category
                );
                println!("{}", session.question);
                let draft = controller.draft();
                if !draft.is_empty() {
                    println!("(press Enter to resend your previous answer)");
                }
                print!("> ");
                std::io::stdout().flush().ok();

                let Some(line) = input.next_line().await? else {
                    // stdin closed; keep the session so it can be resumed
                    println!();
                    break;
                };
                if line.trim() == "quit" {
                    controller.discard();
                    println!("Session discarded. Run `interviewiq start` for a new one.");
                    break;
                }
                let answer = if line.trim().is_empty() && !draft.is_empty() {
                    draft
                } else {
                    line
                };

                match controller.submit_answer(&answer).await {
                    Ok(evaluation) => print_evaluation(&evaluation),
                    Err(ControllerError::EmptyAnswer) => {
                        println!("Please write an answer before submitting.");
                    }
                    Err(ControllerError::Api(e)) => {
                        println!("Submission failed: {}. Your answer was kept - press Enter to retry.", e);
                    }
                    Err(e) => {
                        println!("{}", e);
                    }
                }
            }
            Phase::ShowingEvaluation { .. } => {
                println!(
                    "Next question in {} seconds - press Enter to skip the wait.",
                    AUTO_ADVANCE_DELAY.as_secs()
                );
                tokio::select! {
                    _ = tokio::time::sleep(AUTO_ADVANCE_DELAY + Duration::from_millis(200)) => {}
                    line = input.next_line() => {
                        match line? {
                            Some(_) => controller.skip_wait(),
                            None => break,
                        }
                    }
                }
            }
            Phase::Complete { evaluation } => {
                println!();
                println!("🎉 Interview complete!");
                print_evaluation(&evaluation);
                if let Some(session) = controller.active_session() {
                    println!(
                        "Run `interviewiq summary {}` later to review the transcript.",
                        session.session_id
                    );
                }
                controller.discard();
                break;
            }
            Phase::Evaluating => {
                // transient; submit_answer resolves this before we loop again
                debug!("waiting for evaluation to settle");
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            Phase::Uninitialized => break,
        }
    }
    Ok(())
}

async fn pick_category(input: &mut Input) -> Result<Category> {
    loop {
        println!("Pick a category:");
        for (i, category) in Category::ALL.iter().enumerate() {
            println!("  {}. {}", i + 1, category);
        }
        print!("> ");
        std::io::stdout().flush().ok();
        let Some(line) = input.next_line().await? else {
            bail!("no category selected");
        };
        let choice = line.trim();
        if let Some(category) = Category::from_str(choice) {
            return Ok(category);
        }
        match choice.parse::<usize>() {
            Ok(n) if (1..=Category::ALL.len()).contains(&n) => return Ok(Category::ALL[n - 1]),
            _ => println!("Not a category: {}", choice),
        }
    }
}

fn print_evaluation(evaluation: &Evaluation) {
    let band = ScoreBand::for_score(evaluation.score);
    println!();
    println!("── Evaluation ── score {}/100 ({})", evaluation.score, band.label());
    println!("{}", evaluation.text);
}

async fn summary(api: ApiClient, session_id: Option<&String>) -> Result<()> {
    let session_id = session_id.context("usage: interviewiq summary <session_id>")?;
    let summary = api.session_summary(session_id).await?;

    println!(
        "Session {} [{} / {}] - started {}",
        summary.session_id,
        summary.category,
        summary.difficulty,
        summary.started_at.format("%Y-%m-%d %H:%M")
    );
    match (summary.is_completed, summary.average_score) {
        (true, Some(avg)) => println!(
            "Completed, {} questions, average score {:.1} ({})",
            summary.total_questions,
            avg,
            ScoreBand::for_score(avg.round() as u32).label()
        ),
        (true, None) => println!("Completed, {} questions", summary.total_questions),
        (false, _) => println!("In progress, {} questions so far", summary.total_questions),
    }
    for response in &summary.responses {
        println!();
        println!("Q{}: {}", response.question_number, response.question);
        println!("A: {}", response.answer);
        println!("Score {}/100 - {}", response.score, response.evaluation);
    }
    Ok(())
}

async fn dashboard(api: ApiClient) -> Result<()> {
    let stats = api.platform_stats().await?;
    println!("── Platform ──");
    println!(
        "{} sessions, {} completed ({:.1}%), average score {:.1}",
        stats.total_sessions, stats.completed_sessions, stats.completion_rate, stats.average_score
    );
    if !stats.by_category.is_empty() {
        let mut by_category: Vec<_> = stats.by_category.iter().collect();
        by_category.sort_by(|a, b| b.1.cmp(a.1));
        for (category, count) in by_category {
            println!("  {:<14} {}", category, count);
        }
    }

    let recent = api.recent_sessions(10).await?;
    println!();
    println!("── Recent sessions ({}) ──", recent.total);
    for session in &recent.sessions {
        println!(
            "{}  {:<14} {}  {}",
            session.started_at.format("%Y-%m-%d %H:%M"),
            session.category,
            if session.completed { "done" } else { "open" },
            session
                .average_score
                .map(|s| format!("{:.1}", s))
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    let top = api.leaderboard(None, 5).await?;
    println!();
    println!("── Top sessions ──");
    print_leaderboard_entries(&top);
    Ok(())
}

async fn leaderboard(api: ApiClient, category_arg: Option<&String>) -> Result<()> {
    let category = match category_arg {
        Some(raw) => Some(
            Category::from_str(raw)
                .with_context(|| format!("unknown category '{}'", raw))?,
        ),
        None => None,
    };
    let board = api.leaderboard(category, 10).await?;
    println!("── Leaderboard ({} entries) ──", board.total_entries);
    print_leaderboard_entries(&board);
    Ok(())
}

fn print_leaderboard_entries(board: &crate::api::Leaderboard) {
    for entry in &board.leaderboard {
        println!(
            "#{:<3} {:<14} {:>5.1}  ({} questions, {})",
            entry.rank,
            entry.category,
            entry.score,
            entry.questions,
            entry.date.as_deref().unwrap_or("-"),
        );
    }
}

async fn weak_areas(api: ApiClient, threshold_arg: Option<&String>) -> Result<()> {
    let threshold = match threshold_arg {
        Some(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("threshold must be a number, got '{}'", raw))?,
        None => 60,
    };
    let weak = api.weak_areas(threshold, None).await?;
    if weak.weak_areas.is_empty() {
        println!("No categories scoring under {}.", weak.threshold);
        return Ok(());
    }
    println!("── Weak areas (score < {}) ──", weak.threshold);
    let mut areas: Vec<_> = weak.weak_areas.iter().collect();
    areas.sort_by(|a, b| a.1.avg_score.partial_cmp(&b.1.avg_score).unwrap_or(std::cmp::Ordering::Equal));
    for (category, area) in areas {
        println!(
            "{:<14} avg {:>5.1} over {} answers",
            category, area.avg_score, area.count
        );
    }
    Ok(())
}

async fn progress(api: ApiClient, user_id_arg: Option<&String>) -> Result<()> {
    let user_id = user_id_arg
        .context("usage: interviewiq progress <user_id>")?
        .parse::<i64>()
        .context("user_id must be a number")?;
    let progress = api.user_progress(user_id, 20).await?;
    if progress.total_sessions == 0 {
        println!(
            "{}",
            progress
                .message
                .unwrap_or_else(|| "No sessions found for this user".to_string())
        );
        return Ok(());
    }
    println!(
        "── Progress for user {} ({} sessions, {:+.1} improvement) ──",
        progress.user_id, progress.total_sessions, progress.improvement
    );
    for point in &progress.progress {
        println!(
            "{}  {:<14} {:>5.1}  ({} questions)",
            point.date, point.category, point.score, point.questions
        );
    }
    Ok(())
}

async fn health(api: ApiClient) -> Result<()> {
    let health = api.health_check().await?;
    println!(
        "api: {}  database: {}  status: {}",
        health.api, health.database, health.status
    );
    if !health.is_healthy() {
        bail!("backend is not healthy");
    }
    Ok(())
}
