mod output;
mod simulate;

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use cardrank_core::{
    CardId, RankingSession, RatingBook, SelectionPolicy, SessionConfig, Vote, VoteOutcome,
};
use chrono::Utc;
use clap::Parser;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "cardrank", version, about = "Rank cards through pairwise choices")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Interactively place a list of cards into a personal ranking
    Rank(RankArgs),
    /// Re-derive a ranking from a recorded vote log
    Replay(ReplayArgs),
    /// Run a synthetic voter against the insertion algorithm
    Simulate(SimulateArgs),
}

#[derive(Parser)]
struct RankArgs {
    /// File with one card per line, or a JSON array of strings
    #[arg(long)]
    items: Option<PathBuf>,

    /// Inline card (repeatable)
    #[arg(long = "item")]
    inline_items: Vec<String>,

    /// Opponent selection policy: "midpoint" or "random"
    #[arg(long)]
    policy: Option<String>,

    /// K-factor for the ELO leaderboard (default 32)
    #[arg(long)]
    k_factor: Option<f64>,

    /// Save every recorded vote to a JSONL file (replayable later)
    #[arg(long)]
    save_votes: Option<PathBuf>,

    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ReplayArgs {
    /// JSONL vote log, one vote per line
    #[arg(long)]
    votes: PathBuf,

    /// File with card IDs in the order they were liked, one per line
    #[arg(long)]
    order: PathBuf,

    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct SimulateArgs {
    /// Number of cards to insert
    #[arg(long, default_value_t = 100)]
    cards: usize,

    /// Probability that the synthetic voter answers against its own
    /// preference (0.0 = perfectly consistent)
    #[arg(long, default_value_t = 0.0)]
    noise: f64,

    /// RNG seed for arrival order and voter noise
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Opponent selection policy: "midpoint" or "random"
    #[arg(long)]
    policy: Option<String>,
}

fn parse_policy(value: Option<&str>) -> SelectionPolicy {
    match value {
        Some("midpoint") | None => SelectionPolicy::Midpoint,
        Some("random") => SelectionPolicy::Random,
        Some(other) => bail(format!(
            "Unknown policy \"{other}\". Use \"midpoint\" or \"random\"."
        )),
    }
}

/// Parse a string as either a JSON array of strings or plain text (one card per line).
fn parse_items_from_str(content: &str) -> Vec<String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let items: Vec<String> = serde_json::from_str(trimmed)
            .unwrap_or_else(|e| bail(format!("File looks like JSON but failed to parse: {e}")));
        items.into_iter().filter(|s| !s.trim().is_empty()).collect()
    } else {
        trimmed
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Load cards from all sources: --items file, --item inline args, or stdin.
fn load_items(args: &RankArgs) -> Vec<String> {
    let mut items = Vec::new();

    if let Some(ref path) = args.items {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read items file {}: {e}", path.display())));
        items = parse_items_from_str(&content);
    }

    items.extend(args.inline_items.iter().cloned());

    if items.is_empty() {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail("No cards provided. Use --items <file>, --item <name>, or pipe cards via stdin.");
        }
        let content: String = stdin
            .lock()
            .lines()
            .map(|l| l.unwrap_or_else(|e| bail(format!("Failed to read from stdin: {e}"))))
            .collect::<Vec<_>>()
            .join("\n");
        items = parse_items_from_str(&content);
    }

    if items.is_empty() {
        bail("No cards to rank.");
    }
    items
}

fn main() {
    sensible_env_logger::init!();

    let cli = Cli::parse();
    match cli.command {
        Commands::Rank(args) => run_rank(args),
        Commands::Replay(args) => run_replay(args),
        Commands::Simulate(args) => run_simulate(args),
    }
}

/// Ask the user which of the two cards they prefer. Returns the winner ID.
fn ask_preference(
    input: &mut impl BufRead,
    target: CardId,
    target_name: &str,
    opponent: CardId,
    opponent_name: &str,
) -> CardId {
    loop {
        println!("  Which do you prefer?");
        println!("    1) {target_name}");
        println!("    2) {opponent_name}");
        print!("  [1/2] > ");
        io::stdout()
            .flush()
            .unwrap_or_else(|e| bail(format!("Failed to flush stdout: {e}")));

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .unwrap_or_else(|e| bail(format!("Failed to read from stdin: {e}")));
        if read == 0 {
            bail("Input ended before the ranking was complete.");
        }
        match line.trim() {
            "1" => return target,
            "2" => return opponent,
            other => println!("  Please answer 1 or 2 (got \"{other}\")."),
        }
    }
}

fn run_rank(args: RankArgs) {
    let items = load_items(&args);
    let policy = parse_policy(args.policy.as_deref());

    let mut session = RankingSession::new(SessionConfig { policy });
    let mut book = match args.k_factor {
        Some(k) => RatingBook::with_k_factor(k),
        None => RatingBook::new(),
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();

    // Cards are liked in input order; each one is placed before the next
    // is considered, exactly like a swipe session.
    for (idx, name) in items.iter().enumerate() {
        let target = idx as CardId;
        println!("\nPlacing \"{name}\"...");
        loop {
            match session.advance(target) {
                VoteOutcome::Inserted { index } => {
                    println!("  \"{name}\" ranked #{}.", index + 1);
                    break;
                }
                VoteOutcome::NeedsComparison { opponent } => {
                    let opponent_name = &items[opponent as usize];
                    let winner =
                        ask_preference(&mut input, target, name, opponent, opponent_name);
                    let vote = Vote::new(target, opponent, winner, Utc::now())
                        .unwrap_or_else(|e| bail(e));
                    book.record_outcome(vote.winner(), vote.loser());
                    session.record_vote(vote);
                }
            }
        }
    }

    if let Some(ref path) = args.save_votes {
        save_votes(path, session.votes());
        println!("\nSaved {} votes to {}", session.votes().len(), path.display());
    }

    println!();
    if args.json {
        output::print_json(session.ranking(), &items, &book, session.votes().len());
    } else {
        output::print_table(session.ranking(), &items, &book, session.votes().len());
    }
}

fn save_votes(path: &PathBuf, votes: &[Vote]) {
    let mut lines = String::new();
    for vote in votes {
        let line = serde_json::to_string(vote)
            .unwrap_or_else(|e| bail(format!("Failed to serialize vote: {e}")));
        lines.push_str(&line);
        lines.push('\n');
    }
    std::fs::write(path, lines)
        .unwrap_or_else(|e| bail(format!("Failed to write {}: {e}", path.display())));
}

fn run_replay(args: ReplayArgs) {
    let votes = load_votes(&args.votes);
    let order = load_order(&args.order);
    log::debug!("replaying {} votes over {} cards", votes.len(), order.len());

    // The whole log is present up front, so every card must place without
    // new comparisons; that is the re-derivation guarantee. Midpoint is
    // forced: replay never asks anything, so the policy only matters if
    // the log turns out to be incomplete.
    let mut session = RankingSession::with_state(
        Vec::new(),
        votes,
        SessionConfig {
            policy: SelectionPolicy::Midpoint,
        },
    );

    for &target in &order {
        match session.advance(target) {
            VoteOutcome::Inserted { .. } => {}
            VoteOutcome::NeedsComparison { opponent } => bail(format!(
                "Vote log cannot place card {target}: missing comparison against card {opponent}"
            )),
        }
    }

    if args.json {
        output::print_ranking_json(session.ranking());
    } else {
        output::print_ranking_table(session.ranking());
    }
}

fn load_votes(path: &PathBuf) -> Vec<Vote> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| bail(format!("Failed to read vote log {}: {e}", path.display())));
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .enumerate()
        .map(|(n, line)| {
            serde_json::from_str::<Vote>(line).unwrap_or_else(|e| {
                bail(format!("Invalid vote on line {} of {}: {e}", n + 1, path.display()))
            })
        })
        .collect()
}

fn load_order(path: &PathBuf) -> Vec<CardId> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| bail(format!("Failed to read order file {}: {e}", path.display())));
    content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| {
            l.parse::<CardId>()
                .unwrap_or_else(|_| bail(format!("Invalid card ID in order file: \"{l}\"")))
        })
        .collect()
}

fn run_simulate(args: SimulateArgs) {
    if args.cards < 2 {
        bail("Need at least 2 cards to simulate.");
    }
    if !(0.0..=1.0).contains(&args.noise) {
        bail("--noise must be between 0.0 and 1.0.");
    }

    let policy = parse_policy(args.policy.as_deref());
    let report = simulate::run(args.cards, args.noise, args.seed, policy);
    output::print_simulation(&report);
}
