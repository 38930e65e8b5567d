/// Output formatting: terminal tables and JSON.
use cardrank_core::{CardId, RatingBook};
use serde::Serialize;

use crate::simulate::SimulationReport;

#[derive(Serialize)]
struct JsonRankedCard {
    rank: usize,
    name: String,
    elo: f64,
    votes: u32,
}

#[derive(Serialize)]
struct JsonOutput {
    ranking: Vec<JsonRankedCard>,
    total_votes: usize,
}

/// Print the personal ranking with each card's leaderboard stats.
pub fn print_table(ranking: &[CardId], names: &[String], book: &RatingBook, total_votes: usize) {
    let name_width = ranking
        .iter()
        .map(|&c| names[c as usize].len())
        .max()
        .unwrap_or(4)
        .max(4);

    println!(" # | {:<name_width$} |    ELO | Votes", "Card");
    println!("---|-{}-|--------|------", "-".repeat(name_width));

    for (i, &card) in ranking.iter().enumerate() {
        let name = &names[card as usize];
        let votes = book.card(card).map(|r| r.votes).unwrap_or(0);
        println!(
            "{:>2} | {:<name_width$} | {:>6.0} | {:>5}",
            i + 1,
            name,
            book.rating(card),
            votes,
        );
    }

    println!("\n{} cards ranked from {} votes", ranking.len(), total_votes);
}

/// Print the personal ranking as JSON.
pub fn print_json(ranking: &[CardId], names: &[String], book: &RatingBook, total_votes: usize) {
    let cards: Vec<JsonRankedCard> = ranking
        .iter()
        .enumerate()
        .map(|(i, &card)| JsonRankedCard {
            rank: i + 1,
            name: names[card as usize].clone(),
            elo: book.rating(card),
            votes: book.card(card).map(|r| r.votes).unwrap_or(0),
        })
        .collect();

    let output = JsonOutput {
        ranking: cards,
        total_votes,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&output).expect("ranking output is serializable")
    );
}

/// Print a replayed ranking (IDs only; replay has no name table).
pub fn print_ranking_table(ranking: &[CardId]) {
    println!(" # | Card ID");
    println!("---|--------");
    for (i, &card) in ranking.iter().enumerate() {
        println!("{:>2} | {card}", i + 1);
    }
    println!("\n{} cards re-derived from the vote log", ranking.len());
}

pub fn print_ranking_json(ranking: &[CardId]) {
    println!(
        "{}",
        serde_json::to_string_pretty(&ranking).expect("ranking output is serializable")
    );
}

/// Print a simulation summary.
pub fn print_simulation(report: &SimulationReport) {
    println!(
        "Simulated {} cards (noise {:.2}, seed {}, policy {:?})",
        report.cards, report.noise, report.seed, report.policy,
    );
    println!(
        "Comparisons: {} total, {:.2} avg per insertion, {} worst",
        report.total_comparisons, report.avg_comparisons, report.max_comparisons,
    );
    println!(
        "Inversions vs true preference: {} of {} pairs",
        report.inversions,
        report.cards * (report.cards - 1) / 2,
    );

    if !report.leaderboard_top.is_empty() {
        println!("\nELO leaderboard (top {}):", report.leaderboard_top.len());
        for (i, (card, rating)) in report.leaderboard_top.iter().enumerate() {
            println!("{:>2}. card {:<4} {:>6.0}", i + 1, card, rating);
        }
    }
}
