//! penney-runner: headless generate-and-score pipeline for Penney's Game.
//!
//! Usage:
//!   penney-runner --decks 10000 --seed 12345 --db decks.db
//!   penney-runner --config data/config.json --decks 0 --parallel
//!   penney-runner --decks 50000 --no-score

use anyhow::{Context, Result};
use penney_core::{
    config::PenneyConfig,
    matrix::{MatrixBundle, WinDrawMatrix},
    pipeline::Pipeline,
    store::DeckStore,
    types::new_run_id,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match flag_value(&args, "--config") {
        Some(path) => PenneyConfig::load(path)?,
        None => PenneyConfig::default(),
    };
    if let Some(db) = flag_value(&args, "--db") {
        config.db_path = db.to_string();
    }
    if let Some(results) = flag_value(&args, "--results") {
        config.results_csv = results.to_string();
    }
    if let Some(matrix) = flag_value(&args, "--matrix") {
        config.matrix_json = matrix.to_string();
    }
    config.batch_size = parse_arg(&args, "--batch-size", config.batch_size);
    config.pattern_length = parse_arg(&args, "--pattern-length", config.pattern_length);
    config.validate()?;

    let decks = parse_arg(&args, "--decks", 10_000u64);
    let seed = flag_value(&args, "--seed")
        .map(|s| s.parse::<u64>().with_context(|| format!("--seed: cannot parse '{s}'")))
        .transpose()?;
    let parallel = args.iter().any(|a| a == "--parallel");
    let score = !args.iter().any(|a| a == "--no-score");

    println!("Penney's Game - penney-runner");
    println!("  decks:          {decks}");
    println!("  pattern length: {}", config.pattern_length);
    println!("  batch size:     {}", config.batch_size);
    println!("  db:             {}", config.db_path);
    println!();

    let store = DeckStore::open(&config.db_path)
        .with_context(|| format!("opening {}", config.db_path))?;
    let mut pipeline = Pipeline::start(new_run_id(), seed, config, store)?;

    println!("--- STAGE 1: Generating decks (master seed {}) ---", pipeline.seed());
    pipeline.generate(decks)?;

    if score {
        println!("--- STAGE 2: Scoring decks ---");
        let stats = pipeline.score(parallel)?;
        println!("  scored {} decks ({} playthroughs)", stats.decks_processed, stats.playthroughs);

        println!("--- STAGE 3: Exporting results ---");
        let bundle = pipeline.export()?;
        print_matrices(&bundle);
    }

    pipeline.finish()?;
    log::info!("Run {} finished", pipeline.run_id);
    print_summary(&pipeline)?;
    Ok(())
}

fn print_matrices(bundle: &MatrixBundle) {
    for matrix in [&bundle.tricks, &bundle.cards] {
        println!();
        print!("{}", matrix.render_text());
        print_best_choices(matrix);
    }
}

fn print_best_choices(matrix: &WinDrawMatrix) {
    let labels = matrix.card_labels();
    for (row, best) in matrix.best_choice_per_row().into_iter().enumerate() {
        println!(
            "  vs {:<6} best reply {:<6} ({}%)",
            labels[row], labels[best], matrix.win[row][best]
        );
    }
}

fn print_summary(pipeline: &Pipeline) -> Result<()> {
    let totals = pipeline.totals();
    let config = pipeline.config();
    let store = pipeline.store();

    println!();
    println!("=== RUN SUMMARY ===");
    println!("  run_id:          {}", pipeline.run_id);
    println!("  master seed:     {}", pipeline.seed());
    println!("  decks generated: {}", totals.decks_generated);
    println!("  decks scored:    {}", totals.decks_scored);
    println!("  playthroughs:    {}", totals.playthroughs);
    println!("  decks in store:  {}", store.deck_count()?);
    println!("  still unscored:  {}", store.unscored_count()?);
    println!("  results csv:     {}", config.results_csv);
    println!("  matrices json:   {}", config.matrix_json);
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
