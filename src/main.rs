//! Odd-Even Sort Driver
//!
//! Fills an array with random values, sorts it with the parallel odd-even
//! transposition sort, verifies the result and reports the elapsed time.
//! With `--compare` it also times std's pdqsort and rayon's parallel sort on
//! the same input.

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use odd_even_sort::{baseline, sort_with_config, SortConfig, DEFAULT_WORKERS};

/// Default array size
const DEFAULT_ARRAY_SIZE: usize = 10_000;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of elements to sort
    #[arg(short = 'n', long, default_value_t = DEFAULT_ARRAY_SIZE)]
    size: usize,

    /// Number of parallel workers
    #[arg(short, long, env = "ODD_EVEN_WORKERS", default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Rounds each worker runs (defaults to the array size)
    #[arg(short, long)]
    rounds: Option<usize>,

    /// Generated values lie in 0..MAX_VALUE
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    max_value: u32,

    /// Seed for reproducible input
    #[arg(long)]
    seed: Option<u64>,

    /// Print the array before and after sorting
    #[arg(short, long)]
    print: bool,

    /// Also time std and rayon sorts on the same input
    #[arg(long)]
    compare: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let mut config = SortConfig::new(args.workers);
    if let Some(rounds) = args.rounds {
        config = config.with_round_count(rounds);
    }

    info!(
        size = args.size,
        workers = args.workers,
        rounds = config.rounds_for(args.size),
        "generating input"
    );
    let data = generate(args.size, args.max_value, args.seed);

    if args.print {
        println!("Unsorted array: {}", format_array(&data));
    }

    let mut sorted = data.clone();
    let start = Instant::now();
    let report = sort_with_config(&mut sorted, &config).context("odd-even sort failed")?;
    let elapsed = start.elapsed();

    info!(
        elements = report.elements,
        workers = report.workers,
        rounds = report.rounds,
        swaps = report.swaps,
        "sort complete"
    );

    if args.print {
        println!("Sorted array: {}", format_array(&sorted));
    }
    println!("Elapsed time: {:.3} ms", millis(elapsed));

    if !baseline::is_sorted(&sorted) {
        bail!(
            "output is not sorted after {} rounds with {} workers",
            report.rounds,
            report.workers
        );
    }
    if !baseline::is_permutation_of(&sorted, &data) {
        bail!("output is not a permutation of the input");
    }
    println!("Odd-even sort verified: OK");

    if args.compare {
        compare_baselines(&data, &sorted, elapsed);
    }

    Ok(())
}

fn generate(size: usize, max_value: u32, seed: Option<u64>) -> Vec<u32> {
    match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..size).map(|_| rng.gen_range(0..max_value)).collect()
        }
        None => {
            let mut rng = rand::thread_rng();
            (0..size).map(|_| rng.gen_range(0..max_value)).collect()
        }
    }
}

fn compare_baselines(data: &[u32], sorted: &[u32], odd_even: Duration) {
    println!("\n--- Baselines ---");

    let mut std_data = data.to_vec();
    let start = Instant::now();
    baseline::sort_unstable(&mut std_data);
    let std_time = start.elapsed();

    let mut rayon_data = data.to_vec();
    let start = Instant::now();
    baseline::parallel_sort(&mut rayon_data);
    let rayon_time = start.elapsed();

    println!("std pdqsort time:   {:.3} ms", millis(std_time));
    println!("rayon par_sort time: {:.3} ms", millis(rayon_time));

    if std_data == sorted && rayon_data == sorted {
        println!("Results match baselines: OK");
    } else {
        println!("WARNING: Results differ from baselines!");
    }

    for (name, time) in [("std pdqsort", std_time), ("rayon par_sort", rayon_time)] {
        let ratio = odd_even.as_secs_f64() / time.as_secs_f64().max(f64::EPSILON);
        if ratio > 1.0 {
            println!("Odd-even vs {}: {} is {:.2}x faster", name, name, ratio);
        } else {
            println!("Odd-even vs {}: odd-even is {:.2}x faster", name, 1.0 / ratio);
        }
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn format_array(data: &[u32]) -> String {
    data.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
