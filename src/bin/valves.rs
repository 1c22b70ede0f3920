use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use valve_search::{
    read_input, solve, Budget, FrontierOrder, SearchConfig, PAIR_MINUTES, SINGLE_MINUTES, START_VALVE,
};

#[derive(Parser, Debug)]
#[command(name = "valves")]
#[command(version, about = "Release as much pressure as possible before the volcano erupts", long_about = None)]
struct Args {
    /// Scan output to read; stdin if omitted
    input: Option<PathBuf>,

    /// Minutes each searcher has [default: 30 alone, 26 with two searchers]
    #[arg(long, short = 'm')]
    minutes: Option<usize>,

    /// Number of searchers sharing the work
    #[arg(long, short = 's', default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    searchers: u8,

    /// Valve every searcher starts from
    #[arg(long, default_value = START_VALVE)]
    start: String,

    /// Order in which pending states are explored
    #[arg(long, value_enum, default_value_t = FrontierOrder::BestFirst)]
    order: FrontierOrder,

    /// Stop after expanding this many states
    #[arg(long)]
    max_states: Option<usize>,

    /// Stop after this many milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Also print the valves opened along the best path
    #[arg(long)]
    path: bool,

    /// Log more (-v for progress, -vv for every state)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(&self) -> Result<SearchConfig, Box<dyn Error>> {
        let default_minutes = if self.searchers > 1 { PAIR_MINUTES } else { SINGLE_MINUTES };
        let budget = Budget::new(self.minutes.unwrap_or(default_minutes), self.searchers)?;
        Ok(SearchConfig {
            start: self.start.clone(),
            budget,
            order: self.order,
            max_states: self.max_states,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
        })
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let input = read_input(args.input.as_deref())?;
    let outcome = solve(&input, &args.config()?)?;
    if !outcome.complete {
        warn!("search stopped early, the answer may not be optimal");
    }

    println!("{}", outcome.best);
    if args.path {
        for step in &outcome.path {
            println!("{step}");
        }
    }
    Ok(())
}
