use clap::Parser;
use cut_patterns::render;
use cut_patterns::{ClimbConfig, CutCatalog, CutsHillClimb, PatternPool};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "cut_patterns",
    about = "Generate low-waste 1D cut patterns by randomized hill climbing"
)]
struct Cli {
    /// Stock piece length (e.g. 12)
    #[arg(long)]
    stock: u32,

    /// Required cuts as LEN:qty (e.g. 3:2 4:1 5:1 6:2)
    #[arg(long = "cuts", num_args = 1..)]
    cuts: Vec<String>,

    /// Neighbors generated per hill-climb iteration
    #[arg(long, default_value_t = 5)]
    nbr_hood_size: usize,

    /// Number of distinct patterns to collect
    #[arg(long, default_value_t = 10)]
    patterns: usize,

    /// Maximum hill climbs while collecting patterns
    #[arg(long, default_value_t = 150)]
    max_calls: usize,

    /// Maximum iterations per hill climb
    #[arg(long, default_value_t = 150)]
    max_iter: usize,

    /// Probability of an extra add/remove move per neighbor
    #[arg(long, default_value_t = 0.1)]
    prob_extra_move: f64,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Show an ASCII bar for each pattern
    #[arg(long)]
    layout: bool,

    /// Print solver input (patterns, cut mapping, demand) as JSON
    #[arg(long)]
    json: bool,

    /// Log climb progress to stderr
    #[arg(long)]
    verbose: bool,
}

fn parse_cut(s: &str) -> Result<(u32, u32), String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("invalid cut '{}', expected LEN:qty", s));
    }
    let length = parts[0]
        .parse::<u32>()
        .map_err(|_| format!("invalid length in '{}'", s))?;
    let qty = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    if length == 0 {
        return Err(format!("length must be non-zero in '{}'", s));
    }
    Ok((length, qty))
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let demands: Vec<(u32, u32)> = cli
        .cuts
        .iter()
        .map(|c| parse_cut(c))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    let config = ClimbConfig {
        max_iter: cli.max_iter,
        prob_extra_move: cli.prob_extra_move,
        ..ClimbConfig::default()
    };

    let engine = CutCatalog::new(demands).and_then(|catalog| match cli.seed {
        Some(seed) => CutsHillClimb::seeded(catalog, cli.stock, cli.nbr_hood_size, config, seed),
        None => CutsHillClimb::from_entropy(catalog, cli.stock, cli.nbr_hood_size, config),
    });
    let mut engine = engine.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let mut pool = PatternPool::new(&mut engine);
    if let Err(e) = pool.build(cli.patterns, cli.max_calls) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if cli.json {
        match serde_json::to_string_pretty(&pool.lp_input()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for (i, pattern) in pool.patterns().iter().enumerate() {
        let waste = cli.stock as u64 - pattern.total_length();
        println!("Pattern {}: {} waste {}", i + 1, pattern, waste);
        if cli.layout {
            print!("{}", render::render_pattern(cli.stock, pattern));
        }
    }

    println!(
        "Summary: {} pattern{} from {} climb{}",
        pool.patterns().len(),
        if pool.patterns().len() == 1 { "" } else { "s" },
        pool.calls(),
        if pool.calls() == 1 { "" } else { "s" },
    );
}
