use clap::Parser;
use stick_cutter::error::PackError;
use stick_cutter::input::{self, OversizePolicy};
use stick_cutter::packer::{self, DEFAULT_MAX_PIECES, Packer};
use stick_cutter::render::{self, DEFAULT_BAR_WIDTH};
use stick_cutter::types::Plan;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "stick_cutter",
    about = "1D cutting stock planner (first-fit decreasing)"
)]
struct Cli {
    /// Stock length, e.g. 6000
    #[arg(long)]
    stock: String,

    /// Lengths to cut, separated by spaces or commas (e.g. "1200, 800 450")
    #[arg(required = true, num_args = 1..)]
    lengths: Vec<String>,

    /// Drop pieces longer than the stock instead of failing
    #[arg(long)]
    skip_oversize: bool,

    /// Refuse inputs with more pieces than this
    #[arg(long, default_value_t = DEFAULT_MAX_PIECES)]
    max_pieces: usize,

    /// Show a bar chart of each stick
    #[arg(long)]
    bars: bool,

    /// Bar chart width in characters
    #[arg(long, default_value_t = DEFAULT_BAR_WIDTH)]
    bar_width: usize,

    /// Print a workshop cut list instead of the summary view
    #[arg(long)]
    print: bool,

    /// Emit the plan as JSON
    #[arg(long, conflicts_with = "print")]
    json: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn build_plan(cli: &Cli) -> Result<Plan, PackError> {
    let capacity = input::parse_capacity(&cli.stock)?;
    let policy = if cli.skip_oversize {
        OversizePolicy::Skip
    } else {
        OversizePolicy::Reject
    };
    let lengths = input::parse_lengths(&cli.lengths.join(" ")).into_lengths(policy)?;
    let lengths = input::validate_lengths(lengths, capacity, policy)?;

    Packer::new(capacity)
        .with_max_pieces(cli.max_pieces)
        .pack(&lengths)
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .init();

    let plan = build_plan(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if cli.json {
        match serde_json::to_string_pretty(&plan) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if cli.print {
        print!("{}", render::render_print(&plan));
        return;
    }

    let bar_width = cli.bars.then_some(cli.bar_width);
    print!("{}", render::render_results(&plan, bar_width));
    println!();

    let pieces: Vec<u32> = plan.bins.iter().flat_map(|b| b.pieces.iter().copied()).collect();
    println!(
        "Summary: {} stick{} used (at least {} needed), {} waste ({:.1}%)",
        plan.bin_count(),
        if plan.bin_count() == 1 { "" } else { "s" },
        packer::lower_bound(&pieces, plan.capacity),
        plan.total_waste(),
        plan.total_waste_percent(),
    );
}
