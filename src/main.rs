//! akh-bayes CLI: exact queries over built-in Bayesian networks.

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use akh_bayes::export::export_network;
use akh_bayes::network::{Network, NetworkConfig};
use akh_bayes::seeds::{self, Seed};

#[derive(Parser)]
#[command(name = "akh-bayes", version, about = "Exact inference over discrete Bayesian networks")]
struct Cli {
    /// Built-in network to operate on.
    #[arg(long, global = true, value_enum, default_value_t = Seed::Alarm)]
    network: Seed,

    /// Refuse to enumerate networks with more nodes than this.
    #[arg(long, global = true, default_value = "24")]
    max_nodes: usize,

    /// Query even if some node tables are incomplete.
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the nodes in topological order, e.g. `P(R)P(T)P(A|RT)`.
    Order,

    /// Report whether every node table is complete and valid.
    Defined,

    /// Dump every node's probability table.
    Factors {
        /// Emit JSON (with topological order) instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Answer a query such as "J|M" (P(J | M)) or "JM" (P(J, M)).
    Query {
        /// Query expression: VARS or VARS|EVIDENCE.
        expression: String,

        /// Emit JSON including the enumeration sums.
        #[arg(long)]
        json: bool,
    },

    /// Build the alarm network step by step and show each stage.
    Demo,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = NetworkConfig {
        max_nodes: cli.max_nodes,
        require_defined: !cli.lenient,
    };

    match cli.command {
        Commands::Order => {
            let network = cli.network.build(config)?;
            println!("{}", network.topological_order_string()?);
        }

        Commands::Defined => {
            let network = cli.network.build(config)?;
            let ill_formed = network.ill_formed();
            if ill_formed.is_empty() {
                println!("{} network is defined ({} nodes)", cli.network, network.len());
            } else {
                let names: String = ill_formed.iter().collect();
                println!("{} network is not defined; ill-formed: {names}", cli.network);
            }
        }

        Commands::Factors { json } => {
            let network = cli.network.build(config)?;
            if json {
                let export = export_network(&network)?;
                let json = serde_json::to_string_pretty(&export).into_diagnostic()?;
                println!("{json}");
            } else {
                print_factors(&network);
            }
        }

        Commands::Query { expression, json } => {
            let network = cli.network.build(config)?;
            let answer = network.answer(&expression)?;
            if json {
                let json = serde_json::to_string_pretty(&answer).into_diagnostic()?;
                println!("{json}");
            } else {
                println!("P({}) = {:.10}", answer.query, answer.probability);
            }
        }

        Commands::Demo => run_demo(config)?,
    }

    Ok(())
}

fn print_factors(network: &Network) {
    for (name, table) in network.show_factors() {
        let rows: Vec<String> = table.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        println!("{name} : {{{}}}", rows.join(", "));
    }
}

/// Define the alarm network node by node, checking definedness along the way.
fn run_demo(config: NetworkConfig) -> Result<()> {
    let mut net = seeds::alarm_without_m(config)?;
    println!("defined before M: {}", net.is_defined());

    let _ = seeds::define_alarm_m(&mut net)?;
    println!("order: {}", net.topological_order_string()?);
    println!("defined: {}", net.is_defined());
    print_factors(&net);

    for expression in ["J|M", "R|JM", "A|R"] {
        println!("P({expression}) = {:.10}", net.query(expression)?);
    }
    Ok(())
}
