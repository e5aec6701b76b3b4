use clap::{Parser, Subcommand};
use rentbuy::api::{self, CompareArgs};
use rentbuy::config::ServerConfig;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "rentbuy",
    about = "Cumulative cost of renting versus buying a home, and the year buying becomes cheaper"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the web page and the /api/compare endpoint
    Serve {
        #[arg(long, help = "Port to listen on, overriding RENTBUY_LISTEN_ADDR")]
        port: Option<u16>,
    },
    /// Compare renting and buying for one set of assumptions
    Compare {
        #[command(flatten)]
        args: CompareArgs,
        #[arg(long, help = "Print the JSON response instead of the text report")]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port } => {
            let config = match ServerConfig::from_env() {
                Ok(config) => config.with_port(port),
                Err(e) => {
                    error!("Configuration error: {e}");
                    std::process::exit(1);
                }
            };
            if let Err(e) = api::run_http_server(config).await {
                error!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Compare { args, json } => match api::run_compare_cli(args, json) {
            Ok(output) => println!("{output}"),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
