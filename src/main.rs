mod callerid;
mod cdr;
mod client;
mod config;
mod phonebook;
mod pipeline;

use clap::Parser;
use config::{AppConfig, DEFAULT_API_URL};
use std::process;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "voipms-autowhite")]
#[command(version = "1.0.0")]
#[command(about = "Adds recently answered callers to the auto_white phonebook group on voip.ms")]
#[command(override_usage = "voipms-autowhite -u <username> -p <password> -m <phonenumber>")]
struct Cli {
    /// API username (account e-mail)
    #[arg(short, long)]
    username: String,

    /// API password
    #[arg(short, long)]
    password: String,

    /// DID whose inbound calls are examined
    #[arg(short = 'm', long = "phonenumber")]
    phone_number: String,

    /// REST endpoint
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    let start = Instant::now();

    let config = match AppConfig::new(
        cli.username,
        cli.password,
        cli.phone_number,
        &cli.api_url,
    ) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e:#}");
            process::exit(1);
        }
    };

    let whitelister = match pipeline::AutoWhitelister::new(config) {
        Ok(w) => w,
        Err(e) => {
            log::error!("{e:#}");
            process::exit(1);
        }
    };

    match whitelister.run().await {
        Ok(summary) => pipeline::print_summary(&summary, start),
        Err(e) => {
            log::error!("{e:#}");
            process::exit(1);
        }
    }
}
