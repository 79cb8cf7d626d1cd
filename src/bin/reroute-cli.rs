use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "reroute-cli")]
#[command(about = "Client for the cluster reroute API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9200")]
    url: String,

    /// Bearer token, when the service requires one.
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current cluster state
    State {
        /// Comma separated sections (e.g. nodes,routing_table)
        #[arg(long)]
        metric: Option<String>,

        #[arg(long)]
        flat_settings: bool,
    },
    /// Run reroute commands
    Reroute {
        /// Return an explanation for every command
        #[arg(long)]
        explain: bool,

        /// Compute the result without applying it
        #[arg(long)]
        dry_run: bool,

        /// Sections of the resulting state to return (`none` for none)
        #[arg(long)]
        metric: Option<String>,

        /// JSON file with a `{"commands": [...]}` body
        #[arg(long)]
        commands: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key))?,
        );
    }

    match cli.command {
        Commands::State {
            metric,
            flat_settings,
        } => {
            let url = match metric {
                Some(metric) => format!("{}/_cluster/state/{}", cli.url, metric),
                None => format!("{}/_cluster/state", cli.url),
            };
            let mut query = Vec::new();
            if flat_settings {
                query.push(("flat_settings", "true".to_string()));
            }
            let res = client.get(url).query(&query).headers(headers).send().await?;
            print_response(res).await?;
        }
        Commands::Reroute {
            explain,
            dry_run,
            metric,
            commands,
        } => {
            let mut query = Vec::new();
            if explain {
                query.push(("explain", "true".to_string()));
            }
            if dry_run {
                query.push(("dry_run", "true".to_string()));
            }
            if let Some(metric) = metric {
                query.push(("metric", metric));
            }

            let body: Value = match commands {
                Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
                None => serde_json::json!({ "commands": [] }),
            };

            let res = client
                .post(format!("{}/_cluster/reroute", cli.url))
                .query(&query)
                .headers(headers)
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    for warning in res.headers().get_all("warning") {
        if let Ok(text) = warning.to_str() {
            eprintln!("Warning: {}", text);
        }
    }

    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
