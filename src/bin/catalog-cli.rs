use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Management CLI for the route catalog service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8787")]
    url: String,

    /// Bearer key for mutating commands.
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every host and its patterns
    Routes,
    /// Show the route matching a concrete path
    Lookup { host: String, path: String },
    /// Make one segment position dynamic for a family of routes
    Parameterize {
        host: String,
        /// Concrete path or `:param` pattern of a registered route
        path: String,
        /// Zero-indexed segment position
        position: usize,
    },
    /// Write the catalog snapshot to stdout or a file
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the catalog with a snapshot file
    Import { file: PathBuf },
    /// Drop every route
    Clear,
    /// Update store options
    Options {
        #[arg(long)]
        enable_more_info: Option<bool>,
    },
    /// Print the OpenAPI document for a host
    Openapi { host: String },
    /// Upload a HAR file
    Ingest { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {key}"))?);
    }
    let request = |method: Method, path: &str| -> RequestBuilder {
        client
            .request(method, format!("{}{}", cli.url, path))
            .headers(headers.clone())
    };

    match cli.command {
        Commands::Routes => {
            print_response(request(Method::GET, "/routes").send().await?).await?;
        }
        Commands::Lookup { host, path } => {
            let res = request(Method::GET, &format!("/routes/{host}/lookup"))
                .query(&[("path", path)])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Parameterize { host, path, position } => {
            let res = request(Method::POST, "/parameterize")
                .json(&json!({ "host": host, "path": path, "position": position }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Export { output } => {
            let res = request(Method::GET, "/snapshot").send().await?;
            match output {
                Some(path) => {
                    let snapshot: Value = res.error_for_status()?.json().await?;
                    fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;
                    println!("Snapshot written to {}", path.display());
                }
                None => print_response(res).await?,
            }
        }
        Commands::Import { file } => {
            let snapshot: Value = serde_json::from_str(&fs::read_to_string(file)?)?;
            let res = request(Method::PUT, "/snapshot").json(&snapshot).send().await?;
            print_response(res).await?;
        }
        Commands::Clear => {
            print_response(request(Method::DELETE, "/routes").send().await?).await?;
        }
        Commands::Options { enable_more_info } => {
            let mut body = serde_json::Map::new();
            if let Some(enabled) = enable_more_info {
                body.insert("enableMoreInfo".into(), Value::Bool(enabled));
            }
            let res = request(Method::PATCH, "/options").json(&body).send().await?;
            print_response(res).await?;
        }
        Commands::Openapi { host } => {
            print_response(request(Method::GET, &format!("/openapi/{host}")).send().await?).await?;
        }
        Commands::Ingest { file } => {
            let har: Value = serde_json::from_str(&fs::read_to_string(file)?)?;
            let res = request(Method::POST, "/captures/har").json(&har).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: catalog service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let text = res.text().await?;
    if text.is_empty() {
        println!("OK ({})", status);
        return Ok(());
    }
    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
