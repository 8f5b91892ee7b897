use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde_json::json;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Rating {
    Up,
    Down,
}

/// Submits one docs feedback rating to a running server.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Docs page path, e.g. /docs/7.6/react/api/args
    path: String,

    #[arg(value_enum)]
    rating: Rating,

    #[arg(long)]
    comment: Option<String>,

    #[arg(long, default_value = "7.6")]
    docs_version: String,

    #[arg(long, default_value = "react")]
    framework: String,

    #[arg(long, default_value = "ts")]
    code_language: String,

    #[arg(long, default_value = "127.0.0.1")]
    client_ip: String,

    #[arg(long, default_value = "http://localhost:1111/feedback")]
    url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let rating = match args.rating {
        Rating::Up => "up",
        Rating::Down => "down",
    };

    let payload = json!({
        "path": args.path,
        "rating": rating,
        "comment": args.comment,
        "version": args.docs_version,
        "framework": args.framework,
        "codeLanguage": args.code_language,
    });

    println!("{payload:#}");

    let response = reqwest::Client::new()
        .post(&args.url)
        .header("client-ip", &args.client_ip)
        .json(&payload)
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", args.url))?;

    println!("Status: {}", response.status());
    println!("{}", response.text().await?);

    Ok(())
}
