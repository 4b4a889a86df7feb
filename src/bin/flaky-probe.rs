use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "flaky-probe")]
#[command(about = "Send requests to a flaky-backend fixture and print the cycle it returns", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8080")]
    url: String,

    /// Number of sequential requests.
    #[arg(short = 'n', long, default_value_t = 6)]
    count: u32,

    /// Print one JSON report instead of a line per request.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Attempt {
    index: u32,
    status: u16,
    body: String,
}

#[derive(Serialize)]
struct Report {
    url: String,
    attempts: Vec<Attempt>,
    successes: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let report = match probe(&cli).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        for attempt in &report.attempts {
            println!("#{} {} {}", attempt.index, attempt.status, attempt.body);
        }
        println!("{}/{} succeeded", report.successes, report.attempts.len());
    }

    ExitCode::SUCCESS
}

async fn probe(cli: &Cli) -> Result<Report, reqwest::Error> {
    // One connection per request, so the fixture sees them strictly in order.
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()?;

    let mut attempts = Vec::new();
    for index in 1..=cli.count {
        let res = client.get(&cli.url).send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;
        attempts.push(Attempt { index, status, body });
    }

    let successes = attempts.iter().filter(|a| (200..300).contains(&a.status)).count();
    Ok(Report {
        url: cli.url.clone(),
        attempts,
        successes,
    })
}
