//! Health check command - probes a running bookbinder server.

use std::time::Duration;

use serde::Deserialize;

use crate::cli::HealthArgs;

/// Shape of the server's `/health` JSON.
#[derive(Debug, Deserialize)]
struct HealthReport {
    status: String,
    backend: String,
}

/// Run the health check command.
///
/// Prints the reported storage backend on success; any failure mode
/// (unreachable, non-2xx, malformed body, unhealthy status) exits
/// non-zero with a one-line reason.
pub async fn run(args: &HealthArgs) -> Result<(), Box<dyn std::error::Error>> {
    let base = args.url.trim_end_matches('/');
    let url = if base.ends_with("/health") {
        base.to_string()
    } else {
        format!("{base}/health")
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .build()?;

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => fail(&format!("cannot reach {url}: {e}")),
    };
    if !response.status().is_success() {
        fail(&format!("{url} returned HTTP {}", response.status()));
    }

    let report: HealthReport = match response.json().await {
        Ok(report) => report,
        Err(e) => fail(&format!("malformed health response from {url}: {e}")),
    };
    if report.status != "healthy" {
        fail(&format!("server reported status {:?}", report.status));
    }

    println!("healthy ({} backend)", report.backend);
    Ok(())
}

fn fail(reason: &str) -> ! {
    eprintln!("unhealthy: {reason}");
    std::process::exit(1);
}
