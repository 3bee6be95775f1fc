//! Bell Pair Demo
//!
//! Accumulates a bell-pair circuit through the workbench one block at
//! a time, runs it on the remote compute service, and reports the
//! outcome distribution. Optionally drives the visualization handshake
//! with a terminal viewer that dismisses each artifact as it arrives.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use quarry_client::ComputeClient;
use quarry_demos::{print_header, print_result, print_section, print_success, print_warning};
use quarry_runtime::{DataShape, RunOutcome, VizOutcome, Workbench};

#[derive(Parser, Debug)]
#[command(name = "demo-bell")]
#[command(about = "Run a bell-pair circuit on a Quarry compute service")]
struct Args {
    /// Service base URL (falls back to QUARRY_SERVICE_URL, then localhost)
    #[arg(short, long)]
    url: Option<String>,

    /// Number of shots
    #[arg(short, long, default_value = "1000")]
    shots: u32,

    /// Render and display the outcome histogram
    #[arg(long)]
    histogram: bool,

    /// Render and display the circuit diagram
    #[arg(long)]
    diagram: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    print_header("Bell Pair Demo");

    let client = match &args.url {
        Some(url) => ComputeClient::with_base_url(url.as_str()),
        None => ComputeClient::new(),
    }
    .context("building compute client")?;

    print_section("Service");
    print_result("Base URL", client.base_url());
    match client.health().await {
        Ok(health) if health.is_ok() => print_success("service is healthy"),
        Ok(health) => print_warning(&format!("service status: {}", health.status)),
        Err(e) => print_warning(&format!("health check failed: {e}")),
    }

    let bench = Workbench::new(Arc::new(client));

    // A terminal "viewer": dismisses each artifact as soon as it is
    // announced, resuming the suspended requester.
    if args.histogram || args.diagram {
        let mut viewer = bench.attach_viewer();
        tokio::spawn(async move {
            while let Some(event) = viewer.recv().await {
                print_result(
                    "Artifact",
                    format!(
                        "{} ({} base64 bytes)",
                        event.artifact.kind.name(),
                        event.artifact.image_base64.len()
                    ),
                );
                event.ticket.dismiss();
            }
        });
    }

    print_section("Circuit");
    bench.create_circuit(2, 2);
    bench.gate_h(0);
    bench.gate_cx(0, 1);
    bench.measure_all();
    let program = bench.snapshot();
    print_result("Operations", program.ops().len());
    print_result("Gates", program.gate_count());

    print_section("Execution");
    print_result("Shots", args.shots);
    match bench.run(args.shots).await {
        RunOutcome::Completed => {
            print_success("run completed");
            print_result("Result", bench.result_text());
            print_result("Counts", bench.result_data(DataShape::Counts));
            let snapshot = bench.snapshot();
            if let Some((label, count)) = snapshot.counts().most_frequent() {
                print_result("Most frequent", format!("|{label}⟩ × {count}"));
            }
        }
        RunOutcome::NoCircuit => print_warning(&bench.result_text()),
        RunOutcome::Rejected(reason) => print_warning(&format!("service rejected run: {reason}")),
        RunOutcome::Unreachable(reason) => {
            print_warning(&format!("service unreachable: {reason}"));
        }
    }

    if args.histogram {
        print_section("Histogram");
        match bench.show_histogram(&bench.result_text()).await {
            VizOutcome::Dismissed => print_success("histogram shown and dismissed"),
            VizOutcome::NothingToShow => print_warning("no result data to chart"),
            VizOutcome::Failed(reason) => print_warning(&format!("render failed: {reason}")),
        }
    }

    if args.diagram {
        print_section("Circuit Diagram");
        match bench.show_circuit().await {
            VizOutcome::Dismissed => print_success("diagram shown and dismissed"),
            VizOutcome::NothingToShow => print_warning("no circuit to diagram"),
            VizOutcome::Failed(reason) => print_warning(&format!("render failed: {reason}")),
        }
    }

    println!();
    print_success("demo complete");
    Ok(())
}
