use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ordesk_core::{
    EvalReport, Evaluator, InMemoryOrderStore, StubMailer, WorkflowOrchestrator, WorkflowReport,
};

use chat_client::{ChatConfig, OpenAiClient};

#[derive(Parser)]
#[command(
    name = "ordesk",
    about = "Customer-support workflow pipeline — extract, look up, update, draft, send",
    version
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one customer message through the pipeline
    Run {
        /// Free-text customer message, e.g. "Cambiar dirección orden #12345 a ..."
        message: String,
    },

    /// Run the built-in evaluation scenarios and write a report
    Eval {
        /// Where to write the JSON evaluation report
        #[arg(long, default_value = "eval_results.json")]
        output: PathBuf,
    },

    /// List the seeded demo orders
    Orders,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run { message } => cmd_run(&message, cli.json).await,
        Commands::Eval { output } => cmd_eval(&output, cli.json).await,
        Commands::Orders => cmd_orders(cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn build_orchestrator() -> anyhow::Result<WorkflowOrchestrator> {
    let config = ChatConfig::from_env().context("chat client configuration")?;
    let client = Arc::new(OpenAiClient::new(config)?);
    Ok(WorkflowOrchestrator::new(
        client,
        Arc::new(InMemoryOrderStore::seeded()),
        Arc::new(StubMailer),
    ))
}

async fn cmd_run(message: &str, json: bool) -> anyhow::Result<()> {
    let orchestrator = build_orchestrator()?;
    let report = orchestrator.execute(message).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &WorkflowReport) {
    if report.success {
        println!("workflow completed ({} steps)", report.execution_log.len());
        if let Some(actions) = &report.actions_taken {
            println!("action: {}", actions.action.as_str());
        }
        if let Some(body) = &report.response_sent {
            println!("\n--- email sent ---\n{body}");
        }
    } else {
        println!(
            "workflow aborted after {} step(s): {}",
            report.execution_log.len(),
            report.error.as_deref().unwrap_or("unknown")
        );
    }
}

async fn cmd_eval(output: &Path, json: bool) -> anyhow::Result<()> {
    let orchestrator = build_orchestrator()?;
    let evaluator = Evaluator::default();
    let report = evaluator.run_all(&orchestrator).await;

    let serialized = serde_json::to_string_pretty(&report)?;
    std::fs::write(output, &serialized)
        .with_context(|| format!("writing {}", output.display()))?;

    if json {
        println!("{serialized}");
    } else {
        print_eval_summary(&report);
        println!("\nreport written to {}", output.display());
    }
    Ok(())
}

fn print_eval_summary(report: &EvalReport) {
    println!(
        "scenarios: {}  passed: {}  failed: {}  pass rate: {:.1}%",
        report.total, report.passed, report.failed, report.pass_rate
    );
    for result in &report.results {
        let status = if result.passed { "PASS" } else { "FAIL" };
        println!("  [{status}] {}: {} ({})", result.id, result.name, result.score);
        if !result.passed {
            for (name, check) in &result.checks {
                if !check.pass {
                    println!(
                        "         {name}: expected {}, got {}",
                        check.expected, check.actual
                    );
                }
            }
        }
    }
}

fn cmd_orders(json: bool) -> anyhow::Result<()> {
    let store = InMemoryOrderStore::seeded();
    let orders = store.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&orders)?);
    } else {
        for (id, order) in &orders {
            println!(
                "#{id}  {:<12} {:<18} {}",
                order.status.as_str(),
                order.customer,
                order.address
            );
        }
    }
    Ok(())
}
