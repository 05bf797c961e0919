use anyhow::Result;
use std::io::Write;
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod config;
mod input;
mod response;
mod transcript;
mod workflow;

use workflow::Decision;

/// Log a message to /tmp/stagegate-{session_id}.txt if STAGEGATE_DEBUG is set.
/// This is for debugging hook behavior.
fn trace_log(session_id: &str, message: &str) {
    if std::env::var("STAGEGATE_DEBUG").is_ok() {
        let path = format!("/tmp/stagegate-{}.txt", session_id);
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] {}", timestamp, message);
        }
    }
}

fn main() {
    // All diagnostics go to stderr; stdout carries only the decision JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(&args) {
        Ok(decision) => response::emit(&decision),
        Err(err) => {
            tracing::error!(error = ?err, "hook execution failed");
            response::emit_failure()
        }
    }
}

fn run(args: &[String]) -> Result<Decision> {
    let input = input::read_input(args)?;
    trace_log(
        &input.session_id,
        &format!("tool={}", input.tool_name.as_deref().unwrap_or("None")),
    );

    let transcript_path = input.resolve_path(&input.transcript_path);
    tracing::info!(
        transcript = %transcript_path.display(),
        "checking workflow completion"
    );

    if !transcript_path.exists() {
        tracing::warn!("transcript file not found");
        return Ok(Decision::Approve(
            "Transcript not found - skipping check".to_string(),
        ));
    }

    let workflow = config::load_workflow(input.project_dir.as_deref().map(Path::new));

    let agents = transcript::agent_calls(&transcript_path)?;
    tracing::info!(agents = ?agents, "detected agents");
    trace_log(
        &input.session_id,
        &format!("{} agent calls in transcript", agents.len()),
    );

    let warnings = transcript::scan_warnings(&transcript_path)?;

    Ok(workflow::decide(&workflow, &agents, &warnings))
}
