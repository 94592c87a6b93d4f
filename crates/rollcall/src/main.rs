//! # rollcall
//!
//! Demo driver for the rollcall attendance session controller.
//!
//! Runs one scripted session end to end against a stub camera backend:
//! start → pre-check → camera → confirm → ending → success → close,
//! printing the controller snapshot at each milestone. A minimal stand-in
//! for a real presentation layer.
//!
//! ## Architecture
//!
//! This is Layer 2 - the binary that ties together:
//! - rollcall-core: Core types and configuration
//! - rollcall-session: Session orchestration

use std::sync::Arc;
use std::time::Duration;

use rollcall_core::{ControllerConfig, SelectedCourse, SessionPhase};
use rollcall_session::{SessionController, StubCamera};

/// Poll the controller until it reaches the given phase.
async fn wait_for_phase(controller: &SessionController, phase: SessionPhase) {
    while controller.phase() != phase {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}

fn print_snapshot(controller: &SessionController) -> anyhow::Result<()> {
    let snapshot = controller.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Optional config file argument
    let args: Vec<String> = std::env::args().collect();
    let config = match args.get(1) {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            ControllerConfig::from_file(path)?
        }
        None => ControllerConfig::default(),
    };

    tracing::info!("rollcall demo starting");

    let backend = Arc::new(StubCamera::new());
    let controller = SessionController::new(config, backend)?;

    let course = SelectedCourse::new(1, "Introduction to Computer Science", "CS101", 32);
    let session_id = controller.start(Some(course))?;
    tracing::info!("Session started: id={}", session_id);
    print_snapshot(&controller)?;

    wait_for_phase(&controller, SessionPhase::Camera).await;
    tracing::info!("Pre-check complete, camera live");
    print_snapshot(&controller)?;

    // Let the session run for a bit
    tokio::time::sleep(Duration::from_secs(5)).await;

    controller.request_end();
    controller.confirm_end();
    tracing::info!("End confirmed, running end-of-session checklist");

    wait_for_phase(&controller, SessionPhase::Success).await;
    print_snapshot(&controller)?;

    controller.close();
    tracing::info!("rollcall demo shutting down");

    Ok(())
}
