//! # domotikd — domotik daemon
//!
//! Composition root that wires the controller to the virtual board and
//! drives the tick loop.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Initialise structured logging
//! - Construct the virtual board from the `[[simulation]]` entries
//! - Build the controller from the `[[devices]]` and `[[rules]]` entries
//! - Call `advance()` on a fixed interval until Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use domotik_adapter_virtual::VirtualBoard;
use domotik_app::clock::SystemClock;
use domotik_app::controller::Controller;
use domotik_app::ports::{Board, Clock};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.logging.filter);

    let tick_interval = config.tick_interval();
    let board = VirtualBoard::with_simulation(&config.simulation);
    let mut controller = Controller::new(
        &config.devices,
        config.rules,
        board,
        SystemClock::start(),
    )
    .context("failed to build controller")?;

    tracing::info!(
        tick_interval_ms = config.runtime.tick_interval_ms,
        sensors = controller.registry().sensor_count(),
        actuators = controller.registry().actuator_count(),
        rules = controller.engine().rules().len(),
        "domotikd started"
    );

    let ticks = run(&mut controller, tick_interval, shutdown_signal()).await;

    tracing::info!(
        ticks,
        uptime_ms = controller.uptime(),
        status = ?controller.aggregate_status(),
        "domotikd stopped"
    );
    Ok(())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for ctrl-c, stopping");
    }
}

/// Advance the controller once per `period` until `shutdown` resolves.
/// Returns the number of ticks run.
async fn run<B, C>(
    controller: &mut Controller<B, C>,
    period: Duration,
    shutdown: impl Future<Output = ()>,
) -> u64
where
    B: Board,
    C: Clock,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut ticks = 0;
    loop {
        tokio::select! {
            () = &mut shutdown => break,
            _ = interval.tick() => {
                let report = controller.advance();
                ticks += 1;
                if report.readings > 0 {
                    for reading in controller.snapshot().values() {
                        tracing::debug!(reading = %reading.to_json(), "reading");
                    }
                }
                if !report.activated.is_empty() || !report.deactivated.is_empty() {
                    tracing::debug!(
                        now = report.now,
                        activated = ?report.activated,
                        deactivated = ?report.deactivated,
                        "rules fired"
                    );
                }
            }
        }
    }
    ticks
}
