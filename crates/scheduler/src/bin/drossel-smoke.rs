//! drossel-smoke -- synthetic workload probe for the bounded scheduler.
//!
//! Builds a worker pool and scheduler from CLI/TOML config, submits a batch
//! of busy tasks, waits for their completion signals, checks the observed
//! concurrency high-water mark against the configured limit, and dumps the
//! scheduler metrics as JSON.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use drossel_core::{FnTask, TaskScheduler};
use drossel_scheduler::{build_worker_pool, Scheduler, SchedulerConfig};

// ── CLI ─────────────────────────────────────────────────────────────

/// Synthetic workload probe for the drossel scheduler.
#[derive(Parser, Debug)]
#[command(name = "drossel-smoke", version, about)]
struct Cli {
    /// Path to a scheduler TOML config file.
    #[arg(long, env = "DROSSEL_CONFIG")]
    config: Option<String>,

    /// Number of tasks to submit.
    #[arg(long, env = "DROSSEL_SMOKE_TASKS", default_value_t = 64)]
    tasks: usize,

    /// Override the configured max concurrency.
    #[arg(long, env = "DROSSEL_MAX_CONCURRENCY")]
    max_concurrency: Option<usize>,

    /// Per-task busy time in milliseconds.
    #[arg(long, env = "DROSSEL_SMOKE_TASK_MILLIS", default_value_t = 5)]
    task_millis: u64,

    /// Worker threads in the underlying pool (0 = one per core).
    #[arg(long, env = "DROSSEL_POOL_THREADS", default_value_t = 0)]
    pool_threads: usize,
}

// ── main ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match SchedulerConfig::from_file(path) {
            Ok(cfg) => {
                info!(path = %path, "loaded scheduler config");
                cfg
            }
            Err(e) => {
                warn!(
                    error = %e,
                    path = %path,
                    "failed to load config, using defaults"
                );
                SchedulerConfig::default()
            }
        },
        None => SchedulerConfig::default(),
    };
    if let Some(max_concurrency) = cli.max_concurrency {
        config.max_concurrency = max_concurrency;
    }

    let pool = build_worker_pool(cli.pool_threads).context("failed to build worker pool")?;
    let scheduler =
        Scheduler::new(config.clone(), pool).context("failed to construct scheduler")?;

    let running = Arc::new(AtomicUsize::new(0));
    let high_water = Arc::new(AtomicUsize::new(0));
    let (done_tx, done_rx) = mpsc::channel();

    info!(
        tasks = cli.tasks,
        max_concurrency = config.max_concurrency,
        "submitting workload"
    );
    for i in 0..cli.tasks {
        let running = Arc::clone(&running);
        let high_water = Arc::clone(&high_water);
        let done = done_tx.clone();
        let busy = Duration::from_millis(cli.task_millis);
        scheduler.submit(FnTask::new(format!("smoke-{i}"), move |_cx| {
            let now = running.fetch_add(1, Ordering::SeqCst) + 1;
            high_water.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(busy);
            running.fetch_sub(1, Ordering::SeqCst);
            let _ = done.send(i);
        }));
    }
    drop(done_tx);

    for _ in 0..cli.tasks {
        done_rx
            .recv_timeout(Duration::from_secs(30))
            .context("timed out waiting for task completion")?;
    }

    let peak = high_water.load(Ordering::SeqCst);
    if peak > config.max_concurrency {
        anyhow::bail!(
            "concurrency cap violated: peak {} > limit {}",
            peak,
            config.max_concurrency
        );
    }
    info!(peak, limit = config.max_concurrency, "concurrency cap held");

    println!("{}", serde_json::to_string_pretty(&scheduler.metrics())?);
    Ok(())
}
