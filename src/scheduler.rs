//! Background scheduler for recurring catalog maintenance.
//!
//! One recurring job: a library-wide metadata sync through the import
//! service. Runs either on a fixed hour interval or on a cron expression
//! when `scheduler.cron_expression` is set.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::SchedulerConfig;
use crate::services::ImportService;

pub struct Scheduler {
    import_service: Arc<dyn ImportService>,
    config: SchedulerConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    pub fn new(import_service: Arc<dyn ImportService>, config: SchedulerConfig) -> Self {
        Self {
            import_service,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Scheduler is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting background scheduler");

        if let Some(cron_expr) = &self.config.cron_expression {
            self.run_with_cron(cron_expr).await
        } else {
            self.run_with_interval().await
        }
    }

    async fn run_with_cron(&self, cron_expr: &str) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let import_service = Arc::clone(&self.import_service);
        let running = Arc::clone(&self.running);

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let import_service = Arc::clone(&import_service);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                run_library_sync(import_service.as_ref()).await;
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Scheduler running with cron: {}", cron_expr);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    async fn run_with_interval(&self) -> Result<()> {
        let hours = self.config.sync_interval_hours.max(1);

        info!("Scheduler running: library sync every {}h", hours);

        // First tick fires immediately, giving a sync on daemon startup.
        let mut sync_interval = interval(Duration::from_secs(u64::from(hours) * 60 * 60));

        loop {
            sync_interval.tick().await;
            if !*self.running.read().await {
                break;
            }
            run_library_sync(self.import_service.as_ref()).await;
        }

        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping scheduler...");
        *self.running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }
}

async fn run_library_sync(import_service: &dyn ImportService) {
    let start = std::time::Instant::now();
    info!(
        event = "job_started",
        job_name = "sync_library",
        "Starting scheduled library sync"
    );

    let report = import_service.sync_library().await;

    if report.failed > 0 {
        error!(
            event = "job_failed",
            job_name = "sync_library",
            failed = report.failed,
            "Library sync finished with failures"
        );
    }

    info!(
        event = "job_finished",
        job_name = "sync_library",
        synced = report.synced,
        skipped = report.skipped,
        failed = report.failed,
        duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Scheduled library sync finished"
    );
}
