//! Cron scheduler for periodic maintenance (stale chat sweep, horoscope
//! cleanup), wrapping `tokio-cron-scheduler`.
//!
//! Jobs are registered by name. Expressions are 6-field cron with seconds,
//! evaluated in UTC; 5-field expressions and a few keywords are accepted
//! and normalized.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use tokio::sync::RwLock;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("scheduler error: {0}")]
    JobError(String),

    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("job '{0}' is not scheduled")]
    JobNotFound(String),
}

// ---------------------------------------------------------------------------
// Schedule normalization
// ---------------------------------------------------------------------------

/// Normalize a schedule string to a 6-field cron expression.
///
/// Accepts 6-field cron as-is, 5-field cron (seconds prepended), `hourly`,
/// `daily`, and `daily at HH:MM`.
pub fn normalize_schedule(input: &str) -> Result<String, SchedulerError> {
    let trimmed = input.trim();

    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    match parts.len() {
        5 => return Ok(format!("0 {trimmed}")),
        6 => return Ok(trimmed.to_string()),
        _ => {}
    }

    let lower = trimmed.to_lowercase();
    match lower.as_str() {
        "hourly" => return Ok("0 0 * * * *".to_string()),
        "daily" => return Ok("0 0 0 * * *".to_string()),
        _ => {}
    }

    if let Some(at) = lower.strip_prefix("daily at ") {
        let (hour, minute) = at
            .split_once(':')
            .and_then(|(h, m)| Some((h.trim().parse::<u32>().ok()?, m.trim().parse::<u32>().ok()?)))
            .ok_or_else(|| SchedulerError::InvalidSchedule(input.to_string()))?;
        if hour < 24 && minute < 60 {
            return Ok(format!("0 {minute} {hour} * * *"));
        }
    }

    Err(SchedulerError::InvalidSchedule(format!(
        "unrecognized schedule format: '{trimmed}'"
    )))
}

// ---------------------------------------------------------------------------
// MaintenanceScheduler
// ---------------------------------------------------------------------------

/// Invoked with the fire time each time a job triggers.
pub type JobCallback = Arc<dyn Fn(DateTime<Utc>) -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Clone)]
pub struct MaintenanceScheduler {
    inner: Arc<RwLock<Option<JobScheduler>>>,
    /// Job name -> tokio-cron-scheduler job id.
    jobs: Arc<RwLock<HashMap<String, Uuid>>>,
}

impl MaintenanceScheduler {
    /// Create a scheduler. Nothing fires until [`MaintenanceScheduler::start`].
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
            jobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn start(&self) -> Result<(), SchedulerError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| SchedulerError::JobError(e.to_string()))?;
        scheduler
            .start()
            .await
            .map_err(|e| SchedulerError::JobError(e.to_string()))?;

        *self.inner.write().await = Some(scheduler);
        tracing::info!("maintenance scheduler started");
        Ok(())
    }

    /// Stop the scheduler and forget every job.
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        if let Some(mut scheduler) = self.inner.write().await.take() {
            scheduler
                .shutdown()
                .await
                .map_err(|e| SchedulerError::JobError(e.to_string()))?;
            tracing::info!("maintenance scheduler stopped");
        }
        self.jobs.write().await.clear();
        Ok(())
    }

    /// Register `callback` under `name`, replacing a job of the same name.
    pub async fn schedule(
        &self,
        name: &str,
        schedule: &str,
        callback: JobCallback,
    ) -> Result<(), SchedulerError> {
        let cron_expr = normalize_schedule(schedule)?;

        let inner = self.inner.read().await;
        let scheduler = inner
            .as_ref()
            .ok_or_else(|| SchedulerError::JobError("scheduler not started".to_string()))?;

        let job_name = name.to_string();
        let job = Job::new_async(cron_expr.as_str(), move |_uuid, _lock| {
            let cb = callback.clone();
            let job_name = job_name.clone();
            Box::pin(async move {
                let now = Utc::now();
                tracing::debug!(job = %job_name, %now, "maintenance job fired");
                cb(now).await;
            })
        })
        .map_err(|e| SchedulerError::InvalidSchedule(e.to_string()))?;

        let job_id = job.guid();
        scheduler
            .add(job)
            .await
            .map_err(|e| SchedulerError::JobError(e.to_string()))?;

        let previous = self.jobs.write().await.insert(name.to_string(), job_id);
        if let Some(previous) = previous {
            scheduler
                .remove(&previous)
                .await
                .map_err(|e| SchedulerError::JobError(e.to_string()))?;
        }

        tracing::info!(job = name, schedule = %cron_expr, "maintenance job scheduled");
        Ok(())
    }

    pub async fn unschedule(&self, name: &str) -> Result<(), SchedulerError> {
        let job_id = self
            .jobs
            .write()
            .await
            .remove(name)
            .ok_or_else(|| SchedulerError::JobNotFound(name.to_string()))?;

        if let Some(scheduler) = self.inner.read().await.as_ref() {
            scheduler
                .remove(&job_id)
                .await
                .map_err(|e| SchedulerError::JobError(e.to_string()))?;
        }
        tracing::info!(job = name, "maintenance job unscheduled");
        Ok(())
    }

    pub async fn job_count(&self) -> usize {
        self.jobs.read().await.len()
    }
}

impl Default for MaintenanceScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> JobCallback {
        Arc::new(|_now| Box::pin(async {}))
    }

    #[test]
    fn six_field_cron_passes_through() {
        assert_eq!(normalize_schedule("0 0 0 * * *").unwrap(), "0 0 0 * * *");
    }

    #[test]
    fn five_field_cron_gains_seconds() {
        assert_eq!(normalize_schedule("5 0 * * *").unwrap(), "0 5 0 * * *");
    }

    #[test]
    fn keywords_are_normalized() {
        assert_eq!(normalize_schedule("Daily").unwrap(), "0 0 0 * * *");
        assert_eq!(normalize_schedule("hourly").unwrap(), "0 0 * * * *");
        assert_eq!(normalize_schedule("daily at 00:05").unwrap(), "0 5 0 * * *");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(normalize_schedule("whenever").is_err());
        assert!(normalize_schedule("daily at 25:00").is_err());
        assert!(normalize_schedule("daily at noon").is_err());
    }

    #[tokio::test]
    async fn schedule_requires_start() {
        let scheduler = MaintenanceScheduler::new();
        let err = scheduler.schedule("sweep", "daily", noop()).await.unwrap_err();
        assert!(matches!(err, SchedulerError::JobError(_)));
    }

    #[tokio::test]
    async fn jobs_are_tracked_by_name() {
        let scheduler = MaintenanceScheduler::new();
        scheduler.start().await.unwrap();

        scheduler.schedule("sweep", "daily", noop()).await.unwrap();
        scheduler.schedule("cleanup", "0 5 0 * * *", noop()).await.unwrap();
        scheduler.schedule("sweep", "hourly", noop()).await.unwrap();
        assert_eq!(scheduler.job_count().await, 2);

        scheduler.unschedule("sweep").await.unwrap();
        assert!(matches!(
            scheduler.unschedule("sweep").await.unwrap_err(),
            SchedulerError::JobNotFound(_)
        ));

        scheduler.stop().await.unwrap();
        assert_eq!(scheduler.job_count().await, 0);
    }
}
