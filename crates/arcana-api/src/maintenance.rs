//! Periodic maintenance: the stale-chat sweep, horoscope cleanup, and the
//! daily horoscope pre-generation.
//!
//! The jobs run on the shared [`MaintenanceScheduler`] while the server is
//! up, and can be triggered once from the CLI. A failing run is logged and
//! retried at the next tick.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::FutureExt;

use arcana_core::horoscope::service::PregenerationReport;
use arcana_core::scheduler::{JobCallback, MaintenanceScheduler};

use crate::state::AppState;

pub const CHAT_SWEEP_JOB: &str = "chat-sweep";
pub const HOROSCOPE_CLEANUP_JOB: &str = "horoscope-cleanup";
pub const HOROSCOPE_GENERATE_JOB: &str = "horoscope-generate";

/// Outcome of one maintenance pass.
#[derive(Debug, Default, Clone, Copy, serde::Serialize)]
pub struct SweepReport {
    pub chats_closed: u64,
    pub horoscopes_deleted: u64,
}

/// Close chats past their retention window.
pub async fn sweep_chats(state: &AppState, now: DateTime<Utc>) -> anyhow::Result<u64> {
    let closed = state
        .chat_service
        .sweep_stale(now, state.config.chat.retention_days)
        .await?;
    Ok(closed)
}

/// Delete horoscopes older than the serving window.
pub async fn cleanup_horoscopes(state: &AppState, now: DateTime<Utc>) -> anyhow::Result<u64> {
    Ok(state.horoscope_service.cleanup(now).await?)
}

/// Generate today's horoscope for every active app user that lacks one.
pub async fn generate_horoscopes(
    state: &AppState,
    now: DateTime<Utc>,
) -> anyhow::Result<PregenerationReport> {
    let users = state.user_service.active_app_users().await?;
    Ok(state.horoscope_service.pregenerate(&users, now).await)
}

/// Run the sweep and the cleanup once. Pre-generation is left out since it
/// calls the oracle once per user; see [`generate_horoscopes`].
pub async fn run_once(state: &AppState, now: DateTime<Utc>) -> anyhow::Result<SweepReport> {
    Ok(SweepReport {
        chats_closed: sweep_chats(state, now).await?,
        horoscopes_deleted: cleanup_horoscopes(state, now).await?,
    })
}

/// Start the scheduler with all three jobs registered on their configured cron
/// schedules.
pub async fn start(state: &AppState) -> anyhow::Result<MaintenanceScheduler> {
    let scheduler = MaintenanceScheduler::new();
    scheduler.start().await?;

    let sweep_state = state.clone();
    let sweep: JobCallback = Arc::new(move |now: DateTime<Utc>| {
        let state = sweep_state.clone();
        async move {
            match sweep_chats(&state, now).await {
                Ok(closed) => tracing::info!(closed, "stale chat sweep finished"),
                Err(e) => tracing::warn!(error = %e, "stale chat sweep failed"),
            }
        }
        .boxed()
    });
    scheduler
        .schedule(CHAT_SWEEP_JOB, &state.config.chat.sweep_schedule, sweep)
        .await?;

    let cleanup_state = state.clone();
    let cleanup: JobCallback = Arc::new(move |now: DateTime<Utc>| {
        let state = cleanup_state.clone();
        async move {
            match cleanup_horoscopes(&state, now).await {
                Ok(deleted) => tracing::info!(deleted, "horoscope cleanup finished"),
                Err(e) => tracing::warn!(error = %e, "horoscope cleanup failed"),
            }
        }
        .boxed()
    });
    scheduler
        .schedule(
            HOROSCOPE_CLEANUP_JOB,
            &state.config.horoscope.cleanup_schedule,
            cleanup,
        )
        .await?;

    let generate_state = state.clone();
    let generate: JobCallback = Arc::new(move |now: DateTime<Utc>| {
        let state = generate_state.clone();
        async move {
            match generate_horoscopes(&state, now).await {
                Ok(report) => tracing::info!(
                    ready = report.ready,
                    failed = report.failed,
                    "horoscope pre-generation finished"
                ),
                Err(e) => tracing::warn!(error = %e, "horoscope pre-generation failed"),
            }
        }
        .boxed()
    });
    scheduler
        .schedule(
            HOROSCOPE_GENERATE_JOB,
            &state.config.horoscope.generate_schedule,
            generate,
        )
        .await?;

    Ok(scheduler)
}
