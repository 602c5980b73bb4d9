use anyhow::Result;
use log::*;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::mpsc::Sender;

use crate::store::StateStore;
use crate::tick::{TickEvent, Trigger};

/// First multiple of `interval` since the epoch that lies after `now`.
pub fn next_aligned_tick(now: OffsetDateTime, interval: Duration) -> OffsetDateTime {
    let interval_secs = interval.as_secs().max(1) as i64;
    let next = (now.unix_timestamp().div_euclid(interval_secs) + 1) * interval_secs;
    OffsetDateTime::from_unix_timestamp(next).unwrap_or(now + interval)
}

pub async fn run_schedule(interval: Duration, ticks: Sender<TickEvent>) -> Result<()> {
    loop {
        let now = OffsetDateTime::now_utc();
        let next = next_aligned_tick(now, interval);
        debug!("Next scheduled tick at {}", next);

        let wait = Duration::try_from(next - now).unwrap_or(interval);
        tokio::time::sleep(wait).await;
        ticks.send(TickEvent::new(Trigger::Schedule)).await?;
    }
}

// Recompute on SIGUSR1
#[cfg(unix)]
pub async fn run_manual_trigger(ticks: Sender<TickEvent>) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut requests = signal(SignalKind::user_defined1())?;
    while requests.recv().await.is_some() {
        info!("Manual recalculation requested");
        ticks.send(TickEvent::new(Trigger::Manual)).await?;
    }
    Ok(())
}

// Remembers the last polled state; the first poll only sets the baseline
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last_seen: Option<Option<String>>,
}

impl ChangeDetector {
    pub fn observe(&mut self, current: Option<String>) -> bool {
        let changed = matches!(&self.last_seen, Some(last) if *last != current);
        self.last_seen = Some(current);
        changed
    }
}

pub async fn watch_outdoor_temperature<S>(
    store: S,
    entity_id: &'static str,
    interval: Duration,
    ticks: Sender<TickEvent>,
) -> Result<()>
where
    S: StateStore + Clone + Send + 'static,
{
    let mut poll = tokio::time::interval(interval);
    let mut detector = ChangeDetector::default();

    loop {
        poll.tick().await;
        let reader = store.clone();
        let current = match tokio::task::spawn_blocking(move || reader.state(entity_id)).await? {
            Ok(current) => current,
            Err(error) => {
                warn!("Failed to read {}: {:#}", entity_id, error);
                continue;
            }
        };
        debug!("{} polled as {:?}", entity_id, current);
        if detector.observe(current) {
            debug!("{} changed", entity_id);
            ticks.send(TickEvent::new(Trigger::OutdoorChange)).await?;
        }
    }
}
