//! Simulated firmware task set
//!
//! Three tasks share one `SharedState`: the sensor task queues readings, the
//! reporting task drains them and watches the current alarm, and the button
//! task stands in for the button interrupt that records the active alarm.

use crate::{SimConfig, SimError};
use critical_lock::SpinLock;
use protected_var::ProtectedInt;
use ring_buffer::{IntRingBuffer, BUFSIZE};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info, warn};

/// `current_alarm` value while no alarm has been raised
pub const NO_ALARM: i32 = -1;

/// State shared between the tasks. Owned by `run`, handed out as `Arc`s.
pub struct SharedState {
    /// Sensor readings waiting to be published
    pub readings: IntRingBuffer<BUFSIZE, SpinLock>,
    /// Alarm id set by the button handler
    pub current_alarm: ProtectedInt<SpinLock>,
    /// Non-zero once the sensor task has queued its last reading
    pub sensor_done: ProtectedInt<SpinLock>,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            readings: IntRingBuffer::new(),
            current_alarm: ProtectedInt::new(NO_ALARM),
            sensor_done: ProtectedInt::new(0),
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one simulation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimReport {
    pub produced: u32,
    pub dropped: u32,
    pub published: u32,
    /// Alarm changes observed by the reporting task
    pub alarm_changes: u32,
    pub last_alarm: i32,
}

/// Synthetic temperature reading in tenths of a degree
fn synth_reading(seq: u32) -> u32 {
    200 + (seq * 7) % 50
}

/// Queue `config.readings` readings, dropping any that find the buffer full
pub async fn sensor_task(state: Arc<SharedState>, config: SimConfig) -> (u32, u32) {
    let mut ticker = interval(Duration::from_millis(config.sensor_period_ms));
    let mut dropped = 0;

    for seq in 0..config.readings {
        ticker.tick().await;
        let reading = synth_reading(seq);
        match state.readings.put_item(reading) {
            Ok(()) => debug!("Queued reading {} ({} pending)", reading, state.readings.number()),
            Err(e) => {
                dropped += 1;
                warn!("Dropping reading {}: {}", reading, e);
            }
        }
    }

    state.sensor_done.set_value(1);
    info!("Sensor task finished: {} readings, {} dropped", config.readings, dropped);
    (config.readings, dropped)
}

/// Periodically drain the buffer and report alarm changes.
///
/// Returns `(published, alarm_changes)` once the sensor task is done and the
/// buffer is empty.
pub async fn reporting_task(state: Arc<SharedState>, config: SimConfig) -> (u32, u32) {
    let mut ticker = interval(Duration::from_millis(config.report_period_ms));
    let mut published = 0;
    let mut alarm_changes = 0;
    let mut last_alarm = NO_ALARM;

    loop {
        ticker.tick().await;

        let alarm = state.current_alarm.get_value();
        if alarm != last_alarm {
            info!("Current alarm changed: {} -> {}", last_alarm, alarm);
            last_alarm = alarm;
            alarm_changes += 1;
        }

        // Sampled before draining: once set, no more readings will arrive
        let sensor_done = state.sensor_done.get_value() != 0;

        if let Ok(pending) = state.readings.list_buffer() {
            debug!("Publishing {} pending readings", pending.len());
        }

        let mut batch = 0;
        while let Ok(reading) = state.readings.get_item() {
            debug!("Published reading {}", reading);
            batch += 1;
        }
        if batch > 0 {
            published += batch;
            info!("Published {} readings ({} total)", batch, published);
        }

        if sensor_done && state.readings.is_empty() {
            break;
        }
    }

    (published, alarm_changes)
}

/// Stand-in for the button interrupt: cycles the active alarm id
pub async fn button_task(state: Arc<SharedState>, config: SimConfig) {
    let mut ticker = interval(Duration::from_millis(config.button_period_ms));
    let mut next = 0;

    while state.sensor_done.get_value() == 0 {
        ticker.tick().await;
        state.current_alarm.set_value(next);
        debug!("Button pressed, alarm {} active", next);
        next = (next + 1) % config.alarm_count;
    }
}

/// Run the three tasks to completion on the current runtime
pub async fn run(config: SimConfig) -> Result<SimReport, SimError> {
    let state = Arc::new(SharedState::new());
    info!(
        "Starting tasks: buffer capacity {}, {} readings",
        state.readings.capacity(),
        config.readings
    );

    let sensor = tokio::spawn(sensor_task(Arc::clone(&state), config.clone()));
    let reporter = tokio::spawn(reporting_task(Arc::clone(&state), config.clone()));
    let button = tokio::spawn(button_task(Arc::clone(&state), config));

    let (sensor, reporter, button) = tokio::join!(sensor, reporter, button);
    let (produced, dropped) = sensor?;
    let (published, alarm_changes) = reporter?;
    button?;

    Ok(SimReport {
        produced,
        dropped,
        published,
        alarm_changes,
        last_alarm: state.current_alarm.get_value(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_state_starts_clear() {
        let state = SharedState::new();
        assert!(state.readings.is_empty());
        assert_eq!(state.current_alarm.get_value(), NO_ALARM);
        assert_eq!(state.sensor_done.get_value(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_run_publishes_everything() {
        let report = run(SimConfig::quick()).await.unwrap();

        assert_eq!(report.produced, 40);
        assert_eq!(report.dropped, 0);
        assert_eq!(report.published, 40);
        assert!(report.last_alarm >= 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_reporter_drops_readings() {
        let report = run(SimConfig::stress()).await.unwrap();

        assert_eq!(report.produced, 200);
        assert!(report.dropped > 0);
        assert_eq!(report.published + report.dropped, report.produced);
        assert!(report.alarm_changes > 0);
    }
}
