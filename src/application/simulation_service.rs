// Simulation service - Periodic telemetry and vision ticks behind shared state
use crate::application::random_source::RandomSource;
use crate::application::telemetry_generator::{TelemetryGenerator, latest};
use crate::application::vision_generator::VisionGenerator;
use crate::domain::sensor::SensorReading;
use crate::domain::vision::{VisionFeed, VisionVerdict};
use crate::infrastructure::config::SimulationSettings;
use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

const EVENT_BUFFER: usize = 64;

/// Item published to live subscribers on every tick.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum LiveEvent {
    Telemetry(SensorReading),
    Vision(VisionVerdict),
}

struct SharedState {
    window: RwLock<Vec<SensorReading>>,
    vision: RwLock<VisionFeed>,
}

/// Read-only handle onto the running simulation.
#[derive(Clone)]
pub struct SimulationReader {
    state: Arc<SharedState>,
    events: broadcast::Sender<LiveEvent>,
    cancel_token: CancellationToken,
}

impl SimulationReader {
    pub async fn window(&self) -> Vec<SensorReading> {
        self.state.window.read().await.clone()
    }

    /// Latest reading, zeroed when nothing has been generated yet.
    pub async fn latest(&self) -> SensorReading {
        latest(&self.state.window.read().await)
    }

    pub async fn vision_feed(&self) -> VisionFeed {
        self.state.vision.read().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.events.subscribe()
    }

    /// Cancelled once the simulation is shutting down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }
}

/// Owns both tick tasks. Dropping it cancels them; [`SimulationRuntime::stop`]
/// also waits for them to finish.
pub struct SimulationRuntime {
    reader: SimulationReader,
    cancel_token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl SimulationRuntime {
    pub fn start<T, V>(settings: &SimulationSettings, telemetry_rng: T, vision_rng: V) -> Self
    where
        T: RandomSource + 'static,
        V: RandomSource + 'static,
    {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let mut telemetry = TelemetryGenerator::new(telemetry_rng);
        let initial = telemetry.initialize(settings.window_size, Utc::now());

        let state = Arc::new(SharedState {
            window: RwLock::new(initial),
            vision: RwLock::new(VisionFeed::new()),
        });
        let cancel_token = CancellationToken::new();
        let reader = SimulationReader {
            state,
            events,
            cancel_token: cancel_token.clone(),
        };

        let handles = vec![
            tokio::spawn(telemetry_loop(
                telemetry,
                reader.clone(),
                Duration::from_millis(settings.telemetry_interval_ms),
                cancel_token.clone(),
            )),
            tokio::spawn(vision_loop(
                VisionGenerator::new(vision_rng),
                reader.clone(),
                Duration::from_millis(settings.vision_interval_ms),
                cancel_token.clone(),
            )),
        ];

        tracing::info!(
            "Simulation started: window={} telemetry={}ms vision={}ms",
            settings.window_size,
            settings.telemetry_interval_ms,
            settings.vision_interval_ms
        );

        Self {
            reader,
            cancel_token,
            handles,
        }
    }

    pub fn reader(&self) -> SimulationReader {
        self.reader.clone()
    }

    /// Cancelling this token halts both ticks and ends live streams;
    /// [`SimulationRuntime::stop`] still has to be awaited to join the tasks.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub async fn stop(mut self) -> anyhow::Result<()> {
        self.cancel_token.cancel();
        for handle in std::mem::take(&mut self.handles) {
            handle.await.context("simulation task failed to join")?;
        }
        tracing::info!("Simulation stopped");
        Ok(())
    }
}

impl Drop for SimulationRuntime {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

fn ticker(period: Duration) -> tokio::time::Interval {
    // First tick after one full period, like a browser interval timer.
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn telemetry_loop<R: RandomSource>(
    mut generator: TelemetryGenerator<R>,
    reader: SimulationReader,
    period: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = ticker(period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let mut window = reader.state.window.write().await;
                match generator.tick(&window, Utc::now()) {
                    Ok(next) => {
                        *window = next;
                        let reading = latest(&window);
                        drop(window);
                        tracing::debug!("Telemetry tick: oee={:.1} rul={}", reading.oee, reading.predicted_rul);
                        // No subscribers is fine.
                        let _ = reader.events.send(LiveEvent::Telemetry(reading));
                    }
                    Err(e) => tracing::warn!("Skipping telemetry tick: {}", e),
                }
            }
            _ = cancel_token.cancelled() => {
                tracing::debug!("Telemetry loop shutting down");
                break;
            }
        }
    }
}

async fn vision_loop<R: RandomSource>(
    mut generator: VisionGenerator<R>,
    reader: SimulationReader,
    period: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = ticker(period);
    let mut frame = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let (verdict, next_frame) = generator.tick(frame, Utc::now());
                frame = next_frame;
                if !verdict.is_pass() {
                    tracing::debug!("Vision verdict {} failed: {:?}", verdict.id, verdict.defect_type);
                }
                reader.state.vision.write().await.push(verdict.clone(), frame);
                let _ = reader.events.send(LiveEvent::Vision(verdict));
            }
            _ = cancel_token.cancelled() => {
                tracing::debug!("Vision loop shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::random_source::SeededRandom;
    use crate::domain::vision::FEED_CAPACITY;

    fn settings() -> SimulationSettings {
        SimulationSettings {
            window_size: 41,
            telemetry_interval_ms: 5000,
            vision_interval_ms: 2500,
            seed: Some(1),
        }
    }

    fn start() -> SimulationRuntime {
        SimulationRuntime::start(&settings(), SeededRandom::from_seed(1), SeededRandom::from_seed(2))
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_initialized_on_start() {
        let runtime = start();
        let reader = runtime.reader();

        assert_eq!(reader.window().await.len(), 41);
        assert!(reader.vision_feed().await.is_empty());
        runtime.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_keep_window_length_and_fill_feed() {
        let runtime = start();
        let reader = runtime.reader();
        let first_latest = reader.latest().await;

        tokio::time::sleep(Duration::from_millis(15_100)).await;

        let window = reader.window().await;
        assert_eq!(window.len(), 41);
        assert_ne!(reader.latest().await, first_latest);
        assert!(window.windows(2).all(|pair| pair[0].time_ms <= pair[1].time_ms));

        let feed = reader.vision_feed().await;
        assert_eq!(feed.len(), 6);
        assert_eq!(feed.frame(), 6);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(reader.vision_feed().await.len(), FEED_CAPACITY);

        runtime.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_receive_events() {
        let runtime = start();
        let mut events = runtime.reader().subscribe();

        // Vision fires at 2.5s; both timers fire at 5s in either order.
        let first = events.recv().await.unwrap();
        assert!(matches!(first, LiveEvent::Vision(_)));

        let mut saw_telemetry = false;
        for _ in 0..2 {
            if let LiveEvent::Telemetry(reading) = events.recv().await.unwrap() {
                assert!(reading.prediction_lower <= reading.oee);
                saw_telemetry = true;
            }
        }
        assert!(saw_telemetry);

        runtime.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_ticks() {
        let runtime = start();
        let reader = runtime.reader();
        runtime.stop().await.unwrap();

        let before = reader.window().await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(reader.window().await, before);
        assert!(reader.vision_feed().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_token_halts_ticks_before_stop() {
        let runtime = start();
        let reader = runtime.reader();
        runtime.shutdown_token().cancel();
        assert!(reader.shutdown_token().is_cancelled());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(reader.vision_feed().await.is_empty());
        runtime.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_tasks() {
        let reader = {
            let runtime = start();
            runtime.reader()
        };

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(reader.vision_feed().await.is_empty());
    }

    #[test]
    fn test_live_event_shape() {
        let json = serde_json::to_value(LiveEvent::Telemetry(SensorReading::default())).unwrap();
        assert_eq!(json["type"], "telemetry");
        assert!(json["data"].get("predictedRUL").is_some());
    }
}
