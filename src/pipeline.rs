use apex_capture::Frame;
use apex_data::Settings;
use apex_state::OverlayState;
use apex_vision::Engine;
use image::RgbaImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Notify};
use tracing::{debug, info, warn};

/// Drives the classifier with frames from the capture side and publishes
/// overlay states for the actuator side.
pub struct Pipeline {
    stop: Arc<AtomicBool>,
    wake: Arc<Notify>,
    state_rx: watch::Receiver<Option<OverlayState>>,
}

impl Pipeline {
    /// Spawn the classification loop on the current tokio runtime.
    ///
    /// Frames are evaluated one at a time; a frame that arrives while the
    /// previous one is still being classified replaces any older pending one.
    pub fn start(
        engine: Engine,
        frame_rx: watch::Receiver<Option<Arc<RgbaImage>>>,
        settings_rx: watch::Receiver<Settings>,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let (state_tx, state_rx) = watch::channel::<Option<OverlayState>>(None);

        let wake = Arc::new(Notify::new());
        tokio::spawn(classify_loop(
            engine,
            frame_rx,
            settings_rx,
            state_tx,
            stop.clone(),
            wake.clone(),
        ));

        info!("Pipeline started");
        Self { stop, wake, state_rx }
    }

    /// Stop the loop. An evaluation already running finishes first; nothing
    /// is published after it.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
        self.wake.notify_one();
        info!("Pipeline stop requested");
    }

    /// Most recent overlay state, `None` until a frame could be classified.
    pub fn latest_state(&self) -> Option<OverlayState> {
        *self.state_rx.borrow()
    }

    /// Receiver notified whenever the overlay state changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<OverlayState>> {
        self.state_rx.clone()
    }
}

async fn classify_loop(
    engine: Engine,
    mut frame_rx: watch::Receiver<Option<Arc<RgbaImage>>>,
    mut settings_rx: watch::Receiver<Settings>,
    state_tx: watch::Sender<Option<OverlayState>>,
    stop: Arc<AtomicBool>,
    wake: Arc<Notify>,
) {
    // The engine moves into each blocking task and comes back with the result
    let mut engine = Some(engine);
    let mut settings_open = true;

    loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        let Some(mut current) = engine.take() else {
            break;
        };

        tokio::select! {
            _ = wake.notified() => {
                break;
            }
            changed = frame_rx.changed() => {
                if changed.is_err() {
                    info!("Frame source closed");
                    break;
                }
                let frame = frame_rx.borrow_and_update().clone();
                let Some(frame) = frame else {
                    engine = Some(current);
                    continue;
                };

                let result = tokio::task::spawn_blocking(move || {
                    let state = current.evaluate(&Frame::from_rgba_image(&frame));
                    (current, state)
                })
                .await;

                match result {
                    Ok((_, _)) if stop.load(Ordering::Relaxed) => break,
                    Ok((returned, state)) => {
                        engine = Some(returned);
                        // Unsupported frames leave the banners as they are
                        if let Some(state) = state {
                            state_tx.send_if_modified(|published| {
                                if *published == Some(state) {
                                    return false;
                                }
                                debug!("Overlay state changed: {:?}", state);
                                *published = Some(state);
                                true
                            });
                        }
                    }
                    Err(e) => {
                        warn!("Classification task failed: {}", e);
                        break;
                    }
                }
            }
            changed = settings_rx.changed(), if settings_open => {
                if changed.is_err() {
                    settings_open = false;
                    engine = Some(current);
                    continue;
                }
                let settings = settings_rx.borrow_and_update().clone();

                let result = tokio::task::spawn_blocking(move || {
                    let applied = current.apply_settings(settings);
                    (current, applied)
                })
                .await;

                match result {
                    Ok((returned, applied)) => {
                        engine = Some(returned);
                        if let Err(e) = applied {
                            warn!("Keeping previous settings: {}", e);
                        }
                    }
                    Err(e) => {
                        warn!("Settings task failed: {}", e);
                        break;
                    }
                }
            }
        }
    }

    info!("Pipeline stopped");
}
