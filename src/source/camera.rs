//! Camera frame source
//!
//! Captures frames on a background thread and publishes the latest decoded
//! RGBA frame for the render thread to pick up. The nokhwa camera object
//! lives entirely on the capture thread; `open` blocks on a handshake so an
//! unavailable device is reported synchronously and the caller can fall
//! back to the sample clip.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use nokhwa::pixel_format::RgbAFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::Camera;
use parking_lot::Mutex;

use super::{SourceError, VideoFrame};

type SharedFrame = Arc<Mutex<Option<VideoFrame>>>;

/// Live camera capture.
#[derive(Debug)]
pub struct CameraSource {
    latest: SharedFrame,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl CameraSource {
    /// Open camera `index` and start streaming at (or near) the requested
    /// resolution. Fails synchronously when the device cannot be opened or
    /// its stream will not start.
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self, SourceError> {
        let latest: SharedFrame = Arc::new(Mutex::new(None));
        let running = Arc::new(AtomicBool::new(true));

        // The capture thread reports the outcome of opening the device
        // before entering its loop.
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<(), SourceError>>(1);

        let latest_clone = latest.clone();
        let running_clone = running.clone();
        let thread = std::thread::Builder::new()
            .name("camera-capture".to_string())
            .spawn(move || {
                let requested = RequestedFormat::new::<RgbAFormat>(
                    RequestedFormatType::HighestResolution(Resolution::new(width, height)),
                );
                let mut camera = match Camera::new(CameraIndex::Index(index), requested) {
                    Ok(camera) => camera,
                    Err(e) => {
                        let _ = ready_tx.send(Err(SourceError::CameraOpen(e.to_string())));
                        return;
                    }
                };
                if let Err(e) = camera.open_stream() {
                    let _ = ready_tx.send(Err(SourceError::CameraStream(e.to_string())));
                    return;
                }

                let actual = camera.resolution();
                log::info!(
                    "camera opened: {} ({}x{})",
                    camera.info().human_name(),
                    actual.width(),
                    actual.height()
                );
                let _ = ready_tx.send(Ok(()));

                capture_loop(camera, latest_clone, running_clone);
            })
            .map_err(|e| SourceError::CameraOpen(format!("capture thread: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                // Thread has already exited; nothing to join eagerly.
                let _ = thread.join();
                return Err(e);
            }
            Err(_) => {
                let _ = thread.join();
                return Err(SourceError::CameraOpen(
                    "capture thread exited before reporting".to_string(),
                ));
            }
        }

        Ok(Self {
            latest,
            running,
            thread: Some(thread),
        })
    }

    /// Newest decoded frame, if the camera has delivered one yet. Frame
    /// dimensions travel with each frame; the render side sizes its
    /// textures from them rather than from the requested resolution.
    pub fn latest_frame(&self) -> Option<VideoFrame> {
        self.latest.lock().clone()
    }

    /// Stop the capture thread and release the device.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.stop();
    }
}

fn capture_loop(mut camera: Camera, latest: SharedFrame, running: Arc<AtomicBool>) {
    let mut frame_number: u64 = 0;

    while running.load(Ordering::Acquire) {
        match camera.frame() {
            Ok(frame) => match frame.decode_image::<RgbAFormat>() {
                Ok(image) => {
                    let (width, height) = image.dimensions();
                    frame_number += 1;
                    *latest.lock() = Some(VideoFrame {
                        data: image.into_raw(),
                        width,
                        height,
                        frame_number,
                    });
                }
                // A bad frame is skipped, never fatal.
                Err(e) => log::warn!("failed to decode camera frame: {e}"),
            },
            Err(e) => {
                log::warn!("failed to capture frame: {e}");
                std::thread::sleep(Duration::from_millis(10));
            }
        }
    }

    log::info!("camera capture thread stopped");
}
