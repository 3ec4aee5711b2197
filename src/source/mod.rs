//! Frame sources
//!
//! Two producers of video frames feed the panels: a live camera and a
//! bundled sample clip. Acquisition is a single binary choice made at
//! startup - try the camera once, and on any failure fall back to the clip.
//! There is no retry; only the status label tells the two apart.

pub mod camera;
pub mod sample;

use std::path::{Path, PathBuf};

pub use camera::CameraSource;
pub use sample::SampleVideo;

/// One decoded RGBA frame from whichever source is active.
#[derive(Clone, Debug)]
pub struct VideoFrame {
    /// Tightly packed RGBA pixel data.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Monotonically increasing; lets the render loop skip re-uploads.
    pub frame_number: u64,
}

/// Which source is feeding the panels. Drives the status label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    DeviceCamera,
    SampleVideo,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::DeviceCamera => "Device Camera",
            SourceKind::SampleVideo => "Sample Video",
        }
    }
}

/// Errors from acquiring a frame source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to open camera: {0}")]
    CameraOpen(String),
    #[error("failed to start camera stream: {0}")]
    CameraStream(String),
    #[error("failed to read sample clip {path}: {source}")]
    SampleRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode sample clip: {0}")]
    SampleDecode(#[from] image::ImageError),
    #[error("sample clip contains no frames")]
    EmptyClip,
}

/// The active frame source.
#[derive(Debug)]
pub enum FrameSource {
    Camera(CameraSource),
    Sample(SampleVideo),
}

impl FrameSource {
    /// Acquire a source: camera first, unconditional fallback to the bundled
    /// clip. Errors out only when the fallback itself cannot be loaded.
    pub fn acquire(
        camera_index: u32,
        width: u32,
        height: u32,
        clip_path: &Path,
    ) -> Result<Self, SourceError> {
        match CameraSource::open(camera_index, width, height) {
            Ok(camera) => Ok(Self::Camera(camera)),
            Err(e) => {
                log::warn!("camera unavailable ({e}); falling back to sample clip");
                SampleVideo::load(clip_path).map(Self::Sample)
            }
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Camera(_) => SourceKind::DeviceCamera,
            Self::Sample(_) => SourceKind::SampleVideo,
        }
    }

    /// Newest decodable frame, if one has arrived yet. The camera may take a
    /// few ticks to deliver its first frame; the render loop just keeps
    /// going without drawing until this returns `Some`.
    pub fn latest_frame(&self) -> Option<VideoFrame> {
        match self {
            Self::Camera(camera) => camera.latest_frame(),
            Self::Sample(clip) => Some(clip.current_frame()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::{GifEncoder, Repeat};
    use image::{Delay, Frame, Rgba, RgbaImage};
    use std::fs;

    /// Camera index that cannot exist on any machine, so acquisition fails
    /// deterministically and exercises the fallback.
    const NO_SUCH_CAMERA: u32 = u32::MAX;

    fn write_temp_clip(name: &str) -> PathBuf {
        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut bytes);
            encoder.set_repeat(Repeat::Infinite).unwrap();
            for color in [[255u8, 0, 0, 255], [0, 255, 0, 255]] {
                let img = RgbaImage::from_pixel(4, 4, Rgba(color));
                let frame = Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(100, 1));
                encoder.encode_frame(frame).unwrap();
            }
        }
        let path = std::env::temp_dir().join(format!("{name}-{}.gif", std::process::id()));
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_camera_rejected_falls_back_to_sample_clip() {
        let path = write_temp_clip("defocus-sim-fallback");

        let source = FrameSource::acquire(NO_SUCH_CAMERA, 64, 48, &path).unwrap();
        assert_eq!(source.kind(), SourceKind::SampleVideo);

        // The clip always has a decodable frame; the panels are never blank.
        let frame = source.latest_frame().expect("clip frame");
        assert_eq!((frame.width, frame.height), (4, 4));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_acquire_fails_when_clip_also_missing() {
        let err = FrameSource::acquire(
            NO_SUCH_CAMERA,
            64,
            48,
            Path::new("assets/does-not-exist.gif"),
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::SampleRead { .. }));
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(SourceKind::DeviceCamera.label(), "Device Camera");
        assert_eq!(SourceKind::SampleVideo.label(), "Sample Video");
    }

    #[test]
    fn test_source_error_display() {
        let err = SourceError::CameraOpen("no device".to_string());
        assert_eq!(err.to_string(), "failed to open camera: no device");
        assert_eq!(
            SourceError::EmptyClip.to_string(),
            "sample clip contains no frames"
        );
    }
}
