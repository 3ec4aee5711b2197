//! Sample clip frame source
//!
//! The fallback when no camera can be acquired: a short animated GIF bundled
//! with the app, decoded up front and replayed on a loop. Frames are picked
//! by elapsed wall-clock time, so playback speed is independent of the
//! render rate.

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::time::{Duration, Instant};

use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;

use super::{SourceError, VideoFrame};

/// Location of the bundled clip, relative to the working directory.
pub const DEFAULT_CLIP_PATH: &str = "assets/sample.gif";

/// Delay applied to frames that declare none. Some encoders write 0.
const FALLBACK_FRAME_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug)]
struct ClipFrame {
    data: Vec<u8>,
    /// Time at which this frame ends, measured from the start of a loop.
    end_offset: Duration,
}

/// A pre-decoded, endlessly looping clip.
#[derive(Debug)]
pub struct SampleVideo {
    frames: Vec<ClipFrame>,
    width: u32,
    height: u32,
    /// Duration of one full playback cycle.
    loop_duration: Duration,
    started: Instant,
}

impl SampleVideo {
    /// Read and decode the clip at `path`.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let bytes = fs::read(path).map_err(|source| SourceError::SampleRead {
            path: path.to_path_buf(),
            source,
        })?;
        let clip = Self::from_bytes(&bytes)?;
        log::info!(
            "sample clip loaded: {} ({}x{}, {} frames, {:.1}s loop)",
            path.display(),
            clip.width,
            clip.height,
            clip.frames.len(),
            clip.loop_duration.as_secs_f32(),
        );
        Ok(clip)
    }

    /// Decode a GIF from memory. All frames are composited to full RGBA
    /// images immediately; the clip is expected to be small.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SourceError> {
        let decoder = GifDecoder::new(Cursor::new(bytes))?;
        let raw_frames = decoder.into_frames().collect_frames()?;
        if raw_frames.is_empty() {
            return Err(SourceError::EmptyClip);
        }

        let mut frames = Vec::with_capacity(raw_frames.len());
        let mut offset = Duration::ZERO;
        let mut width = 0;
        let mut height = 0;
        for frame in raw_frames {
            let mut delay = Duration::from(frame.delay());
            if delay.is_zero() {
                delay = FALLBACK_FRAME_DELAY;
            }
            offset += delay;

            let buffer = frame.into_buffer();
            (width, height) = buffer.dimensions();
            frames.push(ClipFrame {
                data: buffer.into_raw(),
                end_offset: offset,
            });
        }

        Ok(Self {
            frames,
            width,
            height,
            loop_duration: offset,
            started: Instant::now(),
        })
    }

    /// The frame scheduled for right now. Always available - the clip loops
    /// forever. `frame_number` keeps counting across loops so the render
    /// side can dedupe uploads.
    pub fn current_frame(&self) -> VideoFrame {
        let elapsed = self.started.elapsed();
        let loop_nanos = self.loop_duration.as_nanos().max(1);
        let loops = (elapsed.as_nanos() / loop_nanos) as u64;
        let within = Duration::from_nanos((elapsed.as_nanos() % loop_nanos) as u64);

        let index = self
            .frames
            .iter()
            .position(|f| within < f.end_offset)
            .unwrap_or(self.frames.len() - 1);

        VideoFrame {
            data: self.frames[index].data.clone(),
            width: self.width,
            height: self.height,
            frame_number: loops * self.frames.len() as u64 + index as u64 + 1,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::{GifEncoder, Repeat};
    use image::{Delay, Frame, Rgba, RgbaImage};

    fn encode_test_clip(colors: &[[u8; 4]], width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut bytes);
            encoder.set_repeat(Repeat::Infinite).unwrap();
            for color in colors {
                let img = RgbaImage::from_pixel(width, height, Rgba(*color));
                let frame = Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(100, 1));
                encoder.encode_frame(frame).unwrap();
            }
        }
        bytes
    }

    #[test]
    fn test_decode_clip() {
        let bytes = encode_test_clip(&[[255, 0, 0, 255], [0, 255, 0, 255]], 8, 6);
        let clip = SampleVideo::from_bytes(&bytes).unwrap();
        assert_eq!(clip.frame_count(), 2);
        assert_eq!(clip.dimensions(), (8, 6));
    }

    #[test]
    fn test_current_frame_shape() {
        let bytes = encode_test_clip(&[[0, 0, 255, 255]], 4, 4);
        let clip = SampleVideo::from_bytes(&bytes).unwrap();
        let frame = clip.current_frame();
        assert_eq!(frame.width, 4);
        assert_eq!(frame.height, 4);
        assert_eq!(frame.data.len(), 4 * 4 * 4);
        assert!(frame.frame_number >= 1);
    }

    #[test]
    fn test_frame_numbers_never_go_backwards() {
        let bytes = encode_test_clip(&[[1, 2, 3, 255], [4, 5, 6, 255]], 2, 2);
        let clip = SampleVideo::from_bytes(&bytes).unwrap();
        let mut last = 0;
        for _ in 0..20 {
            let n = clip.current_frame().frame_number;
            assert!(n >= last);
            last = n;
        }
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        assert!(SampleVideo::from_bytes(b"definitely not a gif").is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = SampleVideo::load(Path::new("assets/does-not-exist.gif")).unwrap_err();
        assert!(matches!(err, SourceError::SampleRead { .. }));
    }
}
