use crate::error::{PlayError, Result};
use std::time::Instant;

/// The playback surface the preview drives. Times are in seconds of source
/// media; volume is 0..=1.
pub trait MediaElement {
    fn load(&mut self, path: &str) -> Result<()>;
    fn play(&mut self) -> std::result::Result<(), PlayError>;
    fn pause(&mut self);
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f64);
    /// True once playback ran off the end of the source.
    fn is_ended(&mut self) -> bool;
}

/// A media element with no decoder behind it: time advances with the wall
/// clock while playing. Used when GStreamer is not compiled in.
#[derive(Debug, Clone, Default)]
pub struct ClockMedia {
    source: Option<String>,
    /// Source position when playback last started or was seeked.
    base: f64,
    started: Option<Instant>,
    duration: Option<f64>,
    volume: f64,
}

impl ClockMedia {
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            ..Self::default()
        }
    }

    /// Ends playback after `seconds`, like a real source of that length.
    pub fn with_duration(seconds: f64) -> Self {
        Self {
            duration: Some(seconds.max(0.0)),
            ..Self::new()
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_playing(&self) -> bool {
        self.started.is_some()
    }

    /// Position at `now`, capped at the duration.
    pub fn position_at(&self, now: Instant) -> f64 {
        let raw = match self.started {
            Some(t) => self.base + now.saturating_duration_since(t).as_secs_f64(),
            None => self.base,
        };
        match self.duration {
            Some(d) => raw.min(d),
            None => raw,
        }
    }

    fn ended_at(&self, now: Instant) -> bool {
        self.duration
            .is_some_and(|d| self.started.is_some() && self.position_at(now) >= d)
    }
}

impl MediaElement for ClockMedia {
    fn load(&mut self, path: &str) -> Result<()> {
        log::debug!("ClockMedia loading {}", path);
        self.source = Some(path.to_string());
        self.base = 0.0;
        self.started = None;
        Ok(())
    }

    fn play(&mut self) -> std::result::Result<(), PlayError> {
        if self.source.is_none() {
            return Err(PlayError::NotAllowed("no source loaded".to_string()));
        }
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.base = self.position_at(Instant::now());
        self.started = None;
    }

    fn current_time(&self) -> f64 {
        self.position_at(Instant::now())
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.base = seconds.max(0.0);
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn is_ended(&mut self) -> bool {
        self.ended_at(Instant::now())
    }
}

#[cfg(feature = "gstreamer")]
pub use gst_media::GstMedia;

#[cfg(feature = "gstreamer")]
mod gst_media {
    use super::MediaElement;
    use crate::error::{CutlineError, PlayError, Result};
    use gst::prelude::*;
    use gstreamer as gst;

    /// A `playbin` pipeline; decodes and renders through GStreamer's own sinks.
    pub struct GstMedia {
        playbin: gst::Element,
    }

    impl GstMedia {
        pub fn new() -> Result<Self> {
            gst::init().map_err(|e| CutlineError::media(e.to_string()))?;
            let playbin = gst::ElementFactory::make("playbin")
                .build()
                .map_err(|e| CutlineError::media(e.to_string()))?;
            Ok(Self { playbin })
        }
    }

    impl MediaElement for GstMedia {
        fn load(&mut self, path: &str) -> Result<()> {
            self.playbin
                .set_state(gst::State::Null)
                .map_err(|e| CutlineError::media(e.to_string()))?;
            let uri = gst::glib::filename_to_uri(path, None)
                .map_err(|e| CutlineError::media(e.to_string()))?;
            self.playbin.set_property("uri", uri.as_str());
            self.playbin
                .set_state(gst::State::Paused)
                .map_err(|e| CutlineError::media(e.to_string()))?;
            log::info!("Loaded {} into playbin", path);
            Ok(())
        }

        fn play(&mut self) -> std::result::Result<(), PlayError> {
            self.playbin
                .set_state(gst::State::Playing)
                .map(|_| ())
                .map_err(|e| PlayError::Failed(e.to_string()))
        }

        fn pause(&mut self) {
            if let Err(e) = self.playbin.set_state(gst::State::Paused) {
                log::warn!("Failed to pause playbin: {}", e);
            }
        }

        fn current_time(&self) -> f64 {
            self.playbin
                .query_position::<gst::ClockTime>()
                .map(|t| t.nseconds() as f64 / 1_000_000_000.0)
                .unwrap_or(0.0)
        }

        fn set_current_time(&mut self, seconds: f64) {
            let target = gst::ClockTime::from_nseconds((seconds.max(0.0) * 1_000_000_000.0) as u64);
            if let Err(e) = self
                .playbin
                .seek_simple(gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE, target)
            {
                log::warn!("Seek to {}s failed: {}", seconds, e);
            }
        }

        fn set_volume(&mut self, volume: f64) {
            self.playbin.set_property("volume", volume.clamp(0.0, 1.0));
        }

        fn is_ended(&mut self) -> bool {
            self.playbin
                .bus()
                .and_then(|bus| bus.pop_filtered(&[gst::MessageType::Eos]))
                .is_some()
        }
    }

    impl Drop for GstMedia {
        fn drop(&mut self) {
            let _ = self.playbin.set_state(gst::State::Null);
        }
    }
}
