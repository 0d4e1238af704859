//! Marker tracks.

use crate::event::{MetaEvent, TimeSignature, TrackEvent};
use crate::timeline::Timeline;
use crate::timing::{FrameRate, Tempo, TICKS_PER_BEAT};
use crate::Result;

/// Label for the marker at 1-based position `ordinal`.
pub fn marker_label(ordinal: usize) -> String {
    format!("SC {}", ordinal)
}

/// Ordered meta-events of a single track, excluding end-of-track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    events: Vec<TrackEvent>,
}

impl Track {
    /// Create an empty track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a track from already-ordered events.
    pub fn from_events(events: Vec<TrackEvent>) -> Self {
        Self { events }
    }

    /// Append an event.
    pub fn push(&mut self, delta: u32, event: MetaEvent) {
        self.events.push(TrackEvent::new(delta, event));
    }

    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// First tempo event, if any.
    pub fn tempo(&self) -> Option<Tempo> {
        self.events.iter().find_map(|e| match e.event {
            MetaEvent::Tempo(tempo) => Some(tempo),
            _ => None,
        })
    }

    /// First time signature event, if any.
    pub fn time_signature(&self) -> Option<TimeSignature> {
        self.events.iter().find_map(|e| match e.event {
            MetaEvent::TimeSignature(sig) => Some(sig),
            _ => None,
        })
    }

    /// Markers with their absolute tick position.
    pub fn markers(&self) -> Vec<(u64, &str)> {
        let mut at = 0u64;
        let mut markers = Vec::new();
        for e in &self.events {
            at += e.delta as u64;
            if let Some(label) = e.event.as_marker() {
                markers.push((at, label));
            }
        }
        markers
    }

    /// Absolute tick position of the last event.
    pub fn duration_ticks(&self) -> u64 {
        self.events.iter().map(|e| e.delta as u64).sum()
    }
}

/// Builds the marker track for a list of scene boundaries.
///
/// The track holds a tempo event, a 4/4 time signature, then one `SC n`
/// marker per boundary.
#[derive(Debug, Clone, Copy)]
pub struct MarkerTrackBuilder {
    tempo: Tempo,
    ticks_per_beat: u16,
}

impl MarkerTrackBuilder {
    pub fn new() -> Self {
        Self {
            tempo: Tempo::default(),
            ticks_per_beat: TICKS_PER_BEAT,
        }
    }

    /// Set the tempo written to the track.
    pub fn tempo(mut self, tempo: Tempo) -> Self {
        self.tempo = tempo;
        self
    }

    /// Set the timeline resolution.
    pub fn ticks_per_beat(mut self, ticks_per_beat: u16) -> Self {
        self.ticks_per_beat = ticks_per_beat;
        self
    }

    pub fn resolution(&self) -> u16 {
        self.ticks_per_beat
    }

    /// Build the track.
    pub fn build(&self, frames: &[u64], fps: FrameRate) -> Result<Track> {
        self.build_with_timeline(frames, fps).map(|(track, _)| track)
    }

    /// Build the track and return the timeline it was built from.
    pub fn build_with_timeline(&self, frames: &[u64], fps: FrameRate) -> Result<(Track, Timeline)> {
        let timeline = Timeline::build(frames, fps, self.ticks_per_beat)?;

        let mut track = Track {
            events: Vec::with_capacity(timeline.len() + 2),
        };
        track.push(0, MetaEvent::Tempo(self.tempo));
        track.push(0, MetaEvent::TimeSignature(TimeSignature::COMMON));
        for (i, &delta) in timeline.deltas().iter().enumerate() {
            track.push(delta, MetaEvent::Marker(marker_label(i + 1)));
        }

        Ok((track, timeline))
    }
}

impl Default for MarkerTrackBuilder {
    fn default() -> Self {
        Self::new()
    }
}
