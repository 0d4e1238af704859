//! Scenemark-SMF: frame-accurate marker tracks in Standard MIDI Files
//!
//! This crate turns a list of scene-boundary frame indices into a single-track
//! Standard MIDI File whose marker meta-events line up with the cuts on a DAW
//! timeline. It encodes the container itself; no MIDI library is involved.
//!
//! # Modules
//!
//! - `vlq` - 7-bit variable-length quantities used for delta times and lengths
//! - `timing` - exact frame rates, tempo, and frame-to-tick conversion
//! - `timeline` - boundary validation and per-gap tick deltas
//! - `event` - tempo, time signature and marker meta-events
//! - `track` - marker track model and builder
//! - `container` - `MThd`/`MTrk` chunk serialization and parsing
//!
//! # Example
//!
//! ```
//! use scenemark_smf::{deserialize, serialize, FrameRate, MarkerTrackBuilder, TICKS_PER_BEAT};
//!
//! let fps: FrameRate = "25".parse()?;
//! let track = MarkerTrackBuilder::new().build(&[0, 300, 533], fps)?;
//! let bytes = serialize(&track, TICKS_PER_BEAT)?;
//!
//! let file = deserialize(&bytes)?;
//! assert_eq!(file.track, track);
//! assert_eq!(file.track.markers()[1], (11520, "SC 2"));
//! # Ok::<(), scenemark_smf::Error>(())
//! ```

pub mod container;
pub mod error;
pub mod event;
pub mod timeline;
pub mod timing;
pub mod track;
pub mod vlq;

pub use container::{deserialize, serialize, ChunkType, MarkerFile};
pub use error::{Error, Result};
pub use event::{MetaEvent, MetaKind, TimeSignature, TrackEvent};
pub use timeline::{tick_deltas, validate_boundaries, Timeline};
pub use timing::{FrameRate, Tempo, DEFAULT_BPM, TICKS_PER_BEAT};
pub use track::{marker_label, MarkerTrackBuilder, Track};
