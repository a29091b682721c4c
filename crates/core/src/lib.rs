//! Core library for the soundboard application.
//!
//! The crate holds all soundboard logic behind host-neutral seams. Each
//! module owns a distinct concern (clip library, playback sessions, the
//! audio backend, the sample tap, waveform drawing, progress UI) and the
//! [`controller::Soundboard`] ties them together as the single owner of all
//! process-wide state.

pub mod audio;
pub mod canvas;
pub mod config;
pub mod controller;
pub mod error;
pub mod library;
pub mod session;
pub mod tap;
pub mod ui;
pub mod visualizer;

pub use audio::{AudioBackend, RodioBackend};
pub use canvas::{Canvas, Point, Stroke};
pub use config::{AppConfig, AudioConfig, CanvasConfig};
pub use controller::{KeyInput, Soundboard};
pub use error::{Result, SoundboardError};
pub use library::{SoundId, SoundLibrary};
pub use session::{ClipInstance, PlaybackSession, SessionEvent};
pub use tap::{tap_pair, SignalTap, TapProducer, WINDOW_SIZE};
pub use ui::{fill_percent, format_clock, UiState};
pub use visualizer::Visualizer;
