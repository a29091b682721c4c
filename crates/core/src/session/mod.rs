use std::fmt;
use std::time::Duration;

use crate::{Result, SoundId};

/// One playable clip handle. Implemented by the rodio backend for real
/// output and by in-memory stubs in tests.
pub trait ClipInstance {
    /// Starts or resumes playback.
    fn play(&mut self);
    /// Pauses playback without releasing the handle.
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);
    fn muted(&self) -> bool;
    fn seek(&mut self, position: Duration) -> Result<()>;
    fn position(&self) -> Duration;
    /// Total clip length, `None` until/unless metadata is known.
    fn duration(&self) -> Option<Duration>;
    /// True once the clip has played to natural completion.
    fn finished(&self) -> bool;
    /// Consumes the handle, letting the sound run to completion on its own.
    /// This is the supersede path; dropping the handle instead stops it.
    fn detach(self: Box<Self>);
}

/// Lifecycle events observed on the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Emitted exactly once per session, when the duration becomes known.
    MetadataReady { duration: Duration },
    /// Emitted on every poll while the clip is still running.
    PositionTick {
        position: Duration,
        duration: Option<Duration>,
    },
    /// Emitted on natural completion only, never when superseded. The
    /// session is torn down right after, so it cannot fire twice.
    Ended { duration: Option<Duration> },
}

/// The single playback tracked by the transport controls and progress UI.
pub struct PlaybackSession {
    sound: SoundId,
    instance: Box<dyn ClipInstance>,
    metadata_emitted: bool,
}

impl PlaybackSession {
    pub fn new(sound: SoundId, instance: Box<dyn ClipInstance>) -> Self {
        Self {
            sound,
            instance,
            metadata_emitted: false,
        }
    }

    pub fn sound(&self) -> SoundId {
        self.sound
    }

    pub fn instance(&mut self) -> &mut dyn ClipInstance {
        self.instance.as_mut()
    }

    /// Polls the instance and reports what changed since the last poll.
    pub fn poll(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if !self.metadata_emitted {
            if let Some(duration) = self.instance.duration() {
                self.metadata_emitted = true;
                events.push(SessionEvent::MetadataReady { duration });
            }
        }
        if self.instance.finished() {
            events.push(SessionEvent::Ended {
                duration: self.instance.duration(),
            });
        } else {
            events.push(SessionEvent::PositionTick {
                position: self.instance.position(),
                duration: self.instance.duration(),
            });
        }
        events
    }

    /// Releases the session while letting the underlying sound finish.
    pub fn detach(self) {
        self.instance.detach();
    }
}

impl fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("sound", &self.sound)
            .field("metadata_emitted", &self.metadata_emitted)
            .finish()
    }
}
