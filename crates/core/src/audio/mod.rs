use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::source::SeekError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::session::ClipInstance;
use crate::tap::{tap_pair, SignalTap, TapProducer};
use crate::{Result, SoundboardError};

/// Seam between the controller and the host audio device.
pub trait AudioBackend {
    /// Brings the shared output up if it is not running yet. Activation
    /// calls this before spawning so a previously idle device is recovered.
    fn ensure_running(&mut self) -> Result<()>;

    /// Creates a fresh, paused playable instance for the clip at `path`,
    /// with a signal tap attached to its sample stream.
    fn spawn(&mut self, path: &Path, tap_capacity: usize)
        -> Result<(Box<dyn ClipInstance>, SignalTap)>;
}

/// rodio-backed output: one lazily opened shared stream, one sink per clip
/// instance. Detached sinks stay on the stream's mixer until they finish,
/// which is what lets superseded clips keep playing.
#[derive(Default)]
pub struct RodioBackend {
    stream: Option<(OutputStream, OutputStreamHandle)>,
}

impl RodioBackend {
    pub fn new() -> Self {
        Self { stream: None }
    }
}

impl AudioBackend for RodioBackend {
    fn ensure_running(&mut self) -> Result<()> {
        if self.stream.is_none() {
            let (stream, handle) = OutputStream::try_default()?;
            tracing::debug!("opened default audio output stream");
            self.stream = Some((stream, handle));
        }
        Ok(())
    }

    fn spawn(
        &mut self,
        path: &Path,
        tap_capacity: usize,
    ) -> Result<(Box<dyn ClipInstance>, SignalTap)> {
        self.ensure_running()?;
        let handle = match &self.stream {
            Some((_, handle)) => handle,
            None => return Err(SoundboardError::msg("audio output is not running")),
        };

        let file = File::open(path)?;
        let decoder = Decoder::new(BufReader::new(file))?;
        let duration = decoder.total_duration();
        let (producer, tap) = tap_pair(tap_capacity);

        let sink = Sink::try_new(handle)?;
        sink.pause();
        sink.append(TapSource {
            inner: decoder.convert_samples::<f32>(),
            producer,
        });

        let instance = RodioInstance {
            sink,
            duration,
            volume: 1.0,
            muted: false,
        };
        Ok((Box::new(instance), tap))
    }
}

impl fmt::Debug for RodioBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RodioBackend")
            .field("running", &self.stream.is_some())
            .finish()
    }
}

/// Mirrors every sample into the tap ring buffer on its way to the output
/// device.
struct TapSource<S> {
    inner: S,
    producer: TapProducer,
}

impl<S> Iterator for TapSource<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.inner.next()?;
        self.producer.push(sample);
        Some(sample)
    }
}

impl<S> Source for TapSource<S>
where
    S: Source<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.inner.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> std::result::Result<(), SeekError> {
        self.inner.try_seek(pos)
    }
}

/// A sink plus the metadata the session layer needs. Mute is implemented as
/// a zero gain so the stored volume survives unmuting.
struct RodioInstance {
    sink: Sink,
    duration: Option<Duration>,
    volume: f32,
    muted: bool,
}

impl RodioInstance {
    fn apply_gain(&self) {
        let gain = if self.muted { 0.0 } else { self.volume };
        self.sink.set_volume(gain);
    }
}

impl ClipInstance for RodioInstance {
    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.apply_gain();
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_gain();
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.sink.try_seek(position)?;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn finished(&self) -> bool {
        self.sink.empty()
    }

    fn detach(self: Box<Self>) {
        self.sink.detach();
    }
}
