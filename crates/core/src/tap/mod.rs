//! Lock-free sample tap between the playback thread and the draw side.

use std::fmt;

use ringbuf::{traits::*, HeapRb};

/// Number of samples the visualizer reads per frame.
pub const WINDOW_SIZE: usize = 2048;

/// Creates a connected producer/tap pair backed by a ring buffer of at least
/// `capacity` samples.
pub fn tap_pair(capacity: usize) -> (TapProducer, SignalTap) {
    let rb = HeapRb::new(capacity.max(WINDOW_SIZE));
    let (producer, consumer) = rb.split();
    (
        TapProducer { inner: producer },
        SignalTap {
            inner: consumer,
            window: vec![0.0; WINDOW_SIZE],
        },
    )
}

/// Write side, owned by the audio source on the playback thread.
pub struct TapProducer {
    inner: ringbuf::HeapProd<f32>,
}

impl TapProducer {
    /// Pushes one sample, dropping it when the draw side has fallen behind.
    pub fn push(&mut self, sample: f32) -> bool {
        self.inner.try_push(sample).is_ok()
    }

    /// Pushes a block of samples, returning how many fit.
    pub fn push_block(&mut self, samples: &[f32]) -> usize {
        self.inner.push_slice(samples)
    }
}

/// Read side. Keeps a rolling window of the most recent [`WINDOW_SIZE`]
/// samples, zero-filled until enough audio has flowed through.
pub struct SignalTap {
    inner: ringbuf::HeapCons<f32>,
    window: Vec<f32>,
}

impl SignalTap {
    /// Drains pending samples and returns the trailing window.
    pub fn window(&mut self) -> &[f32] {
        self.window.extend(self.inner.pop_iter());
        let len = self.window.len();
        if len > WINDOW_SIZE {
            self.window.drain(..len - WINDOW_SIZE);
        }
        &self.window
    }
}

impl fmt::Debug for TapProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapProducer").finish()
    }
}

impl fmt::Debug for SignalTap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalTap")
            .field("window", &self.window.len())
            .finish()
    }
}
