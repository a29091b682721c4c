use crate::canvas::{Canvas, Point};
use crate::tap::SignalTap;

pub const LINE_WIDTH: f32 = 2.0;
pub const STROKE_COLOR: &str = "#a8e6ff";

/// Draw-loop state for the waveform. At most one tap is bound at a time;
/// binding a new one replaces the previous tap, and cancellation blanks the
/// surface.
#[derive(Debug, Default)]
pub struct Visualizer {
    tap: Option<SignalTap>,
    scheduled: bool,
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the tap of a freshly spawned instance and schedules the loop.
    pub fn bind(&mut self, tap: SignalTap) {
        self.tap = Some(tap);
        self.scheduled = true;
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Draws one frame if the loop is scheduled; otherwise leaves the canvas
    /// untouched.
    pub fn frame(&mut self, canvas: &mut Canvas) {
        if !self.scheduled {
            return;
        }
        let Some(tap) = self.tap.as_mut() else {
            return;
        };
        draw_waveform(tap.window(), canvas);
    }

    /// Cancels the loop and blanks the surface.
    pub fn cancel(&mut self, canvas: &mut Canvas) {
        self.scheduled = false;
        self.tap = None;
        canvas.clear();
    }
}

/// Strokes the sample window as one polyline spanning the canvas width, with
/// amplitude centered at mid-height and a final vertex pinned to the vertical
/// center of the right edge.
fn draw_waveform(samples: &[f32], canvas: &mut Canvas) {
    canvas.clear();
    if samples.is_empty() {
        return;
    }

    let width = canvas.client_width();
    let height = canvas.client_height();
    let slice_width = width / samples.len() as f32;

    let mut points = Vec::with_capacity(samples.len() + 1);
    for (i, sample) in samples.iter().enumerate() {
        points.push(Point {
            x: slice_width * i as f32,
            y: (sample + 1.0) * height / 2.0,
        });
    }
    points.push(Point {
        x: width,
        y: height / 2.0,
    });

    canvas.stroke_polyline(points, LINE_WIDTH, STROKE_COLOR);
}
