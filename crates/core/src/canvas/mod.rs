use crate::config::CanvasConfig;

/// One vertex of a recorded stroke, in logical (pre-scale) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// A single recorded polyline stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub line_width: f32,
    pub color: String,
}

/// Recording 2D surface for the waveform. The backing resolution tracks the
/// displayed size multiplied by the device pixel ratio, and drawing commands
/// are retained so a window backend can replay them.
#[derive(Debug, Clone)]
pub struct Canvas {
    client_width: f32,
    client_height: f32,
    device_pixel_ratio: f32,
    backing_width: u32,
    backing_height: u32,
    scale: f32,
    strokes: Vec<Stroke>,
}

impl Canvas {
    pub fn new(config: &CanvasConfig) -> Self {
        let mut canvas = Self {
            client_width: config.width,
            client_height: config.height,
            device_pixel_ratio: config.device_pixel_ratio,
            backing_width: 0,
            backing_height: 0,
            scale: 1.0,
            strokes: Vec::new(),
        };
        canvas.rescale_backing();
        canvas
    }

    /// Adopts a new displayed size and pixel density. The accumulated
    /// coordinate transform is reset before the density scale is applied
    /// again, so repeated resizes never compound it.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.client_width = width;
        self.client_height = height;
        self.device_pixel_ratio = device_pixel_ratio;
        self.scale = 1.0;
        self.rescale_backing();
    }

    fn rescale_backing(&mut self) {
        self.backing_width = (self.client_width * self.device_pixel_ratio).round() as u32;
        self.backing_height = (self.client_height * self.device_pixel_ratio).round() as u32;
        self.scale *= self.device_pixel_ratio;
    }

    /// Blanks the surface.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn stroke_polyline(&mut self, points: Vec<Point>, line_width: f32, color: &str) {
        self.strokes.push(Stroke {
            points,
            line_width,
            color: color.to_string(),
        });
    }

    pub fn is_blank(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn client_width(&self) -> f32 {
        self.client_width
    }

    pub fn client_height(&self) -> f32 {
        self.client_height
    }

    pub fn backing_width(&self) -> u32 {
        self.backing_width
    }

    pub fn backing_height(&self) -> u32 {
        self.backing_height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}
