//! Progress formatting and the UI state mirrored from the current session.

/// Glyph shown on the mute button while audio is muted. The glyph names the
/// action the next press performs, not the current state.
pub const MUTED_GLYPH: &str = "\u{1F50A}";
/// Glyph shown while audio is audible.
pub const UNMUTED_GLYPH: &str = "\u{1F507}";

/// Renders a position or duration in seconds as `m:ss` with zero-padded
/// seconds. Non-finite input renders as `0:00`.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "0:00".to_string();
    }
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Fill percentage for the progress track. Zero whenever the duration is
/// unknown or non-positive.
pub fn fill_percent(position: f64, duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        (position / duration) * 100.0
    } else {
        0.0
    }
}

/// Volume, mute and progress state derived from the current session. Volume
/// and mute outlive individual sessions; the progress fields are rewritten on
/// every position tick.
#[derive(Debug, Clone)]
pub struct UiState {
    pub volume: f32,
    pub muted: bool,
    pub elapsed: String,
    pub total: String,
    pub fill_percent: f64,
}

impl UiState {
    pub fn new(volume: f32) -> Self {
        Self {
            volume,
            muted: false,
            elapsed: format_clock(0.0),
            total: format_clock(0.0),
            fill_percent: 0.0,
        }
    }

    pub fn mute_glyph(&self) -> &'static str {
        if self.muted {
            MUTED_GLYPH
        } else {
            UNMUTED_GLYPH
        }
    }

    pub fn set_progress(&mut self, position: f64, duration: f64) {
        self.elapsed = format_clock(position);
        self.total = format_clock(duration);
        self.fill_percent = fill_percent(position, duration);
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(1.0)
    }
}
