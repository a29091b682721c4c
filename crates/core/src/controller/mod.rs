use std::fmt;

use crate::audio::AudioBackend;
use crate::canvas::Canvas;
use crate::config::AppConfig;
use crate::library::{SoundId, SoundLibrary};
use crate::session::{PlaybackSession, SessionEvent};
use crate::ui::UiState;
use crate::visualizer::Visualizer;
use crate::Result;

/// Inputs understood by the keyboard dispatch path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// A single letter; mapped letters trigger the matching clip.
    Letter(char),
    /// Toggles pause/resume on the current session.
    Space,
}

/// The soundboard controller. Owns every piece of process-wide state: the
/// clip library, the audio backend, the single current session, the waveform
/// draw loop, the canvas, and the volume/mute values that persist across
/// sessions.
pub struct Soundboard {
    library: SoundLibrary,
    backend: Box<dyn AudioBackend>,
    session: Option<PlaybackSession>,
    visualizer: Visualizer,
    canvas: Canvas,
    ui: UiState,
    tap_capacity: usize,
}

impl Soundboard {
    pub fn new(config: &AppConfig, library: SoundLibrary, backend: Box<dyn AudioBackend>) -> Self {
        Self {
            library,
            backend,
            session: None,
            visualizer: Visualizer::new(),
            canvas: Canvas::new(&config.canvas),
            ui: UiState::new(config.audio.initial_volume),
            tap_capacity: config.audio.tap_capacity,
        }
    }

    /// Starts a fresh playback of `sound` and makes it the current session.
    ///
    /// Any prior session is detached, not stopped: its sound keeps playing
    /// until it finishes on its own, but volume, mute, scrub and progress all
    /// follow the new instance from here on. On error (missing or
    /// undecodable clip, no output device) the current session is left
    /// untouched.
    pub fn activate(&mut self, sound: SoundId) -> Result<()> {
        let path = self.library.clip_path(sound)?.to_path_buf();
        self.backend.ensure_running()?;
        let (mut instance, tap) = match self.backend.spawn(&path, self.tap_capacity) {
            Ok(spawned) => spawned,
            Err(error) => {
                tracing::warn!(%sound, %error, "could not start clip");
                return Err(error);
            }
        };

        instance.set_volume(self.ui.volume);
        instance.set_muted(self.ui.muted);

        if let Some(previous) = self.session.take() {
            tracing::debug!(superseded = %previous.sound(), "superseding current session");
            previous.detach();
        }

        self.visualizer.bind(tap);
        instance.play();
        self.session = Some(PlaybackSession::new(sound, instance));
        tracing::debug!(%sound, "activated clip");
        Ok(())
    }

    /// Polls the current session and mirrors its state into the UI. Returns
    /// the events observed so a front end can react to them.
    pub fn tick(&mut self) -> Vec<SessionEvent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };

        let events = session.poll();
        let mut ended = false;
        for event in &events {
            match event {
                SessionEvent::MetadataReady { duration } => {
                    tracing::debug!(seconds = duration.as_secs_f64(), "clip metadata ready");
                }
                SessionEvent::PositionTick { position, duration } => {
                    let duration = duration.map_or(0.0, |d| d.as_secs_f64());
                    self.ui.set_progress(position.as_secs_f64(), duration);
                }
                SessionEvent::Ended { duration } => {
                    let duration = duration.map_or(0.0, |d| d.as_secs_f64());
                    self.ui.set_progress(0.0, duration);
                    ended = true;
                }
            }
        }

        if ended {
            self.visualizer.cancel(&mut self.canvas);
            self.session = None;
        }
        events
    }

    /// Runs one waveform frame if the draw loop is scheduled.
    pub fn frame_tick(&mut self) {
        self.visualizer.frame(&mut self.canvas);
    }

    /// Remembers `level` as the live slider value and applies it to the
    /// current session, if any. New sessions pick the value up on activation.
    pub fn set_volume(&mut self, level: f32) {
        let level = level.clamp(0.0, 1.0);
        self.ui.volume = level;
        if let Some(session) = self.session.as_mut() {
            session.instance().set_volume(level);
        }
    }

    /// Flips the process-wide mute flag and applies it to the current
    /// session, if any.
    pub fn toggle_mute(&mut self) {
        self.ui.muted = !self.ui.muted;
        if let Some(session) = self.session.as_mut() {
            let muted = self.ui.muted;
            session.instance().set_muted(muted);
        }
    }

    /// Seeks the current session to `ratio` of its duration. Silent no-op
    /// without a session or while the duration is unknown.
    pub fn scrub(&mut self, ratio: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let instance = session.instance();
        let Some(duration) = instance.duration() else {
            return;
        };
        let target = duration.mul_f64(ratio.clamp(0.0, 1.0));
        if let Err(error) = instance.seek(target) {
            tracing::warn!(%error, "scrub rejected");
        }
    }

    /// Pauses a playing session, resumes a paused one; no-op otherwise.
    pub fn toggle_pause(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let instance = session.instance();
        if instance.is_paused() {
            instance.play();
        } else {
            instance.pause();
        }
    }

    /// Keyboard dispatch: mapped letters activate their clip through the
    /// same path as a button press, space toggles pause. Unmapped letters do
    /// nothing.
    pub fn handle_key(&mut self, input: KeyInput) -> Result<()> {
        match input {
            KeyInput::Space => {
                self.toggle_pause();
                Ok(())
            }
            KeyInput::Letter(key) => match SoundId::from_key(key) {
                Some(sound) => self.activate(sound),
                None => Ok(()),
            },
        }
    }

    /// Adopts a new displayed canvas size and pixel density.
    pub fn resize_canvas(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.canvas.resize(width, height, device_pixel_ratio);
    }

    pub fn current_sound(&self) -> Option<SoundId> {
        self.session.as_ref().map(PlaybackSession::sound)
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn draw_loop_scheduled(&self) -> bool {
        self.visualizer.is_scheduled()
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn library(&self) -> &SoundLibrary {
        &self.library
    }
}

impl fmt::Debug for Soundboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Soundboard")
            .field("current", &self.current_sound())
            .field("ui", &self.ui)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::path::Path;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::session::testing::{StubInstance, StubState};
    use crate::session::ClipInstance;
    use crate::tap::{tap_pair, SignalTap, TapProducer};
    use crate::ui::{MUTED_GLYPH, UNMUTED_GLYPH};
    use crate::SoundboardError;

    /// Backend that hands out stub instances and keeps the shared state and
    /// tap producers around so tests can drive them.
    struct StubBackend {
        duration: Option<Duration>,
        fail_next: Rc<Cell<bool>>,
        spawned: Rc<RefCell<Vec<Rc<RefCell<StubState>>>>>,
        producers: Rc<RefCell<Vec<TapProducer>>>,
    }

    impl StubBackend {
        fn with_duration(duration: Option<Duration>) -> Self {
            Self {
                duration,
                fail_next: Rc::new(Cell::new(false)),
                spawned: Rc::new(RefCell::new(Vec::new())),
                producers: Rc::new(RefCell::new(Vec::new())),
            }
        }
    }

    impl AudioBackend for StubBackend {
        fn ensure_running(&mut self) -> crate::Result<()> {
            Ok(())
        }

        fn spawn(
            &mut self,
            _path: &Path,
            tap_capacity: usize,
        ) -> crate::Result<(Box<dyn ClipInstance>, SignalTap)> {
            if self.fail_next.take() {
                return Err(SoundboardError::msg("clip missing"));
            }
            let state = StubState::new(self.duration);
            self.spawned.borrow_mut().push(state.clone());
            let (producer, tap) = tap_pair(tap_capacity);
            self.producers.borrow_mut().push(producer);
            Ok((Box::new(StubInstance { state }), tap))
        }
    }

    struct Fixture {
        board: Soundboard,
        fail_next: Rc<Cell<bool>>,
        spawned: Rc<RefCell<Vec<Rc<RefCell<StubState>>>>>,
        producers: Rc<RefCell<Vec<TapProducer>>>,
    }

    impl Fixture {
        fn with_duration(duration: Option<Duration>) -> Self {
            let backend = StubBackend::with_duration(duration);
            let fail_next = backend.fail_next.clone();
            let spawned = backend.spawned.clone();
            let producers = backend.producers.clone();
            let board = Soundboard::new(
                &AppConfig::default(),
                SoundLibrary::with_default_clips(Path::new("sounds")),
                Box::new(backend),
            );
            Self {
                board,
                fail_next,
                spawned,
                producers,
            }
        }

        fn state(&self, index: usize) -> Rc<RefCell<StubState>> {
            self.spawned.borrow()[index].clone()
        }
    }

    #[test]
    fn activation_tracks_the_new_sound() {
        let mut fx = Fixture::with_duration(Some(Duration::from_secs(2)));
        fx.board.activate(SoundId::Clap).unwrap();
        assert_eq!(fx.board.current_sound(), Some(SoundId::Clap));
        assert!(fx.board.draw_loop_scheduled());
        assert!(fx.state(0).borrow().playing);
    }

    #[test]
    fn superseding_leaves_the_prior_sound_running() {
        let mut fx = Fixture::with_duration(Some(Duration::from_secs(2)));
        fx.board.activate(SoundId::Clap).unwrap();
        fx.board.activate(SoundId::Dog).unwrap();

        assert_eq!(fx.board.current_sound(), Some(SoundId::Dog));
        let first = fx.state(0);
        assert!(first.borrow().detached);
        assert!(!first.borrow().stopped);
        assert!(fx.state(1).borrow().playing);
    }

    #[test]
    fn activation_failure_keeps_the_current_session() {
        let mut fx = Fixture::with_duration(Some(Duration::from_secs(2)));
        fx.board.activate(SoundId::Clap).unwrap();

        fx.fail_next.set(true);
        assert!(fx.board.activate(SoundId::Dog).is_err());

        assert_eq!(fx.board.current_sound(), Some(SoundId::Clap));
        assert!(!fx.state(0).borrow().detached);
        assert!(fx.board.draw_loop_scheduled());
    }

    #[test]
    fn volume_is_remembered_and_applied_to_new_sessions() {
        let mut fx = Fixture::with_duration(Some(Duration::from_secs(2)));
        fx.board.set_volume(0.3);
        assert_eq!(fx.board.ui().volume, 0.3);

        fx.board.activate(SoundId::Pop).unwrap();
        assert_eq!(fx.state(0).borrow().volume, 0.3);

        fx.board.set_volume(0.8);
        assert_eq!(fx.state(0).borrow().volume, 0.8);
    }

    #[test]
    fn volume_is_clamped_to_unit_range() {
        let mut fx = Fixture::with_duration(None);
        fx.board.set_volume(1.7);
        assert_eq!(fx.board.ui().volume, 1.0);
        fx.board.set_volume(-0.5);
        assert_eq!(fx.board.ui().volume, 0.0);
    }

    #[test]
    fn mute_toggles_instance_and_glyph() {
        let mut fx = Fixture::with_duration(Some(Duration::from_secs(2)));
        fx.board.activate(SoundId::Bell).unwrap();

        fx.board.toggle_mute();
        assert!(fx.state(0).borrow().muted);
        assert_eq!(fx.board.ui().mute_glyph(), MUTED_GLYPH);

        fx.board.toggle_mute();
        assert!(!fx.state(0).borrow().muted);
        assert_eq!(fx.board.ui().mute_glyph(), UNMUTED_GLYPH);
    }

    #[test]
    fn mute_persists_across_sessions() {
        let mut fx = Fixture::with_duration(Some(Duration::from_secs(2)));
        fx.board.toggle_mute();
        fx.board.activate(SoundId::Horn).unwrap();
        assert!(fx.state(0).borrow().muted);
    }

    #[test]
    fn scrub_is_a_no_op_without_a_session() {
        let mut fx = Fixture::with_duration(Some(Duration::from_secs(2)));
        fx.board.scrub(0.5);
        assert!(!fx.board.has_session());
        assert_eq!(fx.board.ui().elapsed, "0:00");
    }

    #[test]
    fn scrub_is_a_no_op_while_duration_is_unknown() {
        let mut fx = Fixture::with_duration(None);
        fx.board.activate(SoundId::Laugh).unwrap();
        fx.board.scrub(0.5);
        assert_eq!(fx.state(0).borrow().position, Duration::ZERO);
    }

    #[test]
    fn scrub_seeks_proportionally_to_duration() {
        let mut fx = Fixture::with_duration(Some(Duration::from_secs(120)));
        fx.board.activate(SoundId::Laugh).unwrap();
        fx.board.scrub(0.25);
        assert_eq!(fx.state(0).borrow().position, Duration::from_secs(30));
    }

    #[test]
    fn pause_toggles_between_playing_and_paused() {
        let mut fx = Fixture::with_duration(Some(Duration::from_secs(2)));
        fx.board.toggle_pause(); // no session, no-op
        fx.board.activate(SoundId::Dog).unwrap();

        fx.board.toggle_pause();
        assert!(fx.state(0).borrow().paused);
        fx.board.toggle_pause();
        assert!(!fx.state(0).borrow().paused);
    }

    #[test]
    fn keyboard_press_matches_direct_activation() {
        let mut via_key = Fixture::with_duration(Some(Duration::from_secs(2)));
        via_key.board.handle_key(KeyInput::Letter('P')).unwrap();

        let mut direct = Fixture::with_duration(Some(Duration::from_secs(2)));
        direct.board.activate(SoundId::Pop).unwrap();

        assert_eq!(via_key.board.current_sound(), direct.board.current_sound());
        assert_eq!(
            via_key.board.draw_loop_scheduled(),
            direct.board.draw_loop_scheduled()
        );
        assert_eq!(
            via_key.state(0).borrow().playing,
            direct.state(0).borrow().playing
        );
    }

    #[test]
    fn unmapped_keys_do_nothing() {
        let mut fx = Fixture::with_duration(Some(Duration::from_secs(2)));
        fx.board.handle_key(KeyInput::Letter('Q')).unwrap();
        assert!(!fx.board.has_session());
    }

    #[test]
    fn space_toggles_pause() {
        let mut fx = Fixture::with_duration(Some(Duration::from_secs(2)));
        fx.board.activate(SoundId::Bell).unwrap();
        fx.board.handle_key(KeyInput::Space).unwrap();
        assert!(fx.state(0).borrow().paused);
    }

    #[test]
    fn position_ticks_drive_the_progress_ui() {
        let mut fx = Fixture::with_duration(Some(Duration::from_secs(120)));
        fx.board.activate(SoundId::Bell).unwrap();
        fx.state(0).borrow_mut().advance(Duration::from_secs(30));
        fx.board.tick();

        assert_eq!(fx.board.ui().elapsed, "0:30");
        assert_eq!(fx.board.ui().total, "2:00");
        assert_eq!(fx.board.ui().fill_percent, 25.0);
    }

    #[test]
    fn natural_end_tears_the_session_down() {
        let mut fx = Fixture::with_duration(Some(Duration::from_secs(65)));
        fx.board.activate(SoundId::Bell).unwrap();

        // Feed the tap and draw a frame so the canvas holds a waveform.
        {
            let mut producers = fx.producers.borrow_mut();
            for _ in 0..256 {
                producers[0].push(0.5);
            }
        }
        fx.board.frame_tick();
        assert!(!fx.board.canvas().is_blank());

        fx.state(0).borrow_mut().advance(Duration::from_secs(70));
        let events = fx.board.tick();
        assert!(events
            .iter()
            .any(|event| matches!(event, SessionEvent::Ended { .. })));

        assert!(!fx.board.has_session());
        assert!(!fx.board.draw_loop_scheduled());
        assert!(fx.board.canvas().is_blank());
        assert_eq!(fx.board.ui().elapsed, "0:00");
        assert_eq!(fx.board.ui().total, "1:05");

        // Ticking an empty board reports nothing further.
        assert!(fx.board.tick().is_empty());
    }
}
