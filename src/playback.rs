//! Playback clock driving continuous time across the recording.
//!
//! The clock owns the authoritative `moment` value. While running it
//! advances with wall-clock time at a fixed moments-per-millisecond rate;
//! stopped, it moves only through discrete steps or explicit jumps. It
//! never leaves `[0, max_moment]`.

/// Clock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Not advancing; stepping is allowed.
    Stopped,
    /// Advancing with wall-clock time.
    Running,
}

/// Emitted by [`PlaybackClock::advance`] when playback stops on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The recording end was reached; the clock stopped itself.
    Ended,
}

/// Wall-clock-driven timeline position over `[0, max_moment]`.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    state: State,
    moment: f32,
    max_moment: f32,
    /// Milliseconds of wall-clock time per discrete moment.
    ms_per_moment: f32,
}

impl PlaybackClock {
    /// Clock over `max_moment + 1` discrete samples, playing the whole
    /// recording in `total_playback_ms` of wall-clock time.
    pub fn new(max_moment: usize, total_playback_ms: f32) -> Self {
        let max_moment = max_moment as f32;
        Self {
            state: State::Stopped,
            moment: 0.0,
            max_moment,
            ms_per_moment: total_playback_ms / max_moment.max(1.0),
        }
    }

    /// Current (possibly fractional) moment.
    pub fn moment(&self) -> f32 {
        self.moment
    }

    /// Last valid discrete moment index.
    pub fn max_moment(&self) -> f32 {
        self.max_moment
    }

    /// Whether the clock is advancing.
    pub fn playing(&self) -> bool {
        self.state == State::Running
    }

    /// Start or resume playback. Starting at the end stops immediately on
    /// the next [`advance`](Self::advance) without moving past the end.
    pub fn play(&mut self) {
        self.state = State::Running;
    }

    /// Pause playback, keeping the current moment.
    pub fn pause(&mut self) {
        self.state = State::Stopped;
    }

    /// Stop and rewind to the first moment.
    pub fn reset(&mut self) {
        self.state = State::Stopped;
        self.moment = 0.0;
    }

    /// Step one discrete sample forward. No-op while playing.
    pub fn step_forward(&mut self) {
        if self.state == State::Stopped {
            self.moment = (self.moment + 1.0).min(self.max_moment);
        }
    }

    /// Step one discrete sample backward. No-op while playing.
    pub fn step_backward(&mut self) {
        if self.state == State::Stopped {
            self.moment = (self.moment - 1.0).max(0.0);
        }
    }

    /// Jump to an arbitrary moment, clamped to the valid range. Out-of-range
    /// requests are not an error.
    pub fn set_moment(&mut self, moment: f32) {
        self.moment = moment.clamp(0.0, self.max_moment);
    }

    /// Advance by `dt` seconds of wall-clock time.
    ///
    /// `dt` is trusted as-is — a frame delivered late (backgrounded window)
    /// jumps the timeline accordingly. Reaching the end clamps, stops the
    /// clock, and reports [`PlaybackEvent::Ended`] so the UI can flip its
    /// play/pause affordance.
    pub fn advance(&mut self, dt: f32) -> Option<PlaybackEvent> {
        if self.state != State::Running {
            return None;
        }
        if self.moment >= self.max_moment {
            self.moment = self.max_moment;
            self.state = State::Stopped;
            return Some(PlaybackEvent::Ended);
        }
        self.moment += 1000.0 * dt / self.ms_per_moment;
        if self.moment >= self.max_moment {
            self.moment = self.max_moment;
            self.state = State::Stopped;
            return Some(PlaybackEvent::Ended);
        }
        None
    }
}

/// Stimulus-relative time of a moment, in milliseconds.
///
/// The recording splits into 31.25 ms bins with stimulus onset at bin 16,
/// so bin 0 sits at -500 ms and bin 47 at ~969 ms.
pub fn moment_to_ms(moment: f32) -> f32 {
    moment * 31.25 - 500.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> PlaybackClock {
        // 47 moments over 20 s, the recording's shipping configuration.
        PlaybackClock::new(47, 20_000.0)
    }

    #[test]
    fn advances_at_the_configured_rate() {
        let mut c = clock();
        c.play();
        // One second of wall clock = maxMoment / 20 moments.
        assert_eq!(c.advance(1.0), None);
        assert!((c.moment() - 47.0 / 20.0).abs() < 1e-4);
    }

    #[test]
    fn ends_and_stops_at_the_last_moment() {
        let mut c = clock();
        c.play();
        assert_eq!(c.advance(60.0), Some(PlaybackEvent::Ended));
        assert_eq!(c.moment(), 47.0);
        assert!(!c.playing());
    }

    #[test]
    fn playing_at_the_end_stops_without_advancing() {
        let mut c = clock();
        c.set_moment(47.0);
        c.play();
        assert!(c.playing());
        assert_eq!(c.advance(0.016), Some(PlaybackEvent::Ended));
        assert_eq!(c.moment(), 47.0);
        assert!(!c.playing());
    }

    #[test]
    fn steps_are_exact_and_stop_at_bounds() {
        let mut c = clock();
        c.set_moment(10.0);
        c.step_forward();
        assert_eq!(c.moment(), 11.0);
        assert!(!c.playing());
        c.set_moment(47.0);
        c.step_forward();
        assert_eq!(c.moment(), 47.0);
        c.reset();
        c.step_backward();
        assert_eq!(c.moment(), 0.0);
    }

    #[test]
    fn stepping_is_ignored_while_playing() {
        let mut c = clock();
        c.play();
        c.step_forward();
        assert_eq!(c.moment(), 0.0);
    }

    #[test]
    fn jumps_clamp_instead_of_erroring() {
        let mut c = clock();
        c.set_moment(900.0);
        assert_eq!(c.moment(), 47.0);
        c.set_moment(-5.0);
        assert_eq!(c.moment(), 0.0);
    }

    #[test]
    fn reset_rewinds_and_pauses() {
        let mut c = clock();
        c.play();
        let _ = c.advance(2.0);
        c.reset();
        assert_eq!(c.moment(), 0.0);
        assert!(!c.playing());
    }

    #[test]
    fn bin_times_match_the_recording_layout() {
        assert_eq!(moment_to_ms(0.0), -500.0);
        assert_eq!(moment_to_ms(16.0), 0.0);
        assert!((moment_to_ms(47.0) - 968.75).abs() < 1e-4);
    }
}
