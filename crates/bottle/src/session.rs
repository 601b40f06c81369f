use crate::config::{Config, PointerConfig};
use crate::sound::{SoundSettings, SoundSink};
use derive_more::Display;
use rand::Rng;
use spinring::angle;
use spinring::{
    CommitError, CommitOutcome, LayoutError, MAX_PLAYERS, MIN_PLAYERS, PlayerId, PlayerSlot,
    SelectionEngine, SpinError, SpinTarget, compute_layout,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Status {
    #[display("Spin the bottle!")]
    Idle,
    #[display("Selecting...")]
    Selecting,
    #[display("{id} has been selected!")]
    Selected { id: PlayerId, remaining: usize },
    #[display("{id} has been selected! Everyone has had a turn.")]
    RoundComplete { id: PlayerId },
}

/// What the presentation side needs to animate an accepted spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub target: SpinTarget,
    /// Absolute pointer rotation in degrees, extra turns included.
    pub rotation: f64,
}

pub fn clamp_player_count(requested: usize) -> usize {
    requested.clamp(MIN_PLAYERS, MAX_PLAYERS)
}

/// Drives a [`SelectionEngine`] on behalf of a front end: player count input, pointer rotation,
/// sound cues and the status line.
pub struct Session<S: SoundSink> {
    engine: SelectionEngine,
    pointer: PointerConfig,
    sound: S,
    sound_settings: SoundSettings,
    auto_reset: bool,
    status: Status,
    rotation: f64,
}

impl<S: SoundSink> Session<S> {
    pub fn new(config: &Config, sound: S) -> Result<Self, LayoutError> {
        let layout = compute_layout(clamp_player_count(config.players))?;
        let mut session = Self {
            engine: SelectionEngine::new(layout),
            pointer: config.pointer,
            sound,
            sound_settings: config.sound,
            auto_reset: config.auto_reset,
            status: Status::Idle,
            rotation: 0.0,
        };
        session.rotation = session.rest_rotation();
        Ok(session)
    }

    pub fn engine(&self) -> &SelectionEngine {
        &self.engine
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn pointer(&self) -> PointerConfig {
        self.pointer
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    pub fn sound_settings(&self) -> SoundSettings {
        self.sound_settings
    }

    pub fn player_count(&self) -> usize {
        self.engine.layout().len()
    }

    /// The slot the pointer currently faces.
    pub fn pointed_slot(&self) -> Option<&PlayerSlot> {
        let ring = angle::pointer_to_ring(self.rotation, self.pointer.rest);
        self.engine.layout().nearest_slot(ring)
    }

    pub fn set_player_count(&mut self, requested: usize) -> Result<usize, LayoutError> {
        let count = clamp_player_count(requested);
        if count != requested {
            log::info!("Player count {} clamped to {}", requested, count);
        }
        self.engine.reset(compute_layout(count)?);
        self.after_reset();
        Ok(count)
    }

    pub fn reset(&mut self) {
        self.engine.restart();
        self.after_reset();
    }

    fn after_reset(&mut self) {
        self.stop_sound();
        self.status = Status::Idle;
        self.rotation = self.rest_rotation();
    }

    // at rest the pointer faces P1
    fn rest_rotation(&self) -> f64 {
        self.engine
            .layout()
            .slots()
            .first()
            .map(|slot| angle::ring_to_pointer(slot.angle, self.pointer.rest))
            .unwrap_or(0.0)
    }

    pub fn spin(&mut self) -> Result<SpinPlan, SpinError> {
        self.spin_with(&mut rand::rng())
    }

    pub fn spin_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<SpinPlan, SpinError> {
        let state = self.engine.state();
        if self.auto_reset && state.is_exhausted() && !state.is_spinning() {
            log::info!("Everyone had a turn, starting a new round");
            self.engine.restart();
        }

        let target = self.engine.spin(rng)?;
        self.status = Status::Selecting;
        self.rotation =
            angle::pointer_rotation(target.angle, self.pointer.rest, self.pointer.extra_turns);
        self.start_sound();

        Ok(SpinPlan {
            target,
            rotation: self.rotation,
        })
    }

    /// Applies a spin once the pointer animation for `id` has finished.
    pub fn finish_spin(&mut self, id: PlayerId) -> Result<CommitOutcome, CommitError> {
        let outcome = self.engine.commit_selection(id)?;
        self.stop_sound();

        self.status = match outcome {
            CommitOutcome::PlayerSelected { id, remaining } => Status::Selected { id, remaining },
            CommitOutcome::RoundComplete { id } => Status::RoundComplete { id },
        };
        log::info!("{} committed: {}", outcome.id(), self.status);
        Ok(outcome)
    }

    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.sound_settings.toggle_mute();
        if muted {
            self.stop_sound();
        }
        log::info!("Sound {}", if muted { "muted" } else { "unmuted" });
        muted
    }

    pub fn apply_config(&mut self, config: &Config) -> Result<(), LayoutError> {
        self.pointer = config.pointer;
        self.sound_settings = config.sound;
        self.auto_reset = config.auto_reset;

        if clamp_player_count(config.players) != self.player_count() {
            self.set_player_count(config.players)?;
        } else if !self.engine.state().is_spinning() && self.status == Status::Idle {
            self.rotation = self.rest_rotation();
        }
        Ok(())
    }

    fn start_sound(&mut self) {
        if !self.sound_settings.audible() {
            return;
        }
        if let Err(e) = self.sound.spin_started(self.sound_settings.volume) {
            log::warn!("Failed to play spin sound: {}", e);
        }
    }

    fn stop_sound(&mut self) {
        if let Err(e) = self.sound.spin_finished() {
            log::warn!("Failed to stop spin sound: {}", e);
        }
    }
}
