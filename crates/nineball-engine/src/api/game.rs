use crate::api::types::{GameEvent, SoundEvent};
use crate::bridge::state::StateBuffer;
use crate::input::queue::InputQueue;
use crate::rules::events::TableEvent;

/// Runner-facing configuration, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Table width in world units.
    pub world_width: f32,
    /// Table height in world units.
    pub world_height: f32,
    /// Ball slots in the state buffer (default: 16).
    pub max_balls: usize,
    /// Sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Game events per frame (default: 64).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 800.0,
            world_height: 400.0,
            max_balls: 16,
            max_sounds: 32,
            max_events: 64,
        }
    }
}

/// The contract a table game fulfils for the runner.
pub trait Game {
    /// Return runner configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Set up the first rack.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed tick: apply input, advance the simulation, emit events.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Publish read-only table state for the presentation layer.
    fn render(&self, _ctx: &mut RenderContext) {}
}

/// Per-frame outputs collected while the game updates.
pub struct EngineContext {
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    /// Structured events of the current frame, before wire encoding.
    pub table_events: Vec<TableEvent>,
    ticks: u64,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            sounds: Vec::new(),
            events: Vec::new(),
            table_events: Vec::new(),
            ticks: 0,
        }
    }

    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Record a table event along with its wire form and sound cue.
    pub fn emit_table_event(&mut self, event: TableEvent) {
        self.events.push(event.to_wire());
        if let Some(sound) = event.sound() {
            self.sounds.push(sound);
        }
        self.table_events.push(event);
    }

    /// Count a fixed tick.
    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    /// Fixed ticks run since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
        self.table_events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Write access to the state buffer during the render pass.
pub struct RenderContext<'a> {
    pub state: &'a mut StateBuffer,
}
