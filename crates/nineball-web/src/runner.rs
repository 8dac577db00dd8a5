use nineball_engine::{
    Game, GameConfig, EngineContext, RenderContext,
    InputEvent, InputQueue, StateBuffer,
    FixedTimestep, ProtocolLayout,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    state: StateBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    initialized: bool,
    frames: u64,
    /// Header, balls, sounds and events in protocol order.
    shared: Vec<f32>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        let layout = ProtocolLayout::from_config(&config);
        let state = StateBuffer::with_capacity(config.max_balls);
        let shared = vec![0.0; layout.buffer_total_floats];

        Self {
            game,
            ctx: EngineContext::new(),
            input: InputQueue::new(),
            state,
            timestep,
            layout,
            config,
            initialized: false,
            frames: 0,
            shared,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.layout = ProtocolLayout::from_config(&self.config);
        self.timestep = FixedTimestep::new(self.config.fixed_dt);
        self.state = StateBuffer::with_capacity(self.config.max_balls);
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.publish();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: fixed ticks, then the render pass.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.game.update(&mut self.ctx, &self.input);
            self.ctx.advance();
            // Input applies to the first tick of the frame only.
            self.input.drain();
        }

        self.frames += 1;
        self.publish();
    }

    /// Render pass plus packing into the shared buffer.
    fn publish(&mut self) {
        self.state.clear();
        {
            let mut render_ctx = RenderContext { state: &mut self.state };
            self.game.render(&mut render_ctx);
        }
        self.state.pack(
            &self.layout,
            (self.config.world_width, self.config.world_height),
            self.frames,
            &self.ctx.sounds,
            &self.ctx.events,
            &mut self.shared,
        );
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn buffer_ptr(&self) -> *const f32 {
        self.shared.as_ptr()
    }

    pub fn balls_ptr(&self) -> *const f32 {
        self.state.balls_ptr()
    }

    pub fn ball_count(&self) -> u32 {
        self.state.ball_count()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn sound_events_len(&self) -> u32 {
        self.ctx.sounds.len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_balls(&self) -> u32 {
        self.layout.max_balls as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nineball_engine::bridge::protocol::*;
    use nineball_engine::{NineBall, SimConfig};

    /// Bare table with no opponent logic: applies input, ticks, renders.
    struct Bare {
        game: NineBall,
    }

    impl Game for Bare {
        fn init(&mut self, _ctx: &mut EngineContext) {}

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            for event in input.iter() {
                match *event {
                    InputEvent::PlaceCueBall { x, y } => {
                        let _ = self.game.place_cue_ball(glam::Vec2::new(x, y));
                    }
                    InputEvent::Strike { angle, power } => {
                        let _ = self.game.strike(nineball_engine::Shot::new(angle, power));
                    }
                    _ => {}
                }
            }
            self.game.tick();
            for event in self.game.drain_events() {
                ctx.emit_table_event(event);
            }
        }

        fn render(&self, ctx: &mut RenderContext) {
            ctx.state.write_table(&self.game);
        }
    }

    fn runner() -> GameRunner<Bare> {
        let mut r = GameRunner::new(Bare { game: NineBall::new(&SimConfig::default()) });
        r.init();
        r
    }

    #[test]
    fn header_reflects_table_after_init() {
        let r = runner();
        let buf = unsafe { std::slice::from_raw_parts(r.buffer_ptr(), r.buffer_total_floats() as usize) };
        assert_eq!(buf[HEADER_BALL_COUNT], 10.0);
        assert_eq!(buf[HEADER_PHASE], 0.0);
        assert_eq!(buf[HEADER_WORLD_WIDTH], 800.0);
        assert_eq!(buf[HEADER_FRAME_COUNTER], 0.0);
    }

    #[test]
    fn input_is_consumed_once() {
        let mut r = runner();
        r.push_input(InputEvent::PlaceCueBall { x: 100.0, y: 200.0 });
        // Two ticks in one frame; the drop applies on the first.
        r.tick(2.0 / 60.0 + 1e-4);
        assert_eq!(r.game().game.phase(), nineball_engine::Phase::Aiming);
        let placed = r
            .context()
            .table_events
            .iter()
            .filter(|e| matches!(e, nineball_engine::TableEvent::CueBallPlaced { .. }))
            .count();
        assert_eq!(placed, 1);
    }

    #[test]
    fn strike_runs_the_shot_across_frames() {
        let mut r = runner();
        r.push_input(InputEvent::PlaceCueBall { x: 100.0, y: 200.0 });
        r.tick(1.0 / 60.0);
        r.push_input(InputEvent::Strike { angle: 0.0, power: 15.0 });
        r.tick(1.0 / 60.0);
        assert_eq!(r.game().game.phase(), nineball_engine::Phase::ShotInFlight);

        for _ in 0..3000 {
            r.tick(1.0 / 60.0);
            if r.game().game.phase() != nineball_engine::Phase::ShotInFlight {
                break;
            }
        }
        assert_ne!(r.game().game.phase(), nineball_engine::Phase::ShotInFlight, "shot never settled");
        let buf = unsafe { std::slice::from_raw_parts(r.buffer_ptr(), r.buffer_total_floats() as usize) };
        assert!(buf[HEADER_FRAME_COUNTER] > 2.0);
    }
}
