pub mod runner;

pub use runner::GameRunner;

/// Generate all `#[wasm_bindgen]` exports for a table game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, table commands, buffer accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod game;
/// use game::MyTable;
///
/// nineball_web::export_game!(MyTable, "my-table");
/// ```
///
/// # Arguments
///
/// - `$game_type`: a type implementing `nineball_engine::Game` with a `new()` constructor
/// - `$game_name`: a string literal used in the initialization log message
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;
        use nineball_engine::InputEvent;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Game not initialized. Call game_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        // ---- Table commands ----

        #[wasm_bindgen]
        pub fn game_place_cue_ball(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PlaceCueBall { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_strike(angle: f32, power: f32) {
            with_runner(|r| r.push_input(InputEvent::Strike { angle, power }));
        }

        #[wasm_bindgen]
        pub fn game_set_spin(top: f32, side: f32) {
            with_runner(|r| r.push_input(InputEvent::SetSpin { top, side }));
        }

        #[wasm_bindgen]
        pub fn game_reset() {
            with_runner(|r| r.push_input(InputEvent::Reset));
        }

        /// Raw `(kind, a, b)` command; unknown kinds are logged and dropped.
        #[wasm_bindgen]
        pub fn game_input(kind: u32, a: f32, b: f32) {
            match InputEvent::from_raw(kind, a, b) {
                Some(event) => with_runner(|r| r.push_input(event)),
                None => log::warn!("{}: unknown input kind {}", $game_name, kind),
            }
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_buffer_ptr() -> *const f32 {
            with_runner(|r| r.buffer_ptr())
        }

        #[wasm_bindgen]
        pub fn get_balls_ptr() -> *const f32 {
            with_runner(|r| r.balls_ptr())
        }

        #[wasm_bindgen]
        pub fn get_ball_count() -> u32 {
            with_runner(|r| r.ball_count())
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_len() -> u32 {
            with_runner(|r| r.sound_events_len())
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width())
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height())
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_balls() -> u32 {
            with_runner(|r| r.max_balls())
        }

        #[wasm_bindgen]
        pub fn get_max_sounds() -> u32 {
            with_runner(|r| r.max_sounds())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }
    };
}
