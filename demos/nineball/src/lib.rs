use wasm_bindgen::prelude::*;

mod game;
mod opponent;

pub use game::{NineBallGame, Seat};

nineball_web::export_game!(NineBallGame, "nineball");
