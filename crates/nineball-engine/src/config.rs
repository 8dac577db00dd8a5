//! Tunable parameters for the table, the ball physics and the shot planner.
//! Every field has a default so a partial JSON document is enough to override
//! a handful of knobs.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Table geometry and per-tick motion constants.
/// Velocities are expressed in table units per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Outer width of the table including rails.
    pub width: f32,
    /// Outer height of the table including rails.
    pub height: f32,
    /// Rail width; the cushion line sits at this inset.
    pub edge_width: f32,
    /// Radius of a pocket opening.
    pub pocket_radius: f32,
    /// Radius of every ball.
    pub ball_radius: f32,
    /// Added to the pocket radius to form the corner capture circle.
    pub corner_capture_margin: f32,
    /// Added to the pocket radius to form the side capture circle.
    pub side_capture_margin: f32,
    /// Linear speed decay per tick, split along the axes of travel.
    pub deceleration: f32,
    /// Highest strike power accepted at the input boundary.
    pub max_power: f32,
    /// Extra spacing between racked balls.
    pub rack_gap: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            edge_width: 20.0,
            pocket_radius: 15.0,
            ball_radius: 8.0,
            corner_capture_margin: 2.0,
            side_capture_margin: 4.0,
            deceleration: 0.05,
            max_power: 20.0,
            rack_gap: 0.1,
        }
    }
}

/// Spin model knobs. The model is a deliberate approximation: side spin curves
/// the path and decays, top spin changes how fast the ball slows down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Geometric decay applied to both spin components every tick.
    pub spin_decay: f32,
    /// Largest share of the deceleration that top spin can cancel (or back spin add).
    pub top_spin_friction: f32,
    /// Scale of the one-off deflection applied on the first moving tick.
    pub side_spin_deflection: f32,
    /// Per-tick rotation of the velocity, scaled by `asin(side_spin)`.
    pub curve_strength: f32,
    /// Parallel impulse at a cushion, as a fraction of `side_spin * speed`.
    pub cushion_spin_impulse: f32,
    /// Spin kept after a cushion contact.
    pub cushion_spin_damping: f32,
    /// Fraction of spin handed from striker to struck ball.
    pub spin_transfer: f32,
    /// Mass of every ball.
    pub ball_mass: f32,
    /// Below this speed a ball is put at rest.
    pub rest_speed: f32,
    /// Below this magnitude a spin component is cleared.
    pub rest_spin: f32,
    /// Farthest a ball may move between two collision passes, in ball radii.
    /// Fast ticks are split into sub-steps so no pair can pass through.
    pub substep_travel: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            spin_decay: 0.98,
            top_spin_friction: 0.3,
            side_spin_deflection: 0.15,
            curve_strength: 0.004,
            cushion_spin_impulse: 0.2,
            cushion_spin_damping: 0.3,
            spin_transfer: 0.3,
            ball_mass: 1.0,
            rest_speed: 0.01,
            rest_spin: 0.001,
            substep_travel: 0.25,
        }
    }
}

/// Heuristic weights for the shot planner and the placement solver.
/// Only the relative ordering they produce matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Scales strike power and the offensive threshold.
    pub difficulty: f32,
    /// Cut angles above this (degrees) lose score linearly.
    pub ideal_cut_deg: f32,
    /// Cut angles above this (degrees) are rejected.
    pub max_cut_deg: f32,
    /// Predicted cue-ball rest within this distance of a pocket rejects a power level.
    pub scratch_risk_radius: f32,
    /// Offensive candidates below this score give way to a safety.
    pub attack_threshold: f32,
    /// Direct shots scoring at or below this are discarded outright.
    pub min_direct_score: f32,
    /// Weight of the next-ball look-ahead in a direct shot's score.
    pub lookahead_weight: f32,
    /// Normalizer for total travel distance of a direct shot.
    pub travel_norm: f32,
    /// Normalizer for distances in the simplified look-ahead.
    pub lookahead_norm: f32,
    /// Base score of a bank (kick) shot before penalties.
    pub bank_base_score: f32,
    /// Normalizer for the total bank path length.
    pub bank_path_norm: f32,
    /// Normalizer for the object ball's distance to the pocket on a bank.
    pub bank_pocket_norm: f32,
    /// Power cap before the difficulty multiplier.
    pub power_cap: f32,
    /// Distance the cue ball drifts per unit of power in the deflection model.
    pub cue_travel_per_power: f32,
    /// Distance the object ball rolls per unit of power on a safety.
    pub safety_travel_per_power: f32,
    /// Power grid tried for direct safeties.
    pub safety_powers: Vec<f32>,
    /// Power grid tried for kick safeties.
    pub kick_safety_powers: Vec<f32>,
    /// Distance the object ball rolls per unit of power on a kick safety.
    pub kick_travel_per_power: f32,
    /// Normalizer for the object ball's distance from each pocket on a safety.
    pub safety_pocket_norm: f32,
    /// Cushion distance below which a safety leave earns a bonus.
    pub safety_cushion_range: f32,
    /// Cushion distance below which the object ball counts as frozen.
    pub safety_frozen_distance: f32,
    /// Normalizer for cue-to-object separation on a safety.
    pub safety_separation_norm: f32,
    /// Bonus when the predicted leave hides the object ball from the cue ball.
    pub safety_hide_bonus: f32,
    /// Lowest power of the last-resort shot straight at the object ball.
    /// Raised as far as needed for the cue ball to get there.
    pub fallback_power: f32,
    /// Safety on the computed power needed to cover a path.
    pub reach_margin: f32,
    /// Cells per axis in the cue-ball placement grid.
    pub placement_grid_steps: u32,
    /// Random attempts once the grid finds nothing.
    pub placement_attempts: u32,
    /// Preferred cue-to-object distance when placing the cue ball.
    pub placement_ideal_distance: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            difficulty: 1.0,
            ideal_cut_deg: 45.0,
            max_cut_deg: 75.0,
            scratch_risk_radius: 30.0,
            attack_threshold: 0.35,
            min_direct_score: 0.1,
            lookahead_weight: 0.3,
            travel_norm: 2000.0,
            lookahead_norm: 1000.0,
            bank_base_score: 0.6,
            bank_path_norm: 2000.0,
            bank_pocket_norm: 1600.0,
            power_cap: 20.0,
            cue_travel_per_power: 10.0,
            safety_travel_per_power: 6.0,
            safety_powers: vec![6.0, 8.0, 10.0, 12.0],
            kick_safety_powers: vec![12.0, 14.0, 16.0],
            kick_travel_per_power: 4.0,
            safety_pocket_norm: 400.0,
            safety_cushion_range: 100.0,
            safety_frozen_distance: 1.0,
            safety_separation_norm: 300.0,
            safety_hide_bonus: 0.5,
            fallback_power: 5.0,
            reach_margin: 1.25,
            placement_grid_steps: 20,
            placement_attempts: 100,
            placement_ideal_distance: 200.0,
        }
    }
}

impl AiConfig {
    pub fn max_cut(&self) -> f32 {
        self.max_cut_deg.to_radians()
    }

    pub fn ideal_cut(&self) -> f32 {
        self.ideal_cut_deg.to_radians()
    }

    /// Offensive score a candidate must reach before a safety is considered.
    /// Stronger players attempt harder shots.
    pub fn offensive_threshold(&self) -> f32 {
        self.attack_threshold / self.difficulty.max(0.1)
    }
}

/// Full simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub table: TableConfig,
    pub physics: PhysicsConfig,
    pub ai: AiConfig,
    /// Seed for the rack shuffle and the placement fallback.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            table: TableConfig::default(),
            physics: PhysicsConfig::default(),
            ai: AiConfig::default(),
            seed: 0x9BA11,
        }
    }
}

impl SimConfig {
    /// Parse a configuration from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject geometry that leaves no room to play.
    pub fn validate(&self) -> Result<(), EngineError> {
        let t = &self.table;
        if t.ball_radius <= 0.0 || t.pocket_radius <= 0.0 {
            return Err(EngineError::InvalidConfig("radii must be positive".into()));
        }
        let inner_w = t.width - 2.0 * t.edge_width;
        let inner_h = t.height - 2.0 * t.edge_width;
        if inner_w <= 8.0 * t.ball_radius || inner_h <= 8.0 * t.ball_radius {
            return Err(EngineError::InvalidConfig("playing surface too small".into()));
        }
        if !(0.0..1.0).contains(&self.physics.spin_decay) {
            return Err(EngineError::InvalidConfig("spin_decay must be in [0, 1)".into()));
        }
        if !(self.physics.substep_travel > 0.0 && self.physics.substep_travel <= 1.0) {
            return Err(EngineError::InvalidConfig("substep_travel must be in (0, 1]".into()));
        }
        Ok(())
    }
}
