use glam::Vec2;

use crate::config::PhysicsConfig;
use crate::core::math::{from_angle, rotate, safe_asin};
use crate::core::table::{CushionSide, Table};

/// Number carried by the cue ball.
pub const CUE: u8 = 0;
/// The money ball.
pub const NINE: u8 = 9;

/// English on a ball. Both components live in [-1, 1].
/// Positive `top` is follow, negative is draw. Positive `side` curves the
/// path toward increasing angle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spin {
    pub top: f32,
    pub side: f32,
}

impl Spin {
    pub const NONE: Spin = Spin { top: 0.0, side: 0.0 };

    pub fn new(top: f32, side: f32) -> Self {
        Self { top, side }.clamped()
    }

    /// Clamp each component into [-1, 1], mapping NaN to zero.
    pub fn clamped(self) -> Self {
        let fix = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        Self { top: fix(self.top), side: fix(self.side) }
    }

    /// Scale the vector back onto the unit disc if it lies outside.
    pub fn clamped_to_disc(self) -> Self {
        let s = self.clamped();
        let len = (s.top * s.top + s.side * s.side).sqrt();
        if len > 1.0 {
            Self { top: s.top / len, side: s.side / len }
        } else {
            s
        }
    }

    pub fn scaled(self, k: f32) -> Self {
        Self { top: self.top * k, side: self.side * k }
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.side == 0.0
    }
}

/// A cue strike: the planner's output and the input boundary's strike event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Direction of travel in radians.
    pub angle: f32,
    /// Initial cue-ball speed, in table units per tick.
    pub power: f32,
    pub spin: Spin,
}

impl Shot {
    pub fn new(angle: f32, power: f32) -> Self {
        Self { angle, power, spin: Spin::NONE }
    }

    pub fn with_spin(mut self, spin: Spin) -> Self {
        self.spin = spin.clamped();
        self
    }

    pub fn is_finite(&self) -> bool {
        self.angle.is_finite() && self.power.is_finite()
    }
}

/// Cushions touched during one rebound check, split by axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CushionHits {
    pub x: Option<CushionSide>,
    pub y: Option<CushionSide>,
}

impl CushionHits {
    pub fn any(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = CushionSide> {
        self.x.into_iter().chain(self.y)
    }
}

/// A ball on the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    /// 0 for the cue ball, 1..=9 for object balls.
    pub number: u8,
    pub pos: Vec2,
    /// Velocity in table units per tick.
    pub vel: Vec2,
    pub spin: Spin,
    pub radius: f32,
    pub mass: f32,
    /// False once pocketed; such balls are skipped by physics and collisions.
    pub in_game: bool,
    /// Balls struck since the last shot began, in order. Only the cue ball's
    /// list is consulted by the foul check.
    pub collision_order: Vec<u8>,
    /// Rack slot (object balls) or head spot (cue ball), used when spotting.
    pub home: Vec2,
    /// Side-spin kick still owed from the last strike.
    deflection_pending: bool,
}

impl Ball {
    pub fn new(number: u8, pos: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            number,
            pos,
            vel: Vec2::ZERO,
            spin: Spin::NONE,
            radius,
            mass,
            in_game: true,
            collision_order: Vec::new(),
            home: pos,
            deflection_pending: false,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_spin(mut self, spin: Spin) -> Self {
        self.spin = spin.clamped();
        self
    }

    #[inline]
    pub fn is_cue(&self) -> bool {
        self.number == CUE
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.vel != Vec2::ZERO
    }

    /// At rest: no translation and no spin left to apply.
    #[inline]
    pub fn is_at_rest(&self) -> bool {
        !self.in_game || (!self.is_moving() && self.spin.is_zero())
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass
    }

    /// Put the ball in motion from a cue strike.
    pub fn strike(&mut self, shot: &Shot) {
        self.vel = from_angle(shot.angle) * shot.power;
        self.spin = shot.spin.clamped();
        self.deflection_pending = !self.spin.is_zero();
    }

    /// Return the ball to play at `pos`, stationary and without spin.
    pub fn place(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.spin = Spin::NONE;
        self.in_game = true;
        self.deflection_pending = false;
    }

    /// Take the ball out of play.
    pub fn remove(&mut self) {
        self.in_game = false;
        self.vel = Vec2::ZERO;
        self.spin = Spin::NONE;
        self.deflection_pending = false;
    }

    /// Spin and deceleration for one tick, without moving the ball.
    pub fn update_velocity(&mut self, deceleration: f32, physics: &PhysicsConfig) {
        if !self.in_game {
            return;
        }
        if !self.is_moving() {
            self.spin = Spin::NONE;
            return;
        }

        let accel = self.apply_spin(deceleration, physics);
        self.decelerate(accel, physics.rest_speed);
    }

    /// Move by `fraction` of one tick's velocity.
    #[inline]
    pub fn translate(&mut self, fraction: f32) {
        if self.in_game {
            self.pos += self.vel * fraction;
        }
    }

    /// Spin-to-velocity coupling. Returns the effective deceleration.
    fn apply_spin(&mut self, deceleration: f32, physics: &PhysicsConfig) -> f32 {
        let side = safe_asin(self.spin.side);
        if self.deflection_pending {
            self.vel = rotate(self.vel, physics.side_spin_deflection * side);
            self.deflection_pending = false;
        }
        if side != 0.0 {
            self.vel = rotate(self.vel, physics.curve_strength * side);
        }

        let friction = (1.0 - physics.top_spin_friction * self.spin.top).max(0.0);

        self.spin = self.spin.scaled(physics.spin_decay);
        if self.spin.top.abs() < physics.rest_spin {
            self.spin.top = 0.0;
        }
        if self.spin.side.abs() < physics.rest_spin {
            self.spin.side = 0.0;
        }

        deceleration * friction
    }

    /// Linear per-axis decay toward zero along the direction of travel.
    fn decelerate(&mut self, accel: f32, rest_speed: f32) {
        let angle = self.vel.y.atan2(self.vel.x);
        self.vel.x = toward_zero(self.vel.x, accel * angle.cos().abs());
        self.vel.y = toward_zero(self.vel.y, accel * angle.sin().abs());
        if self.vel.length() < rest_speed {
            self.vel = Vec2::ZERO;
            self.spin = Spin::NONE;
        }
    }

    /// Pocket capture. Returns the pocket index if the ball dropped.
    pub fn check_pocket(&mut self, table: &Table) -> Option<usize> {
        if !self.in_game {
            return None;
        }
        let pocket = table.pocket_at(self.pos)?;
        self.remove();
        Some(pocket)
    }

    /// Clamp to the cushions and reflect the perpendicular velocity. Side
    /// spin kicks the parallel component and is damped afterwards.
    pub fn rebound(&mut self, table: &Table, physics: &PhysicsConfig) -> CushionHits {
        let mut hits = CushionHits::default();
        if !self.in_game {
            return hits;
        }
        let lo = table.min_center();
        let hi = table.max_center();
        let speed = self.speed();

        if self.pos.x < lo.x {
            self.pos.x = lo.x;
            self.vel.x = self.vel.x.abs();
            hits.x = Some(CushionSide::Left);
        } else if self.pos.x > hi.x {
            self.pos.x = hi.x;
            self.vel.x = -self.vel.x.abs();
            hits.x = Some(CushionSide::Right);
        }

        if self.pos.y < lo.y {
            self.pos.y = lo.y;
            self.vel.y = self.vel.y.abs();
            hits.y = Some(CushionSide::Top);
        } else if self.pos.y > hi.y {
            self.pos.y = hi.y;
            self.vel.y = -self.vel.y.abs();
            hits.y = Some(CushionSide::Bottom);
        }

        if hits.any() && self.spin.side != 0.0 {
            let kick = self.spin.side * speed * physics.cushion_spin_impulse;
            for side in hits.iter() {
                let normal = match side {
                    CushionSide::Left => Vec2::X,
                    CushionSide::Right => -Vec2::X,
                    CushionSide::Top => Vec2::Y,
                    CushionSide::Bottom => -Vec2::Y,
                };
                // Parallel direction: the inward normal turned a quarter.
                self.vel += normal.perp() * kick;
            }
        }
        if hits.any() {
            self.spin = self.spin.scaled(physics.cushion_spin_damping);
        }
        hits
    }
}

#[inline]
fn toward_zero(v: f32, amount: f32) -> f32 {
    if v > 0.0 {
        (v - amount).max(0.0)
    } else if v < 0.0 {
        (v + amount).min(0.0)
    } else {
        0.0
    }
}

/// Read-only stand-in for a ball: only what the planner and placement solver need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallView {
    pub number: u8,
    pub pos: Vec2,
    pub in_game: bool,
}

impl BallView {
    pub fn new(number: u8, pos: Vec2) -> Self {
        Self { number, pos, in_game: true }
    }
}

impl From<&Ball> for BallView {
    fn from(ball: &Ball) -> Self {
        Self { number: ball.number, pos: ball.pos, in_game: ball.in_game }
    }
}
