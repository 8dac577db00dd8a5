use glam::Vec2;

use crate::config::{PhysicsConfig, TableConfig};
use crate::core::ball::{Ball, Shot, CUE};
use crate::core::collision::resolve_pair;
use crate::core::table::{CushionSide, Table};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Something that happened during a physics tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsEvent {
    /// Two balls met while closing on each other.
    BallContact { striker: u8, struck: u8, speed: f32 },
    /// A ball rebounded off a cushion.
    Cushion { ball: u8, side: CushionSide },
    /// A ball dropped into the pocket with the given index.
    Pocketed { ball: u8, pocket: usize },
}

// ---------------------------------------------------------------------------
// BallWorld
// ---------------------------------------------------------------------------

/// Upper bound on sub-steps per tick.
pub const MAX_SUBSTEPS: u32 = 64;

/// Owns the balls and advances them one tick at a time.
///
/// A tick first updates every in-play ball's spin and velocity. Movement is
/// then split into sub-steps short enough that no ball travels more than
/// `substep_travel` radii between collision passes. Each sub-step runs in
/// three passes so the result does not depend on which ball moves first:
/// 1. every in-play ball moves its share of the tick;
/// 2. every overlapping pair `(i, j)` with `i < j` is resolved in index order;
/// 3. every in-play ball checks pocket capture, then cushions.
pub struct BallWorld {
    table: Table,
    physics: PhysicsConfig,
    deceleration: f32,
    balls: Vec<Ball>,
    tick: u64,
}

impl BallWorld {
    pub fn new(table_config: &TableConfig, physics: PhysicsConfig) -> Self {
        Self {
            table: Table::new(table_config),
            physics,
            deceleration: table_config.deceleration,
            balls: Vec::new(),
            tick: 0,
        }
    }

    /// Replace the ball set. Balls are kept in the given order; index order
    /// decides pair resolution order.
    pub fn set_balls(&mut self, balls: Vec<Ball>) {
        self.balls = balls;
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    pub fn ball(&self, number: u8) -> Option<&Ball> {
        self.balls.iter().find(|b| b.number == number)
    }

    pub fn ball_mut(&mut self, number: u8) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.number == number)
    }

    pub fn cue_ball(&self) -> Option<&Ball> {
        self.ball(CUE)
    }

    /// Balls still on the table.
    pub fn in_play(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter().filter(|b| b.in_game)
    }

    /// Ticks stepped since creation.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// True when nothing on the table is moving or spinning.
    pub fn all_at_rest(&self) -> bool {
        self.balls.iter().all(Ball::is_at_rest)
    }

    /// Strike the cue ball. Its contact history is cleared first.
    pub fn strike_cue(&mut self, shot: &Shot) -> bool {
        match self.ball_mut(CUE) {
            Some(cue) if cue.in_game => {
                cue.collision_order.clear();
                cue.strike(shot);
                true
            }
            _ => false,
        }
    }

    /// Advance one tick and collect events into the provided Vec.
    pub fn step_into(&mut self, events: &mut Vec<PhysicsEvent>) {
        self.tick += 1;

        for ball in self.balls.iter_mut() {
            ball.update_velocity(self.deceleration, &self.physics);
        }

        let substeps = self.substeps();
        let fraction = 1.0 / substeps as f32;
        for _ in 0..substeps {
            for ball in self.balls.iter_mut() {
                ball.translate(fraction);
            }
            self.resolve_contacts(events);
            self.resolve_boundaries(events);
        }
    }

    /// Sub-steps needed this tick so the fastest ball moves at most
    /// `substep_travel` radii between collision passes.
    pub fn substeps(&self) -> u32 {
        let (fastest, smallest) = self
            .in_play()
            .fold((0.0f32, f32::INFINITY), |(v, r), b| (v.max(b.speed()), r.min(b.radius)));
        let reach = self.physics.substep_travel * smallest;
        if fastest <= 0.0 || !reach.is_finite() || reach <= 0.0 {
            return 1;
        }
        ((fastest / reach).ceil() as u32).clamp(1, MAX_SUBSTEPS)
    }

    fn resolve_contacts(&mut self, events: &mut Vec<PhysicsEvent>) {
        let n = self.balls.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (head, tail) = self.balls.split_at_mut(j);
                if let Some(impact) = resolve_pair(&mut head[i], &mut tail[0], &self.physics) {
                    events.push(PhysicsEvent::BallContact {
                        striker: impact.striker,
                        struck: impact.struck,
                        speed: impact.closing_speed,
                    });
                }
            }
        }
    }

    fn resolve_boundaries(&mut self, events: &mut Vec<PhysicsEvent>) {
        for ball in self.balls.iter_mut() {
            if !ball.in_game {
                continue;
            }
            if let Some(pocket) = ball.check_pocket(&self.table) {
                log::debug!("ball {} pocketed in {} at tick {}", ball.number, pocket, self.tick);
                events.push(PhysicsEvent::Pocketed { ball: ball.number, pocket });
                continue;
            }
            let hits = ball.rebound(&self.table, &self.physics);
            for side in hits.iter() {
                events.push(PhysicsEvent::Cushion { ball: ball.number, side });
            }
        }
    }

    /// Step until everything rests or `max_ticks` pass. Returns ticks stepped.
    pub fn run_until_rest(&mut self, max_ticks: u32, events: &mut Vec<PhysicsEvent>) -> u32 {
        let mut steps = 0;
        while steps < max_ticks && !self.all_at_rest() {
            self.step_into(events);
            steps += 1;
        }
        steps
    }

    /// Positions of every in-play ball except `exclude`, for placement checks.
    pub fn occupied_except(&self, exclude: u8) -> Vec<(u8, Vec2)> {
        self.in_play()
            .filter(|b| b.number != exclude)
            .map(|b| (b.number, b.pos))
            .collect()
    }
}
