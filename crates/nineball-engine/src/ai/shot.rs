use glam::Vec2;

use crate::core::ball::{BallView, Shot, CUE};
use crate::core::table::CushionSide;

/// Everything one planning pass looks at. Built per call and passed down
/// explicitly; the planner keeps no per-call state of its own.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    pub cue: BallView,
    pub target: BallView,
    pub balls: &'a [BallView],
    pub pockets: &'a [Vec2],
    pub ball_radius: f32,
}

impl<'a> Layout<'a> {
    /// In-play object balls other than the target.
    pub fn others(&self) -> impl Iterator<Item = &'a BallView> + '_ {
        let target = self.target.number;
        self.balls
            .iter()
            .filter(move |b| b.in_game && b.number != CUE && b.number != target)
    }

    /// Lowest in-play ball numbered above the target: the ball on next if
    /// the target drops.
    pub fn next_ball(&self) -> Option<BallView> {
        self.others()
            .filter(|b| b.number > self.target.number)
            .min_by_key(|b| b.number)
            .copied()
    }

    /// Whether `pos` is inside the risk circle of any pocket.
    pub fn near_pocket(&self, pos: Vec2, risk_radius: f32) -> bool {
        self.pockets.iter().any(|p| p.distance(pos) < risk_radius)
    }
}

/// A scored way to play the current shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotCandidate {
    /// Straight pot via the ghost ball.
    Direct {
        shot: Shot,
        pocket: usize,
        cut_angle: f32,
        cue_rest: Vec2,
        score: f32,
    },
    /// Cue ball off one cushion onto the ghost ball.
    Bank {
        shot: Shot,
        pocket: usize,
        cushion: CushionSide,
        contact: Vec2,
        score: f32,
    },
    /// Defensive play; `kick` names the cushion when the cue ball goes via one.
    Safety {
        shot: Shot,
        kick: Option<CushionSide>,
        object_rest: Vec2,
        score: f32,
    },
}

impl ShotCandidate {
    pub fn shot(&self) -> Shot {
        match *self {
            ShotCandidate::Direct { shot, .. }
            | ShotCandidate::Bank { shot, .. }
            | ShotCandidate::Safety { shot, .. } => shot,
        }
    }

    pub fn score(&self) -> f32 {
        match *self {
            ShotCandidate::Direct { score, .. }
            | ShotCandidate::Bank { score, .. }
            | ShotCandidate::Safety { score, .. } => score,
        }
    }

    /// Direct and bank shots try to pot the target.
    pub fn is_offensive(&self) -> bool {
        !matches!(self, ShotCandidate::Safety { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShotCandidate::Direct { .. } => "direct",
            ShotCandidate::Bank { .. } => "bank",
            ShotCandidate::Safety { kick: None, .. } => "safety",
            ShotCandidate::Safety { kick: Some(_), .. } => "kick safety",
        }
    }
}

/// Highest-scoring candidate. Ties keep the earlier one.
pub fn best<I>(candidates: I) -> Option<ShotCandidate>
where
    I: IntoIterator<Item = ShotCandidate>,
{
    candidates.into_iter().fold(None, |best, c| match best {
        Some(b) if b.score() >= c.score() => Some(b),
        _ => Some(c),
    })
}
