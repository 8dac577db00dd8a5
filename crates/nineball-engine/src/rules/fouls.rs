use std::fmt;

use crate::core::ball::Ball;

/// A rule violation on a completed shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Foul {
    /// The cue ball went into a pocket.
    CueBallPocketed,
    /// The cue ball touched no object ball.
    NoContact,
    /// The first object ball touched was not the lowest on the table.
    WrongBallFirst { expected: u8, hit: u8 },
}

impl fmt::Display for Foul {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Foul::CueBallPocketed => write!(f, "cue ball pocketed"),
            Foul::NoContact => write!(f, "no ball hit"),
            Foul::WrongBallFirst { expected, hit } => {
                write!(f, "hit the {}-ball first, needed the {}-ball", hit, expected)
            }
        }
    }
}

/// Judge a shot from the cue ball's contact history and whether it is still
/// on the table. Pocketing takes precedence over contact fouls.
pub fn check_foul(cue_in_game: bool, collision_order: &[u8], target: u8) -> Option<Foul> {
    if !cue_in_game {
        return Some(Foul::CueBallPocketed);
    }
    match collision_order.first() {
        None => Some(Foul::NoContact),
        Some(&first) if first != target => Some(Foul::WrongBallFirst { expected: target, hit: first }),
        Some(_) => None,
    }
}

/// [`check_foul`] applied to the cue ball itself.
pub fn check_cue_ball(cue: &Ball, target: u8) -> Option<Foul> {
    check_foul(cue.in_game, &cue.collision_order, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn legal_hit() {
        assert_eq!(check_foul(true, &[3, 5], 3), None);
    }

    #[test]
    fn each_foul_kind() {
        assert_eq!(check_foul(false, &[3], 3), Some(Foul::CueBallPocketed));
        assert_eq!(check_foul(true, &[], 3), Some(Foul::NoContact));
        assert_eq!(
            check_foul(true, &[5, 3], 3),
            Some(Foul::WrongBallFirst { expected: 3, hit: 5 })
        );
    }

    #[test]
    fn verdict_is_deterministic() {
        let order = [4u8, 1, 9];
        let first = check_foul(true, &order, 1);
        for _ in 0..10 {
            assert_eq!(check_foul(true, &order, 1), first);
        }
    }

    #[test]
    fn cue_ball_helper_matches() {
        let mut cue = Ball::new(0, Vec2::new(100.0, 100.0), 8.0, 1.0);
        cue.collision_order = vec![2];
        assert_eq!(check_cue_ball(&cue, 2), None);
        cue.remove();
        assert_eq!(check_cue_ball(&cue, 2), Some(Foul::CueBallPocketed));
    }
}
