//! Fixed table geometry: playing surface, cushions, pockets and spots.
//! Built once from a `TableConfig` and never mutated afterwards.

use glam::Vec2;
use std::f32::consts::SQRT_2;

use crate::config::TableConfig;
use crate::error::PlacementError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PocketKind {
    Corner,
    Side,
}

/// A pocket: aim point plus the circle in which a ball centre is captured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pocket {
    pub center: Vec2,
    pub capture_radius: f32,
    pub kind: PocketKind,
}

impl Pocket {
    /// Whether a ball centre at `pos` falls into this pocket.
    #[inline]
    pub fn captures(&self, pos: Vec2) -> bool {
        pos.distance_squared(self.center) <= self.capture_radius * self.capture_radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CushionSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl CushionSide {
    pub const ALL: [CushionSide; 4] = [
        CushionSide::Top,
        CushionSide::Bottom,
        CushionSide::Left,
        CushionSide::Right,
    ];

    /// Whether the cushion runs along the x axis.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, CushionSide::Top | CushionSide::Bottom)
    }
}

/// One rail as seen by a ball centre: the line at which the centre rebounds
/// and the stretches of that line that have rubber behind them (the rest is
/// pocket mouth).
#[derive(Debug, Clone, PartialEq)]
pub struct Cushion {
    pub side: CushionSide,
    /// x for left/right cushions, y for top/bottom cushions.
    pub line: f32,
    /// Unit normal pointing into the playing surface.
    pub normal: Vec2,
    /// Rubber segments along the cushion axis, as (start, end).
    pub spans: Vec<(f32, f32)>,
}

impl Cushion {
    /// Reflect a point across the rebound line.
    #[inline]
    pub fn mirror(&self, p: Vec2) -> Vec2 {
        if self.side.is_horizontal() {
            Vec2::new(p.x, 2.0 * self.line - p.y)
        } else {
            Vec2::new(2.0 * self.line - p.x, p.y)
        }
    }

    /// Coordinate of `p` along the cushion axis.
    #[inline]
    pub fn axial(&self, p: Vec2) -> f32 {
        if self.side.is_horizontal() {
            p.x
        } else {
            p.y
        }
    }

    /// Whether an axial coordinate lies on rubber rather than a pocket mouth.
    pub fn covers(&self, axial: f32) -> bool {
        self.spans.iter().any(|&(lo, hi)| axial >= lo && axial <= hi)
    }

    /// Where the segment `from -> to` crosses the rebound line, if it does so
    /// within the segment. Parallel segments have no crossing.
    pub fn crossing(&self, from: Vec2, to: Vec2) -> Option<Vec2> {
        let (a, b) = if self.side.is_horizontal() {
            (from.y, to.y)
        } else {
            (from.x, to.x)
        };
        let denom = b - a;
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (self.line - a) / denom;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }
        Some(from + (to - from) * t)
    }
}

/// Immutable table geometry.
#[derive(Debug, Clone)]
pub struct Table {
    width: f32,
    height: f32,
    edge_width: f32,
    pocket_radius: f32,
    ball_radius: f32,
    pockets: [Pocket; 6],
    cushions: [Cushion; 4],
    head_string_x: f32,
    foot_spot: Vec2,
    head_spot: Vec2,
}

impl Table {
    pub fn new(config: &TableConfig) -> Self {
        let w = config.width;
        let h = config.height;
        let e = config.edge_width;
        let pr = config.pocket_radius;
        let r = config.ball_radius;

        // Corner pockets sit diagonally inside the rail corner.
        let inset = pr / SQRT_2;
        let corner = pr + config.corner_capture_margin;
        let side = pr + config.side_capture_margin;
        let pockets = [
            Pocket { center: Vec2::new(e + inset, e + inset), capture_radius: corner, kind: PocketKind::Corner },
            Pocket { center: Vec2::new(w - e - inset, e + inset), capture_radius: corner, kind: PocketKind::Corner },
            Pocket { center: Vec2::new(e + inset, h - e - inset), capture_radius: corner, kind: PocketKind::Corner },
            Pocket { center: Vec2::new(w - e - inset, h - e - inset), capture_radius: corner, kind: PocketKind::Corner },
            Pocket { center: Vec2::new(w / 2.0, e), capture_radius: side, kind: PocketKind::Side },
            Pocket { center: Vec2::new(w / 2.0, h - e), capture_radius: side, kind: PocketKind::Side },
        ];

        let corner_jaw = e + 2.0 * inset;
        let long_spans = vec![(corner_jaw, w / 2.0 - pr), (w / 2.0 + pr, w - corner_jaw)];
        let short_spans = vec![(corner_jaw, h - corner_jaw)];
        let cushions = [
            Cushion { side: CushionSide::Top, line: e + r, normal: Vec2::Y, spans: long_spans.clone() },
            Cushion { side: CushionSide::Bottom, line: h - e - r, normal: -Vec2::Y, spans: long_spans },
            Cushion { side: CushionSide::Left, line: e + r, normal: Vec2::X, spans: short_spans.clone() },
            Cushion { side: CushionSide::Right, line: w - e - r, normal: -Vec2::X, spans: short_spans },
        ];

        // The head string and foot spot sit a quarter of the surface in from each end.
        let quarter = (w - 2.0 * e - 2.0 * pr) / 8.0 * 2.0;
        let head_string_x = e + quarter;

        Self {
            width: w,
            height: h,
            edge_width: e,
            pocket_radius: pr,
            ball_radius: r,
            pockets,
            cushions,
            head_string_x,
            foot_spot: Vec2::new(w - e - quarter, h / 2.0),
            head_spot: Vec2::new(head_string_x, h / 2.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn edge_width(&self) -> f32 {
        self.edge_width
    }

    pub fn pocket_radius(&self) -> f32 {
        self.pocket_radius
    }

    pub fn ball_radius(&self) -> f32 {
        self.ball_radius
    }

    pub fn pockets(&self) -> &[Pocket; 6] {
        &self.pockets
    }

    pub fn pocket_centers(&self) -> [Vec2; 6] {
        self.pockets.map(|p| p.center)
    }

    pub fn cushions(&self) -> &[Cushion; 4] {
        &self.cushions
    }

    pub fn head_string_x(&self) -> f32 {
        self.head_string_x
    }

    pub fn foot_spot(&self) -> Vec2 {
        self.foot_spot
    }

    pub fn head_spot(&self) -> Vec2 {
        self.head_spot
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Lowest legal ball-centre coordinate on both axes.
    pub fn min_center(&self) -> Vec2 {
        Vec2::splat(self.edge_width + self.ball_radius)
    }

    /// Highest legal ball-centre coordinate on both axes.
    pub fn max_center(&self) -> Vec2 {
        Vec2::new(
            self.width - self.edge_width - self.ball_radius,
            self.height - self.edge_width - self.ball_radius,
        )
    }

    /// Whether a ball centre at `pos` is on the playing surface.
    pub fn contains(&self, pos: Vec2) -> bool {
        let lo = self.min_center();
        let hi = self.max_center();
        pos.x >= lo.x && pos.x <= hi.x && pos.y >= lo.y && pos.y <= hi.y
    }

    /// Clamp a ball centre onto the playing surface.
    pub fn clamp_to_surface(&self, pos: Vec2) -> Vec2 {
        pos.clamp(self.min_center(), self.max_center())
    }

    /// Behind the head string.
    pub fn in_kitchen(&self, pos: Vec2) -> bool {
        pos.x <= self.head_string_x
    }

    /// Index of the pocket capturing a ball centre at `pos`.
    pub fn pocket_at(&self, pos: Vec2) -> Option<usize> {
        self.pockets.iter().position(|p| p.captures(pos))
    }

    /// Validate a cue-ball drop against the surface, the kitchen (before the
    /// break), the pockets and every other ball in play.
    pub fn check_cue_position<I>(&self, pos: Vec2, others: I, kitchen_only: bool) -> Result<(), PlacementError>
    where
        I: IntoIterator<Item = (u8, Vec2)>,
    {
        if !pos.is_finite() || !self.contains(pos) {
            return Err(PlacementError::OutOfBounds { x: pos.x, y: pos.y });
        }
        if kitchen_only && !self.in_kitchen(pos) {
            return Err(PlacementError::OutsideKitchen);
        }
        if self.pocket_at(pos).is_some() {
            return Err(PlacementError::InPocket);
        }
        let min_dist = 2.0 * self.ball_radius;
        for (number, other) in others {
            if pos.distance(other) < min_dist {
                return Err(PlacementError::OverlapsBall { number });
            }
        }
        Ok(())
    }

    /// Boolean form of [`Table::check_cue_position`].
    pub fn is_valid_cue_position<I>(&self, pos: Vec2, others: I, kitchen_only: bool) -> bool
    where
        I: IntoIterator<Item = (u8, Vec2)>,
    {
        self.check_cue_position(pos, others, kitchen_only).is_ok()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new(&TableConfig::default())
    }
}
