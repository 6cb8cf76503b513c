use std::f32::consts::TAU;

use fish_hunt_core::{FishId, FormationShape, GroupId, Point, Velocity};

const ANCHOR_SPEED: f32 = 0.5;
const CIRCLE_RADIUS: f32 = 50.0;
const LINE_SPACING: f32 = 40.0;
const VEE_SPREAD: f32 = 30.0;
const VEE_DEPTH: f32 = 20.0;
/// Members closer than this to their slot keep their current velocity.
pub(crate) const SLOT_TOLERANCE: f32 = 5.0;

/// Fish travelling together around a moving anchor.
#[derive(Clone, Debug)]
pub(crate) struct Formation {
    pub(crate) id: GroupId,
    pub(crate) shape: FormationShape,
    pub(crate) anchor: Point,
    velocity: Velocity,
    pub(crate) members: Vec<(FishId, Point)>,
}

impl Formation {
    pub(crate) fn new(id: GroupId, shape: FormationShape, anchor: Point, heading: f32) -> Self {
        Self {
            id,
            shape,
            anchor,
            velocity: Velocity::from_polar(heading, ANCHOR_SPEED),
            members: Vec::new(),
        }
    }

    pub(crate) fn advance(&mut self) {
        self.anchor = self.anchor.translate(self.velocity);
    }

    pub(crate) fn slot(&self, offset: Point) -> Point {
        Point::new(self.anchor.x + offset.x, self.anchor.y + offset.y)
    }
}

/// Offsets of each member relative to the anchor.
pub(crate) fn offsets(shape: FormationShape, count: usize) -> Vec<Point> {
    let half = count as f32 / 2.0;
    (0..count)
        .map(|index| match shape {
            FormationShape::Circle => {
                Point::new(0.0, 0.0).offset(TAU / count as f32 * index as f32, CIRCLE_RADIUS)
            }
            FormationShape::Line => Point::new(
                index as f32 * LINE_SPACING - (count as f32 - 1.0) * LINE_SPACING / 2.0,
                0.0,
            ),
            FormationShape::Vee => {
                let (side, rank) = if (index as f32) < half {
                    (-1.0, index as f32)
                } else {
                    (1.0, (index - count / 2) as f32)
                };
                Point::new(side * rank * VEE_SPREAD, rank.abs() * VEE_DEPTH)
            }
        })
        .collect()
}
