use super::{ANGLE_STEP, SLOT_COUNT, START_ANGLE};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

pub fn slot_angle(slot: usize) -> f64 {
    START_ANGLE + (slot as f64 * ANGLE_STEP)
}

/// Screen position of `slot` on a circle of `radius` around `center`. The y axis grows downward.
pub fn position_for(slot: usize, radius: f64, center: Point) -> Point {
    let angle = slot_angle(slot);
    Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

pub fn markers(radius: f64, center: Point) -> [Point; SLOT_COUNT] {
    std::array::from_fn(|slot| position_for(slot, radius, center))
}

/// Index of the marker closest to `touch`. Ties resolve to the lowest index.
pub fn nearest_slot(touch: Point, markers: &[Point; SLOT_COUNT]) -> usize {
    markers
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(best, best_dist), (i, marker)| {
            let dist = touch.distance(*marker);
            if dist < best_dist {
                (i, dist)
            } else {
                (best, best_dist)
            }
        })
        .0
}
