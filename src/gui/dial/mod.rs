use std::f64::consts::PI;

pub mod geometry;
pub mod model;
pub mod speed;
pub mod view;

pub use geometry::{Point, markers, nearest_slot, position_for};
pub use model::{Dial, LabelSource, Snapshot, TouchAction};
pub use speed::{DialAction, FanSpeed};
pub use view::{DialStyle, draw};

pub const SLOT_COUNT: usize = 4;
pub const START_ANGLE: f64 = PI * (9.0 / 8.0);
pub const ANGLE_STEP: f64 = PI / 2.0;
pub const RADIUS_SCALE: f64 = 0.8; // fraction of the half-extent used by the disc
pub const RADIUS_OFFSET_LABEL: f64 = 30.0;
pub const RADIUS_OFFSET_INDICATOR: f64 = -35.0;
pub const INDICATOR_RADIUS_DIVISOR: f64 = 12.0;
pub const DEFAULT_LABEL_FONT_SIZE: f64 = 55.0;
