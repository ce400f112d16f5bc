use super::geometry::{self, Point};
use super::speed::{DialAction, FanSpeed};
use super::{RADIUS_OFFSET_INDICATOR, RADIUS_OFFSET_LABEL, RADIUS_SCALE};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Resolves display text for speeds and actions.
pub trait LabelSource {
    fn label_for(&self, speed: FanSpeed) -> &str;
    fn action_label(&self, action: DialAction) -> &str;
}

/// Persisted form of the dial. `host_state` is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_state: Option<serde_json::Value>,
}

impl Snapshot {
    pub fn speed(&self) -> Option<FanSpeed> {
        self.speed.as_deref().and_then(|s| s.parse().ok())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchAction {
    pub should_redraw: bool,
    pub changed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Dial {
    pub speed: FanSpeed,
    pub radius: f64,
    pub width: i32,
    pub height: i32,
}

impl Dial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn center(&self) -> Point {
        Point::new((self.width / 2) as f64, (self.height / 2) as f64)
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
        self.radius = self.width.min(self.height) as f64 / 2.0 * RADIUS_SCALE;
        log::debug!(
            "dial resized to {}x{}, radius {}",
            self.width,
            self.height,
            self.radius
        );
    }

    /// Resizes only when the surface size differs. Returns whether anything changed.
    pub fn sync_size(&mut self, width: i32, height: i32) -> bool {
        if (self.width, self.height) == (width.max(0), height.max(0)) {
            return false;
        }
        self.resize(width, height);
        true
    }

    pub fn label_radius(&self) -> f64 {
        self.radius + RADIUS_OFFSET_LABEL
    }

    pub fn indicator_radius(&self) -> f64 {
        self.radius + RADIUS_OFFSET_INDICATOR
    }

    pub fn indicator_position(&self) -> Point {
        geometry::position_for(self.speed.ordinal(), self.indicator_radius(), self.center())
    }

    pub fn label_positions(&self) -> impl Iterator<Item = (FanSpeed, Point)> + '_ {
        FanSpeed::iter().map(|speed| {
            (
                speed,
                geometry::position_for(speed.ordinal(), self.label_radius(), self.center()),
            )
        })
    }

    pub fn touch_down(&mut self, touch: Point) -> TouchAction {
        // markers must reflect the current size before every hit test
        let markers = geometry::markers(self.radius, self.center());
        let slot = geometry::nearest_slot(touch, &markers);
        let speed = FanSpeed::from_ordinal(slot as i64);

        let changed = self.speed != speed;
        if changed {
            log::debug!("dial speed {} -> {}", self.speed, speed);
        }
        self.speed = speed;

        TouchAction {
            should_redraw: true,
            changed,
        }
    }

    pub fn advance(&mut self) -> FanSpeed {
        self.speed = self.speed.next();
        log::debug!("dial advanced to {}", self.speed);
        self.speed
    }

    pub fn next_action(&self) -> DialAction {
        self.speed.next_action()
    }

    pub fn description<'a>(&self, labels: &'a impl LabelSource) -> &'a str {
        labels.label_for(self.speed)
    }

    pub fn action_description<'a>(&self, labels: &'a impl LabelSource) -> &'a str {
        labels.action_label(self.next_action())
    }

    pub fn save(&self, host_state: Option<serde_json::Value>) -> Snapshot {
        Snapshot {
            speed: Some(self.speed.to_string()),
            host_state,
        }
    }

    /// Applies a saved snapshot, falling back to `Off` when it is absent or unreadable.
    pub fn restore(&mut self, snapshot: Option<&Snapshot>) {
        let restored = snapshot.and_then(Snapshot::speed);
        if restored.is_none()
            && let Some(name) = snapshot.and_then(|s| s.speed.as_deref())
        {
            log::warn!("Ignoring unknown saved speed '{}'", name);
        }
        self.speed = restored.unwrap_or_default();
    }
}
