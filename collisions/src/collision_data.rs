use crate::collision::{Collision, NO_COLLISION};
use crate::vector::{axis_precedes, Projection};
use nalgebra::Vector2;

const DEFAULT_ENTRY: f32 = -f32::MAX;

/// Scratch state for one swept separating-axis test.
///
/// Tracks the latest axis entry time, the earliest axis leave time and, for
/// shapes that already interpenetrate, the cheapest way out. Reused across
/// tests by calling [`CollisionData::clear`].
#[derive(Debug, Clone)]
pub struct CollisionData {
    entry_time: f32,
    leave_time: f32,
    collision_normal: Vector2<f32>,
    overlap_normal: Vector2<f32>,
    overlap_time: f32,
    overlap_velocity: f32,
}

impl Default for CollisionData {
    fn default() -> Self {
        Self {
            entry_time: DEFAULT_ENTRY,
            leave_time: NO_COLLISION,
            collision_normal: Vector2::zeros(),
            overlap_normal: Vector2::zeros(),
            overlap_time: NO_COLLISION,
            overlap_velocity: 0.0,
        }
    }
}

impl CollisionData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn entry_time(&self) -> f32 {
        self.entry_time
    }

    pub fn leave_time(&self) -> f32 {
        self.leave_time
    }

    pub fn collision_normal(&self) -> Vector2<f32> {
        self.collision_normal
    }

    pub fn overlap_normal(&self) -> Vector2<f32> {
        self.overlap_normal
    }

    pub fn overlap_velocity(&self) -> f32 {
        self.overlap_velocity
    }

    pub fn set_no_collision(&mut self) {
        self.entry_time = NO_COLLISION;
    }

    pub fn is_collision_not_possible(&self) -> bool {
        self.entry_time == NO_COLLISION
    }

    pub fn has_entry_time_been_updated(&self) -> bool {
        self.entry_time != DEFAULT_ENTRY
    }

    pub fn is_intersecting_and_approaching(&self) -> bool {
        !self.has_entry_time_been_updated() && self.overlap_velocity < 0.0
    }

    pub fn will_collision_happen(&self, max_time: f32) -> bool {
        self.has_entry_time_been_updated()
            && !self.is_collision_not_possible()
            && self.entry_time <= max_time
            && self.entry_time <= self.leave_time
    }

    /// Folds one candidate axis into the running entry/leave times.
    ///
    /// `a` and `b` are both shapes projected onto the unit `axis` in the same
    /// frame, `velocity` is the speed of `a` relative to `b` along the axis.
    /// Returns `false` once the pair can no longer meet, after which the
    /// remaining axes may be skipped.
    pub fn sweep_axis(
        &mut self,
        axis: Vector2<f32>,
        a: Projection,
        b: Projection,
        velocity: f32,
    ) -> bool {
        if self.is_collision_not_possible() {
            return false;
        }
        if a.max <= b.min {
            if velocity <= 0.0 {
                self.set_no_collision();
                return false;
            }
            self.update_entry_time((b.min - a.max) / velocity, axis);
        } else if a.min >= b.max {
            if velocity >= 0.0 {
                self.set_no_collision();
                return false;
            }
            self.update_entry_time((b.max - a.min) / velocity, -axis);
        } else {
            // a can leave through either side of b
            self.update_overlap(a.max - b.min, -velocity, axis);
            self.update_overlap(b.max - a.min, velocity, -axis);
        }
        if velocity > 0.0 {
            self.update_leave_time((b.max - a.min) / velocity);
        } else if velocity < 0.0 {
            self.update_leave_time((b.min - a.max) / velocity);
        }
        true
    }

    /// Writes the verdict of every axis folded so far into `result`.
    pub fn resolve(&self, max_time: f32, result: &mut Collision) {
        if self.is_collision_not_possible() {
            result.set_no_collision();
        } else if !self.has_entry_time_been_updated() {
            if self.overlap_velocity < 0.0 {
                result.set(0.0, self.overlap_normal);
            } else {
                result.set_no_collision();
            }
        } else if self.will_collision_happen(max_time) {
            result.set(self.entry_time, self.collision_normal);
        } else {
            result.set_no_collision();
        }
    }

    fn update_entry_time(&mut self, time: f32, normal: Vector2<f32>) {
        if time > self.entry_time
            || (time == self.entry_time && axis_precedes(normal, self.collision_normal))
        {
            self.entry_time = time;
            self.collision_normal = normal;
        }
    }

    fn update_leave_time(&mut self, time: f32) {
        if time < self.leave_time {
            self.leave_time = time;
        }
    }

    fn update_overlap(&mut self, penetration: f32, velocity: f32, normal: Vector2<f32>) {
        if penetration <= 0.0 || velocity == 0.0 {
            return;
        }
        let time = penetration / velocity.abs();
        let better = time < self.overlap_time
            || (time == self.overlap_time
                && (velocity < self.overlap_velocity
                    || (velocity == self.overlap_velocity
                        && axis_precedes(normal, self.overlap_normal))));
        if better {
            self.overlap_time = time;
            self.overlap_velocity = velocity;
            self.overlap_normal = normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_gap_sets_entry() {
        let mut data = CollisionData::new();
        assert!(data.sweep_axis(
            Vector2::x(),
            Projection::new(-1.0, 1.0),
            Projection::new(5.0, 7.0),
            2.0
        ));
        assert_eq!(data.entry_time(), 2.0);
        assert_eq!(data.leave_time(), 4.0);
        assert_eq!(data.collision_normal(), Vector2::x());
    }

    #[test]
    fn opening_gap_short_circuits() {
        let mut data = CollisionData::new();
        assert!(!data.sweep_axis(
            Vector2::y(),
            Projection::new(-1.0, 1.0),
            Projection::new(-7.0, -5.0),
            1.0
        ));
        assert!(data.is_collision_not_possible());
        assert!(!data.sweep_axis(
            Vector2::x(),
            Projection::new(-1.0, 1.0),
            Projection::new(-0.5, 0.5),
            1.0
        ));
    }

    #[test]
    fn zero_velocity_on_disjoint_axis_is_no_collision() {
        let mut data = CollisionData::new();
        assert!(!data.sweep_axis(
            Vector2::x(),
            Projection::new(0.0, 1.0),
            Projection::new(2.0, 3.0),
            0.0
        ));
    }

    #[test]
    fn overlap_without_entry_reports_time_zero_when_closing() {
        let mut data = CollisionData::new();
        data.sweep_axis(
            Vector2::x(),
            Projection::new(-1.0, 1.0),
            Projection::new(0.5, 2.5),
            1.0,
        );
        data.sweep_axis(
            Vector2::y(),
            Projection::new(-1.0, 1.0),
            Projection::new(-1.0, 1.0),
            0.0,
        );
        assert!(data.is_intersecting_and_approaching());
        let mut result = Collision::none();
        data.resolve(10.0, &mut result);
        assert_eq!(result.time_to_collision, 0.0);
        assert_eq!(result.normal, Vector2::x());
    }

    #[test]
    fn overlap_while_separating_is_no_collision() {
        let mut data = CollisionData::new();
        data.sweep_axis(
            Vector2::x(),
            Projection::new(-1.0, 1.0),
            Projection::new(0.5, 2.5),
            -1.0,
        );
        let mut result = Collision::none();
        data.resolve(10.0, &mut result);
        assert!(!result.is_collision());
    }

    #[test]
    fn entry_after_leave_is_no_collision() {
        let mut data = CollisionData::new();
        data.sweep_axis(
            Vector2::x(),
            Projection::new(-1.0, 1.0),
            Projection::new(5.0, 7.0),
            1.0,
        );
        // y overlap ends long before the x gap closes at t = 4
        data.sweep_axis(
            Vector2::y(),
            Projection::new(-1.0, 1.0),
            Projection::new(0.5, 2.5),
            -3.5,
        );
        let mut result = Collision::none();
        data.resolve(10.0, &mut result);
        assert!(!result.is_collision());
    }

    #[test]
    fn entry_beyond_max_time_is_no_collision() {
        let mut data = CollisionData::new();
        data.sweep_axis(
            Vector2::x(),
            Projection::new(-1.0, 1.0),
            Projection::new(5.0, 7.0),
            1.0,
        );
        let mut result = Collision::none();
        data.resolve(3.0, &mut result);
        assert!(!result.is_collision());
        data.resolve(4.0, &mut result);
        assert_eq!(result.time_to_collision, 4.0);
    }
}
