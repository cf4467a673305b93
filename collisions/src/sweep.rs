use crate::axes;
use crate::collision::Collision;
use crate::collision_data::CollisionData;
use crate::polygon::Polygon;
use crate::shape::{Shape, ShapeKind};
use crate::vector::{dist_to_line_squared, Projection};
use nalgebra::Vector2;

/// Folds each visited axis into `data` using the relative velocity of the
/// frame's reference shape.
fn sweep_with(
    data: &mut CollisionData,
    velocity: Vector2<f32>,
) -> impl FnMut(Vector2<f32>, Projection, Projection) -> bool + '_ {
    move |axis, a, b| data.sweep_axis(axis, a, b, velocity.dot(&axis))
}

pub(crate) fn collide_shapes(
    a: &Shape,
    b: &Shape,
    max_time: f32,
    data: &mut CollisionData,
    result: &mut Collision,
) {
    use ShapeKind::*;

    data.clear();
    let offset = b.position() - a.position();
    let velocity = a.velocity() - b.velocity();
    // mirrored pairs run in b's frame and flip the normal afterwards
    let flipped = match (a.kind(), b.kind()) {
        (Circle { radius: ra }, Circle { radius: rb }) => {
            circle_circle(a, *ra, b, *rb, max_time, result);
            return;
        }
        (
            Circle { radius },
            Rectangle {
                half_width,
                half_height,
            },
        ) => {
            let half = Vector2::new(*half_width, *half_height);
            circle_rectangle(*radius, half, offset, velocity, max_time, data, result);
            false
        }
        (
            Rectangle {
                half_width,
                half_height,
            },
            Circle { radius },
        ) => {
            let half = Vector2::new(*half_width, *half_height);
            circle_rectangle(*radius, half, -offset, -velocity, max_time, data, result);
            true
        }
        (Circle { radius }, Polygon(polygon)) => {
            circle_polygon(*radius, polygon, offset, velocity, max_time, data, result);
            false
        }
        (Polygon(polygon), Circle { radius }) => {
            circle_polygon(*radius, polygon, -offset, -velocity, max_time, data, result);
            true
        }
        (
            Rectangle {
                half_width: aw,
                half_height: ah,
            },
            Rectangle {
                half_width: bw,
                half_height: bh,
            },
        ) => {
            let a_half = Vector2::new(*aw, *ah);
            let b_half = Vector2::new(*bw, *bh);
            axes::rectangle_rectangle(a_half, b_half, offset, sweep_with(data, velocity));
            data.resolve(max_time, result);
            false
        }
        (
            Rectangle {
                half_width,
                half_height,
            },
            Polygon(polygon),
        ) => {
            let half = Vector2::new(*half_width, *half_height);
            axes::rectangle_polygon(half, polygon, offset, sweep_with(data, velocity));
            data.resolve(max_time, result);
            false
        }
        (
            Polygon(polygon),
            Rectangle {
                half_width,
                half_height,
            },
        ) => {
            let half = Vector2::new(*half_width, *half_height);
            axes::rectangle_polygon(half, polygon, -offset, sweep_with(data, -velocity));
            data.resolve(max_time, result);
            true
        }
        (Polygon(pa), Polygon(pb)) => {
            axes::polygon_polygon(pa, pb, offset, sweep_with(data, velocity));
            data.resolve(max_time, result);
            false
        }
    };
    if flipped && result.is_collision() {
        result.flip();
    }
}

/// Disc at the origin against a rectangle centered at `offset`. `velocity`
/// is the disc's velocity relative to the rectangle.
fn circle_rectangle(
    radius: f32,
    half: Vector2<f32>,
    offset: Vector2<f32>,
    velocity: Vector2<f32>,
    max_time: f32,
    data: &mut CollisionData,
    result: &mut Collision,
) {
    axes::circle_rectangle(radius, half, offset, sweep_with(data, velocity));
    data.resolve(max_time, result);
    let corners = axes::rectangle_corners(half, Vector2::zeros());
    // normal i belongs to the edge ending at corner i
    let normals = [-Vector2::x(), -Vector2::y(), Vector2::x(), Vector2::y()];
    refine_vertex_contact(radius, &corners, &normals, -offset, velocity, max_time, result);
}

fn circle_polygon(
    radius: f32,
    polygon: &Polygon,
    offset: Vector2<f32>,
    velocity: Vector2<f32>,
    max_time: f32,
    data: &mut CollisionData,
    result: &mut Collision,
) {
    axes::circle_polygon(radius, polygon, offset, sweep_with(data, velocity));
    data.resolve(max_time, result);
    refine_vertex_contact(
        radius,
        polygon.points(),
        polygon.normals(),
        -offset,
        velocity,
        max_time,
        result,
    );
}

/// The vertex axes of a disc sweep are fixed at `t = 0`, so a disc sliding
/// past a corner can be reported touching it. When the disc's center at the
/// reported time lies in a vertex region rather than a face region, the
/// contact is replaced by the earliest exact vertex hit, or dropped.
///
/// `center` is the disc's center in the polygon's frame at `t = 0` and
/// `normals[i]` is the outward normal of the edge ending at `points[i]`.
fn refine_vertex_contact(
    radius: f32,
    points: &[Vector2<f32>],
    normals: &[Vector2<f32>],
    center: Vector2<f32>,
    velocity: Vector2<f32>,
    max_time: f32,
    result: &mut Collision,
) {
    let time = result.time_to_collision;
    if !result.is_collision() || time <= 0.0 {
        return;
    }
    let at = center + velocity * time;
    let mut face = 0;
    let mut separation = f32::MIN;
    for (i, normal) in normals.iter().enumerate() {
        let distance = normal.dot(&(at - points[i]));
        if distance > separation {
            separation = distance;
            face = i;
        }
    }
    if separation <= 0.0 {
        return;
    }
    let start = points[(face + points.len() - 1) % points.len()];
    let edge = points[face] - start;
    let along = edge.dot(&(at - start));
    if (0.0..=edge.norm_squared()).contains(&along) {
        return;
    }

    let mut earliest: Option<(f32, Vector2<f32>)> = None;
    for point in points {
        if let Some(hit) = vertex_hit_time(*point - center, velocity, radius, max_time) {
            if earliest.map_or(true, |(best, _)| hit < best) {
                earliest = Some((hit, *point));
            }
        }
    }
    match earliest {
        Some((hit, point)) => {
            let toward = point - (center + velocity * hit);
            let length = toward.norm();
            let normal = if length > 0.0 {
                toward / length
            } else {
                result.normal
            };
            result.set(hit, normal);
        }
        None => result.set_no_collision(),
    }
}

/// First time in `[0, max_time]` a disc centered at the origin and moving
/// with `velocity` reaches the point `vertex`.
fn vertex_hit_time(
    vertex: Vector2<f32>,
    velocity: Vector2<f32>,
    radius: f32,
    max_time: f32,
) -> Option<f32> {
    let c = vertex.norm_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let a = velocity.norm_squared();
    let half_b = velocity.dot(&vertex);
    if a == 0.0 || half_b <= 0.0 {
        return None;
    }
    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let time = (half_b - discriminant.sqrt()) / a;
    (time <= max_time).then_some(time.max(0.0))
}

/// Closed-form sweep of two discs.
///
/// Concentric discs never approach each other and report no collision.
fn circle_circle(
    a: &Shape,
    radius_a: f32,
    b: &Shape,
    radius_b: f32,
    max_time: f32,
    result: &mut Collision,
) {
    let velocity = b.velocity() - a.velocity();
    if velocity.x == 0.0 && velocity.y == 0.0 {
        result.set_no_collision();
        return;
    }
    let radii = radius_a + radius_b;
    let radii_squared = radii * radii;
    let line_distance_squared =
        dist_to_line_squared(a.position(), b.position(), b.position() + velocity);
    if line_distance_squared > radii_squared {
        result.set_no_collision();
        return;
    }
    let delta = a.position() - b.position();
    let distance = delta.norm();
    if distance == 0.0 || velocity.dot(&delta) <= 0.0 {
        result.set_no_collision();
        return;
    }
    if distance < radii {
        result.set(0.0, -delta / distance);
        return;
    }
    let speed = velocity.norm();
    let direction = velocity / speed;
    let travel = delta.dot(&direction) - (radii_squared - line_distance_squared).sqrt();
    let time = (travel / speed).max(0.0);
    if time > max_time {
        result.set_no_collision();
        return;
    }
    let contact = -delta + velocity * time;
    let length = contact.norm();
    let normal = if length > 0.0 {
        contact / length
    } else {
        -delta / distance
    };
    result.set(time, normal);
}
