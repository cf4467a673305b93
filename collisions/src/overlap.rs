use crate::axes;
use crate::shape::{Shape, ShapeKind};
use crate::vector::Projection;
use nalgebra::Vector2;

fn overlapping(_axis: Vector2<f32>, a: Projection, b: Projection) -> bool {
    a.overlaps(&b)
}

pub(crate) fn overlap_shapes(a: &Shape, b: &Shape) -> bool {
    use ShapeKind::*;

    let offset = b.position() - a.position();
    match (a.kind(), b.kind()) {
        (Circle { radius: ra }, Circle { radius: rb }) => {
            let radii = ra + rb;
            offset.norm_squared() < radii * radii
        }
        (
            Circle { radius },
            Rectangle {
                half_width,
                half_height,
            },
        ) => {
            let half = Vector2::new(*half_width, *half_height);
            axes::circle_rectangle(*radius, half, offset, overlapping)
        }
        (
            Rectangle {
                half_width,
                half_height,
            },
            Circle { radius },
        ) => {
            let half = Vector2::new(*half_width, *half_height);
            axes::circle_rectangle(*radius, half, -offset, overlapping)
        }
        (Circle { radius }, Polygon(polygon)) => {
            axes::circle_polygon(*radius, polygon, offset, overlapping)
        }
        (Polygon(polygon), Circle { radius }) => {
            axes::circle_polygon(*radius, polygon, -offset, overlapping)
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
            axes::rectangle_rectangle(a_half, b_half, offset, overlapping)
        }
        (
            Rectangle {
                half_width,
                half_height,
            },
            Polygon(polygon),
        ) => {
            let half = Vector2::new(*half_width, *half_height);
            axes::rectangle_polygon(half, polygon, offset, overlapping)
        }
        (
            Polygon(polygon),
            Rectangle {
                half_width,
                half_height,
            },
        ) => {
            let half = Vector2::new(*half_width, *half_height);
            axes::rectangle_polygon(half, polygon, -offset, overlapping)
        }
        (Polygon(pa), Polygon(pb)) => axes::polygon_polygon(pa, pb, offset, overlapping),
    }
}
