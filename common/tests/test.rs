use common::bounds::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_new_and_getters() {
    let bounds = BoundingBox::from_center_half_extents(2.0, 3.0, 2.0, 3.0);
    assert_eq!(bounds.width(), 4.0);
    assert_eq!(bounds.height(), 6.0);
    assert_eq!(bounds.min_x, 0.0);
    assert_eq!(bounds.max_x, 4.0);
    assert_eq!(bounds.min_y, 0.0);
    assert_eq!(bounds.max_y, 6.0);
    assert_eq!(bounds.center(), (2.0, 3.0));
}

#[test]
fn test_square() {
    let bounds = BoundingBox::square(10.0, -10.0, 5.0);
    assert_eq!(bounds, BoundingBox::new(5.0, -15.0, 15.0, -5.0));
}

#[test]
fn test_contains_point() {
    let bounds = BoundingBox::new(0.0, 0.0, 4.0, 6.0);
    assert!(bounds.contains_point(2.0, 3.0));
    assert!(bounds.contains_point(4.0, 6.0));
    assert!(!bounds.contains_point(6.0, 3.0));
    assert!(!bounds.contains_point(2.0, 8.0));
}

#[test]
fn test_contains_edges() {
    let outer = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let touching = BoundingBox::new(0.0, 2.0, 5.0, 5.0);
    let inside = BoundingBox::new(1.0, 1.0, 9.0, 9.0);
    assert!(outer.contains(&touching));
    assert!(!outer.contains_strictly(&touching));
    assert!(outer.contains(&inside));
    assert!(outer.contains_strictly(&inside));
    assert!(!outer.contains(&BoundingBox::new(-1.0, 0.0, 5.0, 5.0)));
}

#[test]
fn test_intersects() {
    let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.intersects(&BoundingBox::new(5.0, 5.0, 15.0, 15.0)));
    assert!(a.intersects(&BoundingBox::new(10.0, 0.0, 12.0, 2.0)));
    assert!(!a.intersects(&BoundingBox::new(10.5, 0.0, 12.0, 2.0)));
    assert!(!a.intersects(&BoundingBox::new(0.0, -3.0, 2.0, -0.1)));
}

#[test]
fn test_expand_to_include() {
    let mut bounds = BoundingBox::new(0.0, 0.0, 4.0, 6.0);
    bounds.expand_to_include(&BoundingBox::new(4.0, 4.0, 8.0, 6.0));
    assert_eq!(bounds.width(), 8.0);
    assert_eq!(bounds.height(), 6.0);
    assert_eq!(bounds.min_x, 0.0);
    assert_eq!(bounds.max_x, 8.0);
}

#[test]
fn test_empty_is_identity_for_union() {
    let bounds = BoundingBox::new(-1.0, -2.0, 3.0, 4.0);
    assert!(BoundingBox::empty().is_empty());
    assert_eq!(BoundingBox::empty().union(&bounds), bounds);
}

#[test]
fn test_translated() {
    let bounds = BoundingBox::new(0.0, 0.0, 1.0, 1.0).translated(2.0, -1.0);
    assert_eq!(bounds, BoundingBox::new(2.0, -1.0, 3.0, 0.0));
}

#[test]
fn test_is_finite() {
    assert!(BoundingBox::new(0.0, 0.0, 1.0, 1.0).is_finite());
    assert!(!BoundingBox::new(f32::NAN, 0.0, 1.0, 1.0).is_finite());
    assert!(!BoundingBox::new(0.0, 0.0, f32::INFINITY, 1.0).is_finite());
}

#[test]
fn test_random_point_inside_respects_margin() {
    let bounds = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..1000 {
        let (x, y) = bounds.random_point_inside(5.0, &mut rng);
        assert!((5.0..=95.0).contains(&x));
        assert!((5.0..=45.0).contains(&y));
    }
}

#[test]
fn test_random_point_inside_collapses_when_too_small() {
    let bounds = BoundingBox::new(0.0, 0.0, 4.0, 4.0);
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(bounds.random_point_inside(3.0, &mut rng), (3.0, 3.0));
}
