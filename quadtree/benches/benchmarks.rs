use collisions::Shape;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use quadtree::{
    Body, CollisionDetector, CollisionGroups, EntityCollision, EntityId, Outcome, SpatialTree,
};
use rand::prelude::*;

fn random_body(rng: &mut StdRng, extent: f32) -> Body {
    let shape = if rng.gen_bool(0.5) {
        Shape::circle(rng.gen_range(0.5..2.0))
    } else {
        Shape::rectangle(rng.gen_range(0.5..2.0), rng.gen_range(0.5..2.0))
    };
    let shape = match shape {
        Ok(shape) => shape,
        Err(err) => panic!("bad benchmark shape: {}", err),
    };
    Body::new(shape)
        .with_position(
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
        )
        .with_velocity(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0))
}

fn populated_tree(count: usize, rng: &mut StdRng) -> (SpatialTree<Body>, Vec<EntityId>) {
    let mut tree = SpatialTree::new(0.0, 0.0, 500.0).unwrap();
    let ids = (0..count)
        .map(|_| tree.add_entity(random_body(rng, 500.0)).unwrap())
        .collect();
    (tree, ids)
}

fn insert_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let mut tree = SpatialTree::new(0.0, 0.0, 500.0).unwrap();

    c.bench_function("tree_insert", |b| {
        b.iter(|| {
            let body = random_body(&mut rng, 500.0);
            black_box(tree.add_entity(body).unwrap());
        })
    });
}

fn remove_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);

    c.bench_function("tree_remove", |b| {
        b.iter_batched(
            || populated_tree(1000, &mut StdRng::seed_from_u64(3)),
            |(mut tree, ids)| {
                let index = rng.gen_range(0..ids.len());
                black_box(tree.remove_entity(ids[index]));
            },
            BatchSize::LargeInput,
        )
    });
}

fn ensure_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(4);
    let (mut tree, _) = populated_tree(5000, &mut rng);

    c.bench_function("tree_ensure_contained", |b| {
        b.iter(|| {
            tree.update_entity_positions(0.016);
            tree.ensure_entities_are_contained(black_box(0.016)).unwrap();
        })
    });
}

fn calc_collision_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(5);
    let (mut tree, _) = populated_tree(5000, &mut rng);
    let groups = CollisionGroups::all();
    tree.ensure_entities_are_contained(1.0).unwrap();

    c.bench_function("tree_calc_collision", |b| {
        b.iter(|| black_box(tree.calc_collision(&groups, black_box(1.0))))
    });
}

fn detector_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(6);
    let mut detector = CollisionDetector::new(0.0, 0.0, 500.0).unwrap();
    detector.groups_mut().set_collision_group(0, 0);
    for _ in 0..2000 {
        detector.add_entity(random_body(&mut rng, 500.0)).unwrap();
    }
    let mut bounce = |collision: &EntityCollision, a: &mut Body, b: &mut Body| {
        use quadtree::Entity;
        let normal = collision.normal();
        let va = a.velocity();
        let vb = b.velocity();
        a.set_velocity(va - normal * 2.0 * va.dot(&normal));
        b.set_velocity(vb - normal * 2.0 * vb.dot(&normal));
        Outcome::Keep
    };

    c.bench_function("detector_update", |b| {
        b.iter(|| black_box(detector.update(black_box(0.016), &mut bounce).unwrap()))
    });
}

criterion_group!(
    benches,
    insert_benchmark,
    remove_benchmark,
    ensure_benchmark,
    calc_collision_benchmark,
    detector_benchmark
);
criterion_main!(benches);
