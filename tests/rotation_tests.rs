//! Rotation-model properties over seeded random shapes.

use confetti::{InsertMode, Polygon, Rectangle, Rgba, TrigTable, Vec2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

const CASES: usize = 200;

fn random_polygon(rng: &mut SmallRng) -> Polygon {
    let n = rng.gen_range(3..12);
    let origin = Vec2::new(rng.gen_range(0.0..700.0), rng.gen_range(0.0..460.0));
    let points = (0..n)
        .map(|_| origin + Vec2::new(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0)))
        .collect();
    Polygon::from_points(Rgba::WHITE, points)
}

fn random_angles(rng: &mut SmallRng) -> (f32, f32, f32) {
    (
        rng.gen_range(-TAU..TAU),
        rng.gen_range(-TAU..TAU),
        rng.gen_range(-TAU..TAU),
    )
}

/// Lookup-table quantisation bound for points up to `radius` from the pivot.
fn tolerance(radius: f32) -> f32 {
    3e-3 * (radius + 1.0)
}

#[test]
fn test_point_counts_always_match() {
    let table = TrigTable::default();
    let mut rng = SmallRng::seed_from_u64(1);
    for _ in 0..CASES {
        let mut poly = random_polygon(&mut rng);
        let (p, y, r) = random_angles(&mut rng);
        poly.rotate(&table, p, y, r);
        assert_eq!(poly.points_original().len(), poly.points_rotated().len());

        let point = Vec2::new(rng.gen_range(0.0..700.0), rng.gen_range(0.0..460.0));
        let mode = match rng.gen_range(0..3) {
            0 => InsertMode::Original,
            1 => InsertMode::Rotated,
            _ => InsertMode::Both,
        };
        poly.add_point(&table, point, mode);
        poly.update_rotation(&table);
        poly.translate(Vec2::new(1.0, -1.0));
        poly.set_rotation(&table, y, r, p);
        assert_eq!(poly.points_original().len(), poly.points_rotated().len());
    }
}

#[test]
fn test_zero_rotation_restores_originals() {
    let table = TrigTable::default();
    let mut rng = SmallRng::seed_from_u64(2);
    for _ in 0..CASES {
        let mut poly = random_polygon(&mut rng);
        for _ in 0..rng.gen_range(1..6) {
            let (p, y, r) = random_angles(&mut rng);
            poly.rotate(&table, p, y, r);
        }
        poly.set_rotation(&table, 0.0, 0.0, 0.0);
        assert_eq!(poly.points_original(), poly.points_rotated());
    }
}

#[test]
fn test_rotate_then_inverse_restores() {
    let table = TrigTable::default();
    let mut rng = SmallRng::seed_from_u64(3);
    for _ in 0..CASES {
        let mut poly = random_polygon(&mut rng);
        let before = poly.points_rotated().to_vec();
        let pivot = poly.center();
        let radius = poly.bounding_circle().radius();

        let (p, y, r) = random_angles(&mut rng);
        poly.rotate(&table, p, y, r);
        poly.rotate(&table, -p, -y, -r);

        assert_eq!(poly.center(), pivot);
        for (a, b) in before.iter().zip(poly.points_rotated()) {
            assert!((*a - *b).length() < tolerance(radius), "{:?} vs {:?}", a, b);
        }
    }
}

#[test]
fn test_bounding_circle_contains_all_points() {
    let table = TrigTable::default();
    let mut rng = SmallRng::seed_from_u64(4);
    for _ in 0..CASES {
        let mut poly = random_polygon(&mut rng);
        let (p, y, r) = random_angles(&mut rng);
        poly.set_rotation(&table, p, y, r);

        let circle = poly.bounding_circle();
        for point in poly.points_rotated() {
            let d = (*point - circle.center()).length();
            assert!(d <= circle.radius() * (1.0 + 1e-5) + 1e-4, "{} > {}", d, circle.radius());
        }
    }
}

#[test]
fn test_resize_round_trip() {
    let table = TrigTable::default();
    let mut rng = SmallRng::seed_from_u64(5);
    for _ in 0..CASES {
        let w = rng.gen_range(1.0..20.0);
        let h = rng.gen_range(1.0..20.0);
        let center = Vec2::new(rng.gen_range(0.0..700.0), rng.gen_range(0.0..460.0));
        let (p, y, r) = random_angles(&mut rng);
        let mut rect =
            Rectangle::centered(center, w, h, Rgba::WHITE).with_rotation(&table, p, y, r);
        let before = rect.clone();

        rect.resize(&table, rng.gen_range(1.0..40.0), rng.gen_range(1.0..40.0));
        rect.resize(&table, w, h);

        assert_eq!(rect.angles(), before.angles());
        assert!((rect.center() - before.center()).length() < 1e-3);
        assert!((rect.bounding_circle().radius() - before.bounding_circle().radius()).abs() < 1e-3);
        for (a, b) in rect
            .polygon()
            .points_rotated()
            .iter()
            .zip(before.polygon().points_rotated())
        {
            assert!((*a - *b).length() < 1e-3);
        }
    }
}

#[test]
fn test_angle_index_wraparound() {
    let table = TrigTable::default();
    let a = table.angle_to_index(-0.001);
    let b = table.angle_to_index(TAU - 0.001);
    assert!(a.abs_diff(b) <= 1);

    let mut rng = SmallRng::seed_from_u64(6);
    for _ in 0..CASES {
        let angle: f32 = rng.gen_range(0.0..TAU);
        let turns = rng.gen_range(-3..4) as f32;
        let i = table.angle_to_index(angle);
        let j = table.angle_to_index(angle + turns * TAU);
        // Near the seam an index can land on either end.
        let diff = i.abs_diff(j);
        assert!(diff <= 2 || diff >= table.len() - 3, "{} vs {}", i, j);
    }
}
