use super::*;
use crate::geom::{all_collinear, convex_hull, orient2d};
use crate::sample::{draw_points, SampleCfg};
use proptest::prelude::*;

fn pts(coords: &[(f64, f64)]) -> PointSet {
    PointSet::from_xy(coords)
}

fn run(p: &PointSet) -> (TriangleMesh, TriangulationStats) {
    Triangulator::default().triangulate_with_stats(p).unwrap()
}

/// Indices in range and distinct, every triangle strictly CCW (exact sign),
/// no directed edge used twice, Delaunay, union equals the convex hull.
fn assert_valid(p: &PointSet, mesh: &TriangleMesh) {
    let cfg = GeomCfg::default();
    for t in mesh {
        assert!(t.indices().iter().all(|&i| i < p.len()), "{t:?} out of range");
        assert_eq!(t.repeated_index(), None);
        let [a, b, c] = t.indices();
        assert!(orient2d(p[a], p[b], p[c]) > 0.0, "{t:?} not CCW");
    }
    assert_eq!(repeated_edges(mesh), vec![], "overlapping triangles in {mesh:?}");
    assert!(is_delaunay(p, mesh, cfg), "{:?}", delaunay_violations(p, mesh, cfg));
    assert!(covers_convex_hull(p, mesh, cfg), "{mesh:?} does not cover the hull");
}

#[test]
fn fewer_than_three_points_is_empty() {
    assert!(triangulate(&PointSet::default()).unwrap().is_empty());
    assert!(triangulate(&pts(&[(1.0, 2.0)])).unwrap().is_empty());
    assert!(triangulate(&pts(&[(0.0, 0.0), (1.0, 1.0)])).unwrap().is_empty());
}

#[test]
fn three_points_make_one_ccw_triangle() {
    let p = pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    assert_eq!(triangulate(&p).unwrap().triangles, vec![Triangle::new(0, 1, 2)]);
    // clockwise input comes back reoriented
    let p = pts(&[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)]);
    assert_eq!(triangulate(&p).unwrap().triangles, vec![Triangle::new(0, 2, 1)]);
}

#[test]
fn collinear_inputs_are_empty() {
    let three = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
    assert!(triangulate(&three).unwrap().is_empty());
    let four = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
    assert!(triangulate(&four).unwrap().is_empty());
    let same = pts(&[(2.0, 3.0); 5]);
    assert!(triangulate(&same).unwrap().is_empty());
}

#[test]
fn convex_pentagon_has_three_triangles() {
    let p = pts(&[(0.0, 0.0), (2.0, 0.0), (3.0, 1.5), (1.0, 3.0), (-1.0, 1.5)]);
    let mesh = triangulate(&p).unwrap();
    assert_eq!(mesh.len(), 3);
    assert_valid(&p, &mesh);
    assert!((mesh_area(&p, &mesh) - 7.5).abs() < 1e-12);
}

#[test]
fn regular_pentagon_is_cocircular_but_complete() {
    let coords: Vec<(f64, f64)> = (0..5)
        .map(|k| {
            let th = 2.0 * std::f64::consts::PI * f64::from(k) / 5.0;
            (th.cos(), th.sin())
        })
        .collect();
    let p = pts(&coords);
    let mesh = triangulate(&p).unwrap();
    assert_eq!(mesh.len(), 3);
    assert_valid(&p, &mesh);
}

#[test]
fn square_tie_breaks_by_insertion_order() {
    let p = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let mesh = triangulate(&p).unwrap();
    assert_eq!(
        mesh.canonicalized().triangles,
        vec![Triangle::new(0, 1, 2), Triangle::new(0, 2, 3)]
    );
}

#[test]
fn square_with_centre_fans_out() {
    let p = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.5, 0.5)]);
    let (mesh, stats) = run(&p);
    assert_eq!(mesh.len(), 4);
    assert!(mesh.iter().all(|t| t.contains(4)));
    assert_valid(&p, &mesh);
    assert_eq!(stats.inserted, 5);
    assert_eq!(stats.ghosts_removed, 4);
    assert_eq!(stats.degenerate_removed, 0);
    // (0,1) replaces one ghost with three triangles; the centre splits both
    // square halves into four
    assert_eq!(stats.created, 7);
    assert_eq!(stats.largest_cavity, 2);
}

#[test]
fn arrow_shape_triangulates_its_hull() {
    // concave quadrilateral; the notch vertex lies inside the hull triangle
    let p = pts(&[(0.0, 1.0), (1.0, 0.0), (2.0, 1.0), (1.0, 0.5)]);
    let mesh = triangulate(&p).unwrap();
    assert_eq!(mesh.len(), 3);
    assert!(mesh.iter().all(|t| t.contains(3)));
    assert_valid(&p, &mesh);
}

#[test]
fn small_sets_in_any_order() {
    for (coords, expected) in [
        (vec![(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)], 2),
        (vec![(-5.0, -5.0), (5.0, -5.0), (5.0, 5.0), (-5.0, 5.0), (0.0, 0.0)], 4),
        (
            vec![
                (0.123456789, 0.987654321),
                (1.111111111, 0.222222222),
                (0.333333333, 1.444444444),
            ],
            1,
        ),
    ] {
        let p = pts(&coords);
        let mesh = triangulate(&p).unwrap();
        assert_eq!(mesh.len(), expected, "{coords:?}");
        assert_valid(&p, &mesh);
    }
}

#[test]
fn duplicates_are_skipped() {
    let p = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    let (mesh, stats) = run(&p);
    assert_eq!(mesh.triangles, vec![Triangle::new(0, 1, 3)]);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.inserted, 3);

    // duplicate of the first point, before the seed triple is complete
    let p = pts(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let (mesh, stats) = run(&p);
    assert_eq!(mesh.len(), 2);
    assert!(mesh.iter().all(|t| !t.contains(1)));
    assert_eq!(stats.duplicates, 1);
    assert_valid(&p, &mesh);
}

#[test]
fn near_duplicate_within_tolerance_is_skipped() {
    let p = pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0 + 1e-12, 0.0)]);
    let (mesh, stats) = run(&p);
    assert_eq!(mesh.len(), 1);
    assert_eq!(stats.duplicates, 1);
}

#[test]
fn near_duplicate_second_point_gives_an_empty_mesh() {
    // merged with the first point, leaving two distinct points
    let p = pts(&[(1.0, 1.0), (1.0, 1.0 + 1e-12), (3.0, 2.0)]);
    let (mesh, stats) = run(&p);
    assert!(mesh.is_empty());
    assert_eq!(stats.duplicates, 1);
    assert!(all_collinear(&p.points, GeomCfg::default()));

    let p = pts(&[(1.0, 1.0), (1.0, 1.0 + 1e-12), (3.0, 2.0), (0.0, 4.0)]);
    let (mesh, stats) = run(&p);
    assert_eq!(mesh.triangles, vec![Triangle::new(0, 2, 3)]);
    assert_eq!(stats.duplicates, 1);
}

#[test]
fn nearly_collinear_points_do_not_overlap() {
    for p in [
        pts(&[
            (2.0000000024, 6.44e-9),
            (4.0000000051, 2.27e-10),
            (0.9999999986, -1.38e-9),
            (0.9999999926, -1.85e-9),
        ]),
        pts(&[(1.0, 1.0), (2.0, 3.0), (1.0 + 8e-9, 1.0), (2.0, 1.0)]),
    ] {
        let (mesh, stats) = run(&p);
        assert_eq!(mesh.len(), 2, "{p:?}");
        assert_eq!(stats.duplicates, 0);
        assert_valid(&p, &mesh);
    }
}

#[test]
fn near_vertical_hull_run_is_covered() {
    let p = pts(&[
        (4.00000000002, 2.99999999990),
        (4.00000000002, 1.00000000002),
        (3.99999999991, 2.3e-11),
        (0.99999999994, 1.99999999996),
    ]);
    let mesh = triangulate(&p).unwrap();
    assert_eq!(mesh.len(), 2);
    assert!((mesh_area(&p, &mesh) - 4.5).abs() < 1e-9);
    assert_valid(&p, &mesh);
}

#[test]
fn collinear_prefix_then_apex() {
    let p = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (1.5, 1.0)]);
    let mesh = triangulate(&p).unwrap();
    assert_eq!(mesh.len(), 3);
    assert_valid(&p, &mesh);
}

#[test]
fn points_outside_the_current_hull() {
    let p = pts(&[
        (0.0, 0.0),
        (1.0, 0.0),
        (0.0, 1.0),
        (5.0, 5.0),
        (-3.0, 2.0),
        (2.0, -4.0),
        (0.3, 0.3),
    ]);
    let mesh = triangulate(&p).unwrap();
    assert_eq!(mesh.len(), 9);
    assert_valid(&p, &mesh);
}

#[test]
fn scale_and_offset_do_not_matter() {
    for p in [
        pts(&[(1e6, 1e6), (1e6 + 1.0, 1e6), (1e6, 1e6 + 1.0)]),
        pts(&[(0.0, 0.0), (1e-10, 0.0), (0.0, 1e-10)]),
        pts(&[(-1.0, -1.0), (-3.0, -1.0), (-2.0, -4.0)]),
        pts(&[(0.0, 0.0), (1.0, 0.0), (0.5, 1e-3)]),
        pts(&[(0.0, 0.0), (1.0, 0.0), (0.5, 1e-7)]),
        pts(&[(1e6, 1e6), (1e6 + 1e-3, 1e6), (1e6, 1e6 + 1e-3)]),
        pts(&[(-1e6, 1e6), (-1e6 + 1e-6, 1e6), (-1e6, 1e6 + 1e-6)]),
    ] {
        let (mesh, stats) = run(&p);
        assert_eq!(mesh.len(), 1, "{p:?}");
        assert_eq!(stats.duplicates, 0, "{p:?}");
        assert_valid(&p, &mesh);
    }
}

#[test]
fn small_spacing_far_from_origin() {
    let coords: Vec<(f64, f64)> = (0..4)
        .flat_map(|i| (0..4).map(move |j| (1e6 + f64::from(i) * 1e-3, 1e6 + f64::from(j) * 1e-3)))
        .collect();
    let p = pts(&coords);
    let (mesh, stats) = run(&p);
    assert_eq!(stats.duplicates, 0);
    assert_eq!(mesh.len(), 18);
    assert!((mesh_area(&p, &mesh) - 9e-6).abs() < 1e-12);
    assert_valid(&p, &mesh);
}

#[test]
fn zigzag_with_collinear_hull_runs() {
    let coords: Vec<(f64, f64)> = (0..10).map(|i| (f64::from(i), f64::from(i % 3))).collect();
    let p = pts(&coords);
    let mesh = triangulate(&p).unwrap();
    assert_eq!(mesh.len(), 10);
    assert!((mesh_area(&p, &mesh) - 15.0).abs() < 1e-9);
    assert_valid(&p, &mesh);
}

#[test]
fn square_grid_is_fully_covered() {
    let coords: Vec<(f64, f64)> = (0..5)
        .flat_map(|i| (0..5).map(move |j| (f64::from(i), f64::from(j))))
        .collect();
    let p = pts(&coords);
    let (mesh, stats) = run(&p);
    assert_eq!(mesh.len(), 32);
    assert!((mesh_area(&p, &mesh) - 16.0).abs() < 1e-9);
    assert_eq!(stats.duplicates, 0);
    assert_valid(&p, &mesh);
}

#[test]
fn output_is_deterministic() {
    let p = draw_points(SampleCfg::uniform(300), 11);
    let a = triangulate(&p).unwrap();
    let b = triangulate(&p).unwrap();
    assert_eq!(a, b);
}

#[test]
fn random_cloud_is_a_full_delaunay_triangulation() {
    for seed in 0..4 {
        let p = draw_points(SampleCfg::uniform(400), seed);
        let mesh = triangulate(&p).unwrap();
        assert_valid(&p, &mesh);
        // Euler: a triangulation of n points with h hull vertices has 2n - h - 2 faces
        let h = convex_hull(&p.points).len();
        assert_eq!(mesh.len(), 2 * p.len() - h - 2, "seed {seed}");
    }
}

#[test]
fn general_position_result_ignores_input_order() {
    let p = draw_points(SampleCfg::uniform(120), 5);
    let n = p.len();
    let reversed = PointSet::new(p.points.iter().rev().copied().collect());
    let a = triangulate(&p).unwrap();
    let b = triangulate(&reversed).unwrap();
    let b_mapped = TriangleMesh::new(
        b.iter()
            .map(|t| {
                let [x, y, z] = t.indices();
                Triangle::new(n - 1 - x, n - 1 - y, n - 1 - z)
            })
            .collect(),
    );
    assert!(a.same_triangles(&b_mapped));
}

#[test]
fn lattice_clouds_with_heavy_degeneracy() {
    for seed in 0..6 {
        let p = draw_points(SampleCfg::lattice(150, 6), seed);
        let (mesh, stats) = run(&p);
        assert_valid(&p, &mesh);
        assert_eq!(stats.inserted + stats.duplicates, p.len());
        assert_eq!(stats.degenerate_removed, 0);
    }
}

#[test]
fn custom_tolerance_is_used() {
    // with a coarse tolerance the flat apex counts as collinear
    let p = pts(&[(0.0, 0.0), (1.0, 0.0), (0.5, 1e-3)]);
    let coarse = Triangulator::new(GeomCfg::with_eps(1e-2));
    assert!(coarse.triangulate(&p).unwrap().is_empty());
    assert_eq!(Triangulator::default().triangulate(&p).unwrap().len(), 1);
}

proptest! {
    #[test]
    fn prop_small_integer_sets_are_valid(
        coords in prop::collection::vec((0i32..6, 0i32..6), 0..40)
    ) {
        let p = PointSet::new(
            coords.iter().map(|&(x, y)| nalgebra::vector![f64::from(x), f64::from(y)]).collect(),
        );
        let mesh = triangulate(&p).unwrap();
        assert_valid(&p, &mesh);
        prop_assert_eq!(mesh.is_empty(), all_collinear(&p.points, GeomCfg::default()));
    }

    #[test]
    fn prop_continuous_sets_are_valid(
        coords in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 3..60)
    ) {
        let p = PointSet::from_xy(&coords);
        let mesh = triangulate(&p).unwrap();
        assert_valid(&p, &mesh);
        prop_assert!(mesh.max_index().map_or(true, |m| m < p.len()));
    }

    #[test]
    fn prop_jittered_lattices_stay_valid(
        cells in prop::collection::vec(
            (0i32..5, 0i32..5, jitter(), jitter()),
            3..30,
        ),
        offset in prop::sample::select(vec![0.0, 1e6, -1e6]),
        copies in 0usize..3,
    ) {
        let mut coords: Vec<(f64, f64)> = cells
            .iter()
            .map(|&(x, y, jx, jy)| (offset + f64::from(x) + jx, offset + f64::from(y) + jy))
            .collect();
        let repeated: Vec<(f64, f64)> = coords.iter().take(copies).copied().collect();
        coords.extend(repeated);
        let p = PointSet::from_xy(&coords);
        let (mesh, stats) = Triangulator::default().triangulate_with_stats(&p).unwrap();
        assert_valid(&p, &mesh);
        prop_assert_eq!(mesh.is_empty(), all_collinear(&p.points, GeomCfg::default()));
        prop_assert_eq!(stats.degenerate_removed, 0);
        prop_assert_eq!(stats.locate_fallbacks, 0);
    }
}

/// Zero, or a signed offset between 1e-12 and 1e-8.
fn jitter() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        (any::<bool>(), -12.0f64..-8.0).prop_map(|(neg, e)| {
            let m = 10f64.powf(e);
            if neg {
                -m
            } else {
                m
            }
        }),
    ]
}
