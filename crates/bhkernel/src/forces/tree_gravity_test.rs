use crate::bodies::PointMasses;
use crate::forces::{DirectGravity, ForceModel, TreeGravity};
use crate::test_support::{RandomBodies, random_bodies, relative_error};

fn run(model: &mut dyn ForceModel, bodies: &RandomBodies) -> (Vec<f64>, Vec<f64>) {
    let mut ax = vec![0.0; bodies.len()];
    let mut ay = vec![0.0; bodies.len()];
    model.accelerations(&bodies.points(), &mut ax, &mut ay).unwrap();
    (ax, ay)
}

fn tree_error(theta: f64, bodies: &RandomBodies) -> f64 {
    let (dx, dy) = run(&mut DirectGravity::default(), bodies);
    let (tx, ty) = run(&mut TreeGravity::new(theta, 1e-4, 100_000), bodies);
    relative_error((&tx, &ty), (&dx, &dy))
}

#[test]
fn test_matches_direct_at_default_theta() {
    let bodies = random_bodies(50, 10.0, 1);

    let error = tree_error(0.7, &bodies);
    assert!(error < 1e-2, "relative error {error} at θ = 0.7");
}

#[test]
fn test_zero_theta_is_exact() {
    let bodies = random_bodies(50, 10.0, 2);

    let error = tree_error(0.0, &bodies);
    assert!(error < 1e-10, "relative error {error} at θ = 0");
}

#[test]
fn test_error_shrinks_with_theta() {
    let bodies = random_bodies(400, 10.0, 3);

    let coarse = tree_error(1.0, &bodies);
    let fine = tree_error(0.1, &bodies);

    assert!(fine < coarse, "θ = 0.1 gave {fine}, θ = 1.0 gave {coarse}");
}

#[test]
fn test_pulls_toward_cluster() {
    let x = [-0.1, 0.1, 0.0, 20.0];
    let y = [0.0, 0.0, 0.1, 0.0];
    let mass = [1.0, 1.0, 1.0, 0.001];
    let points = PointMasses::new(&x, &y, &mass).unwrap();

    let mut gravity = TreeGravity::default();
    let (mut ax, mut ay) = ([0.0; 4], [0.0; 4]);
    gravity.accelerations(&points, &mut ax, &mut ay).unwrap();

    // The distant light body sees roughly 3 units of mass at 20
    assert!(ax[3] < 0.0);
    assert!((ax[3] + 3.0 / 400.0).abs() < 1e-4);
}

#[test]
fn test_trivial_systems() {
    let mut gravity = TreeGravity::default();

    let empty = PointMasses::new(&[], &[], &[]).unwrap();
    gravity
        .accelerations(&empty, &mut [0.0; 0], &mut [0.0; 0])
        .unwrap();

    let single = PointMasses::new(&[5.0], &[5.0], &[2.0]).unwrap();
    let (mut ax, mut ay) = ([1.0], [1.0]);
    gravity.accelerations(&single, &mut ax, &mut ay).unwrap();
    assert_eq!((ax[0], ay[0]), (0.0, 0.0));
}

#[test]
fn test_coincident_bodies_stay_finite() {
    let x = [2.0; 6];
    let y = [-1.0; 6];
    let mass = [1.0; 6];
    let points = PointMasses::new(&x, &y, &mass).unwrap();

    let mut gravity = TreeGravity::default();
    let (mut ax, mut ay) = ([0.0; 6], [0.0; 6]);
    gravity.accelerations(&points, &mut ax, &mut ay).unwrap();

    assert!(gravity.stats().depth_capped);
    assert!(ax.iter().chain(&ay).all(|a| a.is_finite()));
}

#[test]
fn test_exhausted_arena_still_evaluates() {
    let bodies = random_bodies(300, 10.0, 8);

    let mut tight = TreeGravity::new(0.7, 1e-4, 40);
    let (ax, ay) = run(&mut tight, &bodies);

    assert!(tight.stats().exhausted);
    assert!(ax.iter().chain(&ay).all(|a| a.is_finite()));
}

#[test]
fn test_large_n_theta() {
    let mut gravity = TreeGravity::new(0.7, 1e-4, 1_000);
    assert_eq!(gravity.theta_for(1_000_000), 0.7);

    gravity.large_n_theta = Some(1.2);
    gravity.large_n_threshold = 100;
    assert_eq!(gravity.theta_for(100), 0.7);
    assert_eq!(gravity.theta_for(101), 1.2);
}

#[test]
fn test_tree_survives_evaluation() {
    let bodies = random_bodies(30, 10.0, 6);
    let mut gravity = TreeGravity::default();
    run(&mut gravity, &bodies);

    let tree = gravity.tree();
    assert_eq!(tree.node(tree.root()).unwrap().count, 30);
}
