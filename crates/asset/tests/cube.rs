use std::path::PathBuf;

use asset::load_mesh_from_path;

fn cube_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/models/cube.obj")
}

#[test]
fn bundled_cube_loads() {
    let mesh = load_mesh_from_path(cube_path()).expect("load cube");
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.triangle_count(), 12);
    assert_eq!(mesh.normals.len(), mesh.positions.len());
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
}

#[test]
fn cube_corners_average_their_three_faces() {
    let mesh = load_mesh_from_path(cube_path()).unwrap();
    let third = 1.0 / 3.0;
    for i in 0..mesh.vertex_count() {
        let p = mesh.position(i).unwrap();
        let n = mesh.normal(i).unwrap();
        for axis in 0..3 {
            let expected = p[axis].signum() * third;
            assert!(
                (n[axis] - expected).abs() < 1e-6,
                "vertex {i} axis {axis}: {n:?}"
            );
        }
    }
}

#[test]
fn cube_bounds_are_unit() {
    let (min, max) = load_mesh_from_path(cube_path()).unwrap().bounds().unwrap();
    assert_eq!(min, [-1.0, -1.0, -1.0]);
    assert_eq!(max, [1.0, 1.0, 1.0]);
}
