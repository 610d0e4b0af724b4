//! Integration tests for the auxiliary files of the cube blob

use ffeatools_blob::{
    ForceSet, Material, MaterialParams, PinFile, Region, StokesRadii, VdwFile, INACTIVE,
};
use ffeatools_mesh::{read_nodes, read_surface, read_topology, NodeSet, Surface};
use nalgebra::Vector3;
use rstest::{fixture, rstest};
use std::path::PathBuf;

#[fixture]
fn cube() -> (NodeSet, Surface) {
    let nodes = read_nodes("./data/cube.node").unwrap();
    let surface = read_surface("./data/cube.surf").unwrap();
    (nodes, surface)
}

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ffeatools_blob_{}_{name}", std::process::id()))
}

#[rstest]
#[case(Vector3::new(0.0, 0.0, 1.0), 0.5, 6)] // case 1
#[case(Vector3::new(0.0, 0.0, -1.0), 0.5, 6)] // case 2
#[case(Vector3::new(1.0, 0.0, 0.0), -1.0, 12)] // case 3
#[case(Vector3::new(1.0, 0.0, 0.0), 2.0, 0)] // case 4
#[case(Vector3::new(0.0, 0.0, 1.0), 1.0, 2)] // case 5
fn halfspace_activation(
    cube: (NodeSet, Surface),
    #[case] normal: Vector3<f64>,
    #[case] offset: f64,
    #[case] expected: usize,
) {
    let (nodes, surface) = cube;
    let mut vdw = VdwFile::new(surface.num_faces());
    let point = Vector3::new(offset, offset, offset);

    let count = vdw
        .activate_halfspace(&surface, &nodes, normal, point, 1)
        .unwrap();
    assert_eq!(count, expected);
    assert_eq!(vdw.num_active(), expected);
    assert_eq!(vdw.types.iter().filter(|&&t| t == INACTIVE).count(), 12 - expected);
}

#[rstest]
fn vdw_round_trip(cube: (NodeSet, Surface)) {
    let (nodes, surface) = cube;
    let mut vdw = VdwFile::new(surface.num_faces());
    vdw.activate_halfspace(&surface, &nodes, Vector3::z(), nodes.centroid(), 2)
        .unwrap();

    let path = scratch("cube.vdw");
    vdw.write(&path).unwrap();
    assert_eq!(VdwFile::read(&path).unwrap(), vdw);
}

#[rstest]
fn pin_round_trip(cube: (NodeSet, Surface)) {
    let (nodes, _) = cube;
    let pin = PinFile::all(nodes.num_nodes());
    assert_eq!(pin.num_pinned_nodes(), 8);

    let path = scratch("cube.pin");
    pin.write(&path).unwrap();
    assert_eq!(PinFile::read(&path).unwrap(), pin);

    // the bottom face of the cube
    let region = Region::new(Vector3::repeat(-0.5), Vector3::new(1.5, 1.5, 0.5)).unwrap();
    assert_eq!(PinFile::from_region(&nodes, &region).nodes, vec![0, 1, 2, 3]);
}

#[rstest]
fn stokes_follow_elevation() {
    let mut nodes = read_nodes("./data/cube.node").unwrap();
    let mut topology = read_topology("./data/cube.top").unwrap();
    let mut stokes = StokesRadii::uniform(nodes.num_nodes(), 0.5);

    let elevation = topology.increase_order(Some(&mut nodes), None).unwrap();
    stokes.extend_elevated(&elevation).unwrap();

    assert_eq!(stokes.num_nodes(), nodes.num_nodes());
    assert!(stokes.radii[..8].iter().all(|&r| r == 0.5));
    assert!(stokes.radii[8..].iter().all(|&r| r == 0.0));

    let path = scratch("cube.stokes");
    stokes.write(&path).unwrap();
    assert_eq!(StokesRadii::read(&path).unwrap(), stokes);
}

#[rstest]
fn materials_follow_classification() {
    let nodes = read_nodes("./data/cube.1.node").unwrap();
    let mut topology = read_topology("./data/cube.1.ele").unwrap();

    // tetgen lists the central element first
    let mut params = MaterialParams::uniform(topology.num_elements(), Material::default());
    params.materials[0].density = 5.0e3;

    let mut surface = topology.extract_surface().unwrap();
    let map = topology.classify(&mut surface).unwrap();
    params.permute(&map).unwrap();
    assert_eq!(params.densities(), vec![1.5e3, 1.5e3, 1.5e3, 1.5e3, 5.0e3]);

    // four corners of 1/6 and a centre of 1/3
    let mass = topology.mass(&params.densities(), &nodes, 1.0).unwrap();
    assert!((mass - (4.0 * 1.5e3 / 6.0 + 5.0e3 / 3.0)).abs() < 1e-9);

    let path = scratch("cube.mat");
    params.write(&path).unwrap();
    assert_eq!(MaterialParams::read(&path).unwrap(), params);
}

#[rstest]
fn force_file(cube: (NodeSet, Surface)) {
    let (nodes, _) = cube;
    let top = Region::new(Vector3::repeat(-0.5), Vector3::repeat(1.5)).unwrap();
    let mut forces = ForceSet::default();
    forces.add_constant_force(&nodes, &top, Vector3::z(), 1.0);
    forces
        .add_variable_torque(&nodes, &top, 0, 7, 1.0)
        .unwrap();
    assert_eq!(forces.num_forced_nodes(), 8);

    let path = scratch("cube.force");
    forces.write(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3 + 16);
    assert_eq!(text.lines().nth(1), Some("num_forced_nodes 8"));
    assert_eq!(text.lines().last(), Some("7 variable_torque 0 7 1"));
}
