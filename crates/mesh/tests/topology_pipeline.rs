//! Integration tests for turning a generated mesh into an FFEA blob

use ffeatools_mesh::vtk::{surface_to_vtk, topology_to_vtk, write_vtk, TopologyToVtk, VtkFormat};
use ffeatools_mesh::{
    read_nodes, read_surface, read_topology, Location, NodeSet, Order, Surface, Topology,
};
use nalgebra::Vector3;
use rstest::{fixture, rstest};

#[fixture]
fn tetgen_cube() -> (NodeSet, Topology) {
    let nodes = read_nodes("./data/cube.1.node").unwrap();
    let topology = read_topology("./data/cube.1.ele").unwrap();
    (nodes, topology)
}

#[rstest]
fn tetgen_to_blob(tetgen_cube: (NodeSet, Topology)) {
    let (mut nodes, mut topology) = tetgen_cube;
    assert_eq!(topology.num_unknown_elements(), 5);

    // tetgen elements are inverted relative to FFEA
    assert_eq!(topology.orient(&nodes).unwrap(), 5);

    let mut surface = topology.extract_surface().unwrap();
    assert_eq!(surface.num_faces(), 12);

    // the central element is listed first by tetgen and moves to the end
    let map = topology.classify(&mut surface).unwrap();
    assert_eq!(map, vec![4, 0, 1, 2, 3]);
    assert_eq!(topology.num_surface_elements(), 4);
    assert_eq!(topology.elements[4].location, Location::Interior);

    // every cube corner is on the surface
    topology
        .partition_surface_nodes(&mut nodes, &mut surface)
        .unwrap();
    assert_eq!(nodes.num_surface_nodes(), 8);

    // outward normals after orientation
    let centre = Vector3::new(0.5, 0.5, 0.5);
    for face in &surface.faces {
        let outward = face.centroid(&nodes).unwrap() - centre;
        assert!(face.normal(&nodes).unwrap().dot(&outward) > 0.0);
    }

    assert!((topology.volume(&nodes, 1.0).unwrap() - 1.0).abs() < 1e-12);
}

#[rstest]
#[case(0)] // case 1
#[case(1)] // case 2
#[case(2)] // case 3
#[case(3)] // case 4
#[case(4)] // case 5
fn single_element_interior_check(tetgen_cube: (NodeSet, Topology), #[case] index: usize) {
    let (_, mut topology) = tetgen_cube;
    // the central tetrahedron is the first element in the tetgen file
    assert_eq!(topology.is_element_interior(index).unwrap(), index == 0);
}

#[rstest]
fn elevate_blob(tetgen_cube: (NodeSet, Topology)) {
    let (mut nodes, mut topology) = tetgen_cube;
    topology.orient(&nodes).unwrap();
    let mut surface = topology.extract_surface().unwrap();
    topology.classify(&mut surface).unwrap();

    let elevation = topology
        .increase_order(Some(&mut nodes), Some(&mut surface))
        .unwrap();
    assert_eq!(elevation.num_new_nodes(), 18);
    assert_eq!(topology.order(), Some(Order::Quadratic));
    assert_eq!(surface.num_faces(), 48);

    // new nodes follow the existing ones, and nothing is partitioned yet
    assert_eq!(elevation.first_node, 8);
    assert_eq!(nodes.num_nodes(), 26);
    assert_eq!(nodes.num_interior_nodes(), 26);

    // flipping a quadratic element twice leaves it unchanged
    let mut element = topology.elements[0].clone();
    element.flip();
    element.flip();
    assert_eq!(element, topology.elements[0]);

    let summary = topology.summary(&nodes).unwrap();
    assert_eq!(summary.num_linear_nodes, 8);
    assert_eq!(summary.num_inverted_elements, 0);
}

#[fixture]
fn ffea_cube() -> (NodeSet, Topology, Surface) {
    let nodes = read_nodes("./data/cube.node").unwrap();
    let topology = read_topology("./data/cube.top").unwrap();
    let surface = read_surface("./data/cube.surf").unwrap();
    (nodes, topology, surface)
}

#[rstest]
fn elevated_surface_nodes_come_first(ffea_cube: (NodeSet, Topology, Surface)) {
    let (mut nodes, mut topology, mut surface) = ffea_cube;
    let volumes = topology
        .elements
        .iter()
        .map(|e| e.volume(&nodes, 1.0).unwrap())
        .collect::<Vec<f64>>();

    let (elevation, map) = topology.elevate_blob(&mut nodes, &mut surface).unwrap();
    assert_eq!(elevation.num_new_nodes(), 18);
    assert_eq!(map.len(), 26);

    // every cube edge and face diagonal lies on the surface
    assert_eq!(nodes.num_surface_nodes(), 26);
    assert!(surface
        .faces
        .iter()
        .flat_map(|f| f.nodes)
        .all(|n| n < nodes.num_surface_nodes()));
    assert!(topology.is_partitioned());

    for (element, before) in topology.elements.iter().zip(volumes) {
        assert!((element.volume(&nodes, 1.0).unwrap() - before).abs() < 1e-12);
    }

    // midpoints still sit halfway along their edges after renumbering
    for (i, &(a, b)) in elevation.edges.iter().enumerate() {
        let mid = nodes.positions[map[elevation.first_node + i]];
        let expected = 0.5 * (nodes.positions[map[a]] + nodes.positions[map[b]]);
        assert!((mid - expected).norm() < 1e-12);
    }
}

#[rstest]
fn vtk_output(tetgen_cube: (NodeSet, Topology)) {
    let (nodes, topology) = tetgen_cube;
    let converter = TopologyToVtk::builder().include_size(true).build();
    let vtk = converter.convert(&nodes, &topology).unwrap();

    let path = std::env::temp_dir().join(format!("ffeatools_cube_{}", std::process::id()));
    write_vtk(vtk, &path, VtkFormat::LegacyAscii).unwrap();

    let text = std::fs::read_to_string(path.with_extension("vtk")).unwrap();
    assert!(text.contains("POINTS 8"));
    assert!(text.contains("location"));
    assert!(text.contains("volume"));
}

#[rstest]
fn vtk_default_conversions(tetgen_cube: (NodeSet, Topology)) {
    let (nodes, mut topology) = tetgen_cube;
    let mut surface = topology.extract_surface().unwrap();
    topology.classify(&mut surface).unwrap();

    let path = std::env::temp_dir().join(format!("ffeatools_surface_{}", std::process::id()));
    write_vtk(surface_to_vtk(&nodes, &surface).unwrap(), &path, VtkFormat::LegacyAscii).unwrap();
    let text = std::fs::read_to_string(path.with_extension("vtk")).unwrap();
    assert!(text.contains("CELL_TYPES 12"));
    assert!(text.contains("element"));

    // default configuration tags location but not size
    let path = std::env::temp_dir().join(format!("ffeatools_volume_{}", std::process::id()));
    write_vtk(topology_to_vtk(&nodes, &topology).unwrap(), &path, VtkFormat::LegacyAscii).unwrap();
    let text = std::fs::read_to_string(path.with_extension("vtk")).unwrap();
    assert!(text.contains("location"));
    assert!(!text.contains("volume"));
}
