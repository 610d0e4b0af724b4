//! Integration tests for reading a trajectory on disk

use ffeatools_traj::{read_trajectory, Frame, TrajectoryReader};
use rstest::{fixture, rstest};

const TRAJECTORY: &str = "./data/cube_trajectory.out";

#[fixture]
fn frames() -> Vec<Frame> {
    read_trajectory(TRAJECTORY).unwrap()
}

#[rstest]
#[case(0, 0, 0, 3)] // case 1
#[case(1, 1, 0, 0)] // case 2
#[case(2, 0, 100, 3)] // case 3
#[case(3, 1, 100, 2)] // case 4
fn frame_headers(
    frames: Vec<Frame>,
    #[case] index: usize,
    #[case] blob: usize,
    #[case] step: u64,
    #[case] num_nodes: usize,
) {
    assert_eq!(frames.len(), 4);
    let frame = &frames[index];
    assert_eq!(frame.blob, blob);
    assert_eq!(frame.step, step);
    assert_eq!(frame.conformation, Some(0));
    assert_eq!(frame.num_nodes(), num_nodes);
}

#[rstest]
fn single_blob() {
    let mut reader = TrajectoryReader::new();
    reader.disable_progress();
    reader.set_target_blob(0);

    let frames = reader.read(TRAJECTORY).unwrap();
    assert_eq!(frames.len(), 2);
    let moved = frames[1].positions.as_ref().unwrap();
    assert!((moved[0].x - 0.1).abs() < 1e-12);
}

#[rstest]
fn xyz_output() {
    let path = std::env::temp_dir().join(format!("ffeatools_traj_{}.xyz", std::process::id()));
    let mut reader = TrajectoryReader::new();
    reader.disable_progress();

    // the static frame is skipped
    assert_eq!(reader.extract_positions(TRAJECTORY, &path).unwrap(), 3);

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[1], "1.000000e+00 0.000000e+00 0.000000e+00");
    assert_eq!(lines[7], "6.000000e+00 5.000000e+00 5.000000e+00");
}
