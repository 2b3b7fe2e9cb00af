use super::*;

fn run(direction: Direction, source: &str, frames: &[u32]) -> DirectionRun {
    DirectionRun {
        direction,
        frames: frames.iter().map(|&n| FrameRef::new(source, n)).collect(),
    }
}

fn nine_by_four() -> SheetLayout {
    let order = [
        Direction::UpLeft,
        Direction::Up,
        Direction::UpRight,
        Direction::Left,
        Direction::Center,
        Direction::Right,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
    ];
    let runs = order
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            let base = i as u32 * 10;
            run(d, "vid1", &[base, base + 1, base + 2, base + 3])
        })
        .collect();
    SheetLayout::new(256, GridShape { cols: 6, rows: 6 }, runs).unwrap()
}

#[test]
fn canvas_and_cells_follow_flattened_index() {
    let layout = nine_by_four();
    assert_eq!(layout.total_frames(), 36);
    assert_eq!(layout.canvas_size(), (1536, 1536));
    assert_eq!(layout.cell(0), (0, 0));
    assert_eq!(layout.cell(5), (5, 0));
    assert_eq!(layout.cell(6), (0, 1));
    assert_eq!(layout.cell(35), (5, 5));
    assert_eq!(layout.offset(7), (256, 256));
}

#[test]
fn four_rows_of_six_make_a_1536_by_1024_sheet() {
    let runs = [
        Direction::UpLeft,
        Direction::Up,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
    ]
    .iter()
    .map(|&d| run(d, "vid2", &[1, 2, 3, 4]))
    .collect();
    let layout = SheetLayout::new(256, GridShape { cols: 6, rows: 4 }, runs).unwrap();
    assert_eq!(layout.canvas_size(), (1536, 1024));
    assert_eq!(layout.offset(23), (1280, 768));
}

#[test]
fn slots_enumerate_runs_in_order() {
    let layout = nine_by_four();
    let slots: Vec<_> = layout.slots().collect();
    assert_eq!(slots.len(), 36);
    assert_eq!(slots[4].index, 4);
    assert_eq!(slots[4].direction, Direction::Up);
    assert_eq!(slots[4].step, 0);
    assert_eq!(*slots[4].frame, FrameRef::new("vid1", 10));
    assert_eq!(slots[35].direction, Direction::DownRight);
    assert_eq!(slots[35].step, 3);
}

#[test]
fn unique_frames_dedups_shared_refs() {
    let runs = vec![
        run(Direction::Center, "vid1", &[1, 2]),
        run(Direction::Blink, "vid1", &[2, 1]),
    ];
    let layout = SheetLayout::new(8, GridShape { cols: 2, rows: 2 }, runs).unwrap();
    assert_eq!(layout.total_frames(), 4);
    assert_eq!(
        layout.unique_frames(),
        vec![&FrameRef::new("vid1", 1), &FrameRef::new("vid1", 2)]
    );
}

#[test]
fn unequal_run_lengths_are_rejected() {
    let runs = vec![
        run(Direction::Up, "vid1", &[1, 2, 3]),
        run(Direction::Down, "vid1", &[4, 5]),
    ];
    let err = SheetLayout::new(8, GridShape { cols: 4, rows: 4 }, runs).unwrap_err();
    assert!(err.to_string().contains("same length"));
}

#[test]
fn oversized_canvas_is_a_config_error() {
    let runs = || vec![run(Direction::Up, "vid1", &[1, 2])];

    let err = SheetLayout::new(60_000, GridShape { cols: 60_000, rows: 1 }, runs()).unwrap_err();
    assert!(matches!(err, SheetError::Config(_)), "{err}");

    let err = SheetLayout::new(4096, GridShape { cols: 5, rows: 4 }, runs()).unwrap_err();
    assert!(matches!(err, SheetError::Config(_)), "{err}");

    assert!(SheetLayout::new(4096, GridShape { cols: 4, rows: 4 }, runs()).is_ok());
}

#[test]
fn overflowing_the_grid_is_rejected() {
    let runs = vec![
        run(Direction::Up, "vid1", &[1, 2, 3]),
        run(Direction::Down, "vid1", &[4, 5, 6]),
    ];
    assert!(SheetLayout::new(8, GridShape { cols: 5, rows: 1 }, runs).is_err());
}

#[test]
fn duplicate_and_empty_runs_are_rejected() {
    let dup = vec![run(Direction::Up, "a", &[1]), run(Direction::Up, "a", &[2])];
    assert!(SheetLayout::new(8, GridShape { cols: 2, rows: 1 }, dup).is_err());

    let empty = vec![run(Direction::Up, "a", &[])];
    assert!(SheetLayout::new(8, GridShape { cols: 2, rows: 1 }, empty).is_err());

    assert!(SheetLayout::new(8, GridShape { cols: 2, rows: 1 }, vec![]).is_err());
    let one = vec![run(Direction::Up, "a", &[1])];
    assert!(SheetLayout::new(0, GridShape { cols: 2, rows: 1 }, one).is_err());
}
