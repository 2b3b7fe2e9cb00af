use image::Rgba;

use super::*;
use crate::foundation::core::{Direction, FrameRef, GridShape};
use crate::layout::grid::DirectionRun;

fn layout_2x3(tile: u32) -> SheetLayout {
    let runs = vec![
        DirectionRun {
            direction: Direction::Center,
            frames: vec![FrameRef::new("a", 1), FrameRef::new("a", 2)],
        },
        DirectionRun {
            direction: Direction::Blink,
            frames: vec![FrameRef::new("a", 3), FrameRef::new("a", 4)],
        },
    ];
    SheetLayout::new(tile, GridShape { cols: 3, rows: 2 }, runs).unwrap()
}

fn solid(tile: u32, v: u8) -> RgbaImage {
    RgbaImage::from_pixel(tile, tile, Rgba([v, v, v, 255]))
}

#[test]
fn tiles_land_at_their_cells() {
    let layout = layout_2x3(4);
    let t: Vec<RgbaImage> = (1..=4).map(|v| solid(4, v * 10)).collect();
    let tiles: Vec<Option<&RgbaImage>> = t.iter().map(Some).collect();

    let sheet = composite_sheet(&layout, &tiles).unwrap();
    assert_eq!(sheet.dimensions(), (12, 8));
    assert_eq!(sheet.get_pixel(0, 0).0, [10, 10, 10, 255]);
    assert_eq!(sheet.get_pixel(4, 0).0, [20, 20, 20, 255]);
    assert_eq!(sheet.get_pixel(11, 3).0, [30, 30, 30, 255]);
    assert_eq!(sheet.get_pixel(0, 4).0, [40, 40, 40, 255]);
    // unused trailing cells stay transparent
    assert!(cell_is_transparent(&sheet, &layout, 4));
    assert_eq!(sheet.get_pixel(11, 7).0, [0, 0, 0, 0]);
}

#[test]
fn missing_tile_keeps_its_slot() {
    let layout = layout_2x3(4);
    let t: Vec<RgbaImage> = (1..=4).map(|v| solid(4, v * 10)).collect();
    let tiles = vec![Some(&t[0]), None, Some(&t[2]), Some(&t[3])];

    let sheet = composite_sheet(&layout, &tiles).unwrap();
    assert!(cell_is_transparent(&sheet, &layout, 1));
    assert!(!cell_is_transparent(&sheet, &layout, 0));
    assert_eq!(sheet.get_pixel(8, 0).0, [30, 30, 30, 255]);
    assert_eq!(sheet.get_pixel(0, 4).0, [40, 40, 40, 255]);
}

#[test]
fn partial_alpha_is_copied_not_blended() {
    let layout = layout_2x3(2);
    let ghost = RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 77]));
    let sheet = composite_sheet(&layout, &[Some(&ghost), None, None, None]).unwrap();
    assert_eq!(sheet.get_pixel(1, 1).0, [200, 100, 50, 77]);
}

#[test]
fn wrong_tile_count_or_size_is_an_error() {
    let layout = layout_2x3(4);
    let t = solid(4, 1);
    assert!(composite_sheet(&layout, &[Some(&t)]).is_err());

    let big = solid(5, 1);
    assert!(composite_sheet(&layout, &[Some(&big), None, None, None]).is_err());
}
