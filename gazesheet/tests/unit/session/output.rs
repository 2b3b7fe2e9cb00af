use std::collections::BTreeMap;

use image::Rgba;

use super::*;
use crate::assets::source::FrameSource;
use crate::classify::ClassifierConfig;
use crate::foundation::core::{Direction, FrameRef, GridShape};
use crate::layout::grid::{DirectionRun, SheetLayout};
use crate::session::report::BuildReport;

fn out_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_output").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn fixture(dir: &Path, index_format: IndexFormat, frames: bool) -> (SheetSpec, SheetBuild) {
    let layout = SheetLayout::new(
        2,
        GridShape { cols: 2, rows: 1 },
        vec![
            DirectionRun {
                direction: Direction::Left,
                frames: vec![FrameRef::new("a", 1)],
            },
            DirectionRun {
                direction: Direction::Right,
                frames: vec![FrameRef::new("a", 2)],
            },
        ],
    )
    .unwrap();
    let spec = SheetSpec {
        name: "out".to_string(),
        layout: layout.clone(),
        source: FrameSource::new(BTreeMap::new()),
        classifier: ClassifierConfig::default(),
        output: SheetOutput {
            sheet: dir.join("nested").join("sheet.png"),
            index: Some(dir.join("idx").join("sheet_index.txt")),
            index_format,
            const_prefix: "GAZE".to_string(),
            frames_dir: frames.then(|| dir.join("frames")),
        },
    };
    let sheet = RgbaImage::from_fn(4, 2, |x, _| {
        if x < 2 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 128])
        }
    });
    let build = SheetBuild {
        sheet,
        index: DirectionIndexTable::from_layout(&layout),
        report: BuildReport::default(),
    };
    (spec, build)
}

#[test]
fn writes_sheet_and_gdscript_index() {
    let dir = out_dir("gdscript");
    let (spec, build) = fixture(&dir, IndexFormat::Gdscript, false);
    let written = write_outputs(&build, &spec).unwrap();

    assert!(written.frames.is_empty());
    let back = image::open(&written.sheet).unwrap().to_rgba8();
    assert_eq!(back.as_raw(), build.sheet.as_raw());

    let text = std::fs::read_to_string(written.index.unwrap()).unwrap();
    assert!(text.contains("const GAZE_COLS: int = 2"));
    assert!(text.contains("const FRAMES_LEFT: Array[int] = [0]"));
    assert!(text.contains("const FRAMES_RIGHT: Array[int] = [1]"));
}

#[test]
fn json_index_and_frame_dump() {
    let dir = out_dir("json_frames");
    let (spec, build) = fixture(&dir, IndexFormat::Json, true);
    let written = write_outputs(&build, &spec).unwrap();

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(written.index.unwrap()).unwrap()).unwrap();
    assert_eq!(v["directions"][1]["direction"], "right");

    assert_eq!(
        written.frames,
        vec![
            dir.join("frames").join("00_left.png"),
            dir.join("frames").join("01_right.png"),
        ]
    );
    let right = image::open(&written.frames[1]).unwrap().to_rgba8();
    assert_eq!(right.dimensions(), (2, 2));
    assert_eq!(right.get_pixel(0, 0).0, [0, 0, 255, 128]);
}

#[test]
fn render_index_follows_format() {
    let dir = out_dir("render_index");
    let (spec, build) = fixture(&dir, IndexFormat::Json, false);
    let text = render_index(&build.index, &spec.output).unwrap();
    assert_eq!(text, build.index.to_json().unwrap());

    write_outputs(&build, &spec).unwrap();
    let written = std::fs::read_to_string(dir.join("idx").join("sheet_index.txt")).unwrap();
    assert_eq!(written, text);
    let v: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(v["directions"][1]["direction"], "right");
    assert_eq!(v["directions"][1]["start"], 1);
}
