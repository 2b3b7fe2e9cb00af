use super::*;

const PROJECT: &str = r#"{
  "sources": {
    "vid1": { "dir": "frames/vid1" },
    "vid2": { "dir": "/abs/vid2", "pattern": "f{n}.png" }
  },
  "sheets": {
    "eyes": {
      "tile_size": 256,
      "grid": { "cols": 6 },
      "order": ["up", "left", "blink"],
      "sequences": {
        "up":    [["vid1", 1], ["vid1", 2]],
        "left":  [["vid2", 10], ["vid2", 11]],
        "blink": [["vid1", 1], ["vid2", 11]]
      },
      "output": { "sheet": "out/eyes.png", "index": "out/eyes.gd" }
    }
  }
}"#;

fn project() -> ProjectConfig {
    ProjectConfig::from_reader(PROJECT.as_bytes(), "/proj").unwrap()
}

#[test]
fn sheet_resolves_paths_against_root() {
    let spec = project().sheet("eyes").unwrap();
    assert_eq!(spec.name, "eyes");
    assert_eq!(spec.output.sheet, PathBuf::from("/proj/out/eyes.png"));
    assert_eq!(spec.output.index, Some(PathBuf::from("/proj/out/eyes.gd")));
    assert_eq!(spec.output.index_format, IndexFormat::Gdscript);
    assert_eq!(spec.output.const_prefix, "EYE");
    assert_eq!(spec.output.frames_dir, None);

    let vid1 = spec.source.dir("vid1").unwrap();
    assert_eq!(vid1.dir, PathBuf::from("/proj/frames/vid1"));
    assert_eq!(vid1.pattern, FramePattern::default());
    let vid2 = spec.source.dir("vid2").unwrap();
    assert_eq!(vid2.dir, PathBuf::from("/abs/vid2"));
    assert_eq!(vid2.pattern.file_name(3), "f3.png");
}

#[test]
fn omitted_rows_are_derived_from_frame_count() {
    let spec = project().sheet("eyes").unwrap();
    let layout = &spec.layout;
    assert_eq!(layout.total_frames(), 6);
    assert_eq!(layout.grid(), GridShape { cols: 6, rows: 1 });
    assert_eq!(layout.canvas_size(), (1536, 256));
    assert_eq!(layout.runs()[0].direction, Direction::Up);
    assert_eq!(layout.runs()[2].direction, Direction::Blink);
}

#[test]
fn default_classifier_is_luma_key() {
    let spec = project().sheet("eyes").unwrap();
    assert_eq!(spec.classifier, ClassifierConfig::default());
}

#[test]
fn unknown_sheet_lists_known_names() {
    let err = project().sheet("mouth").unwrap_err();
    assert!(matches!(err, SheetError::Config(_)));
    assert!(err.to_string().contains("eyes"));
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = ProjectConfig::from_reader("{ nope".as_bytes(), ".").unwrap_err();
    assert!(matches!(err, SheetError::Config(_)));
}

#[test]
fn unknown_fields_are_rejected() {
    let err = ProjectConfig::from_reader(r#"{"sheetz": {}}"#.as_bytes(), ".").unwrap_err();
    assert!(err.to_string().contains("sheetz"));
}

#[test]
fn explicit_rows_too_small_fail_layout() {
    let mut p = project().def().clone();
    p.sheets.get_mut("eyes").unwrap().grid = GridDef {
        cols: 2,
        rows: Some(2),
    };
    let err = ProjectConfig::from_def(p, "/proj").sheet("eyes").unwrap_err();
    assert!(err.to_string().contains("do not fit"));
}

#[test]
fn unequal_sequences_fail_layout() {
    let mut p = project().def().clone();
    p.sheets
        .get_mut("eyes")
        .unwrap()
        .sequences
        .get_mut(&Direction::Up)
        .unwrap()
        .push(FrameRef::new("vid1", 3));
    let err = ProjectConfig::from_def(p, "/proj").sheet("eyes").unwrap_err();
    assert!(err.to_string().contains("same length"));
}

#[test]
fn from_path_uses_parent_directory_as_root() {
    let dir = PathBuf::from("target").join("unit_config");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("project.json");
    std::fs::write(&path, PROJECT).unwrap();

    let cfg = ProjectConfig::from_path(&path).unwrap();
    assert_eq!(cfg.root(), dir.as_path());
    assert_eq!(cfg.sheet_names(), vec!["eyes"]);

    let missing = ProjectConfig::from_path(dir.join("absent.json")).unwrap_err();
    assert!(matches!(missing, SheetError::Config(_)));
}

#[test]
fn derived_rows_rounds_up() {
    assert_eq!(derived_rows(36, 6), 6);
    assert_eq!(derived_rows(37, 6), 7);
    assert_eq!(derived_rows(1, 6), 1);
    assert_eq!(derived_rows(0, 6), 1);
}
