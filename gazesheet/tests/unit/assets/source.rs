use super::*;

fn fixture_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_source").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &Path, rgba: [u8; 4]) {
    let img = RgbaImage::from_pixel(3, 2, image::Rgba(rgba));
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

fn source_over(dir: &Path) -> FrameSource {
    let mut dirs = BTreeMap::new();
    dirs.insert(
        "vid1".to_string(),
        SourceDir {
            dir: dir.to_path_buf(),
            pattern: FramePattern::default(),
        },
    );
    FrameSource::new(dirs)
}

#[test]
fn pattern_default_pads_to_three_digits() {
    let p = FramePattern::parse(FramePattern::DEFAULT).unwrap();
    assert_eq!(p, FramePattern::default());
    assert_eq!(p.file_name(7), "frame_007.png");
    assert_eq!(p.file_name(1234), "frame_1234.png");
    assert_eq!(p.frame_number("frame_007.png"), Some(7));
    assert_eq!(p.frame_number("frame_07.png"), None);
    assert_eq!(p.frame_number("frame_abc.png"), None);
    assert_eq!(p.frame_number("other_007.png"), None);
}

#[test]
fn pattern_bare_placeholder_has_no_padding() {
    let p = FramePattern::parse("eye-{n}.png").unwrap();
    assert_eq!(p.file_name(5), "eye-5.png");
    assert_eq!(p.frame_number("eye-42.png"), Some(42));
    assert_eq!(p.frame_number("eye-0.png"), Some(0));
    assert_eq!(p.frame_number("eye-007.png"), None);
    assert_eq!(p.frame_number("eye-00.png"), None);
}

#[test]
fn padded_pattern_rejects_extra_padding() {
    let p = FramePattern::parse("frame_{n:03}.png").unwrap();
    assert_eq!(p.frame_number("frame_0007.png"), None);
    assert_eq!(p.frame_number("frame_1234.png"), Some(1234));
}

#[test]
fn pattern_rejects_malformed_placeholders() {
    for bad in [
        "frame.png",
        "frame_{n.png",
        "frame_{x}.png",
        "frame_{n:3}.png",
        "frame_{n:0}.png",
        "{n}_{n}.png",
        "sub/{n}.png",
    ] {
        assert!(FramePattern::parse(bad).is_err(), "{bad} should be rejected");
    }
}

#[test]
fn load_distinguishes_missing_and_undecodable() {
    let dir = fixture_dir("load");
    write_png(&dir.join("frame_001.png"), [10, 20, 30, 255]);
    std::fs::write(dir.join("frame_002.png"), b"not a png").unwrap();
    let src = source_over(&dir);

    let img = src.load(&FrameRef::new("vid1", 1)).unwrap();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);

    let err = src.load(&FrameRef::new("vid1", 2)).unwrap_err();
    assert!(matches!(err, SheetError::Decode(_)));

    let err = src.load(&FrameRef::new("vid1", 3)).unwrap_err();
    assert!(matches!(err, SheetError::MissingSource(_)));

    let err = src.load(&FrameRef::new("nope", 1)).unwrap_err();
    assert!(matches!(err, SheetError::Config(_)));
}

#[test]
fn survey_counts_matching_files_only() {
    let dir = fixture_dir("survey");
    write_png(&dir.join("frame_003.png"), [0, 0, 0, 255]);
    write_png(&dir.join("frame_001.png"), [0, 0, 0, 255]);
    std::fs::write(dir.join("notes.txt"), b"x").unwrap();

    let mut dirs = BTreeMap::new();
    dirs.insert(
        "a".to_string(),
        SourceDir {
            dir: dir.clone(),
            pattern: FramePattern::default(),
        },
    );
    dirs.insert(
        "b".to_string(),
        SourceDir {
            dir: dir.join("absent"),
            pattern: FramePattern::default(),
        },
    );
    let survey = FrameSource::new(dirs).survey().unwrap();
    assert_eq!(survey.len(), 2);
    assert_eq!(survey[0].name, "a");
    assert!(survey[0].exists);
    assert_eq!(survey[0].frames, vec![1, 3]);
    assert!(!survey[1].exists);
    assert!(survey[1].frames.is_empty());
}

#[test]
fn resolve_path_keeps_absolute() {
    let root = Path::new("project");
    assert_eq!(
        resolve_path(root, Path::new("frames/a")),
        PathBuf::from("project/frames/a")
    );
    let abs = std::env::temp_dir();
    assert_eq!(resolve_path(root, &abs), abs);
}
