use std::path::PathBuf;

use gazesheet::{
    ClassifierConfig, Direction, FrameRef, GridDef, IndexFormat, OutputDef, ProjectConfig,
    ProjectDef, SheetDef, SourceDef, Threading,
};
use image::{Rgba, RgbaImage};

// Draws a pupil that drifts toward each gaze direction, keys the white backdrop away and
// assembles a 3x3 gaze sheet plus its index table under `target/synthetic_sheet/`.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let root = PathBuf::from("target").join("synthetic_sheet");
    let frames_dir = root.join("frames");
    std::fs::create_dir_all(&frames_dir)?;

    let gaze = [
        (Direction::UpLeft, (-1, -1)),
        (Direction::Up, (0, -1)),
        (Direction::UpRight, (1, -1)),
        (Direction::Left, (-1, 0)),
        (Direction::Center, (0, 0)),
        (Direction::Right, (1, 0)),
        (Direction::DownLeft, (-1, 1)),
        (Direction::Down, (0, 1)),
        (Direction::DownRight, (1, 1)),
    ];
    const STEPS: u32 = 3;

    let mut sequences = std::collections::BTreeMap::new();
    let mut n = 1u32;
    for (direction, (dx, dy)) in gaze {
        let mut run = Vec::new();
        for step in 1..=STEPS {
            let cx = 32 + dx * 6 * step as i32;
            let cy = 32 + dy * 6 * step as i32;
            let img = RgbaImage::from_fn(64, 64, |x, y| {
                let (ex, ey) = (x as i32 - 32, y as i32 - 32);
                let (px, py) = (x as i32 - cx, y as i32 - cy);
                if px * px + py * py <= 64 {
                    Rgba([25, 20, 30, 255])
                } else if ex * ex + ey * ey <= 576 {
                    Rgba([70, 130, 160, 255])
                } else {
                    Rgba([252, 252, 252, 255])
                }
            });
            img.save(frames_dir.join(format!("frame_{n:03}.png")))?;
            run.push(FrameRef::new("synthetic", n));
            n += 1;
        }
        sequences.insert(direction, run);
    }

    let mut def = ProjectDef::default();
    def.sources.insert(
        "synthetic".to_string(),
        SourceDef {
            dir: "frames".into(),
            pattern: "frame_{n:03}.png".to_string(),
        },
    );
    def.sheets.insert(
        "gaze".to_string(),
        SheetDef {
            tile_size: 48,
            grid: GridDef { cols: 9, rows: None },
            order: gaze.iter().map(|(d, _)| *d).collect(),
            sequences,
            classifier: ClassifierConfig::default(),
            output: OutputDef {
                sheet: "gaze.png".into(),
                index: Some("gaze_index.gd".into()),
                index_format: IndexFormat::Gdscript,
                const_prefix: "EYE".to_string(),
                frames_dir: None,
            },
        },
    );
    std::fs::write(root.join("project.json"), serde_json::to_string_pretty(&def)?)?;

    let project = ProjectConfig::from_def(def, &root);
    let spec = project.sheet("gaze")?;
    let build = gazesheet::build_sheet(&spec, Threading::parallel(None))?;
    gazesheet::write_outputs(&build, &spec)?;

    println!("{}", build.report);
    print!("{}", build.index.to_gdscript("EYE"));
    Ok(())
}
