use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gazesheet", version, about = "Assemble directional sprite sheets from frames")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a sheet: process frames, write the PNG and the index table.
    Build(BuildArgs),
    /// Validate a sheet without touching any image.
    Check(SheetArgs),
    /// Print a sheet's direction index table.
    Index(IndexArgs),
    /// Cut a built sheet back into per-direction tiles.
    Slice(SliceArgs),
    /// Count the frames present in every source collection.
    Sources(ProjectArgs),
}

#[derive(Parser, Debug)]
struct ProjectArgs {
    /// Project JSON file.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Parser, Debug)]
struct SheetArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Sheet name inside the project file.
    #[arg(long)]
    sheet: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "snake_case")]
enum ClassifierKind {
    LumaKey,
    CheckerKey,
    Remote,
}

impl ClassifierKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::LumaKey => "luma_key",
            Self::CheckerKey => "checker_key",
            Self::Remote => "remote",
        }
    }
}

#[derive(Parser, Debug)]
struct BuildArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Override the configured background classifier.
    #[arg(long, value_enum)]
    classifier: Option<ClassifierKind>,

    /// Process frames in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Gdscript,
    Json,
}

#[derive(Parser, Debug)]
struct IndexArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Output format; defaults to the sheet's configured format.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
}

#[derive(Parser, Debug)]
struct SliceArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Built sheet PNG to cut.
    #[arg(long)]
    input: PathBuf,

    /// Directory receiving one PNG per tile.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gazesheet=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Check(args) => cmd_check(args),
        Command::Index(args) => cmd_index(args),
        Command::Slice(args) => cmd_slice(args),
        Command::Sources(args) => cmd_sources(args),
    }
}

fn load_sheet(args: &SheetArgs) -> anyhow::Result<gazesheet::SheetSpec> {
    let project = gazesheet::ProjectConfig::from_path(&args.project.config)
        .with_context(|| format!("load project '{}'", args.project.config.display()))?;
    let spec = project
        .sheet(&args.sheet)
        .with_context(|| format!("sheet '{}'", args.sheet))?;
    tracing::debug!(sheet = %spec.name, frames = spec.layout.total_frames(), "loaded sheet");
    Ok(spec)
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let mut spec = load_sheet(&args.sheet)?;
    if let Some(kind) = args.classifier {
        spec.classifier = spec.classifier.with_kind(kind.as_str())?;
    }
    if args.threads.is_some() && !args.parallel {
        tracing::warn!("--threads has no effect without --parallel");
    }

    let threading = gazesheet::Threading {
        parallel: args.parallel,
        threads: args.threads,
    };
    let build = gazesheet::build_sheet(&spec, threading)?;
    let written = gazesheet::write_outputs(&build, &spec)?;

    eprintln!("wrote {}", written.sheet.display());
    match &written.index {
        Some(path) => eprintln!("wrote {}", path.display()),
        None => print!("{}", gazesheet::render_index(&build.index, &spec.output)?),
    }
    if !written.frames.is_empty() {
        eprintln!("wrote {} tiles", written.frames.len());
    }
    println!("{}", build.report);
    Ok(())
}

fn cmd_check(args: SheetArgs) -> anyhow::Result<()> {
    let spec = load_sheet(&args)?;
    let index = gazesheet::DirectionIndexTable::from_layout(&spec.layout);
    gazesheet::check_lockstep(&spec.layout, &index)?;

    let layout = &spec.layout;
    let grid = layout.grid();
    let (w, h) = layout.canvas_size();
    println!(
        "sheet '{}' ok: {} directions x {} frames, {}x{} grid, {}x{} px, {} unique frames, classifier {}",
        spec.name,
        layout.runs().len(),
        layout.frames_per_direction(),
        grid.cols,
        grid.rows,
        w,
        h,
        layout.unique_frames().len(),
        spec.classifier.kind(),
    );
    Ok(())
}

fn cmd_index(args: IndexArgs) -> anyhow::Result<()> {
    let mut spec = load_sheet(&args.sheet)?;
    match args.format {
        Some(FormatArg::Gdscript) => spec.output.index_format = gazesheet::IndexFormat::Gdscript,
        Some(FormatArg::Json) => spec.output.index_format = gazesheet::IndexFormat::Json,
        None => {}
    }
    let index = gazesheet::DirectionIndexTable::from_layout(&spec.layout);
    print!("{}", gazesheet::render_index(&index, &spec.output)?);
    Ok(())
}

fn cmd_slice(args: SliceArgs) -> anyhow::Result<()> {
    let spec = load_sheet(&args.sheet)?;
    let sheet = image::open(&args.input)
        .with_context(|| format!("read sheet '{}'", args.input.display()))?
        .to_rgba8();
    let tiles = gazesheet::slice_sheet(&sheet, &spec.layout)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;
    for tile in &tiles {
        gazesheet::save_png(&tile.image, &args.out.join(tile.file_name()))?;
    }
    eprintln!("wrote {} tiles to {}", tiles.len(), args.out.display());
    Ok(())
}

fn cmd_sources(args: ProjectArgs) -> anyhow::Result<()> {
    let project = gazesheet::ProjectConfig::from_path(&args.config)
        .with_context(|| format!("load project '{}'", args.config.display()))?;
    for s in project.frame_source()?.survey()? {
        if !s.exists {
            println!("{}: missing directory {}", s.name, s.dir.display());
            continue;
        }
        match (s.frames.first(), s.frames.last()) {
            (Some(first), Some(last)) => println!(
                "{}: {} frames ({first}..={last}) in {}",
                s.name,
                s.frames.len(),
                s.dir.display()
            ),
            _ => println!("{}: 0 frames in {}", s.name, s.dir.display()),
        }
    }
    Ok(())
}
