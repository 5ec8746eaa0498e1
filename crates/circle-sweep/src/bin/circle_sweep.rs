//! circle-sweep CLI: parameter sweep with review, plus the ball and magazine
//! checks on still frames.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::{error, info, warn};

use circle_sweep::blob::{
    draw_overlay, Alliance, BallFinder, BallFinderParams, BlobError, MagazineClassifier,
    MagazineParams,
};
use circle_sweep::detect::{load_rgb, prepare_detector, to_gray};
use circle_sweep::io::{
    write_json_pretty, BallReport, MagazineFrame, ReviewRecord, SweepIoError, SweepReport,
    SweepRunConfig,
};
use circle_sweep::review::{review, AmbiguityPolicy, ReviewVerdict};
use circle_sweep::sweep::{run_sweep, SweepConfigError, SweepPolicy};

use circle_sweep::core::level_from_verbosity;
#[cfg(feature = "tracing")]
use circle_sweep::core::init_tracing;
#[cfg(not(feature = "tracing"))]
use circle_sweep::core::init_with_level;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    SweepIo(#[from] SweepIoError),
    #[error("invalid configuration: {0}")]
    Config(#[from] SweepConfigError),
    #[error(transparent)]
    Blob(#[from] BlobError),
    #[cfg(not(feature = "tracing"))]
    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("log entry {index} holds {count} candidates, expected exactly one")]
    Ambiguous { index: usize, count: usize },
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "circle-sweep")]
#[command(about = "Find a circle of unknown radius by sweeping Hough parameters")]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep vote threshold, accumulator scale and radius over one image.
    Sweep(SweepArgs),

    /// Find the alliance-colored ball in one frame.
    Ball(BallArgs),

    /// Classify the ball color in magazine frames, in order.
    Magazine(MagazineArgs),
}

#[derive(Debug, Clone, Args)]
struct SweepArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// JSON run configuration; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the gray preview and review frames.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Path to write the sweep report (JSON).
    #[arg(long)]
    report: Option<PathBuf>,

    /// Stop at the first accepted candidate set.
    #[arg(long)]
    first_match: bool,

    /// Number of circles a candidate set must hold to be logged.
    #[arg(long)]
    expected_count: Option<usize>,

    /// Smallest plausible radius in pixels.
    #[arg(long)]
    min_size: Option<u32>,

    /// Largest plausible radius in pixels; radius guesses start here.
    #[arg(long)]
    max_size: Option<u32>,

    /// Gaussian sigma applied to the gray frame before edge detection.
    #[arg(long)]
    blur: Option<f32>,

    /// Wait for Enter after each written review frame.
    #[arg(long)]
    pause: bool,

    /// What to do with a log entry holding more than one candidate.
    #[arg(long, value_enum)]
    on_ambiguous: Option<AmbiguityArg>,

    /// Skip writing review frames.
    #[arg(long)]
    no_review: bool,
}

#[derive(Debug, Clone, Args)]
struct BallArgs {
    #[arg(long)]
    image: PathBuf,

    #[arg(long, value_enum)]
    alliance: AllianceArg,

    #[arg(long)]
    report: Option<PathBuf>,

    /// Write the frame with every detected circle drawn on it.
    #[arg(long)]
    overlay: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct MagazineArgs {
    /// Frames to classify; smoothing carries over from one to the next.
    #[arg(long = "image", required = true, num_args = 1..)]
    images: Vec<PathBuf>,

    /// Frames in each rolling median.
    #[arg(long, default_value_t = 20)]
    window: usize,

    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AmbiguityArg {
    Abort,
    Skip,
}

impl From<AmbiguityArg> for AmbiguityPolicy {
    fn from(value: AmbiguityArg) -> Self {
        match value {
            AmbiguityArg::Abort => AmbiguityPolicy::Abort,
            AmbiguityArg::Skip => AmbiguityPolicy::Skip,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AllianceArg {
    Red,
    Blue,
}

impl From<AllianceArg> for Alliance {
    fn from(value: AllianceArg) -> Self {
        match value {
            AllianceArg::Red => Alliance::Red,
            AllianceArg::Blue => Alliance::Blue,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&cli) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Commands::Sweep(args) => run_sweep_cmd(&args),
        Commands::Ball(args) => run_ball(&args),
        Commands::Magazine(args) => run_magazine(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) -> CliResult<()> {
    init_with_level(level_from_verbosity(cli.verbose, cli.quiet))?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) -> CliResult<()> {
    init_tracing(level_from_verbosity(cli.verbose, cli.quiet), false);
    Ok(())
}

fn run_config(args: &SweepArgs) -> CliResult<SweepRunConfig> {
    let mut cfg = match &args.config {
        Some(path) => SweepRunConfig::load_json(path)?,
        None => SweepRunConfig::default(),
    };
    cfg.image_path = Some(args.image.display().to_string());
    if let Some(dir) = &args.out_dir {
        cfg.output_dir = Some(dir.display().to_string());
    }
    if let Some(report) = &args.report {
        cfg.report_path = Some(report.display().to_string());
    }
    if args.first_match {
        cfg.sweep.policy = SweepPolicy::FirstMatch;
    }
    if let Some(count) = args.expected_count {
        cfg.sweep.expected_count = count;
    }
    if let Some(min) = args.min_size {
        cfg.sweep.min_circle_size = min;
    }
    if let Some(max) = args.max_size {
        cfg.sweep.max_circle_size = max;
    }
    if let Some(sigma) = args.blur {
        cfg.blur_sigma = Some(sigma);
    }
    if let Some(policy) = args.on_ambiguous {
        cfg.on_ambiguous = policy.into();
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run_sweep_cmd(args: &SweepArgs) -> CliResult<()> {
    let cfg = run_config(args)?;
    info!("loading image: {}", args.image.display());
    let frame = load_rgb(&args.image)?;
    info!("image size: {}x{}", frame.width(), frame.height());

    let out_dir = cfg.output_dir();
    if !args.no_review {
        std::fs::create_dir_all(&out_dir)?;
        let preview = out_dir.join("gray.png");
        to_gray(&frame, cfg.blur_sigma).save(&preview)?;
        info!("gray preview written to {}", preview.display());
    }

    let detector = prepare_detector(&frame, &cfg.edges, cfg.blur_sigma);
    let outcome = run_sweep(&detector, &cfg.sweep)?;

    match outcome.log.best() {
        Some(best) => {
            let c = &best.candidates[0];
            println!(
                "best: center=({:.1}, {:.1}) radius={:.1} votes>={} dp={} guess={}",
                c.center.x,
                c.center.y,
                c.radius,
                best.params.vote_threshold,
                best.params.scale,
                best.params.radius_guess
            );
        }
        None => println!("no circle found"),
    }
    println!("logged entries: {}", outcome.log.len());

    let mut report = SweepReport::new(
        args.image.display().to_string(),
        frame.dimensions(),
        &cfg,
        &outcome,
    );
    let reviewed = if args.no_review {
        Ok(())
    } else {
        review_frames(&frame, &outcome, &cfg, &out_dir, args.pause, &mut report)
    };

    if let Some(path) = &cfg.report_path {
        report.write_json(path)?;
        info!("report written to {path}");
    }
    reviewed
}

fn review_frames(
    frame: &image::RgbImage,
    outcome: &circle_sweep::SweepOutcome,
    cfg: &SweepRunConfig,
    out_dir: &Path,
    pause: bool,
    report: &mut SweepReport,
) -> CliResult<()> {
    for reviewed in review(frame, &outcome.log) {
        let index = reviewed.index;
        match (reviewed.verdict, reviewed.image) {
            (ReviewVerdict::Single(circle), Some(image)) => {
                let path = out_dir.join(format!("entry_{index:03}.png"));
                image.save(&path)?;
                info!(
                    "entry {index}: center=({:.1}, {:.1}) r={:.1} -> {}",
                    circle.center.x,
                    circle.center.y,
                    circle.radius,
                    path.display()
                );
                report.review.push(ReviewRecord {
                    index,
                    verdict: reviewed.verdict,
                    frame_path: Some(path.display().to_string()),
                });
                if pause {
                    wait_for_enter()?;
                }
            }
            (ReviewVerdict::Ambiguous { count }, _) => {
                report.review.push(ReviewRecord {
                    index,
                    verdict: reviewed.verdict,
                    frame_path: None,
                });
                match cfg.on_ambiguous {
                    AmbiguityPolicy::Abort => return Err(CliError::Ambiguous { index, count }),
                    AmbiguityPolicy::Skip => warn!("skipping entry {index}"),
                }
            }
            (ReviewVerdict::Single(_), None) => {}
        }
    }
    Ok(())
}

fn wait_for_enter() -> CliResult<()> {
    eprint!("press Enter to continue...");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

fn run_ball(args: &BallArgs) -> CliResult<()> {
    let alliance: Alliance = args.alliance.into();
    let finder = BallFinder::new(BallFinderParams::intake(alliance))?;
    let frame = load_rgb(&args.image)?;
    let observation = finder.process(&frame);

    match observation.ball {
        Some(ball) => println!(
            "ball: x={:.1} y={:.1} radius={:.1}",
            ball.center.x, ball.center.y, ball.radius
        ),
        None => println!("ball: none"),
    }

    if let Some(path) = &args.overlay {
        draw_overlay(&frame, &observation).save(path)?;
        info!("overlay written to {}", path.display());
    }

    if let Some(path) = &args.report {
        let report = BallReport {
            image_path: args.image.display().to_string(),
            alliance,
            mask: finder.params().mask,
            observation,
        };
        write_json_pretty(&report, path)?;
        info!("report written to {}", path.display());
    }
    Ok(())
}

fn run_magazine(args: &MagazineArgs) -> CliResult<()> {
    let mut classifier = MagazineClassifier::new(MagazineParams {
        window: args.window,
        ..MagazineParams::default()
    })?;

    let mut frames = Vec::with_capacity(args.images.len());
    for path in &args.images {
        let frame = load_rgb(path)?;
        let reading = classifier.process(&frame);
        let color = match reading.color {
            Some(Alliance::Red) => "red",
            Some(Alliance::Blue) => "blue",
            None => "none",
        };
        println!(
            "{}: {color} (red {:.2}, blue {:.2})",
            path.display(),
            reading.red_fill,
            reading.blue_fill
        );
        frames.push(MagazineFrame {
            image_path: path.display().to_string(),
            reading,
        });
    }

    if let Some(path) = &args.report {
        write_json_pretty(&frames, path)?;
        info!("report written to {}", path.display());
    }
    Ok(())
}
