//! Stepviz CLI - Inspect, replay and export algorithm timelines.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fmt::Display;
use std::fs;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};

use stepviz::{
    algorithm::{Timeline, materialize_many},
    catalog::Catalog,
    playback::{self, SystemClock},
    render::{Renderer, TextRenderer, Theme},
    schema::{DatasetShape, DatasetSpec, Frame, SessionParams, VisualizerConfig},
    session::{Session, SessionStatus},
    timeline::{CompressionType, RecorderConfig, TimelineRecorder},
};

#[derive(Parser, Debug)]
#[command(name = "stepviz", version, about = "Step-by-step algorithm visualizer")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List topics and their algorithms.
    List {
        /// Only list this topic.
        topic: Option<String>,
    },
    /// Materialize a timeline and print its frames.
    Run {
        #[command(flatten)]
        session: SessionArgs,
        /// Print only the final summary.
        #[arg(long)]
        summary: bool,
    },
    /// Replay a timeline in the terminal in real time.
    Play {
        #[command(flatten)]
        session: SessionArgs,
        /// Play from the last frame toward the first.
        #[arg(long)]
        backward: bool,
    },
    /// Write a timeline to a `.stpv` file.
    Export {
        #[command(flatten)]
        session: SessionArgs,
        /// Output path.
        #[arg(long, short)]
        out: PathBuf,
        /// Compress frames with LZ4.
        #[arg(long)]
        lz4: bool,
    },
    /// Run every catalog algorithm over many seeds and audit the results.
    Check {
        /// Number of seeds per algorithm.
        #[arg(long, default_value_t = 64)]
        seeds: u64,
        /// Dataset size.
        #[arg(long, default_value_t = 24)]
        n: usize,
    },
    /// Print an example configuration file.
    ExampleConfig,
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// Catalog topic (defaults to the config file's).
    topic: Option<String>,
    /// Algorithm slug (defaults to the config file's).
    slug: Option<String>,
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Share-link query string, e.g. "step=3&speed=1.5&n=16&seed=42".
    #[arg(long)]
    params: Option<String>,
    /// Dataset size.
    #[arg(long)]
    n: Option<usize>,
    /// Dataset seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Dataset shape (random, reversed, nearly-sorted, few-unique, gaussian).
    #[arg(long)]
    shape: Option<DatasetShape>,
    /// Starting frame.
    #[arg(long)]
    step: Option<usize>,
    /// Playback speed in frames per second.
    #[arg(long)]
    speed: Option<f64>,
    /// Draw with ASCII glyphs only.
    #[arg(long)]
    ascii: bool,
}

impl SessionArgs {
    fn theme(&self) -> Theme {
        if self.ascii {
            Theme::ascii()
        } else {
            Theme::default()
        }
    }
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let cli = Cli::parse();
    let catalog = Catalog::with_builtins();

    match cli.cmd {
        Command::List { topic } => cmd_list(&catalog, topic.as_deref()),
        Command::Run { session, summary } => cmd_run(&catalog, &session, summary),
        Command::Play { session, backward } => cmd_play(&catalog, &session, backward),
        Command::Export { session, out, lz4 } => cmd_export(&catalog, &session, out, lz4),
        Command::Check { seeds, n } => cmd_check(&catalog, seeds, n),
        Command::ExampleConfig => print_example_config(),
    }
}

fn fail(message: impl Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn load_config(args: &SessionArgs) -> (VisualizerConfig, SessionParams) {
    let mut config = match &args.config {
        Some(path) => {
            let config_str = fs::read_to_string(path)
                .unwrap_or_else(|e| fail(format!("reading config file: {}", e)));
            serde_json::from_str(&config_str)
                .unwrap_or_else(|e| fail(format!("parsing config: {}", e)))
        }
        None => VisualizerConfig::default(),
    };

    // Precedence: config file, then --params, then explicit flags.
    let mut params = SessionParams {
        step: 0,
        speed: config.playback.speed,
        n: config.dataset.n,
        seed: config.dataset.seed,
    };
    if let Some(query) = &args.params {
        params.apply_query(query);
    }
    if let Some(step) = args.step {
        params.step = step;
    }
    if let Some(speed) = args.speed {
        params.speed = speed;
    }
    if let Some(n) = args.n {
        params.n = n;
    }
    if let Some(seed) = args.seed {
        params.seed = seed;
    }

    if let Some(topic) = &args.topic {
        config.topic = topic.clone();
    }
    if let Some(slug) = &args.slug {
        config.slug = slug.clone();
    }
    if let Some(shape) = args.shape {
        config.dataset.shape = shape;
    }
    config.dataset.n = params.n;
    config.dataset.seed = params.seed;
    config.playback.speed = params.speed;

    if let Err(e) = config.validate() {
        fail(format!("invalid configuration: {}", e));
    }
    (config, params)
}

fn open_session(catalog: &Catalog, args: &SessionArgs) -> (VisualizerConfig, Session) {
    let (config, params) = load_config(args);
    let mut session = Session::open_with_dataset(
        catalog,
        &config.topic,
        &config.slug,
        config.dataset.clone(),
        params,
    );

    match session.resolve() {
        SessionStatus::Ready { .. } => {}
        SessionStatus::NotFound => fail(format!(
            "no algorithm {}/{} (try `stepviz list`)",
            config.topic, config.slug
        )),
        SessionStatus::Unavailable { reason } | SessionStatus::Invalid { reason } => {
            fail(reason)
        }
        SessionStatus::Loading => fail("algorithm did not load"),
    }
    (config, session)
}

fn session_timeline(session: &Session) -> Timeline {
    session
        .controller()
        .map(|c| c.timeline().clone())
        .unwrap_or_else(|| fail("session has no timeline"))
}

fn print_frame(index: usize, total: usize, frame: &Frame, theme: &Theme) {
    println!("Frame {}/{}", index, total.saturating_sub(1));
    print!("{}", TextRenderer::default().render(frame, theme));
}

fn cmd_list(catalog: &Catalog, topic: Option<&str>) {
    let topics: Vec<&str> = match topic {
        Some(t) => vec![t],
        None => catalog.topics().collect(),
    };

    for topic in topics {
        println!("{}", topic);
        let entries = catalog.list(topic);
        if entries.is_empty() {
            println!("  (no algorithms yet)");
        }
        for entry in entries {
            let meta = &entry.meta;
            println!(
                "  {:<16} {:<16} avg {:<12} space {:<6} {:?}",
                meta.slug, meta.title, meta.complexity.average, meta.complexity.space, meta.difficulty
            );
        }
    }
}

fn cmd_run(catalog: &Catalog, args: &SessionArgs, summary: bool) {
    let (config, session) = open_session(catalog, args);
    let timeline = session_timeline(&session);
    let theme = args.theme();

    println!("{}/{}", config.topic, config.slug);
    println!("Input: {:?}", session.input());
    println!("Share: ?{}", session.params().to_query());
    println!();

    if !summary {
        if args.step.is_some() || args.params.is_some() {
            // A position was requested: show just that frame.
            if let Some(frame) = session.current_frame() {
                let index = session.controller().map_or(0, |c| c.index());
                print_frame(index, timeline.len(), frame, &theme);
            }
        } else {
            for (i, frame) in timeline.iter().enumerate() {
                print_frame(i, timeline.len(), frame, &theme);
                println!();
            }
        }
    }

    println!("Frames: {}", timeline.len());
    if let Some(last) = timeline.last() {
        for (key, value) in last.counters.iter() {
            println!("  {}: {}", key, value);
        }
        println!("  sorted: {}", last.is_sorted());
    }
}

fn cmd_play(catalog: &Catalog, args: &SessionArgs, backward: bool) {
    let (config, mut session) = open_session(catalog, args);
    let theme = args.theme();
    let clock = SystemClock::new(config.playback.tick_hz);
    let Some(controller) = session.controller_mut() else {
        fail("session has no timeline");
    };

    if backward || config.playback.backward {
        if args.step.is_none() {
            controller.to_end();
        }
        controller.play_backward();
    } else {
        controller.play_forward();
    }

    let draw = |controller: &playback::PlaybackController| {
        if let Some(frame) = controller.current_frame() {
            // Clear screen and home the cursor.
            print!("\x1b[2J\x1b[H");
            print_frame(controller.index(), controller.timeline().len(), frame, &theme);
        }
    };

    draw(&*controller);
    let start = Instant::now();
    let report = playback::run(controller, &clock, |c, outcome| {
        if outcome.moved {
            draw(c);
        }
        ControlFlow::Continue(())
    });

    println!();
    println!(
        "Played {} frames in {:.1}s ({} ticks)",
        report.frames_advanced,
        start.elapsed().as_secs_f32(),
        report.ticks
    );
    println!("Share: ?{}", session.params().to_query());
}

fn cmd_export(catalog: &Catalog, args: &SessionArgs, out: PathBuf, lz4: bool) {
    let (_, session) = open_session(catalog, args);
    let timeline = session_timeline(&session);

    let recorder_config = RecorderConfig {
        compression: if lz4 {
            CompressionType::Lz4
        } else {
            CompressionType::None
        },
        ..Default::default()
    };

    let stats = TimelineRecorder::record_timeline(&out, &timeline, recorder_config)
        .unwrap_or_else(|e| fail(format!("writing {}: {}", out.display(), e)));
    println!("Wrote {}: {}", out.display(), stats);
}

fn cmd_check(catalog: &Catalog, seeds: u64, n: usize) {
    let inputs: Vec<Vec<f64>> = (0..seeds).map(|s| DatasetSpec::new(n, s).generate()).collect();
    let start = Instant::now();
    let mut failures = 0usize;

    for entry in catalog.entries() {
        let name = format!("{}/{}", entry.meta.topic, entry.meta.slug);
        let algorithm = match entry.load() {
            Ok(algorithm) => algorithm,
            Err(e) => {
                println!("FAIL {:<28} {}", name, e);
                failures += 1;
                continue;
            }
        };

        let results = materialize_many(algorithm.as_ref(), &inputs);
        let mut frames = 0usize;
        let mut problems = Vec::new();
        for (seed, result) in results.iter().enumerate() {
            match result {
                Ok(timeline) => {
                    frames += timeline.len();
                    if let Some(problem) = audit(&entry.meta.topic, &inputs[seed], timeline) {
                        problems.push(format!("seed {}: {}", seed, problem));
                    }
                }
                Err(e) => problems.push(format!("seed {}: {}", seed, e)),
            }
        }

        if problems.is_empty() {
            println!("ok   {:<28} {} frames over {} seeds", name, frames, seeds);
        } else {
            failures += 1;
            println!("FAIL {:<28} {}", name, problems.join("; "));
        }
    }

    println!("Checked in {:.2}s", start.elapsed().as_secs_f32());
    if failures > 0 {
        std::process::exit(1);
    }
}

/// First violated timeline property, if any.
fn audit(topic: &str, input: &[f64], timeline: &Timeline) -> Option<String> {
    let (Some(first), Some(last)) = (timeline.first(), timeline.last()) else {
        return Some("empty timeline".to_string());
    };
    if first.array != input {
        return Some("first frame differs from the input".to_string());
    }
    if timeline.iter().any(|f| f.array.len() != input.len()) {
        return Some("frame length changed".to_string());
    }
    if let Some(i) = timeline
        .as_slice()
        .windows(2)
        .position(|w| !w[1].counters.dominates(&w[0].counters))
    {
        return Some(format!("counters decreased at frame {}", i + 1));
    }
    if topic == "sorting" && !last.is_sorted() {
        return Some("final frame is not sorted".to_string());
    }
    None
}

fn print_example_config() {
    let config = VisualizerConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}
