mod config;
mod detection;
mod output;
mod pipeline;
mod segmentation;
mod video;

use anyhow::{Context, Result};
use clap::Parser;
use config::PipelineConfig;
use output::OverlayRenderer;
use pipeline::{FrameAnalysis, HandPipeline};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use video::{ImageSequenceSink, ImageSequenceSource, VideoSink, VideoSource};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the input frame sequence
    #[arg(short, long, default_value = "hand_frames")]
    input: PathBuf,

    /// Directory the annotated frames are written to
    #[arg(short, long, default_value = "output_frames")]
    output: PathBuf,

    /// Directory holding the direction icons (none.png, stay.png, arrow.png)
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Path to the overlay font (TTF)
    #[arg(long, default_value = "assets/font.ttf")]
    font: PathBuf,

    /// Analyze every n-th frame; the rest replay the previous annotations
    #[arg(long, default_value_t = 3)]
    skip_frames: u64,

    /// Number of random frames averaged into the background model
    #[arg(long, default_value_t = 30)]
    background_samples: u32,

    /// Minimum dominant-axis displacement in pixels to count as movement
    #[arg(long, default_value_t = 11)]
    movement_threshold: i32,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("Handtrack starting");

    let config = PipelineConfig {
        skip_frames: args.skip_frames.max(1),
        background_sample_frames: args.background_samples,
        movement_threshold: args.movement_threshold,
        ..PipelineConfig::default()
    };

    let mut source =
        ImageSequenceSource::open(&args.input).context("Failed to open input frame sequence")?;
    let (width, height) = source.dimensions();
    tracing::info!(
        "Input: {} frames at {}x{}",
        source.frame_count(),
        width,
        height
    );

    let mut sink = ImageSequenceSink::create(&args.output)
        .context("Failed to create output frame directory")?;

    let overlay =
        OverlayRenderer::load(&args.font, &args.assets).context("Failed to load overlay assets")?;

    tracing::info!("Building background model");
    let mut rng = rand::thread_rng();
    let mut pipeline = HandPipeline::bootstrap(&mut source, config, &mut rng)
        .context("Failed to build the background model")?;

    run_loop(&mut source, &mut sink, &overlay, &mut pipeline)
}

fn run_loop<S, K>(
    source: &mut S,
    sink: &mut K,
    overlay: &OverlayRenderer,
    pipeline: &mut HandPipeline,
) -> Result<()>
where
    S: VideoSource + ?Sized,
    K: VideoSink + ?Sized,
{
    let skip_frames = pipeline.config().skip_frames;
    let mut frame_num = 1u64;
    let mut analyzed = 0u64;
    let mut total_analyze_time = Duration::ZERO;
    let mut total_output_time = Duration::ZERO;
    let mut last = FrameAnalysis::default();

    tracing::info!(
        "Starting frame loop (analyzing every {} frames)",
        skip_frames
    );

    loop {
        let Some(frame) = source.read_frame().context("Failed to decode frame")? else {
            break;
        };

        // Skipped frames replay the previous results so the output stays
        // annotated at full frame rate.
        if frame_num % skip_frames == 0 {
            let analyze_start = Instant::now();
            last = pipeline.analyze(&frame);
            total_analyze_time += analyze_start.elapsed();
            analyzed += 1;
        }

        let mut annotated = frame;
        overlay.annotate(&mut annotated, &last.hand, last.bounding_box, last.direction);

        let output_start = Instant::now();
        sink.write_frame(&annotated)
            .context("Failed to write output frame")?;
        total_output_time += output_start.elapsed();

        if analyzed > 0 && frame_num % (skip_frames * 30) == 0 {
            let avg_analyze_ms = total_analyze_time.as_secs_f64() * 1000.0 / analyzed as f64;
            let avg_write_ms = total_output_time.as_secs_f64() * 1000.0 / frame_num as f64;
            tracing::info!(
                "Frame {}: analyze={:.1}ms avg, write={:.1}ms avg, {}",
                frame_num,
                avg_analyze_ms,
                avg_write_ms,
                describe(&last)
            );
        }

        frame_num += 1;
    }

    tracing::info!(
        "Done: {} frames written, {} analyzed",
        frame_num - 1,
        analyzed
    );
    Ok(())
}

fn describe(analysis: &FrameAnalysis) -> String {
    if analysis.hand.is_detected() {
        format!(
            "hand at ({}, {}) showing {} finger(s), {:?}",
            analysis.hand.location.0,
            analysis.hand.location.1,
            analysis.hand.fingers,
            analysis.direction
        )
    } else {
        "no hand".to_string()
    }
}
