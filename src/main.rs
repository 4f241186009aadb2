mod capture;
mod output;
mod overlay;
mod tracking;

use anyhow::{ensure, Context, Result};
use capture::{CaptureSource, WebcamCapture};
use clap::Parser;
use image::{imageops, Rgb, RgbImage};
use output::{OutputSink, V4L2Output};
use std::time::{Duration, Instant};
use tracking::{RoiBounds, StatusLabel, TrackingConfig, TrackingSession};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input webcam device index
    #[arg(short, long, default_value_t = 0)]
    input_device: u32,

    /// Output v4l2loopback device path
    #[arg(short, long, default_value = "/dev/video10")]
    output_device: String,

    /// Frame width the pipeline works at
    #[arg(long, default_value_t = 400)]
    frame_width: u32,

    /// Frame height the pipeline works at
    #[arg(long, default_value_t = 300)]
    frame_height: u32,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Number of frames spent calibrating the background model
    #[arg(long, default_value_t = 30)]
    calibration_frames: u64,

    /// Background running-average blend weight, in (0, 1)
    #[arg(long, default_value_t = 0.5)]
    background_weight: f32,

    /// Minimum absolute pixel difference counted as foreground (0-255)
    #[arg(long, default_value_t = 18)]
    foreground_threshold: u8,

    /// Sample the centroid for wave detection every N frames
    #[arg(long, default_value_t = 6)]
    wave_interval: u64,

    /// Centroid displacement in pixels that counts as waving
    #[arg(long, default_value_t = 3)]
    wave_threshold: i32,

    /// Detection region override: left edge (default: half the frame width)
    #[arg(long)]
    roi_left: Option<u32>,

    /// Detection region override: top edge (default: 0)
    #[arg(long)]
    roi_top: Option<u32>,

    /// Detection region override: right edge (default: the frame width)
    #[arg(long)]
    roi_right: Option<u32>,

    /// Detection region override: bottom edge (default: two thirds of the frame height)
    #[arg(long)]
    roi_bottom: Option<u32>,

    /// Output the binary segmentation mask instead of the camera view
    #[arg(long)]
    show_mask: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn roi(&self) -> RoiBounds {
        let defaults = RoiBounds::for_frame(self.frame_width, self.frame_height);
        RoiBounds {
            left: self.roi_left.unwrap_or(defaults.left),
            top: self.roi_top.unwrap_or(defaults.top),
            right: self.roi_right.unwrap_or(defaults.right),
            bottom: self.roi_bottom.unwrap_or(defaults.bottom),
        }
    }

    fn tracking_config(&self) -> Result<TrackingConfig> {
        ensure!(
            self.background_weight > 0.0 && self.background_weight < 1.0,
            "background weight must be strictly between 0 and 1"
        );
        ensure!(self.wave_interval >= 1, "wave interval must be at least 1");
        let roi = self.roi();
        ensure!(
            roi.left < roi.right && roi.right <= self.frame_width,
            "ROI horizontal bounds must fit inside the frame"
        );
        ensure!(
            roi.top < roi.bottom && roi.bottom <= self.frame_height,
            "ROI vertical bounds must fit inside the frame"
        );
        Ok(TrackingConfig {
            roi,
            calibration_frames: self.calibration_frames,
            background_weight: self.background_weight,
            foreground_threshold: self.foreground_threshold,
            wave_interval: self.wave_interval,
            wave_threshold: self.wave_threshold,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("Handwave starting");
    tracing::info!("Frame size: {}x{}", args.frame_width, args.frame_height);
    tracing::info!("Target FPS: {}", args.fps);

    let config = args.tracking_config()?;
    tracing::info!(
        "Detection region: ({}, {})..({}, {}), calibrating for {} frames",
        config.roi.left,
        config.roi.top,
        config.roi.right,
        config.roi.bottom,
        config.calibration_frames
    );

    let mut capture = WebcamCapture::new(args.input_device, args.frame_width, args.frame_height)
        .context("Failed to initialize webcam capture")?;

    let mut output = V4L2Output::new(&args.output_device, args.frame_width, args.frame_height)
        .context("Failed to initialize v4l2loopback output")?;

    let session = TrackingSession::new(config);

    run_pipeline(&mut capture, &mut output, session, args.fps, args.show_mask)
}

fn run_pipeline<C, O>(
    capture: &mut C,
    output: &mut O,
    mut session: TrackingSession,
    target_fps: u32,
    show_mask: bool,
) -> Result<()>
where
    C: CaptureSource,
    O: OutputSink,
{
    let frame_duration = Duration::from_secs_f32(1.0 / target_fps as f32);
    let mut frame_count = 0u64;
    let mut total_capture_time = Duration::ZERO;
    let mut total_track_time = Duration::ZERO;
    let mut total_output_time = Duration::ZERO;
    let mut last_status: Option<StatusLabel> = None;

    tracing::info!("Starting main pipeline loop");
    if show_mask {
        tracing::info!("Mask view enabled");
    }
    tracing::info!("Press Ctrl+C to stop");

    loop {
        let loop_start = Instant::now();

        // Capture frame
        let capture_start = Instant::now();
        let mut frame = capture
            .capture_frame()
            .context("Failed to capture frame")?;
        let capture_time = capture_start.elapsed();
        total_capture_time += capture_time;

        // Track
        let track_start = Instant::now();
        let report = session
            .process(&frame)
            .context("Failed to process frame")?;
        let track_time = track_start.elapsed();
        total_track_time += track_time;

        if last_status != Some(report.status) {
            tracing::info!("Status: {}", report.status);
            last_status = Some(report.status);
        }

        // Annotate
        let output_frame = if show_mask {
            mask_view(&frame, &report)
        } else {
            if let Some(contour) = &report.contour {
                overlay::draw_contour(&mut frame, contour, &report.roi);
            }
            overlay::draw_status(&mut frame, &report.status.to_string());
            overlay::draw_roi_box(&mut frame, &report.roi);
            frame
        };

        // Output frame
        let output_start = Instant::now();
        output
            .write_frame(&output_frame)
            .context("Failed to write frame")?;
        let output_time = output_start.elapsed();
        total_output_time += output_time;

        frame_count += 1;

        // Log stats every 30 frames
        if frame_count % 30 == 0 {
            let avg_capture_ms = total_capture_time.as_secs_f64() * 1000.0 / frame_count as f64;
            let avg_track_ms = total_track_time.as_secs_f64() * 1000.0 / frame_count as f64;
            let avg_output_ms = total_output_time.as_secs_f64() * 1000.0 / frame_count as f64;
            let total_ms = avg_capture_ms + avg_track_ms + avg_output_ms;
            let actual_fps = 1000.0 / total_ms;

            tracing::info!(
                "Frame {}: capture={:.1}ms, track={:.1}ms, output={:.1}ms, total={:.1}ms, fps={:.1}",
                frame_count,
                avg_capture_ms,
                avg_track_ms,
                avg_output_ms,
                total_ms,
                actual_fps
            );
        }

        // Frame rate limiting
        let elapsed = loop_start.elapsed();
        if elapsed < frame_duration {
            std::thread::sleep(frame_duration - elapsed);
        }
    }
}

/// Builds the mask-view frame: the binary mask pasted at the detection
/// region's position on a black canvas, with the region outlined. Falls
/// back to a blank canvas while calibrating or when nothing was detected.
fn mask_view(frame: &RgbImage, report: &tracking::FrameReport) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(frame.width(), frame.height(), Rgb([0, 0, 0]));
    if let Some(mask) = &report.mask {
        let mask_rgb = overlay::mask_to_rgb(mask);
        imageops::replace(
            &mut canvas,
            &mask_rgb,
            report.roi.left as i64,
            report.roi.top as i64,
        );
    }
    overlay::draw_status(&mut canvas, &report.status.to_string());
    overlay::draw_roi_box(&mut canvas, &report.roi);
    canvas
}
