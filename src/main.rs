use anyhow::{Context, Result, ensure};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use dashcam_tracks::{FilterConfig, session};

/// Reconstruct cleaned movement tracks from dashcam GPS logs, each point
/// correlated with the recording that was being captured at that moment.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the session root folder
    #[arg(long, default_value = "demo")]
    input: PathBuf,

    /// Output JSON filename, written inside the input folder
    #[arg(long, default_value = "dashcam_tracks.json")]
    output: String,

    /// Maximum allowed GPS jump in kilometers
    #[arg(long, default_value_t = 0.5)]
    max_jump: f64,

    /// Minimum time (seconds) between GPS points
    #[arg(long, default_value_t = 6.0)]
    downsample: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    ensure!(
        args.input.is_dir(),
        "input directory '{}' does not exist",
        args.input.display()
    );

    let output_path = args.input.join(&args.output);

    println!("Building tracks from: {}", args.input.display());
    println!(
        "Max jump: {} km | Downsample: {} s",
        args.max_jump, args.downsample
    );

    let filter = FilterConfig {
        max_jump_km: args.max_jump,
        min_interval_secs: args.downsample,
    };

    let output = session::run(&args.input, &filter)?;

    for failure in &output.failures {
        println!("✗ Skipped {}: {}", failure.path.display(), failure.reason);
    }

    let total_points: usize = output.segments.iter().map(|s| s.points.len()).sum();
    let line_eligible = output
        .segments
        .iter()
        .filter(|s| s.is_line_eligible())
        .count();
    let matched_points = output
        .segments
        .iter()
        .flat_map(|s| &s.points)
        .filter(|p| p.matched_video.is_some())
        .count();

    println!("\n--- Summary ---");
    println!(
        "Built {} segments ({} line-eligible), {} retained points ({} matched to a recording)",
        output.segments.len(),
        line_eligible,
        total_points,
        matched_points
    );

    let file = File::create(&output_path)
        .with_context(|| format!("failed to create {}", output_path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &output.segments)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    println!(
        "✓ Wrote {} segments to {}",
        output.segments.len(),
        output_path.display()
    );

    Ok(())
}
