use anyhow::{Context, Result, ensure};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::track::{FilterConfig, TrackSegment, build_track};
use crate::video::{VIDEO_ROOT_DIR_NAME, VideoIndex};

/// GPS log directory expected inside each session subfolder.
pub const GPS_DIR_NAME: &str = "GPSdata";
/// Extension the dashcam gives its GPS logs.
pub const GPS_FILE_EXTENSION: &str = "TXT";

/// A log file that could not be processed. The rest of the session carries
/// on without it.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct SessionOutput {
    pub segments: Vec<TrackSegment>,
    pub failures: Vec<FileFailure>,
}

fn is_gps_log(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == GPS_FILE_EXTENSION)
}

/// Immediate children of `dir`, sorted by file name so repeated runs over
/// unchanged input enumerate identically.
fn immediate_children(dir: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
}

fn process_log_file(
    path: &Path,
    index: &VideoIndex,
    filter: &FilterConfig,
) -> Result<TrackSegment> {
    let source_file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read GPS log {}", path.display()))?;

    Ok(build_track(&source_file, contents.lines(), index, filter))
}

/// Process every session subfolder beneath `session_root`: subfolders that
/// hold both a `GPSdata` and a `CARDV` directory get one video index and one
/// track segment per `.TXT` log; anything else is skipped. Log files within
/// a subfolder are independent of each other and run in parallel, sharing
/// only the read-only index. Per-file failures are collected, not fatal.
pub fn run(session_root: &Path, filter: &FilterConfig) -> Result<SessionOutput> {
    ensure!(
        session_root.is_dir(),
        "session root '{}' does not exist",
        session_root.display()
    );

    let mut output = SessionOutput::default();

    for subfolder in immediate_children(session_root).filter(|e| e.file_type().is_dir()) {
        let gps_dir = subfolder.path().join(GPS_DIR_NAME);
        let cardv_dir = subfolder.path().join(VIDEO_ROOT_DIR_NAME);

        if !gps_dir.is_dir() || !cardv_dir.is_dir() {
            continue;
        }

        let relative_base = subfolder.file_name().to_string_lossy();
        let index = VideoIndex::build(&cardv_dir, &relative_base);

        let gps_files: Vec<PathBuf> = immediate_children(&gps_dir)
            .filter(|e| e.file_type().is_file() && is_gps_log(e.path()))
            .map(|e| e.into_path())
            .collect();

        if gps_files.is_empty() {
            continue;
        }

        println!(
            "Processing {} GPS logs in {} ({} indexed recordings)...",
            gps_files.len(),
            subfolder.path().display(),
            index.len()
        );

        let results: Vec<(PathBuf, Result<TrackSegment>)> = gps_files
            .into_par_iter()
            .progress()
            .map(|path| {
                let result = process_log_file(&path, &index, filter);
                (path, result)
            })
            .collect();

        for (path, result) in results {
            match result {
                Ok(segment) => output.segments.push(segment),
                Err(err) => output.failures.push(FileFailure {
                    path,
                    reason: format!("{err:#}"),
                }),
            }
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gps_log_predicate_is_extension_exact() {
        assert!(is_gps_log(Path::new("GPSdata/20230101.TXT")));
        assert!(!is_gps_log(Path::new("GPSdata/20230101.txt")));
        assert!(!is_gps_log(Path::new("GPSdata/20230101.LOG")));
        assert!(!is_gps_log(Path::new("GPSdata/TXT")));
    }
}
