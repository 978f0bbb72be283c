use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

/// Root of the recording tree inside each session subfolder.
pub const VIDEO_ROOT_DIR_NAME: &str = "CARDV";
/// Primary recording directory beneath the video root.
pub const MOVIE_DIR_NAME: &str = "MOVIE_A";
/// Nested read-only ("locked") recording directory.
pub const SECONDARY_DIR_NAME: &str = "RO";

/// Recording filenames start with their 14-digit start time, e.g.
/// `20230101100005_A.MP4`.
const VIDEO_FILE_PATTERN: &str = r"(?i)^(\d{14})_.*\.mp4$";
const VIDEO_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Which of the two recording locations a video was found in. Annotation
/// only (renderers color by it); no ordering meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VideoTag {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoEntry {
    pub timestamp: NaiveDateTime,
    /// Link target for downstream renderers, relative to the session root.
    /// Not the filesystem path the scan used.
    pub path: String,
    pub tag: VideoTag,
}

/// Time-sorted index of recording start times, one entry per distinct
/// timestamp. Built once per session subfolder and read-only afterwards.
#[derive(Debug, Default)]
pub struct VideoIndex {
    entries: BTreeMap<NaiveDateTime, VideoEntry>,
}

impl VideoIndex {
    /// Scan the primary and secondary recording directories beneath
    /// `cardv_dir` and index every file whose name carries a valid 14-digit
    /// start timestamp. `relative_base` is the prefix for the constructed
    /// link paths. Missing directories and unmatchable filenames are simply
    /// absent from the result.
    pub fn build(cardv_dir: &Path, relative_base: &str) -> VideoIndex {
        let pattern = Regex::new(VIDEO_FILE_PATTERN).expect("video filename pattern is valid");

        let movie_dir = cardv_dir.join(MOVIE_DIR_NAME);
        let locations = [
            (VideoTag::Primary, movie_dir.clone(), None),
            (
                VideoTag::Secondary,
                movie_dir.join(SECONDARY_DIR_NAME),
                Some(SECONDARY_DIR_NAME),
            ),
        ];

        let mut entries = BTreeMap::new();

        for (tag, scan_dir, subdir) in locations {
            for entry in WalkDir::new(&scan_dir)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                let Some(file_name) = entry.file_name().to_str() else {
                    continue;
                };
                let Some(captures) = pattern.captures(file_name) else {
                    continue;
                };
                let Ok(timestamp) =
                    NaiveDateTime::parse_from_str(&captures[1], VIDEO_TIMESTAMP_FORMAT)
                else {
                    continue;
                };

                let mut parts = vec![relative_base, VIDEO_ROOT_DIR_NAME, MOVIE_DIR_NAME];
                parts.extend(subdir);
                parts.push(file_name);

                // later-scanned entries overwrite earlier ones on a
                // timestamp collision
                entries.insert(
                    timestamp,
                    VideoEntry {
                        timestamp,
                        path: parts.join("/"),
                        tag,
                    },
                );
            }
        }

        VideoIndex { entries }
    }

    /// The last recording that had started by `timestamp`: the entry with
    /// the greatest start time not exceeding the query, or `None` if every
    /// entry starts later (or the index is empty).
    pub fn find_active(&self, timestamp: NaiveDateTime) -> Option<&VideoEntry> {
        self.entries.range(..=timestamp).next_back().map(|(_, e)| e)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<VideoEntry> for VideoIndex {
    fn from_iter<I: IntoIterator<Item = VideoEntry>>(iter: I) -> Self {
        VideoIndex {
            entries: iter.into_iter().map(|e| (e.timestamp, e)).collect(),
        }
    }
}
