pub mod distance;
pub mod record;
pub mod session;
pub mod track;
pub mod video;

pub use record::GpsRecord;
pub use session::{FileFailure, SessionOutput};
pub use track::{FilterConfig, TrackPoint, TrackSegment};
pub use video::{VideoEntry, VideoIndex, VideoTag};
