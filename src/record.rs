use chrono::NaiveDateTime;
use geo::Point;
use serde::Serialize;

pub const LOG_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// One validated GPS fix from a dashcam log line.
///
/// The position is carried as a `geo::Point` in `(x = longitude, y = latitude)`
/// order, signed degrees (south negative, east positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpsRecord {
    pub position: Point<f64>,
    pub timestamp: NaiveDateTime,
}

impl GpsRecord {
    pub fn latitude(&self) -> f64 {
        self.position.y()
    }

    pub fn longitude(&self) -> f64 {
        self.position.x()
    }
}

/// Parse one raw log line into a `GpsRecord`.
///
/// The dashcam writes whitespace-separated rows like
/// `2023/01/01 10:00:00 S:16.930000 E:145.440000 A:12.3 0.0km/h ...`.
/// The `km/h` marker in field 5 tells a data row apart from headers and
/// corrupt lines. The `S:` magnitude is flipped to signed-south degrees; the
/// `E:` magnitude is used as-is. Anything that does not fit is noise, not an
/// error, so every failure mode is `None`.
pub fn parse_line(line: &str) -> Option<GpsRecord> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.len() < 6 || !parts[5].contains("km/h") {
        return None;
    }

    let lat_field = parts[2].strip_prefix("S:")?;
    let lon_field = parts[3].strip_prefix("E:")?;

    let lat: f64 = lat_field.parse().ok()?;
    let lon: f64 = lon_field.parse().ok()?;

    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }

    let timestamp =
        NaiveDateTime::parse_from_str(&format!("{} {}", parts[0], parts[1]), LOG_TIMESTAMP_FORMAT)
            .ok()?;

    Some(GpsRecord {
        // southern hemisphere is logged as a positive magnitude
        position: Point::new(lon, -lat),
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const VALID_LINE: &str = "2023/01/01 10:00:00 S:16.930000 E:145.440000 A:12.0 0.0km/h";

    #[test]
    fn parses_valid_line() {
        let record = parse_line(VALID_LINE).unwrap();

        assert_eq!(record.latitude(), -16.93);
        assert_eq!(record.longitude(), 145.44);
        assert_eq!(
            record.timestamp,
            NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn south_latitude_is_negated() {
        let record = parse_line(VALID_LINE).unwrap();
        assert!(record.latitude() <= 0.0);
    }

    #[test]
    fn tolerates_extra_whitespace() {
        let line = "2023/01/01  10:00:00   S:16.930000 E:145.440000 A:12.0  0.0km/h";
        assert!(parse_line(line).is_some());
    }

    #[test]
    fn rejects_short_line() {
        assert!(parse_line("2023/01/01 10:00:00 S:16.93 E:145.44").is_none());
        assert!(parse_line("").is_none());
    }

    #[test]
    fn rejects_missing_speed_marker() {
        let line = "2023/01/01 10:00:00 S:16.930000 E:145.440000 A:12.0 0.0mph";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn rejects_wrong_coordinate_prefixes() {
        let line = "2023/01/01 10:00:00 N:16.930000 E:145.440000 A:12.0 0.0km/h";
        assert!(parse_line(line).is_none());
        let line = "2023/01/01 10:00:00 S:16.930000 W:145.440000 A:12.0 0.0km/h";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn rejects_non_numeric_coordinate() {
        let line = "2023/01/01 10:00:00 S:abc E:145.440000 A:12.0 0.0km/h";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn rejects_non_finite_coordinate() {
        let line = "2023/01/01 10:00:00 S:inf E:145.440000 A:12.0 0.0km/h";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn rejects_malformed_date() {
        let line = "2023/13/01 10:00:00 S:16.930000 E:145.440000 A:12.0 0.0km/h";
        assert!(parse_line(line).is_none());
        let line = "2023-01-01 10:00:00 S:16.930000 E:145.440000 A:12.0 0.0km/h";
        assert!(parse_line(line).is_none());
    }
}
