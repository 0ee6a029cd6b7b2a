//! Display helpers for torrent records. All pure.

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const KIB: f64 = 1024.0;

/// Human-readable byte count in binary units with two decimals.
///
/// `0 → "0 B"`, `1024 → "1.00 KB"`. Plain bytes have no fraction
/// (`512 → "512 B"`); anything past TB stays in TB.
pub fn format_size(bytes: f64) -> String {
    if !bytes.is_finite() || bytes <= 0.0 {
        return "0 B".to_string();
    }
    let mut value = bytes;
    let mut unit = 0;
    while value >= KIB && unit < SIZE_UNITS.len() - 1 {
        value /= KIB;
        unit += 1;
    }
    if unit == 0 {
        format!("{:.0} {}", value, SIZE_UNITS[0])
    } else {
        format!("{:.2} {}", value, SIZE_UNITS[unit])
    }
}

/// Transfer rate, e.g. `"1.50 MB/s"`.
pub fn format_rate(bytes_per_sec: f64) -> String {
    format!("{}/s", format_size(bytes_per_sec))
}

/// Zero-padded `HH:MM:SS`. Absent or zero renders as `"00:00:00"`;
/// hours keep counting past 99.
pub fn format_duration(seconds: Option<f64>) -> String {
    let secs = match seconds {
        Some(s) if s.is_finite() && s > 0.0 => s.floor() as u64,
        _ => 0,
    };
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Progress percentage with one decimal, e.g. `"42.5%"`.
pub fn format_progress(progress: f64) -> String {
    format!("{:.1}%", progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_units() {
        assert_eq!(format_size(0.0), "0 B");
        assert_eq!(format_size(512.0), "512 B");
        assert_eq!(format_size(1024.0), "1.00 KB");
        assert_eq!(format_size(1536.0), "1.50 KB");
        assert_eq!(format_size(1024.0 * 1024.0), "1.00 MB");
        assert_eq!(format_size(3.0 * 1024.0 * 1024.0 * 1024.0), "3.00 GB");
        assert_eq!(format_size(2048.0 * 1024f64.powi(4)), "2048.00 TB");
    }

    #[test]
    fn size_rejects_garbage() {
        assert_eq!(format_size(-5.0), "0 B");
        assert_eq!(format_size(f64::NAN), "0 B");
    }

    #[test]
    fn rate_suffix() {
        assert_eq!(format_rate(0.0), "0 B/s");
        assert_eq!(format_rate(2048.0), "2.00 KB/s");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(None), "00:00:00");
        assert_eq!(format_duration(Some(0.0)), "00:00:00");
        assert_eq!(format_duration(Some(3661.0)), "01:01:01");
        assert_eq!(format_duration(Some(59.9)), "00:00:59");
        assert_eq!(format_duration(Some(360_000.0)), "100:00:00");
    }

    #[test]
    fn progress_one_decimal() {
        assert_eq!(format_progress(42.0), "42.0%");
        assert_eq!(format_progress(99.96), "100.0%");
    }
}
