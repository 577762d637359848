const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;
const GB: f64 = (1024 * 1024 * 1024) as f64;

/// Round to one decimal place.
pub fn round_1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Round to two decimal places.
pub fn round_2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Bytes to whole megabytes, rounding to the nearest integer.
pub fn bytes_to_mb(bytes: u64) -> u64 {
    bytes / MB + u64::from(bytes % MB >= MB / 2)
}

/// Bytes to gigabytes rounded to two decimals.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    round_2(bytes as f64 / GB)
}

/// Kilobytes to whole megabytes, rounding to the nearest integer.
pub fn kb_to_mb(kb: u64) -> u64 {
    kb / KB + u64::from(kb % KB >= KB / 2)
}

/// Integer percentage of `part / whole`, 0 when `whole` is 0.
pub fn percent_of(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mb_conversion_rounds_to_nearest() {
        assert_eq!(bytes_to_mb(0), 0);
        assert_eq!(bytes_to_mb(MB - 1), 1);
        assert_eq!(bytes_to_mb(MB / 2 - 1), 0);
        assert_eq!(bytes_to_mb(MB / 2), 1);
        assert_eq!(bytes_to_mb(3 * MB + MB / 3), 3);
    }

    #[test]
    fn kb_conversion_rounds_to_nearest() {
        assert_eq!(kb_to_mb(511), 0);
        assert_eq!(kb_to_mb(512), 1);
        assert_eq!(kb_to_mb(204_800), 200);
    }

    #[test]
    fn gb_conversion_keeps_two_decimals() {
        assert_eq!(bytes_to_gb(8 * 1024 * MB), 8.0);
        assert_eq!(bytes_to_gb(1536 * MB), 1.5);
        assert_eq!(bytes_to_gb(1_000_000_000), 0.93);
    }

    #[test]
    fn percent_handles_zero_total() {
        assert_eq!(percent_of(5, 0), 0);
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 67);
    }
}
