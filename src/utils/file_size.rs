pub struct FileSizeUtils;

impl FileSizeUtils {
    /// Formats a byte count the way the upload list shows it: `0 Bytes`,
    /// `512 Bytes`, `1.5 KB`, `2 MB`. Two decimals at most, trailing zeros dropped.
    pub fn format_size(size: u64) -> String {
        const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
        if size == 0 {
            return "0 Bytes".to_string();
        }

        let mut value = size as f64;
        let mut unit_index = 0;

        while value >= 1024.0 && unit_index < UNITS.len() - 1 {
            value /= 1024.0;
            unit_index += 1;
        }

        let rounded = format!("{:.2}", value);
        let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
        format!("{} {}", trimmed, UNITS[unit_index])
    }
}
