use chrono::{DateTime, Local, Utc};
use std::time::Duration;

/// 按给定格式把 UTC 时间显示为本地时间
pub fn format_datetime(time: DateTime<Utc>, format: &str) -> String {
    time.with_timezone(&Local).format(format).to_string()
}

/// 格式化耗时 (例如: "1.25 秒")
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();

    match millis {
        0..=999 => format!("{} 毫秒", millis),
        1000..=59_999 => format!("{:.2} 秒", duration.as_secs_f64()),
        _ => format!("{} 分 {} 秒", duration.as_secs() / 60, duration.as_secs() % 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_datetime() {
        let formatted = format_datetime(Utc::now(), "%Y-%m-%d %H:%M:%S");
        assert!(formatted.contains("-"));
        assert!(formatted.contains(":"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250 毫秒");
        assert_eq!(format_duration(Duration::from_millis(1250)), "1.25 秒");
        assert_eq!(format_duration(Duration::from_secs(125)), "2 分 5 秒");
    }
}
