use chrono::{Local, NaiveDateTime, SubsecRound};

/// Current local time at the one-second precision the stores keep.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Renders a countdown as `MM:SS`.
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn now_has_no_fractional_seconds() {
        assert_eq!(now().nanosecond(), 0);
    }

    #[test]
    fn countdown_format() {
        assert_eq!(format_countdown(300), "05:00");
        assert_eq!(format_countdown(61), "01:01");
        assert_eq!(format_countdown(0), "00:00");
    }
}
