use chrono::NaiveDateTime;

/// Quiz clock as `MM:SS`; minutes keep growing past an hour.
#[must_use]
pub fn format_timer(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Question counter such as `01 / 15`.
#[must_use]
pub fn format_progress(position: usize, total: usize) -> String {
    format!("{position:02} / {total:02}")
}

#[must_use]
pub fn format_duration(seconds: u64) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    if minutes == 0 {
        format!("{remainder}s")
    } else {
        format!("{minutes}m {remainder}s")
    }
}

#[must_use]
pub fn format_attempt_time(value: NaiveDateTime) -> String {
    value.format("%d %b %Y, %H:%M").to_string()
}
