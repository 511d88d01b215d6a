//! Display helpers shared by cards and activity lists.

use chrono::{DateTime, Utc};

/// Render `timestamp` as `Mar 5, 2:07 PM`.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %-I:%M %p").to_string()
}

/// Render a team size as `1 member` / `3 members`.
#[must_use]
pub fn member_count_label(count: u32) -> String {
    if count == 1 {
        "1 member".to_owned()
    } else {
        format!("{count} members")
    }
}

/// Render a role count as `1 open role` / `2 open roles`.
#[must_use]
pub fn open_roles_label(count: u32) -> String {
    if count == 1 {
        "1 open role".to_owned()
    } else {
        format!("{count} open roles")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case(2025, 3, 5, 14, 7, "Mar 5, 2:07 PM")]
    #[case(2025, 12, 25, 0, 30, "Dec 25, 12:30 AM")]
    #[case(2024, 7, 14, 12, 0, "Jul 14, 12:00 PM")]
    fn formats_short_month_and_twelve_hour_clock(
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
        #[case] hour: u32,
        #[case] minute: u32,
        #[case] expected: &str,
    ) {
        let timestamp = Utc
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .expect("valid timestamp");
        assert_eq!(format_timestamp(timestamp), expected);
    }

    #[rstest]
    #[case(0, "0 members")]
    #[case(1, "1 member")]
    #[case(4, "4 members")]
    fn pluralises_members(#[case] count: u32, #[case] expected: &str) {
        assert_eq!(member_count_label(count), expected);
    }

    #[rstest]
    #[case(1, "1 open role")]
    #[case(2, "2 open roles")]
    fn pluralises_roles(#[case] count: u32, #[case] expected: &str) {
        assert_eq!(open_roles_label(count), expected);
    }
}
