use chrono::NaiveDate;

/// `Monday, January 1, 2024`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// `1/1/2024`
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Label for the fixed date buttons: `Today`, `Tomorrow` or the long form.
pub fn relative_day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => format_long_date(date),
    }
}

pub fn parse_input_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(format_long_date(date), "Monday, January 1, 2024");
        assert_eq!(format_short_date(date), "1/1/2024");
        assert_eq!(relative_day_label(date, date), "Today");
        assert_eq!(relative_day_label(date.succ_opt().unwrap(), date), "Tomorrow");
        assert_eq!(parse_input_date("2024-01-01"), Some(date));
        assert_eq!(parse_input_date(""), None);
    }
}
