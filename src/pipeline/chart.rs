use time::{Date, Month};

use crate::pipeline::DayBucket;

/// The upper bound of a day chart's value axis: the largest total plus 15%
/// headroom, rounded up to the next thousand.
///
/// Returns 1000 when there is nothing to show.
pub fn chart_domain_max(buckets: &[DayBucket]) -> f64 {
    let max_total = buckets
        .iter()
        .map(|bucket| bucket.total_amount)
        .fold(0.0_f64, f64::max);

    if max_total <= 0.0 {
        return 1000.0;
    }

    (max_total * 1.15 / 1000.0).ceil() * 1000.0
}

/// Axis label for a day, e.g. "1st Mar" or "22nd Mar".
pub fn day_label(date: Date) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };

    format!("{day}{suffix} {}", short_month_name(date.month()))
}

fn short_month_name(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::pipeline::{DayBucket, chart_domain_max, day_label};

    fn bucket(total_amount: f64) -> DayBucket {
        DayBucket {
            date: date!(2024 - 03 - 01),
            total_amount,
            details: Vec::new(),
        }
    }

    #[test]
    fn domain_max_adds_headroom_and_rounds_up() {
        assert_eq!(chart_domain_max(&[bucket(1500.0), bucket(200.0)]), 2000.0);
        assert_eq!(chart_domain_max(&[bucket(900.0)]), 2000.0);
        assert_eq!(chart_domain_max(&[bucket(10.0)]), 1000.0);
    }

    #[test]
    fn domain_max_defaults_to_one_thousand() {
        assert_eq!(chart_domain_max(&[]), 1000.0);
        assert_eq!(chart_domain_max(&[bucket(0.0)]), 1000.0);
    }

    #[test]
    fn day_labels_use_ordinal_suffixes() {
        assert_eq!(day_label(date!(2024 - 03 - 01)), "1st Mar");
        assert_eq!(day_label(date!(2024 - 03 - 02)), "2nd Mar");
        assert_eq!(day_label(date!(2024 - 03 - 03)), "3rd Mar");
        assert_eq!(day_label(date!(2024 - 03 - 11)), "11th Mar");
        assert_eq!(day_label(date!(2024 - 03 - 13)), "13th Mar");
        assert_eq!(day_label(date!(2024 - 03 - 22)), "22nd Mar");
        assert_eq!(day_label(date!(2024 - 12 - 31)), "31st Dec");
    }
}
