//! Overdue fine calculation

use chrono::{DateTime, Utc};

/// Compute the fine for a returned book.
///
/// No fine if `returned_at` is on or before `due_date`. Otherwise both
/// instants are truncated to their UTC calendar day and the whole-day
/// difference is charged at `fine_per_day`, with a minimum of one day. The
/// truncation means a return past the due instant but on the same calendar
/// day is charged exactly one day, never a fractional or zero fine.
pub fn overdue_fine(due_date: DateTime<Utc>, returned_at: DateTime<Utc>, fine_per_day: i64) -> i64 {
    if returned_at <= due_date {
        return 0;
    }

    let days_late = (returned_at.date_naive() - due_date.date_naive())
        .num_days()
        .max(1);

    days_late * fine_per_day
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const RATE: i64 = 10;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn no_fine_when_returned_before_due() {
        let due = at(2024, 3, 15, 12, 0);
        assert_eq!(overdue_fine(due, due - Duration::days(3), RATE), 0);
    }

    #[test]
    fn no_fine_when_returned_exactly_at_due() {
        let due = at(2024, 3, 15, 12, 0);
        assert_eq!(overdue_fine(due, due, RATE), 0);
    }

    #[test]
    fn same_calendar_day_past_due_charges_one_day() {
        // Due at noon, returned at 23:30 the same day: one full day's fine,
        // never zero or fractional.
        let due = at(2024, 3, 15, 12, 0);
        let returned = at(2024, 3, 15, 23, 30);
        assert_eq!(overdue_fine(due, returned, RATE), RATE);
    }

    #[test]
    fn next_day_early_morning_charges_one_day() {
        let due = at(2024, 3, 15, 23, 0);
        let returned = at(2024, 3, 16, 1, 0);
        assert_eq!(overdue_fine(due, returned, RATE), RATE);
    }

    #[test]
    fn six_days_late() {
        // Scenario: 14-day loan returned 20 days after checkout.
        let checkout_at = at(2024, 3, 1, 9, 0);
        let due = checkout_at + Duration::days(14);
        let returned = checkout_at + Duration::days(20);
        assert_eq!(overdue_fine(due, returned, RATE), 6 * RATE);
    }

    #[test]
    fn fine_grows_in_whole_day_steps() {
        let due = at(2024, 3, 15, 12, 0);
        let mut previous = 0;
        for days in 1..=30 {
            let fine = overdue_fine(due, due + Duration::days(days), RATE);
            assert_eq!(fine, days * RATE);
            assert!(fine > previous);
            previous = fine;
        }
    }
}
