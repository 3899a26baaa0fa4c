//! SM-2 spaced repetition scheduling.
//!
//! Quality grades (0-5):
//! - 0: complete blackout
//! - 1-2: wrong answer, the card goes back to the start
//! - 3: correct with serious difficulty
//! - 4: correct after hesitation
//! - 5: perfect recall

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};

use crate::data::models::ReviewRecord;

pub const MIN_QUALITY: i32 = 0;
pub const MAX_QUALITY: i32 = 5;
/// Grades at or above this count as remembered.
pub const PASSING_QUALITY: i32 = 3;
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Grades `record` against the current UTC time.
pub fn grade(record: ReviewRecord, quality: i32) -> ReviewRecord {
    grade_at(record, quality, Utc::now().naive_utc())
}

/// Applies one review with the given `quality` and stamps `now` as the
/// review time. Out-of-range grades are clamped to 0..=5.
///
/// The ease factor has no lower bound; only the interval is kept at 1 or
/// more.
pub fn grade_at(mut record: ReviewRecord, quality: i32, now: NaiveDateTime) -> ReviewRecord {
    let quality = quality.clamp(MIN_QUALITY, MAX_QUALITY);
    let repetitions = record.repetitions.max(0);

    if quality >= PASSING_QUALITY {
        record.interval = match repetitions {
            0 => 1,
            1 => 6,
            _ => next_interval(record.interval, record.ease_factor),
        };

        // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
        let miss = f64::from(MAX_QUALITY - quality);
        record.ease_factor += 0.1 - miss * (0.08 + miss * 0.02);
        record.repetitions = repetitions.saturating_add(1);
    } else {
        record.repetitions = 0;
        record.interval = 1;
    }

    record.last_reviewed = now;
    record
}

fn next_interval(interval: i32, ease_factor: f64) -> i32 {
    // `as` saturates and maps NaN to 0.
    ((f64::from(interval) * ease_factor).round() as i32).max(1)
}

/// First calendar date (UTC) on which the card is due again.
pub fn due_date(record: &ReviewRecord) -> NaiveDate {
    record
        .last_reviewed
        .date()
        .checked_add_signed(Duration::days(i64::from(record.interval)))
        .unwrap_or(NaiveDate::MAX)
}

/// Due once `now` has reached the due date; the time of day is ignored.
pub fn is_due(record: &ReviewRecord, now: NaiveDateTime) -> bool {
    now.date() >= due_date(record)
}
