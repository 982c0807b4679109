use crate::models::EventRecord;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};

/// Check whether a record is published
///
/// Only an explicit `false` flag hides a record.
#[inline]
pub fn is_record_visible(event: &EventRecord) -> bool {
    event.is_visible
}

/// Check whether an event starts today or later
///
/// The start date is compared at day granularity in the site's time zone,
/// so an event that started this morning is still upcoming. Events without
/// a parseable start date never are.
#[inline]
pub fn is_upcoming(event: &EventRecord, today: NaiveDate, offset: FixedOffset) -> bool {
    event
        .start_date
        .map(|start| start.with_timezone(&offset).date_naive() >= today)
        .unwrap_or(false)
}

/// Visibility plus, optionally, the upcoming check
#[inline]
pub fn is_relevant(
    event: &EventRecord,
    today: NaiveDate,
    offset: FixedOffset,
    upcoming_only: bool,
) -> bool {
    is_record_visible(event) && (!upcoming_only || is_upcoming(event, today, offset))
}

/// Offset for a whole-hour time zone, UTC when out of range
pub fn site_offset(hours: i32) -> FixedOffset {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// Current calendar day at the given UTC offset
pub fn today_at(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}
