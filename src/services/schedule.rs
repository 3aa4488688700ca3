//! Schedule tier classification
//!
//! Rows on alternate-day delivery only run on their rotation days. The
//! classification is a pure function of the row, the weekday and the view
//! context; callers pass `today` explicitly so tests can pin the clock.

use chrono::{Datelike, Local, Weekday};

use crate::types::{DeliveryAlt, Row, Tier, ViewContext, WEEKDAY_DELIVERY};

/// Rotation days for `alt1` rows
pub const ALT1_DAYS: [Weekday; 4] = [Weekday::Mon, Weekday::Wed, Weekday::Fri, Weekday::Sun];

/// Rotation days for `alt2` rows
pub const ALT2_DAYS: [Weekday; 3] = [Weekday::Tue, Weekday::Thu, Weekday::Sat];

/// Days a `Weekday` delivery is skipped in the tiered view
const WEEKDAY_DELIVERY_OFF_DAYS: [Weekday; 2] = [Weekday::Fri, Weekday::Sat];

/// Classify a row into its schedule tier for `today`.
pub fn classify(row: &Row, today: Weekday, context: ViewContext) -> Tier {
    if !row.active || row.delivery_alt == DeliveryAlt::Inactive {
        return Tier::Inactive;
    }

    // The plain view only separates active from inactive rows
    if !context.tiered {
        return Tier::OnSchedule;
    }

    match row.delivery_alt {
        DeliveryAlt::Alt1 if !ALT1_DAYS.contains(&today) => return Tier::OffSchedule,
        DeliveryAlt::Alt2 if !ALT2_DAYS.contains(&today) => return Tier::OffSchedule,
        _ => {}
    }

    if row.delivery == WEEKDAY_DELIVERY && WEEKDAY_DELIVERY_OFF_DAYS.contains(&today) {
        return Tier::OffSchedule;
    }

    Tier::OnSchedule
}

/// Weekday from a 0 = Sunday .. 6 = Saturday index
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// 0 = Sunday .. 6 = Saturday index of a weekday
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

/// Current weekday from the local wall clock
pub fn local_weekday() -> Weekday {
    Local::now().weekday()
}
