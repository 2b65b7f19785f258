//! Trading-session checks.
//!
//! | Market | Session (exchange local) | Days |
//! |--------|--------------------------|------|
//! | Crypto | always open | every day |
//! | Indian | 09:15 - 15:30 IST (UTC+5:30) | Mon - Fri |
//! | Global | 09:30 - 16:00 US Eastern, fixed at UTC-4 | Mon - Fri |
//! | Commodity | whole day | Mon - Fri |
//!
//! Session bounds are inclusive. Exchange holidays are not modelled.

use time::macros::{offset, time};
use time::{OffsetDateTime, Time, UtcOffset, Weekday};

use crate::MarketType;

const IST: UtcOffset = offset!(+5:30);
const US_EASTERN: UtcOffset = offset!(-4);

/// Whether `market` is trading at instant `now`.
pub fn is_market_open(market: MarketType, now: OffsetDateTime) -> bool {
    match market {
        MarketType::Crypto => true,
        MarketType::Indian => in_session(now.to_offset(IST), time!(9:15), time!(15:30)),
        MarketType::Global => in_session(now.to_offset(US_EASTERN), time!(9:30), time!(16:00)),
        MarketType::Commodity => is_weekday(now.to_offset(US_EASTERN).weekday()),
    }
}

fn in_session(local: OffsetDateTime, open: Time, close: Time) -> bool {
    is_weekday(local.weekday()) && (open..=close).contains(&local.time())
}

fn is_weekday(day: Weekday) -> bool {
    !matches!(day, Weekday::Saturday | Weekday::Sunday)
}
