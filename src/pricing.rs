//! Price resolution for catalog display and registration quotes.

use serde::Serialize;

use crate::models::Course;

pub const BUNDLE_COURSE_ID: &str = "bundle";
pub const BUNDLE_COURSE_NAME: &str = "Combined Course Bundle";
pub const BUNDLE_BASE_PRICE: i64 = 3999;
pub const BUNDLE_SPECIAL_OFFER_PRICE: i64 = 2499;
/// Confirmed bundle registrations allowed at the special offer price.
pub const BUNDLE_OFFER_SLOTS: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedPrice {
    pub base_price: Option<i64>,
    pub effective_price: Option<i64>,
    pub discount_percent: i64,
}

fn present(price: Option<i64>) -> Option<i64> {
    price.filter(|p| *p > 0)
}

/// Special offer beats early bird, early bird beats base.
pub fn effective_price(
    base: Option<i64>,
    early_bird: Option<i64>,
    special_offer: Option<i64>,
) -> Option<i64> {
    present(special_offer)
        .or_else(|| present(early_bird))
        .or_else(|| present(base))
}

pub fn discount_percent(base: Option<i64>, effective: Option<i64>) -> i64 {
    match (present(base), present(effective)) {
        (Some(base), Some(effective)) if effective < base => {
            let pct = (base - effective) as f64 / base as f64 * 100.0;
            pct.round() as i64
        }
        _ => 0,
    }
}

pub fn resolve(course: &Course) -> ResolvedPrice {
    let base = Some(course.base_price);
    let effective = effective_price(base, course.early_bird_price, course.special_offer_price);
    ResolvedPrice {
        base_price: present(base),
        effective_price: effective,
        discount_percent: discount_percent(base, effective),
    }
}

pub fn bundle_price(confirmed_bundle_registrations: i64) -> i64 {
    if confirmed_bundle_registrations < BUNDLE_OFFER_SLOTS {
        BUNDLE_SPECIAL_OFFER_PRICE
    } else {
        BUNDLE_BASE_PRICE
    }
}
