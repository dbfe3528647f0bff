//! Registration payment lifecycle.
//!
//! A registration starts unconfirmed with a payment status fixed by the option the
//! student picked. An admin later flips `confirmed` to true after checking the
//! screenshot by hand; that is the only transition and it is terminal.

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::{PaymentOption, PaymentStatus, Registration};

/// Token amount, in rupees, that reserves a seat.
pub const SEAT_LOCK_AMOUNT: i64 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentPlan {
    pub price_offered: i64,
    pub amount_paid: i64,
    pub payment_status: PaymentStatus,
}

/// Amounts recorded at submission. `amount_paid` is what the student says they paid.
pub fn plan_payment(option: PaymentOption, price_offered: i64) -> PaymentPlan {
    match option {
        PaymentOption::Full => PaymentPlan {
            price_offered,
            amount_paid: price_offered,
            payment_status: PaymentStatus::FullPaymentPending,
        },
        PaymentOption::SeatLock => PaymentPlan {
            price_offered,
            amount_paid: SEAT_LOCK_AMOUNT,
            payment_status: PaymentStatus::SeatLockPending,
        },
    }
}

pub fn confirm(registration: &mut Registration, at: DateTime<Utc>) -> Result<(), AppError> {
    if registration.confirmed {
        return Err(AppError::Conflict(format!(
            "registration '{}' is already confirmed",
            registration.id
        )));
    }
    registration.confirmed = true;
    registration.confirmed_at = Some(at);
    Ok(())
}

pub fn status_label(registration: &Registration) -> &'static str {
    if registration.confirmed {
        return "Confirmed";
    }
    match registration.payment_status {
        PaymentStatus::SeatLockPending => "Seat locked, balance due",
        PaymentStatus::FullPaymentPending => "Payment under review",
    }
}

pub fn balance_due(registration: &Registration) -> i64 {
    (registration.price_offered - registration.amount_paid).max(0)
}
