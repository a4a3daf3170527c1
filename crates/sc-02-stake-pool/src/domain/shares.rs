//! Share-price conversion math
//!
//! All conversions run through U256 intermediates so `amount * shares`
//! products cannot overflow, and every division floors toward the protocol:
//! a conversion can round a participant's claim down by a dust unit but can
//! never mint value out of thin air.

use primitive_types::U256;
use shared_types::{Amount, Shares};

/// `a * b / d` with a U256 intermediate, flooring. `None` on division by
/// zero or if the result exceeds `u128::MAX`.
pub fn mul_div(a: u128, b: u128, d: u128) -> Option<u128> {
    if d == 0 {
        return None;
    }
    let result = U256::from(a) * U256::from(b) / U256::from(d);
    if result > U256::from(u128::MAX) {
        None
    } else {
        Some(result.as_u128())
    }
}

/// `ceil(a * b / d)` with a U256 intermediate.
pub fn mul_div_ceil(a: u128, b: u128, d: u128) -> Option<u128> {
    if d == 0 {
        return None;
    }
    let num = U256::from(a) * U256::from(b) + U256::from(d - 1);
    let result = num / U256::from(d);
    if result > U256::from(u128::MAX) {
        None
    } else {
        Some(result.as_u128())
    }
}

/// Shares minted for depositing `amount` into a bucket currently holding
/// `total_pooled` against `total_shares` outstanding.
///
/// An empty bucket prices 1:1. The caller decides what a zero result means
/// (external deposits reject it; internal moves floor the mint at one).
pub fn shares_for_deposit(amount: Amount, total_shares: Shares, total_pooled: Amount) -> Option<Shares> {
    if total_shares == 0 || total_pooled == 0 {
        return Some(amount);
    }
    mul_div(amount, total_shares, total_pooled)
}

/// Redeemable amount for `shares` of a bucket, flooring.
pub fn amount_for_shares(shares: Shares, total_shares: Shares, total_pooled: Amount) -> Option<Amount> {
    if total_shares == 0 {
        return Some(0);
    }
    mul_div(shares, total_pooled, total_shares)
}

/// Shares that must be burned to withdraw at least `amount`, ceiling so the
/// rounding loss stays on the withdrawing side.
pub fn shares_for_amount_ceil(amount: Amount, total_shares: Shares, total_pooled: Amount) -> Option<Shares> {
    if total_pooled == 0 {
        return Some(0);
    }
    mul_div_ceil(amount, total_shares, total_pooled)
}
