//! Linear unlock curve over Unix seconds (integer math, floor rounding).
//! - elapsed = now - start, or 0 while now <= start
//! - vested = total once elapsed >= duration (inclusive at the end boundary)
//! - otherwise vested = floor(total * elapsed / duration)

use crate::error::VaultError;

/// Seconds elapsed since `start_ts`; zero at or before the start.
pub fn elapsed_secs(now_ts: i64, start_ts: i64) -> u64 {
    if now_ts <= start_ts {
        return 0;
    }
    now_ts.abs_diff(start_ts)
}

pub fn linear_vested(
    total: u64,
    start_ts: i64,
    duration: u64,
    now_ts: i64,
) -> Result<u64, VaultError> {
    if duration == 0 {
        return Err(VaultError::InvalidDuration);
    }
    let elapsed = elapsed_secs(now_ts, start_ts);
    if elapsed >= duration {
        return Ok(total);
    }
    // u128 keeps total * elapsed exact; elapsed < duration so the quotient < total.
    let v = (total as u128)
        .checked_mul(elapsed as u128)
        .ok_or(VaultError::MathOverflow)?
        / (duration as u128);
    u64::try_from(v).map_err(|_| VaultError::MathOverflow)
}

/// Timestamp at which the schedule is fully vested.
pub fn vesting_end(start_ts: i64, duration: u64) -> Result<i64, VaultError> {
    let d = i64::try_from(duration).map_err(|_| VaultError::MathOverflow)?;
    start_ts.checked_add(d).ok_or(VaultError::MathOverflow)
}

pub fn is_after_vesting_end(now_ts: i64, start_ts: i64, duration: u64) -> bool {
    elapsed_secs(now_ts, start_ts) >= duration
}
