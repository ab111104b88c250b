// crates/soul-core/src/math.rs
//
// Fixed-point helpers shared by the ledger and the vault.
//
// Amounts carry 18 decimals, and scaled rates and share counts carry about
// as many, so the product of two of them regularly exceeds u128 even when
// the final quotient is small. `mul_div` forms the exact 256-bit product and
// divides it down, failing only when the quotient itself does not fit.

use crate::error::SoulError;

/// `a * b / denominator`, floored, computed through a 256-bit product.
///
/// # Errors
/// Returns `SoulError::Arithmetic` naming `operation` when `denominator` is
/// zero or the quotient exceeds `u128::MAX`.
pub fn mul_div(a: u128, b: u128, denominator: u128, operation: &str) -> Result<u128, SoulError> {
    if denominator == 0 {
        return Err(SoulError::Arithmetic(format!(
            "division by zero in {}",
            operation
        )));
    }
    let (hi, lo) = wide_mul(a, b);
    if hi == 0 {
        return Ok(lo / denominator);
    }
    if hi >= denominator {
        return Err(SoulError::overflow(operation));
    }

    // Shift-subtract long division of hi:lo. `rem < denominator` holds at the
    // top of every step, so the quotient fits in 128 bits.
    let mut rem = hi;
    let mut quotient: u128 = 0;
    for bit in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> bit) & 1);
        quotient <<= 1;
        if carry == 1 || rem >= denominator {
            rem = rem.wrapping_sub(denominator);
            quotient |= 1;
        }
    }
    Ok(quotient)
}

/// Full 256-bit product as `(high, low)` halves.
fn wide_mul(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = u64::MAX as u128;
    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    let mid = (ll >> 64) + (lh & MASK) + (hl & MASK);
    let lo = (ll & MASK) | (mid << 64);
    let hi = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (hi, lo)
}
