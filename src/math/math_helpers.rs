use crate::error::MathError;
use alloy_primitives::{U256, U512};

/// Computes `a * b / denominator` with a 512‑bit intermediate product,
/// returning a `MathError` on overflow or division by zero.
///
/// Same contract as Solidity `FullMath.mulDiv`: the quotient is floored
/// and must fit in 256 bits.
#[inline]
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    let (quotient, _) = wide_div_rem(a, b, denominator)?;
    Ok(quotient)
}

/// Like [`mul_div`], but rounds the result up when there is a
/// non‑zero remainder.
#[inline]
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    let (quotient, remainder) = wide_div_rem(a, b, denominator)?;

    if remainder.is_zero() {
        return Ok(quotient);
    }
    quotient.checked_add(U256::ONE).ok_or(MathError::Overflow)
}

/// Divides `a` by `b`, rounding the result up to the next integer
/// when there is a non‑zero remainder.
///
/// Panics on division by zero like primitive integer division, so
/// callers must ensure `b != 0`.
#[inline]
pub fn div_rounding_up(a: U256, b: U256) -> U256 {
    let (quotient, remainder) = a.div_rem(b);
    if remainder.is_zero() {
        quotient
    } else {
        quotient + U256::ONE
    }
}

fn wide_div_rem(a: U256, b: U256, denominator: U256) -> Result<(U256, U256), MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let product: U512 = a.widening_mul(b);
    let (quotient, remainder) = product.div_rem(U512::from(denominator));

    let q = quotient.as_limbs();
    if q[4..].iter().any(|limb| *limb != 0) {
        return Err(MathError::Overflow);
    }
    let r = remainder.as_limbs();

    Ok((
        U256::from_limbs([q[0], q[1], q[2], q[3]]),
        U256::from_limbs([r[0], r[1], r[2], r[3]]),
    ))
}
