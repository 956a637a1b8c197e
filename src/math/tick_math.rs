use crate::error::StateError;
use crate::error::ZapError;
use alloy_primitives::U256;

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = -MIN_TICK;

pub const MIN_SQRT_RATIO: U256 = U256::from_limbs([4295128739, 0, 0, 0]);
pub const MAX_SQRT_RATIO: U256 =
    U256::from_limbs([6743328256752651558, 17280870778742802505, 4294805859, 0]);

/// Base of the tick grid: `price = 1.0001^tick`.
pub const TICK_BASE: f64 = 1.0001;

/// Returns the sqrt price (Q64.96 fixed‑point) at a given tick index,
/// or `StateError::TickOutOfBounds` if the tick is invalid.
///
/// Bit-for-bit the pool's `TickMath.getSqrtRatioAtTick`, so bounds derived
/// here compare exactly against prices reported by the quoter.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256, StateError> {
    let abs_tick = tick.unsigned_abs();

    if abs_tick > MAX_TICK as u32 {
        return Err(StateError::TickOutOfBounds);
    }

    let mut ratio = if abs_tick & 1 != 0 {
        U256::from_limbs([12262481743371124737, 18445821805675392311, 0, 0])
    } else {
        U256::from_limbs([0, 0, 1, 0])
    };

    macro_rules! apply_multiplier {
        ($bit:expr, $l0:expr, $l1:expr) => {
            if abs_tick & $bit != 0 {
                ratio = ratio.wrapping_mul(U256::from_limbs([$l0, $l1, 0, 0])) >> 128;
            }
        };
    }

    apply_multiplier!(2, 6459403834229662010, 18444899583751176498);
    apply_multiplier!(4, 17226890335427755468, 18443055278223354162);
    apply_multiplier!(8, 2032852871939366096, 18439367220385604838);
    apply_multiplier!(16, 14545316742740207172, 18431993317065449817);
    apply_multiplier!(32, 5129152022828963008, 18417254355718160513);
    apply_multiplier!(64, 4894419605888772193, 18387811781193591352);
    apply_multiplier!(128, 1280255884321894483, 18329067761203520168);
    apply_multiplier!(256, 15924666964335305636, 18212142134806087854);
    apply_multiplier!(512, 8010504389359918676, 17980523815641551639);
    apply_multiplier!(1024, 10668036004952895731, 17526086738831147013);
    apply_multiplier!(2048, 4878133418470705625, 16651378430235024244);
    apply_multiplier!(4096, 9537173718739605541, 15030750278693429944);
    apply_multiplier!(8192, 9972618978014552549, 12247334978882834399);
    apply_multiplier!(16384, 10428997489610666743, 8131365268884726200);
    apply_multiplier!(32768, 9305304367709015974, 3584323654723342297);
    apply_multiplier!(65536, 14301143598189091785, 696457651847595233);
    apply_multiplier!(131072, 7393154844743099908, 26294789957452057);
    apply_multiplier!(262144, 2209338891292245656, 37481735321082);
    apply_multiplier!(524288, 10518117631919034274, 76158723);

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    let lower_32_bits = (ratio.as_limbs()[0] & 0xFFFF_FFFF) as u32;
    Ok((ratio >> 32) + U256::from((lower_32_bits != 0) as u64))
}

/// Rounds a lower range bound down onto the spacing grid.
///
/// Already aligned ticks are returned unchanged.
pub fn align_lower(tick: i32, tick_spacing: i32) -> Result<i32, ZapError> {
    check_spacing(tick_spacing)?;
    Ok(tick.div_euclid(tick_spacing) * tick_spacing)
}

/// Rounds an upper range bound up onto the spacing grid.
pub fn align_upper(tick: i32, tick_spacing: i32) -> Result<i32, ZapError> {
    check_spacing(tick_spacing)?;
    let floored = tick.div_euclid(tick_spacing) * tick_spacing;
    Ok(if floored == tick {
        tick
    } else {
        floored + tick_spacing
    })
}

/// Derives aligned `(tick_lower, tick_upper)` for a symmetric fractional
/// price band `band` around `current_tick`, e.g. `0.05` for ±5%.
pub fn band_ticks(current_tick: i32, band: f64, tick_spacing: i32) -> Result<(i32, i32), ZapError> {
    if !(band > 0.0 && band < 1.0) {
        return Err(ZapError::NumericDomain("band must lie strictly between 0 and 1"));
    }

    let ln_base = TICK_BASE.ln();
    let down = ((1.0 - band).ln() / ln_base).floor();
    let up = ((1.0 + band).ln() / ln_base).floor();

    let raw_lower = (current_tick as f64 + down).max(MIN_TICK as f64) as i32;
    let raw_upper = (current_tick as f64 + up).min(MAX_TICK as f64) as i32;

    Ok((
        align_lower(raw_lower, tick_spacing)?,
        align_upper(raw_upper, tick_spacing)?,
    ))
}

fn check_spacing(tick_spacing: i32) -> Result<(), ZapError> {
    if tick_spacing <= 0 {
        return Err(ZapError::NumericDomain("tick spacing must be positive"));
    }
    Ok(())
}
