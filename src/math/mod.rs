pub mod math_helpers;
pub mod price_math;
pub mod range_ratio;
pub mod sqrt_price_math;
pub mod swap_math;
pub mod tick_math;
