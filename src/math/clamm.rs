// BigInt concentrated-liquidity math: tick <-> sqrt price, liquidity/amount
// deltas, and the mint-amount inverse used by the yield estimator.
// ------------------------------------------------------------------------
// Rounding semantics match the reference pool contracts (two-step ceil for
// token0). BigInt is used end-to-end so intermediates never overflow; callers
// convert from chain words at the seam with `u256_to_bigint`.

use ethers::types::U256;
use num_bigint::{BigInt, Sign};
use num_traits::{One, ToPrimitive, Zero};

pub const MIN_TICK: i32 = -887_272;
pub const MAX_TICK: i32 = 887_272;
const Q96_U128: u128 = 1u128 << 96;

#[inline]
fn bu128(v: u128) -> BigInt {
    BigInt::from(v)
}

#[inline]
fn ceil_div(a: &BigInt, b: &BigInt) -> BigInt {
    // assumes a>=0, b>0
    if a.is_zero() {
        return BigInt::zero();
    }
    (a + (b - BigInt::one())) / b
}

/// Widens a 256-bit chain word into a BigInt (always non-negative).
pub fn u256_to_bigint(u: U256) -> BigInt {
    let mut buf = [0u8; 32];
    u.to_big_endian(&mut buf);
    BigInt::from_bytes_be(Sign::Plus, &buf)
}

// -------------------------------- Tick math --------------------------------

/// Exact TickMath.getSqrtRatioAtTick (Q64.96 integer), ported with canonical constants.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> BigInt {
    assert!((MIN_TICK..=MAX_TICK).contains(&tick), "tick out of range");
    let abs_tick = tick.unsigned_abs();

    // ratio is Q128.128
    let mut ratio = if abs_tick & 0x1 != 0 {
        BigInt::parse_bytes(b"fffcb933bd6fad37aa2d162d1a594001", 16)
            .expect("Failed to parse BigInt constant")
    } else {
        BigInt::one() << 128
    };

    macro_rules! ms {
        ($hex:literal, $cond:expr) => {
            if $cond {
                ratio = (&ratio
                    * BigInt::parse_bytes($hex.as_bytes(), 16)
                        .expect(&format!("Failed to parse BigInt constant: {}", $hex)))
                    >> 128;
            }
        };
    }

    ms!("fff97272373d413259a46990580e213a", (abs_tick & 0x2) != 0);
    ms!("fff2e50f5f656932ef12357cf3c7fdcc", (abs_tick & 0x4) != 0);
    ms!("ffe5caca7e10e4e61c3624eaa0941cd0", (abs_tick & 0x8) != 0);
    ms!("ffcb9843d60f6159c9db58835c926644", (abs_tick & 0x10) != 0);
    ms!("ff973b41fa98c081472e6896dfb254c0", (abs_tick & 0x20) != 0);
    ms!("ff2ea16466c96a3843ec78b326b52861", (abs_tick & 0x40) != 0);
    ms!("fe5dee046a99a2a811c461f1969c3053", (abs_tick & 0x80) != 0);
    ms!("fcbe86c7900a88aedcffc83b479aa3a4", (abs_tick & 0x100) != 0);
    ms!("f987a7253ac413176f2b074cf7815e54", (abs_tick & 0x200) != 0);
    ms!("f3392b0822b70005940c7a398e4b70f3", (abs_tick & 0x400) != 0);
    ms!("e7159475a2c29b7443b29c7fa6e889d9", (abs_tick & 0x800) != 0);
    ms!("d097f3bdfd2022b8845ad8f792aa5825", (abs_tick & 0x1000) != 0);
    ms!("a9f746462d870fdf8a65dc1f90e061e5", (abs_tick & 0x2000) != 0);
    ms!("70d869a156d2a1b890bb3df62baf32f7", (abs_tick & 0x4000) != 0);
    ms!("31be135f97d08fd981231505542fcfa6", (abs_tick & 0x8000) != 0);
    ms!("09aa508b5b7a84e1c677de54f3e99bc9", (abs_tick & 0x10000) != 0);
    ms!("05d6af8dedb81196699c329225ee604", (abs_tick & 0x20000) != 0);
    ms!("2216e584f5fa1ea926041bedfe98", (abs_tick & 0x40000) != 0);
    ms!("48a170391f7dc42444e8fa2", (abs_tick & 0x80000) != 0);

    if tick > 0 {
        let max = (BigInt::one() << 256) - 1;
        ratio = max / ratio;
    }
    // round-up shift by 32 (Q128.128 -> Q64.96)
    (&ratio + ((BigInt::one() << 32) - 1)) >> 32
}

// --------------------------- SqrtPriceMath deltas ---------------------------

/// Uniswap-exact rounding:
/// amount0 =
///   if round_up:
///     ceil( ceil( (L << 96) * (sb - sa) / sb ) / sa )
///   else:
///     floor( floor( (L << 96) * (sb - sa) / sb ) / sa )
pub fn amount0_delta(
    sqrt_ratio_a_x96: &BigInt,
    sqrt_ratio_b_x96: &BigInt,
    liquidity: &BigInt,
    round_up: bool,
) -> BigInt {
    if liquidity.is_zero() {
        return BigInt::zero();
    }
    let (sa, sb) = if sqrt_ratio_a_x96 < sqrt_ratio_b_x96 {
        (sqrt_ratio_a_x96.clone(), sqrt_ratio_b_x96.clone())
    } else {
        (sqrt_ratio_b_x96.clone(), sqrt_ratio_a_x96.clone())
    };
    if sa.is_zero() || sa == sb {
        return BigInt::zero();
    }

    let numerator1 = liquidity << 96;
    let numerator2 = &sb - &sa;

    if round_up {
        // ceil( ceil(n1*n2 / sb) / sa )
        let t = ceil_div(&(&numerator1 * &numerator2), &sb);
        ceil_div(&t, &sa)
    } else {
        // floor( floor(n1*n2 / sb) / sa )
        ((&numerator1 * &numerator2) / &sb) / &sa
    }
}

/// Uniswap-exact rounding:
/// amount1 =
///   if round_up: ceil( L * (sb - sa) / Q96 )
///   else:       floor( L * (sb - sa) / Q96 )
pub fn amount1_delta(
    sqrt_ratio_a_x96: &BigInt,
    sqrt_ratio_b_x96: &BigInt,
    liquidity: &BigInt,
    round_up: bool,
) -> BigInt {
    if liquidity.is_zero() {
        return BigInt::zero();
    }
    let (sa, sb) = if sqrt_ratio_a_x96 < sqrt_ratio_b_x96 {
        (sqrt_ratio_a_x96.clone(), sqrt_ratio_b_x96.clone())
    } else {
        (sqrt_ratio_b_x96.clone(), sqrt_ratio_a_x96.clone())
    };
    if sa == sb {
        return BigInt::zero();
    }

    let num = liquidity * (sb - sa);
    let den = bu128(Q96_U128);
    if round_up {
        ceil_div(&num, &den)
    } else {
        num / den
    }
}

// ------------------------------ Mint amounts --------------------------------

/// Token amounts a pool demands to mint `liquidity` into [tick_lower,
/// tick_upper], both rounded up. Three cases depending on where the current
/// price sits relative to the range:
///   below  -> all token0
///   inside -> token0 above current price, token1 below it
///   above  -> all token1
pub fn mint_amounts(
    tick_current: i32,
    sqrt_price_x96: &BigInt,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: &BigInt,
) -> (BigInt, BigInt) {
    let sqrt_lower = get_sqrt_ratio_at_tick(tick_lower);
    let sqrt_upper = get_sqrt_ratio_at_tick(tick_upper);

    if tick_current < tick_lower {
        (
            amount0_delta(&sqrt_lower, &sqrt_upper, liquidity, true),
            BigInt::zero(),
        )
    } else if tick_current < tick_upper {
        (
            amount0_delta(sqrt_price_x96, &sqrt_upper, liquidity, true),
            amount1_delta(&sqrt_lower, sqrt_price_x96, liquidity, true),
        )
    } else {
        (
            BigInt::zero(),
            amount1_delta(&sqrt_lower, &sqrt_upper, liquidity, true),
        )
    }
}

// --------------------------------- Prices -----------------------------------

/// Human price of token0 denominated in token1, from a Q64.96 sqrt price.
pub fn token0_price(sqrt_price_x96: &BigInt, dec0: u8, dec1: u8) -> f64 {
    let s = sqrt_price_x96.to_f64().unwrap_or(0.0) / ((1u128 << 96) as f64);
    let price_raw = s * s;
    price_raw * 10f64.powi(dec0 as i32 - dec1 as i32)
}

/// Human price of token1 denominated in token0.
pub fn token1_price(sqrt_price_x96: &BigInt, dec0: u8, dec1: u8) -> f64 {
    let p0 = token0_price(sqrt_price_x96, dec0, dec1);
    if p0 == 0.0 {
        0.0
    } else {
        1.0 / p0
    }
}

// ---------------------------------- Tests ------------------------------------
