//! 16.16 fixed-point arithmetic.
//!
//! Every quantity that can influence a reel build or a committed result
//! (distances, scale factors, deltas) is an integer-backed `Fixed`.
//! Peers replay the same inputs and must land on bit-identical reels, so
//! no `f32` is allowed anywhere in the odds math.

/// 16.16 fixed-point value. 1.0 == `FRACUNIT`.
pub type Fixed = i32;

/// One whole unit.
pub const FRACUNIT: Fixed = 1 << 16;

pub const FRACBITS: u32 = 16;

/// Fixed-point multiply: (a * b) >> 16, widened through i64.
#[inline(always)]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    ((a as i64 * b as i64) >> FRACBITS) as Fixed
}

/// Fixed-point divide: (a << 16) / b, widened through i64.
///
/// Division by zero returns 0 in release builds; the odds math guards
/// its divisors, so a zero here is a caller bug.
#[inline(always)]
pub fn fixed_div(a: Fixed, b: Fixed) -> Fixed {
    debug_assert!(b != 0, "fixed_div by zero");
    if b == 0 {
        return 0;
    }
    (((a as i64) << FRACBITS) / b as i64) as Fixed
}

/// Integer to fixed.
#[inline(always)]
pub const fn fixed_int(v: i32) -> Fixed {
    v * FRACUNIT
}

/// Fixed to integer, truncating toward zero.
#[inline(always)]
pub const fn fixed_to_int(v: Fixed) -> i32 {
    v / FRACUNIT
}

#[inline(always)]
pub fn fixed_abs(v: Fixed) -> Fixed {
    v.abs()
}

#[inline(always)]
pub fn fixed_clamp(v: Fixed, min: Fixed, max: Fixed) -> Fixed {
    v.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_identity() {
        assert_eq!(fixed_mul(fixed_int(7), FRACUNIT), fixed_int(7));
    }

    #[test]
    fn test_mul_fraction() {
        // 6 * 0.5 = 3
        assert_eq!(fixed_mul(fixed_int(6), FRACUNIT / 2), fixed_int(3));
    }

    #[test]
    fn test_div() {
        assert_eq!(fixed_div(fixed_int(10), fixed_int(2)), fixed_int(5));
        // 1 / 4 = 0.25
        assert_eq!(fixed_div(FRACUNIT, fixed_int(4)), FRACUNIT / 4);
    }

    #[test]
    fn test_div_by_zero_release_path() {
        // debug_assert fires in debug; the release contract is "return 0"
        if !cfg!(debug_assertions) {
            assert_eq!(fixed_div(FRACUNIT, 0), 0);
        }
    }

    #[test]
    fn test_round_trip() {
        for v in [-300, -1, 0, 1, 12345] {
            assert_eq!(fixed_to_int(fixed_int(v)), v);
        }
    }

    #[test]
    fn test_large_distance_no_overflow() {
        // 15000 units is the clamp ceiling for captured distances; products
        // must survive a 2x lobby scale factor without wrapping.
        let d = fixed_int(15_000);
        let scaled = fixed_mul(d, 2 * FRACUNIT);
        assert_eq!(scaled, fixed_int(30_000));
    }
}
