//! Aspect-ratio preserving target dimensions.

/// Output dimensions for one thumbnail.
///
/// `width` is always the requested width. `height` is
/// `original_height / (original_width / width)` rounded half to even, computed
/// exactly with integers so that ties such as `2.5` land on the even neighbour
/// every time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    pub width: u32,
    pub height: u32,
}

impl ResizePlan {
    /// Returns `None` when either width is zero or the scaled height does not
    /// fit in a `u32`. Upscaling is allowed.
    pub fn compute(original_width: u32, original_height: u32, target_width: u32) -> Option<Self> {
        if original_width == 0 || target_width == 0 {
            return None;
        }

        let scaled = u64::from(original_height) * u64::from(target_width);
        let height = div_round_half_even(scaled, u64::from(original_width));

        Some(Self {
            width: target_width,
            height: u32::try_from(height).ok()?,
        })
    }
}

fn div_round_half_even(numerator: u64, denominator: u64) -> u64 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    // remainder < denominator <= u32::MAX, so doubling cannot overflow
    let twice = remainder * 2;

    if twice > denominator || (twice == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}
