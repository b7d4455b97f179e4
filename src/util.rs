//! Lossy numeric conversions shared by the layout code

pub(crate) fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn to_f64(n: usize) -> f64 {
    n as f64
}

/// `x` rounded down into `u16` range; NaN becomes 0
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn floor_u16(x: f64) -> u16 {
    if x.is_nan() {
        0
    } else {
        x.floor().clamp(0.0, f64::from(u16::MAX)) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_u16() {
        assert_eq!(floor_u16(2.9), 2);
        assert_eq!(floor_u16(-1.5), 0);
        assert_eq!(floor_u16(1e9), u16::MAX);
        assert_eq!(floor_u16(f64::NAN), 0);
    }

    #[test]
    fn test_to_u16() {
        assert_eq!(to_u16(54), 54);
        assert_eq!(to_u16(100_000), u16::MAX);
    }
}
