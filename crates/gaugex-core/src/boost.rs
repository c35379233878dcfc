//! Boost tier resolution.
//!
//! Maps a realized lock duration onto a canonical tier duration and a
//! percentage multiplier. Bands are evaluated in declaration order with
//! first match winning; the 6-month band must stay ahead of the 12-month
//! band, whose lower bound also covers (3, 6] months.

use crate::constants::{
    BOOST_12_MONTHS, BOOST_1_MONTH, BOOST_24_MONTHS, BOOST_3_MONTHS, BOOST_48_MONTHS,
    BOOST_6_MONTHS, BOOST_BASE, TIER_12_MONTHS, TIER_1_MONTH, TIER_24_MONTHS, TIER_3_MONTHS,
    TIER_48_MONTHS, TIER_6_MONTHS,
};
use crate::error::GaugeError;

/// Resolve a lock duration (seconds) to `(tier_duration, boost_multiplier)`.
///
/// Zero duration resolves to the base tier. Durations beyond 48 months and
/// negative durations fail with `InvalidDuration`.
pub fn resolve_boost(duration: i64) -> Result<(i64, u64), GaugeError> {
    if duration == 0 {
        Ok((0, BOOST_BASE))
    } else if duration < 0 {
        Err(GaugeError::InvalidDuration)
    } else if duration <= TIER_1_MONTH {
        Ok((TIER_1_MONTH, BOOST_1_MONTH))
    } else if duration <= TIER_3_MONTHS {
        Ok((TIER_3_MONTHS, BOOST_3_MONTHS))
    } else if duration <= TIER_6_MONTHS {
        Ok((TIER_6_MONTHS, BOOST_6_MONTHS))
    } else if duration <= TIER_12_MONTHS {
        Ok((TIER_12_MONTHS, BOOST_12_MONTHS))
    } else if duration <= TIER_24_MONTHS {
        Ok((TIER_24_MONTHS, BOOST_24_MONTHS))
    } else if duration <= TIER_48_MONTHS {
        Ok((TIER_48_MONTHS, BOOST_48_MONTHS))
    } else {
        Err(GaugeError::InvalidDuration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SECONDS_PER_MONTH;

    const DAY: i64 = 24 * 3600;

    #[test]
    fn zero_duration_resolves_to_base() {
        assert_eq!(resolve_boost(0).unwrap(), (0, 100));
    }

    #[test]
    fn one_second_enters_the_first_band() {
        assert_eq!(resolve_boost(1).unwrap(), (TIER_1_MONTH, 110));
    }

    #[test]
    fn thirty_days_is_the_one_month_tier() {
        assert_eq!(resolve_boost(30 * DAY).unwrap(), (30 * DAY, 110));
    }

    #[test]
    fn band_upper_bounds_are_inclusive() {
        assert_eq!(resolve_boost(TIER_3_MONTHS).unwrap(), (TIER_3_MONTHS, 120));
        assert_eq!(resolve_boost(TIER_6_MONTHS).unwrap(), (TIER_6_MONTHS, 130));
        assert_eq!(resolve_boost(TIER_12_MONTHS).unwrap(), (TIER_12_MONTHS, 140));
        assert_eq!(resolve_boost(TIER_24_MONTHS).unwrap(), (TIER_24_MONTHS, 150));
        assert_eq!(resolve_boost(TIER_48_MONTHS).unwrap(), (TIER_48_MONTHS, 160));
    }

    #[test]
    fn ninety_one_days_takes_the_six_month_band() {
        // 91 days falls inside both the (3, 6] and (3, 12] month bands;
        // the 6-month band is checked first and wins.
        let (tier, boost) = resolve_boost(91 * DAY).unwrap();
        assert_eq!(boost, 130, "first matching band must win");
        assert_eq!(tier, TIER_6_MONTHS);
    }

    #[test]
    fn seven_months_reaches_the_twelve_month_band() {
        assert_eq!(
            resolve_boost(7 * SECONDS_PER_MONTH).unwrap(),
            (TIER_12_MONTHS, 140)
        );
    }

    #[test]
    fn beyond_forty_eight_months_is_invalid() {
        assert!(matches!(
            resolve_boost(TIER_48_MONTHS + 1),
            Err(GaugeError::InvalidDuration)
        ));
    }

    #[test]
    fn negative_duration_is_invalid() {
        assert!(matches!(
            resolve_boost(-1),
            Err(GaugeError::InvalidDuration)
        ));
    }
}
