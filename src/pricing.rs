use crate::catalog::Aircraft;
use crate::quote::TripType;

/// Flight time assumed for every leg. The estimate ignores the route.
pub const ASSUMED_FLIGHT_HOURS: u32 = 2;

/// Placeholder charter estimate in whole euros: hourly rate times the assumed
/// flight hours, doubled for a round trip.
pub fn estimate(aircraft: &Aircraft, trip_type: TripType) -> u32 {
    let one_leg = aircraft.hourly_rate.saturating_mul(ASSUMED_FLIGHT_HOURS);
    match trip_type {
        TripType::RoundTrip => one_leg.saturating_mul(2),
        TripType::OneWay | TripType::MultiStop => one_leg,
    }
}

/// `5000` -> `€5,000`
pub fn format_euros(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    out.push('€');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{find_aircraft, AIRCRAFT};

    #[test]
    fn test_one_way_is_rate_times_two() {
        for aircraft in AIRCRAFT {
            assert_eq!(estimate(aircraft, TripType::OneWay), aircraft.hourly_rate * 2);
        }
    }

    #[test]
    fn test_round_trip_doubles() {
        for aircraft in AIRCRAFT {
            assert_eq!(
                estimate(aircraft, TripType::RoundTrip),
                estimate(aircraft, TripType::OneWay) * 2
            );
        }
    }

    #[test]
    fn test_multi_stop_priced_as_one_way() {
        let g650 = find_aircraft("g650").unwrap();
        assert_eq!(estimate(g650, TripType::MultiStop), 16_000);
    }

    #[test]
    fn test_format_euros() {
        assert_eq!(format_euros(0), "€0");
        assert_eq!(format_euros(999), "€999");
        assert_eq!(format_euros(5_000), "€5,000");
        assert_eq!(format_euros(1_234_567), "€1,234,567");
    }
}
