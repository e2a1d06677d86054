//! The in-progress quote request.
//!
//! Fields that carry an invariant (trip type, dates, passengers, aircraft,
//! services) are private and change only through setters, so a
//! `QuoteRequest` can never hold a return date on a one-way trip or zero
//! passengers.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::{self, Aircraft, Service};
use crate::pricing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TripType {
    OneWay,
    RoundTrip,
    MultiStop,
}

impl TripType {
    pub const ALL: [TripType; 3] = [TripType::OneWay, TripType::RoundTrip, TripType::MultiStop];

    pub fn label_key(self) -> &'static str {
        match self {
            TripType::OneWay => "trip.one_way",
            TripType::RoundTrip => "trip.round_trip",
            TripType::MultiStop => "trip.multi_stop",
        }
    }

    pub fn description_key(self) -> &'static str {
        match self {
            TripType::OneWay => "trip.one_way_desc",
            TripType::RoundTrip => "trip.round_trip_desc",
            TripType::MultiStop => "trip.multi_stop_desc",
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TripType::OneWay => "one-way",
            TripType::RoundTrip => "round-trip",
            TripType::MultiStop => "multi-stop",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("date {0} is in the past")]
    DateInPast(NaiveDate),
    #[error("return date {ret} is before departure {dep}")]
    ReturnBeforeDeparture { dep: NaiveDate, ret: NaiveDate },
    #[error("a return date only applies to round trips")]
    NotRoundTrip,
    #[error("unknown aircraft '{0}'")]
    UnknownAircraft(String),
}

impl QuoteError {
    pub fn message_key(&self) -> &'static str {
        match self {
            QuoteError::DateInPast(_) => "quote_errors.date_in_past",
            QuoteError::ReturnBeforeDeparture { .. } => "quote_errors.return_before_departure",
            QuoteError::NotRoundTrip => "quote_errors.not_round_trip",
            QuoteError::UnknownAircraft(_) => "quote_errors.unknown_aircraft",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteRequest {
    trip_type: Option<TripType>,
    pub origin: String,
    pub destination: String,
    departure_date: Option<NaiveDate>,
    return_date: Option<NaiveDate>,
    passengers: u8,
    #[serde(skip)]
    max_passengers: u8,
    aircraft: Option<&'static Aircraft>,
    services: BTreeSet<Service>,
    pub contact: Contact,
}

impl QuoteRequest {
    pub fn new(trip_type: Option<TripType>, max_passengers: u8) -> Self {
        Self {
            trip_type,
            origin: String::new(),
            destination: String::new(),
            departure_date: None,
            return_date: None,
            passengers: 1,
            max_passengers: max_passengers.max(1),
            aircraft: None,
            services: BTreeSet::new(),
            contact: Contact::default(),
        }
    }

    pub fn trip_type(&self) -> Option<TripType> {
        self.trip_type
    }

    pub fn is_round_trip(&self) -> bool {
        self.trip_type == Some(TripType::RoundTrip)
    }

    pub fn departure_date(&self) -> Option<NaiveDate> {
        self.departure_date
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    pub fn passengers(&self) -> u8 {
        self.passengers
    }

    pub fn max_passengers(&self) -> u8 {
        self.max_passengers
    }

    pub fn aircraft(&self) -> Option<&'static Aircraft> {
        self.aircraft
    }

    pub fn services(&self) -> &BTreeSet<Service> {
        &self.services
    }

    /// Leaving round-trip drops any return date.
    pub fn set_trip_type(&mut self, trip_type: TripType) {
        self.trip_type = Some(trip_type);
        if trip_type != TripType::RoundTrip {
            self.return_date = None;
        }
    }

    pub fn set_departure_date(
        &mut self,
        date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<(), QuoteError> {
        let Some(date) = date else {
            self.departure_date = None;
            return Ok(());
        };

        if date < today {
            return Err(QuoteError::DateInPast(date));
        }

        self.departure_date = Some(date);
        if self.return_date.is_some_and(|ret| ret < date) {
            self.return_date = None;
        }
        Ok(())
    }

    pub fn set_return_date(
        &mut self,
        date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<(), QuoteError> {
        let Some(date) = date else {
            self.return_date = None;
            return Ok(());
        };

        if !self.is_round_trip() {
            return Err(QuoteError::NotRoundTrip);
        }
        if date < today {
            return Err(QuoteError::DateInPast(date));
        }
        if let Some(dep) = self.departure_date {
            if date < dep {
                return Err(QuoteError::ReturnBeforeDeparture { dep, ret: date });
            }
        }

        self.return_date = Some(date);
        Ok(())
    }

    pub fn set_passengers(&mut self, count: u8) {
        self.passengers = count.clamp(1, self.max_passengers);
    }

    pub fn increment_passengers(&mut self) {
        self.set_passengers(self.passengers.saturating_add(1));
    }

    pub fn decrement_passengers(&mut self) {
        self.set_passengers(self.passengers.saturating_sub(1));
    }

    pub fn select_aircraft(&mut self, id: &str) -> Result<&'static Aircraft, QuoteError> {
        let aircraft =
            catalog::find_aircraft(id).ok_or_else(|| QuoteError::UnknownAircraft(id.to_string()))?;
        self.aircraft = Some(aircraft);
        Ok(aircraft)
    }

    /// Returns whether the service is selected after the toggle.
    pub fn toggle_service(&mut self, service: Service) -> bool {
        if self.services.remove(&service) {
            false
        } else {
            self.services.insert(service);
            true
        }
    }

    /// Placeholder estimate for the chosen aircraft. An unset trip type is
    /// priced as one-way.
    pub fn estimate(&self) -> Option<u32> {
        let aircraft = self.aircraft?;
        Some(pricing::estimate(
            aircraft,
            self.trip_type.unwrap_or(TripType::OneWay),
        ))
    }

    /// Route label such as `Lisboa (LPPT) → Paris (LFPB)`.
    pub fn route(&self) -> String {
        format!("{} → {}", self.origin.trim(), self.destination.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_leaving_round_trip_clears_return_date() {
        let mut req = QuoteRequest::new(None, 20);
        req.set_trip_type(TripType::RoundTrip);
        req.set_departure_date(Some(date(6, 1)), today()).unwrap();
        req.set_return_date(Some(date(6, 5)), today()).unwrap();
        assert_eq!(req.return_date(), Some(date(6, 5)));

        req.set_trip_type(TripType::MultiStop);
        assert_eq!(req.return_date(), None);
    }

    #[test]
    fn test_return_date_requires_round_trip() {
        let mut req = QuoteRequest::new(Some(TripType::OneWay), 20);
        assert_eq!(
            req.set_return_date(Some(date(6, 5)), today()),
            Err(QuoteError::NotRoundTrip)
        );
        assert_eq!(req.return_date(), None);
    }

    #[test]
    fn test_return_before_departure_rejected() {
        let mut req = QuoteRequest::new(Some(TripType::RoundTrip), 20);
        req.set_departure_date(Some(date(6, 10)), today()).unwrap();
        let err = req.set_return_date(Some(date(6, 9)), today()).unwrap_err();
        assert!(matches!(err, QuoteError::ReturnBeforeDeparture { .. }));
        assert_eq!(req.return_date(), None);

        // Same-day return is allowed
        req.set_return_date(Some(date(6, 10)), today()).unwrap();
    }

    #[test]
    fn test_moving_departure_past_return_drops_return() {
        let mut req = QuoteRequest::new(Some(TripType::RoundTrip), 20);
        req.set_departure_date(Some(date(6, 1)), today()).unwrap();
        req.set_return_date(Some(date(6, 3)), today()).unwrap();
        req.set_departure_date(Some(date(6, 4)), today()).unwrap();
        assert_eq!(req.return_date(), None);
    }

    #[test]
    fn test_departure_in_past_rejected() {
        let mut req = QuoteRequest::new(None, 20);
        assert_eq!(
            req.set_departure_date(Some(date(4, 30)), today()),
            Err(QuoteError::DateInPast(date(4, 30)))
        );
        // Today itself is fine
        req.set_departure_date(Some(today()), today()).unwrap();
    }

    #[test]
    fn test_passenger_clamp() {
        let mut req = QuoteRequest::new(None, 20);
        for _ in 0..5 {
            req.decrement_passengers();
        }
        assert_eq!(req.passengers(), 1);

        for _ in 0..50 {
            req.increment_passengers();
        }
        assert_eq!(req.passengers(), 20);

        req.set_passengers(0);
        assert_eq!(req.passengers(), 1);
    }

    #[test]
    fn test_toggle_service_twice_removes() {
        let mut req = QuoteRequest::new(None, 20);
        assert!(req.toggle_service(Service::Catering));
        assert!(req.toggle_service(Service::Wifi));
        assert!(!req.toggle_service(Service::Catering));
        assert_eq!(req.services().len(), 1);
        assert!(req.services().contains(&Service::Wifi));
    }

    #[test]
    fn test_select_unknown_aircraft() {
        let mut req = QuoteRequest::new(None, 20);
        assert!(matches!(
            req.select_aircraft("concorde"),
            Err(QuoteError::UnknownAircraft(_))
        ));
        assert!(req.aircraft().is_none());
        assert!(req.estimate().is_none());
    }

    #[test]
    fn test_estimate_follows_aircraft_and_trip() {
        let mut req = QuoteRequest::new(None, 20);
        req.select_aircraft("citation").unwrap();
        assert_eq!(req.estimate(), Some(5_000));

        req.set_trip_type(TripType::RoundTrip);
        assert_eq!(req.estimate(), Some(10_000));
    }
}
