use serde::Serialize;

/// Size class of a charter aircraft, used to group the selection list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AircraftCategory {
    LightJet,
    MidsizeJet,
    HeavyJet,
}

impl AircraftCategory {
    pub fn label_key(self) -> &'static str {
        match self {
            AircraftCategory::LightJet => "fleet.category.light",
            AircraftCategory::MidsizeJet => "fleet.category.midsize",
            AircraftCategory::HeavyJet => "fleet.category.heavy",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            AircraftCategory::LightJet => "✈",
            AircraftCategory::MidsizeJet => "✈✈",
            AircraftCategory::HeavyJet => "✈✈✈",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aircraft {
    pub id: &'static str,
    pub name: &'static str,
    pub category: AircraftCategory,
    /// Maximum seated passengers.
    pub capacity: u8,
    /// Entry-level hourly rate in whole euros.
    pub hourly_rate: u32,
    pub range_km: u32,
    pub cruise_kmh: u32,
}

pub const AIRCRAFT: &[Aircraft] = &[
    Aircraft {
        id: "citation",
        name: "Cessna Citation",
        category: AircraftCategory::LightJet,
        capacity: 8,
        hourly_rate: 2_500,
        range_km: 2_800,
        cruise_kmh: 850,
    },
    Aircraft {
        id: "phenom-300",
        name: "Phenom 300",
        category: AircraftCategory::LightJet,
        capacity: 9,
        hourly_rate: 3_000,
        range_km: 3_200,
        cruise_kmh: 830,
    },
    Aircraft {
        id: "legacy",
        name: "Embraer Legacy",
        category: AircraftCategory::MidsizeJet,
        capacity: 12,
        hourly_rate: 4_500,
        range_km: 5_500,
        cruise_kmh: 900,
    },
    Aircraft {
        id: "hawker-900xp",
        name: "Hawker 900XP",
        category: AircraftCategory::MidsizeJet,
        capacity: 9,
        hourly_rate: 4_000,
        range_km: 4_600,
        cruise_kmh: 860,
    },
    Aircraft {
        id: "g650",
        name: "Gulfstream G650",
        category: AircraftCategory::HeavyJet,
        capacity: 16,
        hourly_rate: 8_000,
        range_km: 12_000,
        cruise_kmh: 980,
    },
    Aircraft {
        id: "global-6000",
        name: "Global 6000",
        category: AircraftCategory::HeavyJet,
        capacity: 17,
        hourly_rate: 7_500,
        range_km: 11_100,
        cruise_kmh: 950,
    },
];

pub fn find_aircraft(id: &str) -> Option<&'static Aircraft> {
    AIRCRAFT.iter().find(|a| a.id == id)
}

pub const AIRPORTS: &[&str] = &[
    "Lisboa (LPPT)",
    "Porto (LPPR)",
    "Faro (LPFR)",
    "Paris (LFPB)",
    "Londres (EGKB)",
    "Madrid (LEMD)",
    "Zurique (LSZR)",
    "Roma (LIRA)",
    "Nice (LFMN)",
    "Barcelona (LEBL)",
    "Viena (LOWW)",
    "Milão (LIML)",
];

/// Optional extras a client can attach to a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Service {
    Catering,
    GroundTransport,
    LuxuryLodging,
    TravelInsurance,
    Concierge,
    Wifi,
}

impl Service {
    pub const ALL: [Service; 6] = [
        Service::Catering,
        Service::GroundTransport,
        Service::LuxuryLodging,
        Service::TravelInsurance,
        Service::Concierge,
        Service::Wifi,
    ];

    pub fn label_key(self) -> &'static str {
        match self {
            Service::Catering => "services.catering",
            Service::GroundTransport => "services.ground_transport",
            Service::LuxuryLodging => "services.lodging",
            Service::TravelInsurance => "services.insurance",
            Service::Concierge => "services.concierge",
            Service::Wifi => "services.wifi",
        }
    }
}
