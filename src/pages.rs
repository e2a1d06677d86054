use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

use crate::catalog::AIRCRAFT;
use crate::i18n::Translator;
use crate::pricing::format_euros;

pub struct Destination {
    pub city: &'static str,
    pub country: &'static str,
    pub flight_time: &'static str,
    /// Lowest one-way price from Lisbon, whole euros.
    pub from_price: u32,
    pub highlights: &'static [&'static str],
}

pub struct Region {
    pub name: &'static str,
    pub count: u32,
    pub popular: &'static str,
}

pub const DESTINATIONS: &[Destination] = &[
    Destination {
        city: "Paris",
        country: "França",
        flight_time: "2h 30m",
        from_price: 3_500,
        highlights: &["Torre Eiffel", "Louvre", "Champs-Élysées"],
    },
    Destination {
        city: "Londres",
        country: "Reino Unido",
        flight_time: "2h 45m",
        from_price: 3_800,
        highlights: &["Big Ben", "Buckingham Palace", "City de Londres"],
    },
    Destination {
        city: "Zurique",
        country: "Suíça",
        flight_time: "2h 15m",
        from_price: 3_200,
        highlights: &["Lago de Zurique", "Bahnhofstrasse", "Alpes Suíços"],
    },
    Destination {
        city: "Madrid",
        country: "Espanha",
        flight_time: "1h 20m",
        from_price: 2_500,
        highlights: &["Museu Prado", "Retiro", "Gran Vía"],
    },
    Destination {
        city: "Roma",
        country: "Itália",
        flight_time: "2h 45m",
        from_price: 3_600,
        highlights: &["Coliseu", "Vaticano", "Fontana di Trevi"],
    },
    Destination {
        city: "Nice",
        country: "França",
        flight_time: "2h 10m",
        from_price: 3_400,
        highlights: &["Promenade des Anglais", "Cannes", "Monte Carlo"],
    },
];

pub const REGIONS: &[Region] = &[
    Region {
        name: "Europa Ocidental",
        count: 25,
        popular: "Paris, Londres, Madrid",
    },
    Region {
        name: "Europa Central",
        count: 18,
        popular: "Zurique, Viena, Praga",
    },
    Region {
        name: "Mediterrâneo",
        count: 15,
        popular: "Nice, Roma, Barcelona",
    },
    Region {
        name: "Ilhas",
        count: 12,
        popular: "Ibiza, Maiorca, Corsega",
    },
];

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn fleet_table(t: &Translator) -> Table {
    let mut table = new_table(vec![
        t.t("fleet.name"),
        t.t("fleet.class"),
        t.t("fleet.capacity"),
        t.t("fleet.hourly_rate"),
        t.t("fleet.range"),
        t.t("fleet.speed"),
    ]);

    for aircraft in AIRCRAFT {
        table.add_row(vec![
            Cell::new(aircraft.name),
            Cell::new(format!(
                "{} {}",
                aircraft.category.glyph(),
                t.t(aircraft.category.label_key())
            )),
            Cell::new(aircraft.capacity),
            Cell::new(format_euros(aircraft.hourly_rate)),
            Cell::new(format!("{} km", aircraft.range_km)),
            Cell::new(format!("{} km/h", aircraft.cruise_kmh)),
        ]);
    }

    table
}

pub fn destinations_table(t: &Translator) -> Table {
    let mut table = new_table(vec![
        t.t("destinations.city"),
        t.t("destinations.country"),
        t.t("destinations.flight_time"),
        t.t("destinations.from_price"),
        t.t("destinations.highlights"),
    ]);

    for dest in DESTINATIONS {
        table.add_row(vec![
            Cell::new(dest.city),
            Cell::new(dest.country),
            Cell::new(dest.flight_time),
            Cell::new(format_euros(dest.from_price)),
            Cell::new(dest.highlights.join(", ")),
        ]);
    }

    table
}

pub fn regions_table(t: &Translator) -> Table {
    let mut table = new_table(vec![
        t.t("destinations.region"),
        t.t("destinations.count"),
        t.t("destinations.popular"),
    ]);

    for region in REGIONS {
        table.add_row(vec![
            Cell::new(region.name),
            Cell::new(region.count),
            Cell::new(region.popular),
        ]);
    }

    table
}
