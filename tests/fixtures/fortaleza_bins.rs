//! Smart-bin sites around Fortaleza for realistic fixtures.
//!
//! Coordinates are real street locations, so straight-line estimates
//! between them are of a plausible city-scale magnitude.

use bin_route_planner::model::{Coordinate, Location};

/// A named site with coordinates.
#[derive(Debug, Clone)]
pub struct Site {
    pub name: &'static str,
    pub lng: f64,
    pub lat: f64,
}

impl Site {
    pub const fn new(name: &'static str, lng: f64, lat: f64) -> Self {
        Self { name, lng, lat }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lng, self.lat)
    }
}

/// Collection depot, where every truck starts and ends its shift.
pub const DEPOT: Site = Site::new("depot", -38.500499900597745, -3.7769178589442527);

pub const BIN_SITES: &[Site] = &[
    Site::new("benfica", -38.53866577, -3.75756748),
    Site::new("aldeota", -38.49557877, -3.76585371),
    Site::new("parquelandia", -38.55128288, -3.76354128),
    Site::new("pirambu", -38.56484413, -3.74589811),
    Site::new("carlito-pamplona", -38.55600357, -3.74238656),
    Site::new("fatima", -38.53360176, -3.76525419),
    Site::new("meireles", -38.50090027, -3.74093055),
    Site::new("centro", -38.53639126, -3.71943269),
    Site::new("bela-vista", -38.56304169, -3.77424691),
    Site::new("montese", -38.54174979033555, -3.771483854972607),
    Site::new("parangaba", -38.539506, -3.795058),
    Site::new("itaoca", -38.545815, -3.792681),
    Site::new("vila-pery", -38.5398346527822, -3.7900433856848474),
];

pub const BIN_CAPACITY: f64 = 120.0;

pub fn depot_location() -> Location {
    Location::depot(DEPOT.name, DEPOT.coordinate())
}

pub fn registry() -> Vec<(String, Coordinate)> {
    BIN_SITES
        .iter()
        .map(|site| (site.name.to_string(), site.coordinate()))
        .collect()
}
