use serde::{Deserialize, Serialize};
use std::fmt;

use super::selection::BoundingBox;
use crate::geo::GeoPoint;
use crate::prelude::{PortalError, PortalResult};

/// Seismic event as returned by an FDSN event catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct FdsnEvent {
    pub id: String,
    pub time: String,
    pub magnitude: f64,
    pub magnitude_type: String,
    pub depth: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub location_reference: String,
    pub magnitude_reference: String,
}

impl FdsnEvent {
    pub fn origin(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Parses an FDSN event service `format=text` response:
    ///
    /// `EventID|Time|Latitude|Longitude|Depth/km|Author|Catalog|Contributor|ContributorID|MagType|Magnitude|MagAuthor|EventLocationName`
    ///
    /// Header (`#`) and blank lines are skipped.
    pub fn parse_text(body: &str) -> PortalResult<Vec<FdsnEvent>> {
        let mut events = Vec::new();
        for (index, line) in body.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            events.push(Self::parse_text_line(index + 1, line)?);
        }
        Ok(events)
    }

    fn parse_text_line(line_no: usize, line: &str) -> PortalResult<FdsnEvent> {
        let fields: Vec<&str> = line.split('|').map(str::trim).collect();
        if fields.len() < 12 {
            return Err(PortalError::InvalidEventRecord {
                line: line_no,
                reason: format!("expected at least 12 fields, found {}", fields.len()),
            });
        }
        let number = |index: usize, label: &str| -> PortalResult<f64> {
            let raw = fields[index];
            if raw.is_empty() {
                return Ok(0.0);
            }
            raw.parse().map_err(|_| PortalError::InvalidEventRecord {
                line: line_no,
                reason: format!("{label} {raw:?} is not a number"),
            })
        };

        Ok(FdsnEvent {
            id: fields[0].to_string(),
            time: fields[1].to_string(),
            latitude: number(2, "latitude")?,
            longitude: number(3, "longitude")?,
            depth: number(4, "depth")?,
            location_reference: fields[5].to_string(),
            magnitude_type: fields[9].to_string(),
            magnitude: number(10, "magnitude")?,
            magnitude_reference: fields[11].to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCatalog {
    pub id: u32,
    pub name: String,
    pub url: String,
}

/// Query parameters for the event search form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsModel {
    pub catalogs: Vec<EventCatalog>,
    pub minimum_magnitude: f64,
    pub date_from: String,
    pub date_to: String,
    pub depth_from: f64,
    pub depth_to: f64,
    pub bounds: BoundingBox,
    pub selected_catalog: usize,
}

impl Default for EventsModel {
    fn default() -> Self {
        Self {
            catalogs: vec![
                EventCatalog {
                    id: 0,
                    name: "EMSC".into(),
                    url: "http://www.seismicportal.eu/fdsnws/event/1/query?".into(),
                },
                EventCatalog {
                    id: 1,
                    name: "IRIS".into(),
                    url: "http://service.iris.edu/fdsnws/event/1/query?".into(),
                },
            ],
            minimum_magnitude: 0.0,
            date_from: "2017-01-01".into(),
            date_to: "2018-01-01".into(),
            depth_from: 0.0,
            depth_to: 999.0,
            bounds: BoundingBox::default(),
            selected_catalog: 0,
        }
    }
}

impl EventsModel {
    pub fn catalog(&self) -> Option<&EventCatalog> {
        self.catalogs.get(self.selected_catalog)
    }

    /// FDSN event query for the selected catalog, or `None` when the
    /// selection points past the catalog list.
    pub fn query_url(&self) -> Option<String> {
        let catalog = self.catalog()?;
        Some(format!(
            "{}starttime={}&endtime={}&minmagnitude={}&mindepth={}&maxdepth={}\
             &minlatitude={}&maxlatitude={}&minlongitude={}&maxlongitude={}&format=text",
            catalog.url,
            self.date_from,
            self.date_to,
            self.minimum_magnitude,
            self.depth_from,
            self.depth_to,
            self.bounds.south,
            self.bounds.north,
            self.bounds.west,
            self.bounds.east,
        ))
    }
}

impl fmt::Display for EventsModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let catalog = self.catalog().map(|c| c.name.as_str()).unwrap_or("none");
        write!(
            f,
            "Catalog: {}, minimum magnitude: {}, date: {} - {}, depth: {} - {}, coordinates: {}",
            catalog,
            self.minimum_magnitude,
            self.date_from,
            self.date_to,
            self.depth_from,
            self.depth_to,
            self.bounds
        )
    }
}
