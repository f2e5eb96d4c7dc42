use super::super::domain::Trend;
use super::super::snapshot::Neighborhood;
use serde::Deserialize;
use std::io::Read;

pub(crate) fn parse_neighborhoods<R: Read>(reader: R) -> Result<Vec<Neighborhood>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut neighborhoods = Vec::new();

    for record in csv_reader.deserialize::<NeighborhoodRow>() {
        neighborhoods.push(record?.into_neighborhood());
    }

    Ok(neighborhoods)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NeighborhoodRow {
    name: String,
    #[serde(default)]
    name_he: String,
    city: String,
    avg_price: f64,
    avg_price_per_sqm: f64,
    trend: String,
    #[serde(default)]
    rooms: String,
    /// Blank cells and a missing column both read as no change.
    #[serde(default)]
    year_over_year: Option<f64>,
}

impl NeighborhoodRow {
    fn into_neighborhood(self) -> Neighborhood {
        Neighborhood {
            name: self.name,
            name_he: self.name_he,
            city: self.city,
            avg_price: self.avg_price,
            avg_price_per_sqm: self.avg_price_per_sqm,
            trend: Trend::parse_lossy(&self.trend),
            rooms: self.rooms,
            year_over_year: self.year_over_year.unwrap_or(0.0),
        }
    }
}
