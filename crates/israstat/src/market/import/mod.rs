mod parser;

use super::snapshot::Neighborhood;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub enum NeighborhoodImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Empty,
}

impl std::fmt::Display for NeighborhoodImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NeighborhoodImportError::Io(err) => {
                write!(f, "failed to read neighborhood table: {}", err)
            }
            NeighborhoodImportError::Csv(err) => {
                write!(f, "invalid neighborhood CSV data: {}", err)
            }
            NeighborhoodImportError::Empty => {
                write!(f, "neighborhood table contains no rows")
            }
        }
    }
}

impl std::error::Error for NeighborhoodImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NeighborhoodImportError::Io(err) => Some(err),
            NeighborhoodImportError::Csv(err) => Some(err),
            NeighborhoodImportError::Empty => None,
        }
    }
}

impl From<std::io::Error> for NeighborhoodImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for NeighborhoodImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads a neighborhood table to stand in for the built-in snapshot list.
///
/// Columns: `name,nameHe,city,avgPrice,avgPricePerSqm,trend,rooms,yearOverYear`.
pub struct NeighborhoodCsvImporter;

impl NeighborhoodCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<Neighborhood>, NeighborhoodImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let neighborhoods = Self::from_reader(file)?;
        info!(path = %path.display(), rows = neighborhoods.len(), "loaded neighborhood table");
        Ok(neighborhoods)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Neighborhood>, NeighborhoodImportError> {
        let neighborhoods = parser::parse_neighborhoods(reader)?;
        if neighborhoods.is_empty() {
            return Err(NeighborhoodImportError::Empty);
        }
        Ok(neighborhoods)
    }
}
