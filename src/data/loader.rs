use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{Listing, ListingTable};

/// Columns the dashboard reads; any others in the file are ignored.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "price",
    "model_year",
    "condition",
    "fuel",
    "type",
    "transmission",
    "paint_color",
    "odometer",
    "model",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the listings CSV and build the table (derived columns included).
pub fn load_csv(path: &Path) -> Result<ListingTable, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_listings(file)?;
    log::info!(
        "Loaded {} listings from {} ({} manufacturers)",
        table.len(),
        path.display(),
        table.manufacturer_options().len()
    );
    Ok(table)
}

/// Parse listings from any CSV source with a header row.
pub fn read_listings<R: std::io::Read>(source: R) -> Result<ListingTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|source| LoadError::Csv { row: 0, source })?
        .clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let mut listings = Vec::new();
    for (row_no, result) in reader.deserialize::<Listing>().enumerate() {
        let listing = result.map_err(|source| LoadError::Csv {
            row: row_no + 1,
            source,
        })?;
        listings.push(listing);
    }

    Ok(ListingTable::from_listings(listings))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str =
        "price,model_year,model,condition,cylinders,fuel,odometer,transmission,type,paint_color,is_4wd,date_posted,days_listed";

    #[test]
    fn reads_rows_and_derives_columns() {
        let csv = format!(
            "{HEADER}\n\
             9400,2011.0,bmw x5,good,6.0,gas,145000.0,automatic,SUV,,1.0,2018-06-23,19\n\
             25500,,ford f-150,good,6.0,gas,88705.0,automatic,pickup,white,1.0,2018-10-19,50\n\
             5500,2013.0,hyundai sonata,like new,4.0,gas,110000.0,automatic,sedan,red,,2019-02-07,79\n"
        );
        let table = read_listings(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        let first = &table.listings()[0];
        assert_eq!(first.price, Some(9400.0));
        assert_eq!(first.model.as_deref(), Some("Bmw X5"));
        assert_eq!(first.manufacturer.as_deref(), Some("bmw"));
        assert_eq!(first.vehicle_type.as_deref(), Some("SUV"));
        assert_eq!(first.paint_color, None);
        assert_eq!(table.listings()[1].model_year, None);
        assert_eq!(table.condition_options(), ["good", "like new"]);
    }

    #[test]
    fn unparsable_numbers_become_missing() {
        let csv = format!("{HEADER}\nabc,2015,kia soul,good,,gas,n/a,manual,hatchback,blue,,,\n");
        let table = read_listings(csv.as_bytes()).unwrap();
        let row = &table.listings()[0];
        assert_eq!(row.price, None);
        assert_eq!(row.odometer, None);
        assert_eq!(row.model_year, Some(2015.0));
    }

    #[test]
    fn extra_and_reordered_columns_are_accepted() {
        let csv = "model,odometer,price,model_year,condition,fuel,type,transmission,paint_color,vin\n\
                   nissan altima,1000,1200,2009,fair,gas,sedan,automatic,black,XYZ\n";
        let table = read_listings(csv.as_bytes()).unwrap();
        assert_eq!(table.listings()[0].odometer, Some(1000.0));
        assert_eq!(table.manufacturer_options(), ["nissan"]);
    }

    #[test]
    fn missing_columns_are_reported() {
        let csv = "price,model_year,model\n1,2000,ford\n";
        let err = read_listings(csv.as_bytes()).unwrap_err();
        match err {
            LoadError::MissingColumns(cols) => {
                assert!(cols.contains(&"odometer".to_string()));
                assert!(cols.contains(&"condition".to_string()));
                assert!(!cols.contains(&"price".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vehicles_us.csv");
        assert!(matches!(load_csv(&path), Err(LoadError::NotFound(_))));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "15990,2013.0,honda pilot,excellent,6.0,gas,109473.0,automatic,SUV,black,1.0,2019-01-07,68").unwrap();
        file.flush().unwrap();

        let table = load_csv(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.year_bounds(), Some((2013, 2013)));
    }
}
