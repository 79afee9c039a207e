use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::derive;

// ---------------------------------------------------------------------------
// Listing – one row of the source table
// ---------------------------------------------------------------------------

/// A single vehicle advertisement (one row of `vehicles_us.csv`).
///
/// Every column is optional: empty CSV fields and unparsable numbers are
/// read as missing values rather than failing the whole load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub model_year: Option<f64>,
    /// Free-text model; title-cased once the table is built.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub cylinders: Option<f64>,
    #[serde(default)]
    pub fuel: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub odometer: Option<f64>,
    #[serde(default)]
    pub transmission: Option<String>,
    #[serde(default, rename = "type")]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub paint_color: Option<String>,
    #[serde(default)]
    pub is_4wd: Option<String>,
    #[serde(default)]
    pub date_posted: Option<String>,
    #[serde(default)]
    pub days_listed: Option<String>,
    /// Derived: lowercase first token of the raw model.
    #[serde(skip_deserializing)]
    pub manufacturer: Option<String>,
}

// ---------------------------------------------------------------------------
// CategoryColumn – categorical columns usable for colouring
// ---------------------------------------------------------------------------

/// Categorical columns a chart can be grouped / coloured by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryColumn {
    #[default]
    Manufacturer,
    Model,
    Condition,
    Fuel,
    Type,
    Transmission,
    PaintColor,
}

impl CategoryColumn {
    /// Selector order shown in the UI.
    pub const ALL: [CategoryColumn; 7] = [
        CategoryColumn::Manufacturer,
        CategoryColumn::Model,
        CategoryColumn::Condition,
        CategoryColumn::Fuel,
        CategoryColumn::Type,
        CategoryColumn::Transmission,
        CategoryColumn::PaintColor,
    ];

    /// Column name as it appears in the CSV header.
    pub fn name(self) -> &'static str {
        match self {
            CategoryColumn::Manufacturer => "manufacturer",
            CategoryColumn::Model => "model",
            CategoryColumn::Condition => "condition",
            CategoryColumn::Fuel => "fuel",
            CategoryColumn::Type => "type",
            CategoryColumn::Transmission => "transmission",
            CategoryColumn::PaintColor => "paint_color",
        }
    }

    /// Display label: the column name with its first letter upper-cased.
    pub fn label(self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// The row's value for this column, `None` when missing.
    pub fn value(self, listing: &Listing) -> Option<&str> {
        let v = match self {
            CategoryColumn::Manufacturer => &listing.manufacturer,
            CategoryColumn::Model => &listing.model,
            CategoryColumn::Condition => &listing.condition,
            CategoryColumn::Fuel => &listing.fuel,
            CategoryColumn::Type => &listing.vehicle_type,
            CategoryColumn::Transmission => &listing.transmission,
            CategoryColumn::PaintColor => &listing.paint_color,
        };
        v.as_deref().filter(|s| !s.is_empty())
    }
}

impl fmt::Display for CategoryColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ListingTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full dataset with derived columns and pre-computed filter options.
/// Immutable once built; every filter and chart call borrows it.
#[derive(Debug, Clone, Default)]
pub struct ListingTable {
    listings: Vec<Listing>,
    /// `(int(min), int(max))` of `model_year`, `None` when no row has a year.
    year_bounds: Option<(i32, i32)>,
    /// Distinct non-missing conditions in order of first appearance.
    condition_options: Vec<String>,
    /// Distinct non-missing manufacturers, sorted.
    manufacturer_options: Vec<String>,
}

impl ListingTable {
    /// Run the derived-column builder and index the filter options.
    pub fn from_listings(mut listings: Vec<Listing>) -> Self {
        derive::derive_columns(&mut listings);

        let year_bounds = listings
            .iter()
            .filter_map(|l| l.model_year)
            .filter(|y| y.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
            .map(|(lo, hi)| (lo as i32, hi as i32));

        let mut seen = BTreeSet::new();
        let mut condition_options = Vec::new();
        for cond in listings.iter().filter_map(|l| CategoryColumn::Condition.value(l)) {
            if seen.insert(cond) {
                condition_options.push(cond.to_string());
            }
        }

        let manufacturer_options: Vec<String> = listings
            .iter()
            .filter_map(|l| l.manufacturer.as_deref())
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        ListingTable {
            listings,
            year_bounds,
            condition_options,
            manufacturer_options,
        }
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn get(&self, row: usize) -> Option<&Listing> {
        self.listings.get(row)
    }

    /// Iterate the rows selected by `indices`, skipping out-of-range ones.
    pub fn rows<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = (usize, &'a Listing)> + 'a {
        indices
            .iter()
            .filter_map(move |&i| self.listings.get(i).map(|l| (i, l)))
    }

    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.year_bounds
    }

    pub fn condition_options(&self) -> &[String] {
        &self.condition_options
    }

    pub fn manufacturer_options(&self) -> &[String] {
        &self.manufacturer_options
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Compact row constructor shared by the data and chart tests.
    pub(crate) fn listing(
        model: Option<&str>,
        year: Option<f64>,
        condition: Option<&str>,
        price: Option<f64>,
        odometer: Option<f64>,
    ) -> Listing {
        Listing {
            model: model.map(str::to_string),
            model_year: year,
            condition: condition.map(str::to_string),
            price,
            odometer,
            fuel: Some("gas".into()),
            ..Default::default()
        }
    }

    #[test]
    fn table_indexes_filter_options() {
        let table = ListingTable::from_listings(vec![
            listing(Some("toyota camry"), Some(2011.0), Some("good"), Some(5000.0), Some(1.0)),
            listing(Some("bmw x5"), Some(2019.7), Some("excellent"), Some(20000.0), None),
            listing(Some("acura tl"), None, Some("good"), None, None),
            listing(None, Some(2004.0), None, None, None),
        ]);

        assert_eq!(table.len(), 4);
        assert_eq!(table.year_bounds(), Some((2004, 2019)));
        assert_eq!(table.condition_options(), ["good", "excellent"]);
        assert_eq!(table.manufacturer_options(), ["acura", "bmw", "toyota"]);
        assert_eq!(table.listings()[1].model.as_deref(), Some("Bmw X5"));
    }

    #[test]
    fn empty_table_has_no_bounds() {
        let table = ListingTable::from_listings(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.year_bounds(), None);
        assert!(table.manufacturer_options().is_empty());
    }

    #[test]
    fn category_labels_capitalize_first_letter_only() {
        assert_eq!(CategoryColumn::Manufacturer.label(), "Manufacturer");
        assert_eq!(CategoryColumn::PaintColor.label(), "Paint_color");
        assert_eq!(CategoryColumn::Type.name(), "type");
    }

    #[test]
    fn category_value_treats_empty_as_missing() {
        let mut l = Listing::default();
        l.paint_color = Some(String::new());
        l.fuel = Some("diesel".into());
        assert_eq!(CategoryColumn::PaintColor.value(&l), None);
        assert_eq!(CategoryColumn::Fuel.value(&l), Some("diesel"));
    }
}
