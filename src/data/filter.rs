use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{CategoryColumn, ListingTable};

// ---------------------------------------------------------------------------
// Filter state: the user's current predicate selection
// ---------------------------------------------------------------------------

/// Year range, allowed conditions and manufacturers, plus the colour
/// dimension used by the charts. Rebuilt from widgets on every interaction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterState {
    /// Inclusive `(min, max)` model year.
    pub year_range: (i32, i32),
    pub conditions: BTreeSet<String>,
    pub manufacturers: BTreeSet<String>,
    pub color_by: CategoryColumn,
}

impl FilterState {
    /// Everything selected: full year range, every condition and manufacturer.
    pub fn select_all(table: &ListingTable) -> Self {
        FilterState {
            year_range: table.year_bounds().unwrap_or((0, 0)),
            conditions: table.condition_options().iter().cloned().collect(),
            manufacturers: table.manufacturer_options().iter().cloned().collect(),
            color_by: CategoryColumn::Manufacturer,
        }
    }

    /// Indices of rows passing this state's predicates.
    pub fn apply(&self, table: &ListingTable) -> Vec<usize> {
        filtered_indices(
            table,
            self.year_range.0,
            self.year_range.1,
            &self.conditions,
            &self.manufacturers,
        )
    }
}

/// Return indices of listings passing all predicates, in table order.
///
/// A listing passes when:
/// * `year_min <= model_year <= year_max` (missing year → fails)
/// * its condition is in `conditions` (missing → fails)
/// * its manufacturer is in `manufacturers` (missing → fails)
///
/// An empty set selects nothing.
pub fn filtered_indices(
    table: &ListingTable,
    year_min: i32,
    year_max: i32,
    conditions: &BTreeSet<String>,
    manufacturers: &BTreeSet<String>,
) -> Vec<usize> {
    if conditions.is_empty() || manufacturers.is_empty() {
        return Vec::new();
    }
    let (lo, hi) = (f64::from(year_min), f64::from(year_max));

    table
        .listings()
        .iter()
        .enumerate()
        .filter(|(_, l)| {
            let Some(year) = l.model_year else {
                return false;
            };
            if !(lo <= year && year <= hi) {
                return false;
            }
            let condition_ok = CategoryColumn::Condition
                .value(l)
                .is_some_and(|c| conditions.contains(c));
            let manufacturer_ok = l
                .manufacturer
                .as_deref()
                .is_some_and(|m| manufacturers.contains(m));
            condition_ok && manufacturer_ok
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;
    use crate::data::model::Listing;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample_table() -> ListingTable {
        ListingTable::from_listings(vec![
            listing(Some("ford f-150"), Some(2010.0), Some("good"), Some(9000.0), Some(120000.0)),
            listing(Some("ford focus"), Some(2015.0), Some("excellent"), Some(7000.0), Some(60000.0)),
            listing(Some("honda civic"), Some(2020.0), Some("good"), Some(18000.0), Some(15000.0)),
            listing(Some("honda accord"), Some(2015.0), Some("fair"), Some(4000.0), Some(150000.0)),
            listing(None, Some(2015.0), Some("good"), Some(3000.0), None),
            listing(Some("ram 1500"), None, Some("good"), Some(25000.0), None),
            listing(Some("ram 2500"), Some(2018.0), None, Some(30000.0), None),
        ])
    }

    #[test]
    fn year_range_excludes_older_rows() {
        let table = sample_table();
        let mut state = FilterState::select_all(&table);
        state.year_range = (2012, 2020);

        let idx = state.apply(&table);
        assert_eq!(idx, vec![1, 2, 3]);
        for (_, l) in table.rows(&idx) {
            let year = l.model_year.unwrap();
            assert!((2015.0..=2020.0).contains(&year));
        }
    }

    #[test]
    fn all_predicates_hold_for_every_kept_row() {
        let table = sample_table();
        let conditions = set(&["good"]);
        let manufacturers = set(&["honda", "ford", "ram"]);
        let idx = filtered_indices(&table, 2000, 2030, &conditions, &manufacturers);

        assert_eq!(idx, vec![0, 2]);
        for (_, l) in table.rows(&idx) {
            assert!(conditions.contains(l.condition.as_deref().unwrap()));
            assert!(manufacturers.contains(l.manufacturer.as_deref().unwrap()));
        }
    }

    #[test]
    fn empty_selection_yields_empty_subset() {
        let table = sample_table();
        let all = FilterState::select_all(&table);

        let mut no_conditions = all.clone();
        no_conditions.conditions.clear();
        assert!(no_conditions.apply(&table).is_empty());

        let mut no_makes = all;
        no_makes.manufacturers.clear();
        assert!(no_makes.apply(&table).is_empty());
    }

    #[test]
    fn missing_values_never_match() {
        let table = sample_table();
        let state = FilterState::select_all(&table);
        let idx = state.apply(&table);
        // no model (4), no year (5), no condition (6)
        assert_eq!(idx, vec![0, 1, 2, 3]);
    }

    #[test]
    fn select_all_uses_table_options() {
        let table = sample_table();
        let state = FilterState::select_all(&table);
        assert_eq!(state.year_range, (2010, 2020));
        assert_eq!(state.conditions, set(&["good", "excellent", "fair"]));
        assert_eq!(state.manufacturers, set(&["ford", "honda", "ram"]));
        assert_eq!(state.color_by, CategoryColumn::Manufacturer);
    }

    #[test]
    fn fractional_years_compare_numerically() {
        let table = ListingTable::from_listings(vec![Listing {
            model: Some("kia soul".into()),
            model_year: Some(2012.5),
            condition: Some("good".into()),
            ..Default::default()
        }]);
        let conditions = set(&["good"]);
        let makes = set(&["kia"]);
        assert_eq!(filtered_indices(&table, 2012, 2012, &conditions, &makes), Vec::<usize>::new());
        assert_eq!(filtered_indices(&table, 2012, 2013, &conditions, &makes), vec![0]);
    }
}
