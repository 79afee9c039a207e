use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Listing, ListingTable};

const COLUMNS: [&str; 11] = [
    "price",
    "model_year",
    "model",
    "manufacturer",
    "condition",
    "fuel",
    "odometer",
    "transmission",
    "type",
    "paint_color",
    "days_listed",
];

/// Preview of the first `limit` filtered listings.
pub fn preview_table(ui: &mut Ui, table: &ListingTable, indices: &[usize], limit: usize) {
    let rows: Vec<&Listing> = table
        .rows(indices)
        .take(limit)
        .map(|(_, l)| l)
        .collect();

    if rows.is_empty() {
        ui.label("No listings match the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .columns(Column::auto().at_least(60.0), COLUMNS.len())
        .header(20.0, |mut header| {
            for name in COLUMNS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|mut body| {
            for listing in rows {
                body.row(18.0, |mut row| {
                    for cell in cells(listing) {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}

fn cells(l: &Listing) -> [String; 11] {
    let num = |v: Option<f64>| v.map(|x| format!("{x}")).unwrap_or_default();
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    [
        num(l.price),
        num(l.model_year),
        text(&l.model),
        text(&l.manufacturer),
        text(&l.condition),
        text(&l.fuel),
        num(l.odometer),
        text(&l.transmission),
        text(&l.vehicle_type),
        text(&l.paint_color),
        text(&l.days_listed),
    ]
}
