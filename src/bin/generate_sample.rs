use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

const MODELS: &[(&str, f64)] = &[
    ("ford f-150", 26000.0),
    ("ford focus", 9000.0),
    ("chevrolet silverado 1500", 27000.0),
    ("chevrolet malibu", 10000.0),
    ("toyota camry", 12000.0),
    ("toyota 4runner", 24000.0),
    ("honda civic", 11000.0),
    ("honda accord", 12500.0),
    ("nissan altima", 9500.0),
    ("jeep wrangler", 25000.0),
    ("ram 1500", 28000.0),
    ("bmw x5", 21000.0),
    ("subaru outback", 14000.0),
    ("hyundai sonata", 9000.0),
    ("kia sorento", 13000.0),
];
const CONDITIONS: &[(&str, f64)] = &[
    ("new", 1.25),
    ("like new", 1.1),
    ("excellent", 1.0),
    ("good", 0.85),
    ("fair", 0.6),
    ("salvage", 0.35),
];
const FUELS: &[&str] = &["gas", "gas", "gas", "diesel", "hybrid", "electric", "other"];
const TYPES: &[&str] = &["sedan", "SUV", "pickup", "truck", "coupe", "hatchback", "wagon", "van"];
const COLORS: &[&str] = &["white", "black", "silver", "grey", "blue", "red", "green", "brown"];

#[derive(Serialize)]
struct Row {
    price: u32,
    model_year: Option<f64>,
    model: String,
    condition: &'static str,
    cylinders: Option<f64>,
    fuel: &'static str,
    odometer: Option<f64>,
    transmission: &'static str,
    #[serde(rename = "type")]
    vehicle_type: &'static str,
    paint_color: Option<&'static str>,
    is_4wd: Option<f64>,
    date_posted: String,
    days_listed: u32,
}

fn listing(rng: &mut StdRng) -> Row {
    let &(model, base_price) = MODELS.choose(rng).unwrap_or(&MODELS[0]);
    let &(condition, factor) = CONDITIONS.choose(rng).unwrap_or(&CONDITIONS[0]);
    let year = rng.gen_range(1990..=2019);
    let age = f64::from(2019 - year);

    let odometer = (age * rng.gen_range(6000.0..16000.0)).round();
    let price = (base_price * factor * 0.9_f64.powf(age) * rng.gen_range(0.7..1.3)).max(500.0);

    Row {
        price: price.round() as u32,
        // a few gaps like the real export
        model_year: (!rng.gen_bool(0.05)).then_some(f64::from(year)),
        model: model.to_string(),
        condition,
        cylinders: (!rng.gen_bool(0.1)).then(|| f64::from(*[4, 6, 8].choose(rng).unwrap_or(&4))),
        fuel: FUELS.choose(rng).copied().unwrap_or("gas"),
        odometer: (!rng.gen_bool(0.1)).then_some(odometer),
        transmission: if rng.gen_bool(0.9) { "automatic" } else { "manual" },
        vehicle_type: TYPES.choose(rng).copied().unwrap_or("sedan"),
        paint_color: (!rng.gen_bool(0.15)).then(|| COLORS.choose(rng).copied().unwrap_or("white")),
        is_4wd: rng.gen_bool(0.5).then_some(1.0),
        date_posted: format!("2018-{:02}-{:02}", rng.gen_range(5..=12), rng.gen_range(1..=28)),
        days_listed: rng.gen_range(0..=120),
    }
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let path = PathBuf::from(args.next().unwrap_or_else(|| "vehicles_us.csv".to_string()));
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count {n:?}"))?,
        None => 10_000,
    };

    let mut rng = StdRng::seed_from_u64(42);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    for _ in 0..rows {
        writer.serialize(listing(&mut rng)).context("writing row")?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} listings to {}", path.display());
    Ok(())
}
