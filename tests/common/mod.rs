//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::f64::consts::PI;

use offgrid_sizer::sizing::HOURS_PER_YEAR;

/// Constant series of one year.
pub fn flat_year(value: f64) -> Vec<f64> {
    vec![value; HOURS_PER_YEAR]
}

/// Residential-style load: 0.8 kW overnight base, 2.5 kW evening peak
/// (18:00–22:00), 1.2 kW otherwise.
pub fn household_load() -> Vec<f64> {
    (0..HOURS_PER_YEAR)
        .map(|h| match h % 24 {
            0..=5 => 0.8,
            18..=21 => 2.5,
            _ => 1.2,
        })
        .collect()
}

/// Per-kW solar output: half-sine between 06:00 and 18:00, scaled by a
/// seasonal factor peaking mid-year (0.4 in winter, 1.0 in summer), with a
/// 0.75 derate.
pub fn seasonal_solar() -> Vec<f64> {
    (0..HOURS_PER_YEAR)
        .map(|h| {
            let hod = (h % 24) as f64;
            let day = (h / 24) as f64;
            let diurnal = if (6.0..18.0).contains(&hod) {
                (PI * (hod - 6.0) / 12.0).sin()
            } else {
                0.0
            };
            let season = 0.7 - 0.3 * (2.0 * PI * day / 365.0).cos();
            diurnal * season * 0.75
        })
        .collect()
}

/// Load that is zero except for a single 24-hour block of `peak_kw`
/// starting at `start_hour`.
pub fn single_spike_load(start_hour: usize, peak_kw: f64) -> Vec<f64> {
    (0..HOURS_PER_YEAR)
        .map(|h| {
            if (start_hour..start_hour + 24).contains(&h) {
                peak_kw
            } else {
                0.0
            }
        })
        .collect()
}

/// `timestamp,kw` CSV rows for `days` days of the household load, starting
/// 2023-01-01 00:00.
pub fn household_load_csv(days: usize) -> String {
    let load = household_load();
    let mut out = String::from("timestamp,load_kw\n");
    for h in 0..days * 24 {
        out.push_str(&format!(
            "2023-01-{:02} {:02}:00:00,{}\n",
            1 + h / 24,
            h % 24,
            load[h]
        ));
    }
    out
}

/// One-column CSV of a series with a header line.
pub fn series_csv(series: &[f64]) -> String {
    let mut out = String::from("kw_per_kw\n");
    for v in series {
        out.push_str(&format!("{v}\n"));
    }
    out
}
