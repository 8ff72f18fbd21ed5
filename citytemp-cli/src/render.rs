use citytemp_core::{City, ReportStatus, TemperatureReport, TemperatureResult};

/// Shown in place of a temperature when a city has no data.
pub const NO_DATA: &str = "—";

/// Round to one decimal, halves away from zero.
pub fn round_one_decimal(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    // avoid printing "-0.0"
    if rounded == 0.0 { 0.0 } else { rounded }
}

pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1} °C", round_one_decimal(v)),
        None => NO_DATA.to_string(),
    }
}

fn detail(result: &TemperatureResult) -> String {
    match (result.station(), result.observed_at()) {
        (Some(station), Some(at)) => format!("{station}, {at}"),
        (None, Some(at)) => at.to_string(),
        _ => String::new(),
    }
}

pub fn render_report(report: &TemperatureReport) -> String {
    let mut out = String::new();
    for (city, result) in report.iter() {
        let line = format!(
            "{:<8} {:>8}  {}",
            city.name(),
            format_value(result.value()),
            detail(result)
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn status_line(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Updated => "Temperatures updated.",
        ReportStatus::Unavailable => "No temperature data available.",
    }
}

pub fn render_cities() -> String {
    City::all()
        .iter()
        .map(|city| {
            let c = city.coordinates();
            format!(
                "{:<8} {:>9.4} {:>9.4}  forecast id {}\n",
                city.name(),
                c.latitude,
                c.longitude,
                city.forecast_id()
            )
        })
        .collect()
}
