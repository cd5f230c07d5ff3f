use chrono::NaiveDateTime;

use crate::model::CurrentConditions;
use crate::weather_code;

use super::{Panel, Tone};

/// Current conditions card. `time` is already local to `timezone`.
pub fn current_conditions(current: &CurrentConditions, timezone: &str) -> Panel {
    let condition = weather_code::describe(current.weather_code);

    Panel {
        title: None,
        tone: Tone::Plain,
        lines: vec![
            format!("{}°C", current.temperature_c),
            format!("{} {}", condition.description, condition.icon),
            local_timestamp(&current.time),
            timezone.to_string(),
            format!("🌬️ {} km/h Wind", current.wind_speed_kmh),
            format!("🧭 {}° Direction", current.wind_direction_deg),
        ],
    }
}

fn local_timestamp(raw: &str) -> String {
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
        .map(|time| time.format("%A, %-d %B - %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}
