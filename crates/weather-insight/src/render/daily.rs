use chrono::NaiveDate;

use crate::model::{DailyEntry, DailySeries};
use crate::weather_code;

use super::{Panel, Tone};

const GRID_DAYS: usize = 7;

/// Days after today, at most a week of them.
pub fn daily_grid(daily: &DailySeries) -> Panel {
    if daily.is_empty() {
        return Panel {
            title: None,
            tone: Tone::Plain,
            lines: vec!["No daily forecast available.".to_string()],
        };
    }

    Panel {
        title: Some("7-Day Forecast".to_string()),
        tone: Tone::Plain,
        lines: daily.days().skip(1).take(GRID_DAYS).map(day_line).collect(),
    }
}

fn day_line(day: DailyEntry<'_>) -> String {
    let condition = weather_code::describe(day.weather_code);
    let weekday = NaiveDate::parse_from_str(day.date, "%Y-%m-%d")
        .map(|date| date.format("%a").to_string())
        .unwrap_or_else(|_| day.date.to_string());

    let mut line = format!(
        "{weekday} {} {} {}°C / {}°C",
        condition.icon, condition.description, day.max_temperature_c, day.min_temperature_c
    );
    if day.precipitation_mm > 0.0 {
        line.push_str(&format!(" 💧 {} mm", day.precipitation_mm));
    }
    line
}
