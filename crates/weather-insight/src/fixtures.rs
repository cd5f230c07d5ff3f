use crate::model::{CurrentConditions, DailySeries, ForecastResult, LocationEcho};

/// Eight days starting Sunday 2026-10-18; the last day has an unknown code.
pub(crate) fn sample_forecast() -> ForecastResult {
    let dates = (18..=25).map(|day| format!("2026-10-{day}")).collect();
    let daily = DailySeries::new(
        dates,
        vec![24.1, 23.0, 22.5, 19.8, 18.0, 20.2, 21.7, 22.0],
        vec![12.3, 11.9, 10.4, 9.0, 8.7, 9.9, 11.0, 11.5],
        vec![0, 1, 2, 61, 63, 3, 45, 9999],
        vec![0.0, 0.0, 0.0, 4.2, 11.5, 0.0, 0.0, 0.0],
    )
    .expect("fixture series");

    ForecastResult {
        location: LocationEcho {
            latitude: 35.6892,
            longitude: 51.389,
            timezone: "Asia/Tehran".to_string(),
            timezone_abbreviation: "GMT+3:30".to_string(),
            utc_offset_seconds: 12_600,
            elevation: Some(1_191.0),
        },
        current: CurrentConditions {
            temperature_c: 21.4,
            wind_speed_kmh: 9.7,
            wind_direction_deg: 245.0,
            weather_code: 1,
            time: "2026-10-18T14:30".to_string(),
        },
        daily,
        hourly: None,
    }
}
