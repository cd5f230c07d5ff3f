use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherCondition {
    pub description: &'static str,
    pub icon: &'static str,
}

pub const UNKNOWN_CONDITION: WeatherCondition = WeatherCondition {
    description: "Unknown",
    icon: "❓",
};

// WMO weather interpretation codes as published by Open-Meteo.
const CONDITIONS: &[(i64, &str, &str)] = &[
    (0, "Clear sky", "☀️"),
    (1, "Mainly clear", "🌤️"),
    (2, "Partly cloudy", "⛅"),
    (3, "Overcast", "☁️"),
    (45, "Fog", "🌫️"),
    (48, "Depositing rime fog", "🌫️"),
    (51, "Light Drizzle", "🌦️"),
    (53, "Moderate Drizzle", "🌧️"),
    (55, "Dense Drizzle", "🌧️"),
    (56, "Light Freezing Drizzle", "🥶🌧️"),
    (57, "Dense Freezing Drizzle", "🥶🌧️"),
    (61, "Slight Rain", "☔"),
    (63, "Moderate Rain", "☔"),
    (65, "Heavy Rain", "⛈️"),
    (66, "Light Freezing Rain", "🥶☔"),
    (67, "Heavy Freezing Rain", "🥶☔"),
    (71, "Slight Snow fall", "🌨️"),
    (73, "Moderate Snow fall", "🌨️"),
    (75, "Heavy Snow fall", "🌨️"),
    (77, "Snow grains", "❄️"),
    (80, "Slight Rain showers", "🌦️"),
    (81, "Moderate Rain showers", "🌧️"),
    (82, "Violent Rain showers", "⛈️"),
    (85, "Slight Snow showers", "🌨️"),
    (86, "Heavy Snow showers", "🌨️"),
    (95, "Thunderstorm", "⚡"),
    (96, "Thunderstorm with slight hail", "⛈️"),
    (99, "Thunderstorm with heavy hail", "⛈️"),
];

/// Looks up a WMO code. Codes outside the table map to [`UNKNOWN_CONDITION`].
pub fn describe(code: i64) -> WeatherCondition {
    CONDITIONS
        .iter()
        .find(|(known, _, _)| *known == code)
        .map(|&(_, description, icon)| WeatherCondition { description, icon })
        .unwrap_or(UNKNOWN_CONDITION)
}
