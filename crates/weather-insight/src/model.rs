use serde::Serialize;
use thiserror::Error;

pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(ValidationError::NotANumber);
        }
        if !LATITUDE_RANGE.contains(&latitude) {
            return Err(ValidationError::LatitudeOutOfRange(latitude));
        }
        if !LONGITUDE_RANGE.contains(&longitude) {
            return Err(ValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parses raw form text. Both fields must be numeric before ranges are checked.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, ValidationError> {
        match (parse_number(latitude), parse_number(longitude)) {
            (Some(latitude), Some(longitude)) => Self::new(latitude, longitude),
            _ => Err(ValidationError::NotANumber),
        }
    }

    pub fn latitude(self) -> f64 {
        self.latitude
    }

    pub fn longitude(self) -> f64 {
        self.longitude
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Please enter valid numbers for latitude and longitude.")]
    NotANumber,
    #[error("Latitude must be between -90 and 90 (got {0}).")]
    LatitudeOutOfRange(f64),
    #[error("Longitude must be between -180 and 180 (got {0}).")]
    LongitudeOutOfRange(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{series} series length mismatch: {field} has {actual} entries, expected {expected}")]
pub struct SeriesLengthMismatch {
    pub series: &'static str,
    pub field: &'static str,
    pub expected: usize,
    pub actual: usize,
}

fn check_len(
    series: &'static str,
    field: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), SeriesLengthMismatch> {
    if expected == actual {
        Ok(())
    } else {
        Err(SeriesLengthMismatch {
            series,
            field,
            expected,
            actual,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationEcho {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub timezone_abbreviation: String,
    pub utc_offset_seconds: i32,
    pub elevation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub wind_direction_deg: f64,
    pub weather_code: i64,
    /// Local time at the forecast location, ISO-8601 without offset.
    pub time: String,
}

/// Per-day forecast columns. Every column has one entry per day; index 0 is today.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeries {
    dates: Vec<String>,
    max_temperature_c: Vec<f64>,
    min_temperature_c: Vec<f64>,
    weather_codes: Vec<i64>,
    precipitation_mm: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyEntry<'a> {
    pub date: &'a str,
    pub max_temperature_c: f64,
    pub min_temperature_c: f64,
    pub weather_code: i64,
    pub precipitation_mm: f64,
}

impl DailySeries {
    pub fn new(
        dates: Vec<String>,
        max_temperature_c: Vec<f64>,
        min_temperature_c: Vec<f64>,
        weather_codes: Vec<i64>,
        precipitation_mm: Vec<f64>,
    ) -> Result<Self, SeriesLengthMismatch> {
        let expected = dates.len();
        check_len("daily", "temperature_2m_max", expected, max_temperature_c.len())?;
        check_len("daily", "temperature_2m_min", expected, min_temperature_c.len())?;
        check_len("daily", "weather_code", expected, weather_codes.len())?;
        check_len("daily", "precipitation_sum", expected, precipitation_mm.len())?;

        Ok(Self {
            dates,
            max_temperature_c,
            min_temperature_c,
            weather_codes,
            precipitation_mm,
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<DailyEntry<'_>> {
        Some(DailyEntry {
            date: self.dates.get(index)?,
            max_temperature_c: self.max_temperature_c[index],
            min_temperature_c: self.min_temperature_c[index],
            weather_code: self.weather_codes[index],
            precipitation_mm: self.precipitation_mm[index],
        })
    }

    pub fn days(&self) -> impl Iterator<Item = DailyEntry<'_>> {
        (0..self.len()).filter_map(|index| self.get(index))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlySeries {
    times: Vec<String>,
    temperature_c: Vec<Option<f64>>,
    relative_humidity_pct: Vec<Option<f64>>,
    wind_speed_kmh: Vec<Option<f64>>,
}

impl HourlySeries {
    pub fn new(
        times: Vec<String>,
        temperature_c: Vec<Option<f64>>,
        relative_humidity_pct: Vec<Option<f64>>,
        wind_speed_kmh: Vec<Option<f64>>,
    ) -> Result<Self, SeriesLengthMismatch> {
        let expected = times.len();
        check_len("hourly", "temperature_2m", expected, temperature_c.len())?;
        check_len("hourly", "relative_humidity_2m", expected, relative_humidity_pct.len())?;
        check_len("hourly", "wind_speed_10m", expected, wind_speed_kmh.len())?;

        Ok(Self {
            times,
            temperature_c,
            relative_humidity_pct,
            wind_speed_kmh,
        })
    }
}

/// One provider response. Replaced wholesale on every cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub location: LocationEcho,
    pub current: CurrentConditions,
    pub daily: DailySeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly: Option<HourlySeries>,
}
