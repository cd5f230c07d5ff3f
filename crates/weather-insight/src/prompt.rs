use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::ForecastResult;
use crate::weather_code::{self, UNKNOWN_CONDITION, WeatherCondition};

/// Language the generated summary is requested in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptLanguage {
    #[default]
    Persian,
    English,
}

impl PromptLanguage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Persian => "fa",
            Self::English => "en",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fa" | "persian" | "farsi" => Some(Self::Persian),
            "en" | "english" => Some(Self::English),
            _ => None,
        }
    }
}

struct Template {
    instruction: &'static str,
    current_heading: fn(&str) -> String,
    current_temperature: fn(f64, &str, &str) -> String,
    current_wind: fn(f64, f64) -> String,
    daily_heading: fn(usize) -> String,
    daily_line: fn(&str, f64, f64, &str, &str, f64) -> String,
    unknown_description: &'static str,
    weekday: fn(Weekday) -> &'static str,
}

static PERSIAN: Template = Template {
    instruction: "لطفاً یک پاراگراف تفسیر آب و هوا به زبان فارسی بنویسید که بر شرایط کلیدی و روند کلی هوا در داده‌های زیر تمرکز کند.",
    current_heading: |timezone| format!("آب و هوای فعلی در منطقه زمانی {timezone}:"),
    current_temperature: |temperature, description, icon| {
        format!("دما: {temperature}°C، وضعیت: {description} {icon}،")
    },
    current_wind: |speed, direction| {
        format!("سرعت باد: {speed} کیلومتر بر ساعت از جهت {direction} درجه.")
    },
    daily_heading: |days| {
        format!("پیش‌بینی {days} روز آینده (دما بر حسب سانتی‌گراد، بارش بر حسب میلی‌متر):")
    },
    daily_line: |label, max, min, description, icon, precipitation| {
        format!(
            "{label}: حداکثر {max}°C، حداقل {min}°C، وضعیت: {description} {icon}، بارش: {precipitation} میلی‌متر"
        )
    },
    unknown_description: "نامعلوم",
    weekday: persian_weekday,
};

static ENGLISH: Template = Template {
    instruction: "Please write one paragraph in English interpreting the weather below, focusing on the key conditions and the overall trend.",
    current_heading: |timezone| format!("Current weather in time zone {timezone}:"),
    current_temperature: |temperature, description, icon| {
        format!("Temperature: {temperature}°C, conditions: {description} {icon},")
    },
    current_wind: |speed, direction| {
        format!("Wind speed: {speed} km/h from {direction} degrees.")
    },
    daily_heading: |days| {
        format!("Forecast for the next {days} days (temperatures in Celsius, precipitation in millimetres):")
    },
    daily_line: |label, max, min, description, icon, precipitation| {
        format!(
            "{label}: max {max}°C, min {min}°C, conditions: {description} {icon}, precipitation: {precipitation} mm"
        )
    },
    unknown_description: "Unknown",
    weekday: english_weekday,
};

/// Renders the generation prompt. The output depends only on its inputs.
pub fn build_prompt(forecast: &ForecastResult, language: PromptLanguage) -> String {
    let template = match language {
        PromptLanguage::Persian => &PERSIAN,
        PromptLanguage::English => &ENGLISH,
    };
    let current = &forecast.current;
    let condition = weather_code::describe(current.weather_code);

    let mut lines = vec![
        template.instruction.to_string(),
        (template.current_heading)(&forecast.location.timezone),
        (template.current_temperature)(
            current.temperature_c,
            description(template, condition),
            condition.icon,
        ),
        (template.current_wind)(current.wind_speed_kmh, current.wind_direction_deg),
        String::new(),
        (template.daily_heading)(forecast.daily.len()),
    ];

    for day in forecast.daily.days() {
        let condition = weather_code::describe(day.weather_code);
        let label = day_label(template, day.date);
        lines.push((template.daily_line)(
            &label,
            day.max_temperature_c,
            day.min_temperature_c,
            description(template, condition),
            condition.icon,
            day.precipitation_mm,
        ));
    }

    lines.join("\n")
}

fn description(template: &Template, condition: WeatherCondition) -> &'static str {
    if condition == UNKNOWN_CONDITION {
        template.unknown_description
    } else {
        condition.description
    }
}

fn day_label(template: &Template, date: &str) -> String {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map(|parsed| (template.weekday)(parsed.weekday()).to_string())
        .unwrap_or_else(|_| date.to_string())
}

fn persian_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sat => "شنبه",
        Weekday::Sun => "یکشنبه",
        Weekday::Mon => "دوشنبه",
        Weekday::Tue => "سه‌شنبه",
        Weekday::Wed => "چهارشنبه",
        Weekday::Thu => "پنجشنبه",
        Weekday::Fri => "جمعه",
    }
}

fn english_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
