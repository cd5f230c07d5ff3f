use serde::Serialize;

use crate::dashboard::{RequestState, Stage};
use crate::model::ForecastResult;

pub mod current;
pub mod daily;
pub mod insight;
pub mod loading;

pub const PAGE_TITLE: &str = "Weather Forecast";
const SUBMIT_LABEL: &str = "Get Weather";
const SUBMIT_BUSY_LABEL: &str = "Fetching & Analyzing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Info,
    Alert,
    Highlight,
}

/// One block of terminal output.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: Option<String>,
    pub tone: Tone,
    pub lines: Vec<String>,
}

/// Composes the whole page for the given state.
pub fn page(state: &RequestState) -> Vec<Panel> {
    let busy = state.is_busy();
    let mut panels = vec![Panel {
        title: Some(PAGE_TITLE.to_string()),
        tone: Tone::Plain,
        lines: vec![
            format!("Latitude: {}", state.latitude_input()),
            format!("Longitude: {}", state.longitude_input()),
            format!(
                "[ {} ]",
                if busy { SUBMIT_BUSY_LABEL } else { SUBMIT_LABEL }
            ),
        ],
    }];

    match state.forecast() {
        Stage::Idle => {}
        Stage::Loading => panels.push(loading::loading_indicator()),
        Stage::Failed(message) => panels.push(Panel {
            title: None,
            tone: Tone::Alert,
            lines: vec![message.clone()],
        }),
        Stage::Ready(forecast) => {
            panels.extend(result_panels(forecast, state.interpretation()));
        }
    }

    panels
}

fn result_panels(forecast: &ForecastResult, interpretation: &Stage<String>) -> Vec<Panel> {
    let mut panels = vec![
        Panel {
            title: Some(format!(
                "Weather in {:.2}, {:.2}",
                forecast.location.latitude, forecast.location.longitude
            )),
            tone: Tone::Plain,
            lines: Vec::new(),
        },
        current::current_conditions(&forecast.current, &forecast.location.timezone),
        daily::daily_grid(&forecast.daily),
    ];
    panels.extend(insight::insight_panel(
        interpretation.value().map(String::as_str),
        interpretation.is_loading(),
        interpretation.error(),
    ));
    panels
}

/// Plain terminal rendering; panels are separated by a blank line.
pub fn to_text(panels: &[Panel]) -> String {
    panels
        .iter()
        .map(panel_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn panel_text(panel: &Panel) -> String {
    let mut lines = Vec::with_capacity(panel.lines.len() + 2);
    if let Some(title) = &panel.title {
        lines.push(title.clone());
        lines.push("-".repeat(title.chars().count()));
    }
    let marker = match panel.tone {
        Tone::Alert => "[!] ",
        Tone::Info => "... ",
        Tone::Plain | Tone::Highlight => "",
    };
    lines.extend(panel.lines.iter().map(|line| format!("{marker}{line}")));
    lines.join("\n")
}

/// JSON view of the request state.
#[derive(Debug, Serialize)]
pub struct DashboardSnapshot<'a> {
    pub latitude_input: &'a str,
    pub longitude_input: &'a str,
    pub busy: bool,
    pub forecast: &'a Stage<ForecastResult>,
    pub interpretation: &'a Stage<String>,
}

impl<'a> DashboardSnapshot<'a> {
    pub fn from_state(state: &'a RequestState) -> Self {
        Self {
            latitude_input: state.latitude_input(),
            longitude_input: state.longitude_input(),
            busy: state.is_busy(),
            forecast: state.forecast(),
            interpretation: state.interpretation(),
        }
    }
}
