use super::{Panel, Tone};

pub fn loading_indicator() -> Panel {
    Panel {
        title: None,
        tone: Tone::Info,
        lines: vec!["Loading weather data...".to_string()],
    }
}
