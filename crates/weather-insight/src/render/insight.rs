use super::{Panel, Tone};

/// Summary card. Loading wins over an error, an error wins over text; nothing to show yields `None`.
pub fn insight_panel(
    interpretation: Option<&str>,
    loading: bool,
    error: Option<&str>,
) -> Option<Panel> {
    if loading {
        return Some(Panel {
            title: None,
            tone: Tone::Info,
            lines: vec!["Generating AI weather insight...".to_string()],
        });
    }

    if let Some(error) = error {
        return Some(Panel {
            title: None,
            tone: Tone::Alert,
            lines: vec![format!("Error generating AI insight: {error}")],
        });
    }

    let text = interpretation.filter(|text| !text.trim().is_empty())?;
    Some(Panel {
        title: Some("AI Weather Insight".to_string()),
        tone: Tone::Highlight,
        lines: vec![text.to_string()],
    })
}
