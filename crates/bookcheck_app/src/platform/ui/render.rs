use std::io::{self, Write};

use bookcheck_core::{AppViewModel, SessionId};

const EXTRACTION_HEADERS: [&str; 7] = [
    "Screenshot",
    "Type",
    "Hotel",
    "Check-in",
    "Check-out",
    "Guests",
    "Total",
];
const COMPARISON_HEADERS: [&str; 6] = [
    "Field",
    "Initial",
    "Final",
    "Status",
    "Explanation",
    "Evidence",
];

/// Prints view models as they change: new log lines while the session runs,
/// then result tables once it ends.
pub struct TerminalRenderer<W: Write> {
    out: W,
    printed_logs: usize,
    session_id: SessionId,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed_logs: 0,
            session_id: 0,
        }
    }

    /// Writes only log entries not printed yet for the current session.
    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        if view.session_id != self.session_id || view.logs.len() < self.printed_logs {
            self.session_id = view.session_id;
            self.printed_logs = 0;
        }
        for entry in &view.logs[self.printed_logs..] {
            writeln!(
                self.out,
                "{} [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                entry.level.as_str(),
                entry.text
            )?;
        }
        self.printed_logs = view.logs.len();
        self.out.flush()
    }

    pub fn render_selection(&mut self, view: &AppViewModel) -> io::Result<()> {
        if !view.files.is_empty() {
            writeln!(self.out, "Selected {} image(s):", view.files.len())?;
            for file in &view.files {
                writeln!(self.out, "  {} ({})", file.name, format_size(file.size))?;
            }
        }
        if let Some(hint) = view.selection_hint {
            writeln!(self.out, "{hint}")?;
        }
        self.out.flush()
    }

    pub fn render_summary(&mut self, view: &AppViewModel) -> io::Result<()> {
        if !view.extractions.is_empty() {
            writeln!(self.out, "\nExtractions")?;
            let rows: Vec<Vec<String>> = view
                .extractions
                .iter()
                .map(|row| {
                    vec![
                        row.screenshot_id.clone(),
                        row.classification.clone(),
                        row.hotel_name.clone(),
                        row.check_in.clone(),
                        row.check_out.clone(),
                        row.guests.clone(),
                        row.total_price.clone(),
                    ]
                })
                .collect();
            write_table(&mut self.out, &EXTRACTION_HEADERS, &rows)?;
        }

        if !view.comparisons.is_empty() {
            writeln!(self.out, "\nComparisons")?;
            let rows: Vec<Vec<String>> = view
                .comparisons
                .iter()
                .map(|row| {
                    vec![
                        row.field.clone(),
                        row.initial_value.clone(),
                        row.final_value.clone(),
                        row.status.as_str().to_string(),
                        row.explanation.clone(),
                        row.evidence.clone(),
                    ]
                })
                .collect();
            write_table(&mut self.out, &COMPARISON_HEADERS, &rows)?;
        }

        if let Some(label) = &view.final_label {
            writeln!(self.out, "\nFinal: {label}")?;
            if let Some(detail) = &view.final_detail {
                writeln!(self.out, "{detail}")?;
            }
        }
        if let Some(banner) = view.banner {
            writeln!(self.out, "\n{}", banner.text)?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

fn write_table<W: Write>(out: &mut W, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write_row(out, &widths, &header_cells)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &widths, &rule)?;
    for row in rows {
        write_row(out, &widths, row)?;
    }
    Ok(())
}

fn write_row<W: Write>(out: &mut W, widths: &[usize], cells: &[String]) -> io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookcheck_core::{
        update, AppState, ComparisonRecord, FileCandidate, FinalSummary, Msg, StreamEvent,
    };
    use std::path::PathBuf;

    fn image(name: &str) -> FileCandidate {
        FileCandidate {
            path: PathBuf::from(name),
            name: name.to_string(),
            size: 2048,
            mime: "image/png".to_string(),
        }
    }

    fn running_state() -> AppState {
        let (state, _) = update(
            AppState::new(),
            Msg::FilesSelected(vec![image("quote.png"), image("booking.png")]),
        );
        let (state, _) = update(state, Msg::StartClicked);
        state
    }

    fn progress(state: AppState, text: &str) -> AppState {
        let session = state.session_id();
        update(
            state,
            Msg::StreamEvent {
                session,
                event: StreamEvent::Progress {
                    text: text.to_string(),
                },
            },
        )
        .0
    }

    fn lines(output: Vec<u8>) -> Vec<String> {
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn prints_each_log_entry_once() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        let state = running_state();
        renderer.render(&state.view()).unwrap();
        let state = progress(state, "Classifying screenshots");
        renderer.render(&state.view()).unwrap();
        renderer.render(&state.view()).unwrap();

        let out = lines(renderer.into_inner());
        assert_eq!(out.len(), 2);
        assert!(out[0].ends_with("[info] Uploading images and starting processing..."));
        assert!(out[1].ends_with("[info] Classifying screenshots"));
    }

    #[test]
    fn summary_lists_comparisons_and_banner() {
        let mut state = running_state();
        let session = state.session_id();
        let comparison: ComparisonRecord = serde_json::from_value(serde_json::json!({
            "field": "total_price",
            "initial_value": "420 EUR",
            "final_value": "450 EUR",
            "status": "mismatch",
            "explanation": "price increased",
            "evidence": ["quote line 4", "booking footer"]
        }))
        .unwrap();
        for event in [
            StreamEvent::Comparison(comparison),
            StreamEvent::Final(FinalSummary {
                overall: "mismatch".to_string(),
                detail: None,
            }),
        ] {
            state = update(state, Msg::StreamEvent { session, event }).0;
        }

        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render_summary(&state.view()).unwrap();
        let out = lines(renderer.into_inner());

        assert!(out.contains(&"Comparisons".to_string()));
        assert!(out.iter().any(|line| line.starts_with("Field")));
        assert!(out.iter().any(|line| line.starts_with("total_price")
            && line.contains("mismatch")
            && line.ends_with("quote line 4, booking footer")));
        assert!(out.contains(&"Final: MISMATCH".to_string()));
        assert_eq!(
            out.last().map(String::as_str),
            Some("Initial quote and booking do not match")
        );
    }

    #[test]
    fn selection_hint_is_shown_for_a_single_file() {
        let (state, _) = update(AppState::new(), Msg::FilesSelected(vec![image("quote.png")]));
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render_selection(&state.view()).unwrap();

        assert_eq!(
            lines(renderer.into_inner()),
            vec![
                "Selected 1 image(s):".to_string(),
                "  quote.png (2.0 KB)".to_string(),
                "At least two screenshots required".to_string(),
            ]
        );
    }
}
