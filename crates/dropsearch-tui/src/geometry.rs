//! Terminal cell geometry for the widget's extents.
//!
//! The core measures in abstract units. In the terminal one unit is one cell:
//! rows for the surface, columns for the cancel control.

use dropsearch_core::config::Config;
use dropsearch_core::overlay::OverlayMetrics;
use ratatui::text::Span;

/// Height of the bordered input bar
pub const INPUT_BAR_ROWS: u16 = 3;

/// Padding around the cancel label
const CANCEL_PADDING: f32 = 2.0;

/// Round an animated extent to whole cells.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn cells(extent: f32) -> u16 {
    if !extent.is_finite() || extent <= 0.0 {
        return 0;
    }
    extent.round().min(f32::from(u16::MAX)) as u16
}

/// Columns the cancel control needs to show its label.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cancel_width(label: &str) -> f32 {
    label.chars().count() as f32 + CANCEL_PADDING
}

/// Display columns taken by the first `cursor` chars of `text`. Wide glyphs
/// count two columns, combining marks none.
#[must_use]
pub fn cursor_column(text: &str, cursor: usize) -> u16 {
    let end = text.char_indices().nth(cursor).map_or(text.len(), |(i, _)| i);
    let width = Span::raw(&text[..end]).width();
    u16::try_from(width).unwrap_or(u16::MAX)
}

/// Overlay metrics for a terminal: the input bar is [`INPUT_BAR_ROWS`] tall and
/// the cancel control is as wide as its label unless the config says otherwise.
#[must_use]
pub fn tui_metrics(config: &Config) -> OverlayMetrics {
    let metrics = config.animation.to_metrics();
    OverlayMetrics {
        input_bar_height: f32::from(INPUT_BAR_ROWS),
        cancel_width: config
            .animation
            .cancel_width
            .unwrap_or_else(|| cancel_width(&config.appearance.cancel_text)),
        ..metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_rounds_and_clamps() {
        assert_eq!(cells(0.0), 0);
        assert_eq!(cells(-4.0), 0);
        assert_eq!(cells(f32::NAN), 0);
        assert_eq!(cells(2.4), 2);
        assert_eq!(cells(2.6), 3);
        assert_eq!(cells(1.0e9), u16::MAX);
    }

    #[test]
    fn test_cursor_column_counts_display_width() {
        assert_eq!(cursor_column("", 0), 0);
        assert_eq!(cursor_column("rust", 2), 2);
        assert_eq!(cursor_column("rust", 4), 4);
        assert_eq!(cursor_column("日本語", 2), 4);
        assert_eq!(cursor_column("e\u{301}x", 2), 1);
    }

    #[test]
    fn test_cursor_column_past_end_and_saturates() {
        assert_eq!(cursor_column("abc", 10), 3);

        let long = "x".repeat(usize::from(u16::MAX) + 10);
        assert_eq!(cursor_column(&long, long.len()), u16::MAX);
    }

    #[test]
    fn test_cancel_width_from_label() {
        assert!((cancel_width("Cancel") - 8.0).abs() < f32::EPSILON);
        assert!((cancel_width("") - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_tui_metrics_defaults() {
        let metrics = tui_metrics(&Config::default());
        assert!((metrics.input_bar_height - 3.0).abs() < f32::EPSILON);
        assert!((metrics.cancel_width - 8.0).abs() < f32::EPSILON);
        assert_eq!(metrics.surface_duration.as_millis(), 500);
    }

    #[test]
    fn test_tui_metrics_configured_cancel_width() {
        let mut config = Config::default();
        config.animation.cancel_width = Some(12.0);
        config.appearance.cancel_text = "Close".to_string();

        let metrics = tui_metrics(&config);
        assert!((metrics.cancel_width - 12.0).abs() < f32::EPSILON);
    }
}
