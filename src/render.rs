//! Frame rendering for terminal output.
//!
//! The core never draws anything itself; hosts plug in a [`Renderer`]. The
//! CLI uses [`TextRenderer`], which draws one horizontal bar per element.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::schema::{Frame, Role};

/// Glyph tokens a renderer maps highlight roles onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub bar: char,
    pub compared: char,
    pub swapped: char,
    pub pivot: char,
    pub highlighted: char,
    /// Width of the longest bar in characters.
    pub width: usize,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bar: '█',
            compared: '?',
            swapped: '⇅',
            pivot: '●',
            highlighted: '*',
            width: 40,
        }
    }
}

impl Theme {
    /// ASCII-only theme for terminals without Unicode block glyphs.
    pub fn ascii() -> Self {
        Self {
            bar: '#',
            swapped: '~',
            pivot: 'o',
            ..Self::default()
        }
    }

    pub fn marker(&self, role: Option<Role>) -> char {
        match role {
            Some(Role::Compared) => self.compared,
            Some(Role::Swapped) => self.swapped,
            Some(Role::Pivot) => self.pivot,
            Some(Role::Highlighted) => self.highlighted,
            None => ' ',
        }
    }
}

/// Produces a visual representation of one frame.
pub trait Renderer {
    fn render(&self, frame: &Frame, theme: &Theme) -> String;
}

/// Bar chart renderer with explain and counter lines.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    pub show_counters: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            show_counters: true,
        }
    }
}

impl TextRenderer {
    fn bar_len(value: f64, lo: f64, hi: f64, width: usize) -> usize {
        if width == 0 {
            return 0;
        }
        if hi <= lo {
            return width;
        }
        // Smallest value still gets one cell so it stays visible.
        let t = (value - lo) / (hi - lo);
        1 + (t * (width - 1) as f64).round() as usize
    }
}

impl Renderer for TextRenderer {
    fn render(&self, frame: &Frame, theme: &Theme) -> String {
        let mut out = String::new();
        let lo = frame.array.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = frame.array.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let digits = frame.array.len().saturating_sub(1).to_string().len();

        for (i, &value) in frame.array.iter().enumerate() {
            let marker = theme.marker(frame.highlights.role_of(i));
            let bar = theme
                .bar
                .to_string()
                .repeat(Self::bar_len(value, lo, hi, theme.width));
            let _ = writeln!(out, "{marker} {i:>digits$} {bar} {value}");
        }

        if let Some(explain) = &frame.explain {
            let _ = writeln!(out, "{explain}");
        }
        if self.show_counters && !frame.counters.is_empty() {
            let counters: Vec<String> = frame
                .counters
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            let _ = writeln!(out, "[{}]", counters.join(" "));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Counters, Highlights, SWAPS};

    #[test]
    fn test_render_marks_roles_and_scales_bars() {
        let mut counters = Counters::with_keys(&[SWAPS]);
        counters.bump(SWAPS);
        let frame = Frame::snapshot(&[1.0, 5.0, 3.0])
            .counters(&counters)
            .highlights(Highlights::swapped(0, 1))
            .explain("Swap them because 5 > 1.");

        let theme = Theme {
            width: 5,
            ..Theme::ascii()
        };
        let text = TextRenderer::default().render(&frame, &theme);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "~ 0 # 1");
        assert_eq!(lines[1], "~ 1 ##### 5");
        assert_eq!(lines[2], "  2 ### 3");
        assert_eq!(lines[3], "Swap them because 5 > 1.");
        assert_eq!(lines[4], "[swaps=1]");
    }

    #[test]
    fn test_render_flat_and_empty_arrays() {
        let theme = Theme {
            width: 3,
            ..Theme::ascii()
        };
        let renderer = TextRenderer {
            show_counters: false,
        };
        let flat = renderer.render(&Frame::snapshot(&[2.0, 2.0]), &theme);
        assert!(flat.lines().all(|l| l.contains("###")));
        assert_eq!(renderer.render(&Frame::snapshot(&[]), &theme), "");
    }

    #[test]
    fn test_marker_precedence_follows_roles() {
        let theme = Theme::default();
        let highlights = Highlights {
            compared: Some((0, 1)),
            swapped: Some((1, 2)),
            pivot: Some(3),
            indices: vec![3, 4],
        };
        let markers: Vec<char> = (0..6).map(|i| theme.marker(highlights.role_of(i))).collect();
        assert_eq!(markers, vec!['?', '⇅', '⇅', '●', '*', ' ']);
    }
}
