//! Parrot/neon theme tokens for terminal charts and console output.
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (chart surface)
//! - **Accent**: Electric cyan (first series, titles)
//! - **Positive / Negative / Warning / Neutral**: further series colors
//! - **Muted**: Steel blue (axes, gridlines)

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Near-black background (chart surface)
    pub background: Color,
    /// Electric cyan accent (first series, titles)
    pub accent: Color,
    /// Neon green
    pub positive: Color,
    /// Hot pink
    pub negative: Color,
    /// Neon orange (warnings)
    pub warning: Color,
    /// Cool purple
    pub neutral: Color,
    /// Steel blue (axes)
    pub muted: Color,
    /// White (primary text)
    pub text_primary: Color,
    /// Light gray (axis titles, labels)
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    /// Color of the `index`-th line on a chart. Cycles after six series.
    pub fn series_color(&self, index: usize) -> Color {
        let palette = [
            self.accent,
            self.warning,
            self.positive,
            self.negative,
            self.neutral,
            self.text_primary,
        ];
        palette[index % palette.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_colors_cycle() {
        let theme = Theme::default();
        assert_eq!(theme.series_color(0), theme.accent);
        assert_eq!(theme.series_color(6), theme.accent);
        assert_ne!(theme.series_color(0), theme.series_color(1));
    }
}
