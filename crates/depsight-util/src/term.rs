//! Styled text output and Cargo-style status lines.

use std::fmt;
use std::io::Write;

use console::Style;

/// Semantic styles used by reports. Mapped to terminal colours only when
/// colours are enabled on the [`StyledOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Normal,
    /// Component names and coordinates.
    Identifier,
    /// Secondary text: descriptions, variant blocks, detail sections.
    Description,
    /// Resolution failures (`FAILED`, `(n)`).
    Failure,
    /// Informational markers: `(*)`, `(not requested)`.
    Info,
    /// Something the user can type.
    UserInput,
    /// Error coordinates in failure explanations.
    Error,
}

impl TextStyle {
    fn console_style(self) -> Style {
        match self {
            TextStyle::Normal => Style::new(),
            TextStyle::Identifier => Style::new().bold(),
            TextStyle::Description => Style::new().dim(),
            TextStyle::Failure => Style::new().red().bold(),
            TextStyle::Info => Style::new().yellow(),
            TextStyle::UserInput => Style::new().cyan().bold(),
            TextStyle::Error => Style::new().red(),
        }
    }
}

/// An in-memory text buffer that applies [`TextStyle`]s when colours are on.
///
/// With colours off the buffer holds plain text, which is what tests compare
/// against.
#[derive(Debug, Default, Clone)]
pub struct StyledOutput {
    buf: String,
    colors: bool,
}

impl StyledOutput {
    /// A plain-text buffer.
    pub fn plain() -> Self {
        Self::default()
    }

    /// A buffer that emits ANSI styles.
    pub fn colored() -> Self {
        Self {
            buf: String::new(),
            colors: true,
        }
    }

    /// Colours follow the terminal's capabilities.
    pub fn for_terminal() -> Self {
        if console::colors_enabled() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn text(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.buf.push_str(text.as_ref());
        self
    }

    pub fn styled(&mut self, style: TextStyle, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if self.colors && style != TextStyle::Normal {
            let painted = style.console_style().force_styling(true).apply_to(text);
            self.buf.push_str(&painted.to_string());
        } else {
            self.buf.push_str(text);
        }
        self
    }

    pub fn println(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl fmt::Display for StyledOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}

/// Print a Cargo-style status line: `   Analyzing runtimeClasspath`
///
/// The `label` is right-padded to 12 characters and printed in bold green,
/// followed by the `message` in the default terminal colour.
pub fn status(label: &str, message: &str) {
    let green_bold = Style::new().green().bold();
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        green_bold.apply_to(label),
    );
}

/// Print a warning-style status line (bold yellow label).
pub fn status_warn(label: &str, message: &str) {
    let yellow_bold = Style::new().yellow().bold();
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        yellow_bold.apply_to(label),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_has_no_escapes() {
        let mut out = StyledOutput::plain();
        out.styled(TextStyle::Failure, "FAILED").text(" here").println();
        assert_eq!(out.as_str(), "FAILED here\n");
    }

    #[test]
    fn colored_output_wraps_styled_text() {
        let mut out = StyledOutput::colored();
        out.styled(TextStyle::Failure, "FAILED");
        assert!(out.as_str().contains("FAILED"));
        assert!(out.as_str().contains('\u{1b}'));
    }

    #[test]
    fn normal_style_is_never_escaped() {
        let mut out = StyledOutput::colored();
        out.styled(TextStyle::Normal, "x");
        assert_eq!(out.as_str(), "x");
    }

    #[test]
    fn display_matches_buffer() {
        let mut out = StyledOutput::plain();
        out.text("a").text("b");
        assert_eq!(out.to_string(), "ab");
    }
}
