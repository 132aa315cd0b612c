use owo_colors::OwoColorize;

/// Byte range `start..end` into the program text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Computes the 1-based line and column (in characters) of a byte offset
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Returns the text of a 1-based line without its terminator
pub fn line_text(source: &str, line: usize) -> Option<&str> {
    source
        .split('\n')
        .nth(line.checked_sub(1)?)
        .map(|text| text.strip_suffix('\r').unwrap_or(text))
}

/// A label pointing at the offending part of the source
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// A complete error report. Runtime failures carry no label because the
/// evaluator does not track source positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub code: &'static str,
    pub message: String,
    pub label: Option<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            label: None,
            notes: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }
}

/// Renders diagnostics in a compiler-like layout:
///
/// ```text
/// error[E0101]: Expected ENDIF at end of input
///   --> prog.pseudo:3:1
///    |
///  3 | OUTPUT X
///    | ^^^^^^
///    |
/// ```
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        let severity = if self.use_color {
            "error".red().bold().to_string()
        } else {
            "error".to_string()
        };
        let message = if self.use_color {
            diagnostic.message.bold().to_string()
        } else {
            diagnostic.message.clone()
        };
        output.push_str(&format!("{}[{}]: {}\n", severity, diagnostic.code, message));

        if let Some(label) = &diagnostic.label {
            self.render_label(&mut output, label);
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("  {} {}\n", self.gutter("="), note));
        }

        output
    }

    fn render_label(&self, output: &mut String, label: &Label) {
        let (line, col) = line_col(self.source, label.span.start);
        let width = line.to_string().len();
        let blank = " ".repeat(width + 1);

        output.push_str(&format!(
            "{}{} {}:{}:{}\n",
            " ".repeat(width),
            self.gutter("-->"),
            self.file_name,
            line,
            col
        ));
        output.push_str(&format!("{} {}\n", blank, self.gutter("|")));

        let content = line_text(self.source, line).unwrap_or("");
        output.push_str(&format!(
            "{} {} {}\n",
            self.gutter(&format!("{:>width$}", line, width = width + 1)),
            self.gutter("|"),
            content
        ));

        // Underline stays on the first line of the span.
        let line_len = content.chars().count();
        let span_len = self.source[label.span.start.min(self.source.len())..label.span.end.min(self.source.len())]
            .chars()
            .take_while(|c| *c != '\n')
            .count();
        let carets = span_len.max(1).min(line_len.saturating_sub(col - 1).max(1));
        let mut underline = format!("{}{}", " ".repeat(col - 1), "^".repeat(carets));
        if !label.message.is_empty() {
            underline.push(' ');
            underline.push_str(&label.message);
        }
        let underline = if self.use_color {
            underline.red().to_string()
        } else {
            underline
        };
        output.push_str(&format!("{} {} {}\n", blank, self.gutter("|"), underline));
        output.push_str(&format!("{} {}\n", blank, self.gutter("|")));
    }

    fn gutter(&self, s: &str) -> String {
        if self.use_color {
            s.blue().to_string()
        } else {
            s.to_string()
        }
    }
}

/// Render multiple diagnostics followed by an abort summary
pub fn render_diagnostics(
    source: &str,
    file_name: &str,
    diagnostics: &[Diagnostic],
    use_color: bool,
) -> String {
    let renderer = DiagnosticRenderer::new(source, file_name, use_color);
    let mut output = String::new();

    for diagnostic in diagnostics {
        output.push_str(&renderer.render(diagnostic));
        output.push('\n');
    }

    match diagnostics.len() {
        0 => {}
        1 => output.push_str("error: aborting due to 1 previous error\n"),
        n => output.push_str(&format!("error: aborting due to {} previous errors\n", n)),
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let source = "DECLARE X : INTEGER\nX ← 5";
        assert_eq!(line_col(source, 0), (1, 1));
        assert_eq!(line_col(source, 8), (1, 9));
        assert_eq!(line_col(source, 20), (2, 1));
        // `←` is three bytes but one column
        assert_eq!(line_col(source, 22), (2, 3));
        assert_eq!(line_col(source, 26), (2, 5));
    }

    #[test]
    fn test_line_text() {
        let source = "OUTPUT 1\r\nOUTPUT 2\nOUTPUT 3";
        assert_eq!(line_text(source, 1), Some("OUTPUT 1"));
        assert_eq!(line_text(source, 3), Some("OUTPUT 3"));
        assert_eq!(line_text(source, 4), None);
        assert_eq!(line_text(source, 0), None);
    }

    #[test]
    fn test_diagnostic_rendering() {
        let source = "X ← 5\nIF X > 3 THEN\nOUTPUT X\n";
        let diagnostic = Diagnostic::error("E0101", "Expected ENDIF at end of input")
            .with_label(Label::new(Span::new(22, 28), "block opened here is never closed"))
            .with_help("close the block with ENDIF");

        let output = DiagnosticRenderer::new(source, "prog.pseudo", false).render(&diagnostic);

        assert!(output.contains("error[E0101]: Expected ENDIF at end of input"));
        assert!(output.contains("prog.pseudo:3:1"));
        assert!(output.contains("3 | OUTPUT X"));
        assert!(output.contains("^^^^^^ block opened here is never closed"));
        assert!(output.contains("= help: close the block with ENDIF"));
    }

    #[test]
    fn test_runtime_diagnostic_has_no_location() {
        let diagnostic = Diagnostic::error("E0201", "Variable 'Y' not declared");
        let output = render_diagnostics("OUTPUT Y", "prog.pseudo", &[diagnostic], false);
        assert!(output.starts_with("error[E0201]: Variable 'Y' not declared\n"));
        assert!(!output.contains("-->"));
        assert!(output.contains("aborting due to 1 previous error"));
    }
}
