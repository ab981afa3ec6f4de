//! Indentation-aware output buffer.

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct PhpWriter {
    output: String,
    indent_level: usize,
    at_line_start: bool,
}

impl PhpWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            at_line_start: true,
        }
    }

    /// Write text, indenting first if this starts a line.
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            for _ in 0..self.indent_level {
                self.output.push_str(INDENT);
            }
            self.at_line_start = false;
        }
        self.output.push_str(text);
    }

    pub fn write_line(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indents_only_at_line_start() {
        let mut w = PhpWriter::new();
        w.write("if (true) {");
        w.write_line();
        w.increase_indent();
        w.write("$a");
        w.write(" = 1;");
        w.write_line();
        w.decrease_indent();
        w.write("}");
        assert_eq!(w.as_str(), "if (true) {\n    $a = 1;\n}");
    }

    #[test]
    fn test_decrease_below_zero_is_noop() {
        let mut w = PhpWriter::new();
        w.decrease_indent();
        w.write("x");
        assert_eq!(w.into_string(), "x");
    }
}
