/// Rendered advice body in both languages
#[derive(Debug, Default)]
pub(super) struct Body {
    pub en: String,
    pub ny: String,
    pub urgent: bool,
}

/// Line-oriented builder for markdown-ish advice text
#[derive(Debug, Default)]
pub(super) struct Doc {
    lines: Vec<String>,
}

impl Doc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.lines.push(format!("**{}**", text.as_ref()));
        self
    }

    pub fn field(&mut self, label: &str, value: impl std::fmt::Display) -> &mut Self {
        self.lines.push(format!("• **{label}:** {value}"));
        self
    }

    pub fn bullet(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.lines.push(format!("• {}", text.as_ref()));
        self
    }

    pub fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(text.into());
        self
    }

    /// Paragraph break; collapses repeats and is dropped at the start
    pub fn blank(&mut self) -> &mut Self {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
        self
    }

    pub fn finish(&mut self) -> String {
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        std::mem::take(&mut self.lines).join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_layout() {
        let text = Doc::new()
            .blank()
            .heading("Tips")
            .field("Soil", "Loam")
            .blank()
            .blank()
            .bullet("Weed early")
            .blank()
            .finish();

        assert_eq!(text, "**Tips**\n• **Soil:** Loam\n\n• Weed early");
    }
}
