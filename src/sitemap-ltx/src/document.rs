//! The assembled llms.txt directory document.

use std::path::Path;

use crate::errors::Result;
use crate::summarize::PageSummary;

const BANNER_WIDTH: usize = 80;
const SEPARATOR_WIDTH: usize = 40;

/// One summary per paragraph, between a banner naming the website and a dashed separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmsTxtDocument {
    website: String,
    summaries: Vec<PageSummary>,
}

impl LlmsTxtDocument {
    pub fn new(website: impl Into<String>, summaries: Vec<PageSummary>) -> Self {
        Self {
            website: website.into(),
            summaries,
        }
    }

    pub fn summaries(&self) -> &[PageSummary] {
        &self.summaries
    }

    /// Number of pages that were summarized successfully.
    pub fn successes(&self) -> usize {
        self.summaries.iter().filter(|s| s.is_success()).count()
    }

    /// The document text. Failed pages appear as their `Error processing ...` line.
    pub fn render(&self) -> String {
        let rule = "=".repeat(BANNER_WIDTH);

        let mut lines = vec![
            rule.clone(),
            format!("LLMS.txt Page for {}", self.website),
            format!("{rule}\n"),
            "Links can be found below:\n".to_string(),
        ];
        for summary in &self.summaries {
            lines.push(summary.to_string());
            lines.push(String::new());
        }
        lines.push("-".repeat(SEPARATOR_WIDTH));

        lines.join("\n")
    }

    /// Writes the rendered document as UTF-8, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())?;
        Ok(())
    }
}

impl std::fmt::Display for LlmsTxtDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}
