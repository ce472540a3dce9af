use std::collections::HashMap;

use indoc::indoc;
use subst::substitute;

use crate::errors::Result;

/// Fixed instruction sent ahead of every page.
pub const SYSTEM_PROMPT: &str = indoc! { "
  You are an AI that creates webpage summaries in a specific link format. \
  Provide a concise title of 4 to 5 words that accurately conveys the main context and purpose of the webpage."
};

const SUMMARIZE_PAGE: &str = indoc! { "
  Create a single-sentence webpage summary in this exact format:
  [Title] (${URL}): A concise sentence that captures the essence of the page.

  Input content:
  ${CONTENT}"
};

/// The user message for one page: the page URL plus its cleaned text, verbatim and untruncated.
pub fn prompt_summarize_page(url: &str, content: &str) -> Result<String> {
    let res = substitute(SUMMARIZE_PAGE, &{
        let mut v = HashMap::new();
        v.insert("URL".to_string(), url.to_string());
        v.insert("CONTENT".to_string(), content.to_string());
        v
    })?;
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_summarize_page() {
        let prompt = prompt_summarize_page("https://example.com/a", "Costs $5 (plus ${TAX}).").unwrap();
        assert_eq!(
            prompt,
            "Create a single-sentence webpage summary in this exact format:\n\
             [Title] (https://example.com/a): A concise sentence that captures the essence of the page.\n\
             \n\
             Input content:\n\
             Costs $5 (plus ${TAX})."
        );
    }

    #[test]
    fn test_system_prompt_asks_for_short_title() {
        assert!(SYSTEM_PROMPT.starts_with("You are an AI that creates webpage summaries"));
        assert!(SYSTEM_PROMPT.contains("4 to 5 words"));
        assert!(!SYSTEM_PROMPT.contains('\n'));
    }
}
