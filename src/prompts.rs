//! Prompt text for the literature-review screening request.
//!
//! The request is the framing sentence, the article text and the instruction
//! block, concatenated with no separator.
//!
//! Callers can replace the instruction block via
//! [`crate::config::BatchConfig::instructions`]; the framing sentence is
//! always kept.

/// Framing sentence that opens every request.
///
/// The article text is appended directly after it with no separator.
pub const FRAMING_PROMPT: &str = concat!(
    "You are an advanced text analysis assistant specializing in analyzing academic articles, \n",
    "    both theoretical pieces and empirical studies.",
);

/// Default analysis instructions appended after the article text.
///
/// Used when `BatchConfig::instructions` is `None`.
pub const DEFAULT_INSTRUCTIONS: &str = concat!(
    "\n",
    "    Read and analyze the provided text very accurately and comprehensively.\n",
    "    \n",
    "    Context:\n",
    "    - This analysis is for a Health Sciences MSc. Thesis Systematic Literature Review\n",
    "    - Currently in the full-text screening phase\n",
    "    - Focus: Physical activity interventions for elderly people\n",
    "    - Analytical lens: Social-Ecological Model of Health Behavior\n",
    "    \n",
    "    Research Question:\n",
    "    How have physical activity interventions and their effectiveness been studied \n",
    "    and implemented among elderly populations in community settings?\n",
    "    \n",
    "    Please provide:\n",
    "    A) Critical assessment of text relevance to context (yes/no with brief explanation)\n",
    "    B) Summary of article's main objectives, research questions, and relevance to thesis\n",
    "    C) Detailed study design analysis\n",
    "    D) Primary findings related to intervention effectiveness, adherence factors, and health outcomes in elderly populations\n",
    "    ",
);

/// Assemble the single outbound message: framing, article text, instructions.
///
/// `text` is inserted verbatim. Nothing is truncated, chunked or escaped, so
/// oversized articles reach the provider whole.
pub fn build_prompt(text: &str, instructions: &str) -> String {
    let mut prompt =
        String::with_capacity(FRAMING_PROMPT.len() + text.len() + instructions.len());
    prompt.push_str(FRAMING_PROMPT);
    prompt.push_str(text);
    prompt.push_str(instructions);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_framing_text_instructions() {
        let p = build_prompt("HelloWorld", DEFAULT_INSTRUCTIONS);
        assert!(p.starts_with(FRAMING_PROMPT));
        assert!(p.ends_with(DEFAULT_INSTRUCTIONS));
        assert_eq!(
            p.len(),
            FRAMING_PROMPT.len() + "HelloWorld".len() + DEFAULT_INSTRUCTIONS.len()
        );
        assert!(p.contains("empirical studies.HelloWorld\n    Read"));
    }

    #[test]
    fn text_is_not_escaped() {
        let raw = "quotes \" and {braces} and \\ backslash\n\ttab ünïcödé";
        let p = build_prompt(raw, DEFAULT_INSTRUCTIONS);
        assert!(p.contains(raw));
    }

    #[test]
    fn large_text_is_passed_whole() {
        let big = "x".repeat(2_000_000);
        let p = build_prompt(&big, "");
        assert!(p.contains(&big));
    }

    #[test]
    fn instructions_list_four_sections() {
        for section in ["A) ", "B) ", "C) ", "D) "] {
            assert!(DEFAULT_INSTRUCTIONS.contains(section), "missing {section}");
        }
        assert!(DEFAULT_INSTRUCTIONS.contains("Research Question:"));
    }

    #[test]
    fn prompt_text_keeps_indentation_and_trailing_spaces() {
        assert!(FRAMING_PROMPT.ends_with("academic articles, \n    both theoretical pieces and empirical studies."));
        assert!(DEFAULT_INSTRUCTIONS.starts_with("\n    Read and analyze"));
        assert!(DEFAULT_INSTRUCTIONS.contains("been studied \n    and implemented"));
        assert!(DEFAULT_INSTRUCTIONS.contains("\n    \n    Context:\n"));
        assert!(DEFAULT_INSTRUCTIONS.ends_with("in elderly populations\n    "));
    }
}
