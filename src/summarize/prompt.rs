//! Prompt construction for transcript summaries.

use super::{SummaryRequest, ACTION_ITEMS, FOLLOW_UP_QUESTIONS, KEY_TAKEAWAYS, NOTABLE_QUOTES};

const PREAMBLE: &str = "You are an expert at extracting insights from meeting transcripts \
                        and voice notes.

Analyze the following transcript and provide a structured summary with these sections:";

const CLOSING: &str = "Use exactly one \"## \" markdown heading per section, in the order \
                       listed, and put every point on its own line starting with \"- \". \
                       Keep the summary concise but comprehensive.";

fn guidance(section: &str) -> &'static [&'static str] {
    match section {
        KEY_TAKEAWAYS => &[
            "List the 3-5 most important insights or learnings",
            "Focus on unique ideas, announcements, or valuable information",
        ],
        ACTION_ITEMS => &[
            "List specific tasks or follow-ups mentioned or implied",
            "Format as actionable items (e.g., \"Research X\", \"Contact Y about Z\")",
        ],
        FOLLOW_UP_QUESTIONS => &[
            "Suggest 2-3 questions worth exploring further",
            "These could be clarifications or deeper dives into topics mentioned",
        ],
        NOTABLE_QUOTES => &[
            "Include 1-2 particularly insightful or memorable quotes (if any)",
            "Include speaker attribution if available",
        ],
        _ => &["List the relevant points from the transcript"],
    }
}

pub fn build_prompt(request: &SummaryRequest) -> String {
    let mut prompt = String::from(PREAMBLE);
    prompt.push('\n');

    for section in &request.sections {
        prompt.push_str("\n## ");
        prompt.push_str(section);
        prompt.push('\n');
        for line in guidance(section) {
            prompt.push_str("- ");
            prompt.push_str(line);
            prompt.push('\n');
        }
    }

    prompt.push('\n');
    prompt.push_str(CLOSING);
    prompt.push_str("\n\n---\n\n");

    if !request.title.is_empty() {
        prompt.push_str("TITLE: ");
        prompt.push_str(&request.title);
        prompt.push('\n');
    }
    prompt.push_str("TRANSCRIPT:\n");
    prompt.push_str(&request.transcript_text);
    prompt.push('\n');
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::default_sections;

    fn request(sections: Vec<String>) -> SummaryRequest {
        SummaryRequest {
            transcript_text: "Ana: We discussed the roadmap.".to_string(),
            title: "Roadmap review".to_string(),
            date: None,
            sections,
        }
    }

    #[test]
    fn test_prompt_lists_sections_in_order() {
        let prompt = build_prompt(&request(default_sections()));

        let positions: Vec<usize> = default_sections()
            .iter()
            .map(|s| prompt.find(&format!("## {}\n", s)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(prompt.contains("Include speaker attribution if available"));
        assert!(prompt.ends_with("TRANSCRIPT:\nAna: We discussed the roadmap.\n"));
        assert!(prompt.contains("TITLE: Roadmap review"));
    }

    #[test]
    fn test_prompt_for_custom_section() {
        let prompt = build_prompt(&request(vec!["Decisions".to_string()]));
        assert!(prompt.contains("## Decisions\n- List the relevant points"));
        assert!(!prompt.contains("## Key Takeaways"));
    }
}
