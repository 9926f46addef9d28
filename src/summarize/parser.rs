//! Line scanner that turns model markdown into ordered sections.
//!
//! Two states: before the first `##` heading (lines are ignored) and inside
//! a section (bullets and free text accumulate into it).

use super::{Section, FIXED_SECTIONS};

const HEADING_MARKER: &str = "##";
const DASH_BULLET: char = '-';
const STAR_BULLET: &str = "* ";

/// Output of a parse: sections in canonical order plus whether any heading
/// matched a requested section.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSections {
    pub sections: Vec<Section>,
    pub recognized_headings: usize,
}

#[derive(Clone, Copy)]
enum ScanState {
    BeforeHeading,
    InSection(usize),
}

/// Section layout: fixed four first, then requested extras, then headings
/// the model invented, in order of first appearance.
struct SectionTable {
    sections: Vec<Section>,
    requested: Vec<usize>,
}

impl SectionTable {
    fn new(requested: &[String]) -> Self {
        let mut sections: Vec<Section> = FIXED_SECTIONS.iter().map(|n| Section::new(*n)).collect();
        let mut indices = Vec::with_capacity(requested.len());

        for name in requested {
            let index = match find_section(&sections, name) {
                Some(index) => index,
                None => {
                    sections.push(Section::new(clean_name(name)));
                    sections.len() - 1
                }
            };
            indices.push(index);
        }

        Self {
            sections,
            requested: indices,
        }
    }

    /// Index of the section a heading opens, and whether it was requested.
    fn open(&mut self, heading: &str) -> (usize, bool) {
        if let Some(index) = find_section(&self.sections, heading) {
            return (index, self.requested.contains(&index));
        }
        self.sections.push(Section::new(heading));
        (self.sections.len() - 1, false)
    }
}

fn find_section(sections: &[Section], name: &str) -> Option<usize> {
    let wanted = normalize_name(name);
    sections
        .iter()
        .position(|s| normalize_name(&s.name) == wanted)
}

fn normalize_name(name: &str) -> String {
    clean_name(name).to_lowercase()
}

/// Section name without emphasis markers or a trailing colon, so
/// `**Key Takeaways:**` and `Key Takeaways` name the same section.
fn clean_name(name: &str) -> &str {
    let is_emphasis = |c: char| c == '*' || c == '_';
    name.trim()
        .trim_matches(is_emphasis)
        .trim()
        .trim_end_matches(':')
        .trim()
        .trim_matches(is_emphasis)
        .trim()
}

fn heading_text(line: &str) -> Option<&str> {
    let text = clean_name(line.trim_start_matches('#'));
    (!text.is_empty()).then_some(text)
}

/// `-` with or without a following space, or `* `. A bare `*` prefix is
/// left alone since it usually opens emphasis.
fn bullet_text(line: &str) -> Option<&str> {
    line.strip_prefix(DASH_BULLET)
        .or_else(|| line.strip_prefix(STAR_BULLET))
        .map(str::trim)
}

fn is_thematic_break(line: &str) -> bool {
    line.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|c| line.chars().all(|ch| ch == *c))
}

/// Parse `raw` into sections for the `requested` names.
pub fn parse_sections(raw: &str, requested: &[String]) -> ParsedSections {
    let mut table = SectionTable::new(requested);
    let mut state = ScanState::BeforeHeading;
    let mut recognized_headings = 0;

    for line in raw.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        if line.starts_with(HEADING_MARKER) {
            if let Some(heading) = heading_text(line) {
                let (index, was_requested) = table.open(heading);
                if was_requested {
                    recognized_headings += 1;
                }
                state = ScanState::InSection(index);
            }
            continue;
        }

        let ScanState::InSection(index) = state else {
            continue;
        };

        if is_thematic_break(line) {
            continue;
        }

        let entry = match bullet_text(line) {
            Some(text) => text,
            None if line == "*" => continue,
            None => line,
        };
        if !entry.is_empty() {
            table.sections[index].items.push(entry.to_string());
        }
    }

    ParsedSections {
        sections: table.sections,
        recognized_headings,
    }
}

/// Markdown with one `## ` heading per section followed by `- ` bullets.
pub fn render_markdown(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|section| {
            let mut block = format!("{} {}", HEADING_MARKER, section.name);
            for item in &section.items {
                block.push_str("\n- ");
                block.push_str(item);
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
