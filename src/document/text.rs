/*!
 * Line-oriented plain-text documents.
 *
 * Each meaningful line is one translatable unit. The output keeps only the
 * translated lines: blank and digit-only lines are dropped, matching the
 * skip rule used during extraction, so line positions line up with
 * progress-record positions on resume as long as the input is unchanged.
 */

use crate::document::is_meaningful;

/// Extract the ordered meaningful lines from a text document
pub fn extract_units(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| is_meaningful(line))
        .map(|line| line.to_string())
        .collect()
}

/// Assemble the translated-lines-only output document
pub fn reassemble(translations: &[String]) -> String {
    if translations.is_empty() {
        return String::new();
    }
    let mut output = translations.join("\n");
    output.push('\n');
    output
}
