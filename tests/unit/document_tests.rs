/*!
 * Tests for unit extraction and document handling
 */

use anyhow::Result;
use yabtwai::app_config::DocumentConfig;
use yabtwai::document::{is_meaningful, markup, text, LoadedDocument};
use yabtwai::file_utils::{DocumentKind, FileManager};
use crate::common;

/// Test the meaningful-unit rule on boundary inputs
#[test]
fn test_isMeaningful_withBoundaryInputs_shouldMatchSkipRule() {
    assert!(is_meaningful("A sentence."));
    assert!(is_meaningful("Chapter 1"));
    assert!(is_meaningful("3.14"));

    assert!(!is_meaningful(""));
    assert!(!is_meaningful("2024"));
    assert!(!is_meaningful(" \t\r\n"));
}

/// Test line extraction skipping blank and digit-only lines
#[test]
fn test_textExtraction_withSkippableLines_shouldKeepMeaningfulOnly() {
    let content = "foo\n  \nbar\n";

    let units = text::extract_units(content);

    assert_eq!(units, vec!["foo", "bar"]);
}

/// Test that the text output holds the translated lines only
#[test]
fn test_textReassembly_shouldHoldTranslatedLinesOnly() {
    let translations = vec!["FOO".to_string(), "BAR".to_string()];

    assert_eq!(text::reassemble(&translations), "FOO\nBAR\n");
    assert_eq!(text::reassemble(&[]), "");
}

/// Test loading and writing a plain-text document end to end
#[test]
fn test_loadedDocument_withTextFile_shouldExtractAndWrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_file(&dir, "story.txt", "foo\n  \nbar\n")?;
    let config = DocumentConfig::default();

    let document = LoadedDocument::load(&input, DocumentKind::Text)?;
    let units = document.extract_units(&config)?;
    assert_eq!(units, vec!["foo", "bar"]);

    let output = dir.join("story_translated.txt");
    let translations = vec!["FOO".to_string(), "BAR".to_string()];
    document.write_translated(&config, &translations, &output)?;

    assert_eq!(FileManager::read_to_string(&output)?, "FOO\nBAR\n");
    Ok(())
}

/// Test that a partial translation set leaves the tail out of a text output
#[test]
fn test_loadedDocument_withPartialTranslations_shouldWriteCompletedHead() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_file(&dir, "story.txt", "one\ntwo\nthree\n")?;
    let config = DocumentConfig::default();

    let document = LoadedDocument::load(&input, DocumentKind::Text)?;
    let output = dir.join("partial.txt");
    document.write_translated(&config, &["ONE".to_string()], &output)?;

    assert_eq!(FileManager::read_to_string(&output)?, "ONE\n");
    Ok(())
}

/// Test loading an EPUB through the document dispatch
#[test]
fn test_loadedDocument_withEpubFile_shouldExtractChapterUnits() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let chapter = common::chapter_with_paragraphs(&["First paragraph.", "42", "Second paragraph."]);
    let input = common::build_test_epub(&dir, "book.epub", &[chapter])?;
    let config = DocumentConfig::default();

    let document = LoadedDocument::load(&input, DocumentKind::Epub)?;
    let units = document.extract_units(&config)?;

    assert_eq!(units, vec!["First paragraph.", "Second paragraph."]);
    Ok(())
}

/// Test markup extraction against the configured tag list
#[test]
fn test_markupExtraction_withCustomTagList_shouldHonorSelection() -> Result<()> {
    let content = b"<body><p>In a paragraph.</p><blockquote>In a quote.</blockquote>\
                    <h1>In a heading.</h1></body>";

    let mut config = DocumentConfig::default();
    config.translate_tags = "p,blockquote".to_string();

    let units = markup::extract_units(content, &config)?;

    assert_eq!(units, vec!["In a paragraph.", "In a quote."]);
    Ok(())
}

/// Test that only the outermost selected element forms a unit
#[test]
fn test_markupExtraction_withNestedSelectedTags_shouldKeepOutermostUnit() -> Result<()> {
    let content = b"<body><div>Before. <p>Inside text.</p> After.</div></body>";

    let mut config = DocumentConfig::default();
    config.translate_tags = "div,p".to_string();

    let units = markup::extract_units(content, &config)?;

    assert_eq!(units, vec!["Before. Inside text. After."]);
    Ok(())
}

/// Test extraction of untagged text runs when enabled
#[test]
fn test_markupExtraction_withTextRunsEnabled_shouldAlsoCollectRuns() -> Result<()> {
    let content = b"<body><p>Tagged paragraph.</p>A loose run of text.</body>";

    let mut config = DocumentConfig::default();
    let without_runs = markup::extract_units(content, &config)?;
    assert_eq!(without_runs, vec!["Tagged paragraph."]);

    config.include_text_runs = true;
    let with_runs = markup::extract_units(content, &config)?;
    assert_eq!(with_runs, vec!["Tagged paragraph.", "A loose run of text."]);
    Ok(())
}

/// Test that repeated extraction of an unchanged chapter is stable
#[test]
fn test_markupExtraction_repeated_shouldYieldIdenticalSequence() -> Result<()> {
    let content = b"<body><p>Opening line.</p><p>17</p><div>A div.</div>\
                    <p>Closing line.</p></body>";
    let config = DocumentConfig::default();

    let first = markup::extract_units(content, &config)?;
    let second = markup::extract_units(content, &config)?;

    assert_eq!(first, vec!["Opening line.", "Closing line."]);
    assert_eq!(first, second);
    Ok(())
}

/// Test weaving translated siblings into chapter markup
#[test]
fn test_markupWeave_shouldInsertTranslatedSiblingAfterEachUnit() -> Result<()> {
    let content = b"<body><p class=\"intro\">Hello.</p><p>World.</p></body>";
    let config = DocumentConfig::default();
    let translations = vec!["Bonjour.".to_string(), "Monde.".to_string()];
    let mut cursor = 0;

    let woven = markup::weave_translations(content, &config, &translations, &mut cursor)?;
    let woven_text = String::from_utf8(woven)?;

    assert_eq!(cursor, 2);
    // The sibling repeats the start tag, attributes included
    assert!(woven_text.contains("<p class=\"intro\">Hello.</p><p class=\"intro\">Bonjour.</p>"));
    assert!(woven_text.contains("<p>World.</p><p>Monde.</p>"));
    Ok(())
}

/// Test that weaving runs short gracefully on partial translation sets
#[test]
fn test_markupWeave_withFewerTranslationsThanUnits_shouldLeaveTailOriginal() -> Result<()> {
    let content = b"<body><p>One.</p><p>Two.</p></body>";
    let config = DocumentConfig::default();
    let translations = vec!["Un.".to_string()];
    let mut cursor = 0;

    let woven = markup::weave_translations(content, &config, &translations, &mut cursor)?;
    let woven_text = String::from_utf8(woven)?;

    assert_eq!(cursor, 1);
    assert!(woven_text.contains("<p>One.</p><p>Un.</p>"));
    assert!(woven_text.contains("<p>Two.</p>"));
    assert!(!woven_text.contains("<p>Two.</p><p>"));
    Ok(())
}

/// Test that the skip rule does not consume translations while weaving
#[test]
fn test_markupWeave_withSkippedUnits_shouldNotConsumeTranslations() -> Result<()> {
    let content = b"<body><p>Real text.</p><p>42</p><p>More text.</p></body>";
    let config = DocumentConfig::default();
    let translations = vec!["VRAI".to_string(), "PLUS".to_string()];
    let mut cursor = 0;

    let woven = markup::weave_translations(content, &config, &translations, &mut cursor)?;
    let woven_text = String::from_utf8(woven)?;

    assert_eq!(cursor, 2);
    assert!(woven_text.contains("<p>Real text.</p><p>VRAI</p>"));
    // The digit-only paragraph stays untouched, no sibling inserted
    assert!(woven_text.contains("<p>42</p><p>More text.</p><p>PLUS</p>"));
    Ok(())
}
