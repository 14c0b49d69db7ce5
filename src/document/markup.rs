/*!
 * Chapter markup scanning and bilingual weaving.
 *
 * A single event-stream walker backs both passes over a chapter: the
 * extraction pass collects meaningful unit texts, the weaving pass rewrites
 * the chapter and inserts a translated sibling element directly after each
 * original unit. Sharing the walker keeps the unit order identical between
 * the two passes, which is what makes position-based resume sound.
 */

use anyhow::{anyhow, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::app_config::DocumentConfig;
use crate::document::is_meaningful;

/// What the walker does when it completes a meaningful unit
enum UnitSink<'a> {
    /// Record the unit text, extraction pass
    Collect(&'a mut Vec<String>),
    /// Consume the next available translation, weaving pass
    Weave {
        translations: &'a [String],
        cursor: &'a mut usize,
    },
}

impl UnitSink<'_> {
    /// Accept one meaningful unit, returning the translation to weave in
    fn accept(&mut self, text: &str) -> Option<String> {
        match self {
            UnitSink::Collect(units) => {
                units.push(text.to_string());
                None
            }
            UnitSink::Weave {
                translations,
                cursor,
            } => {
                // Translations can run short when a partial artifact is
                // written; the remaining units stay original-only.
                if **cursor < translations.len() {
                    let translated = translations[**cursor].clone();
                    **cursor += 1;
                    Some(translated)
                } else {
                    None
                }
            }
        }
    }
}

/// An open translatable element while its subtree streams past
struct Capture {
    /// Original start tag, reused verbatim for the bilingual sibling
    start: BytesStart<'static>,
    /// Local element name, for matching the closing tag
    name: Vec<u8>,
    /// Nesting depth of same-named descendants
    depth: usize,
    /// Accumulated character data of the whole subtree
    text: String,
}

/// Extract the ordered meaningful units from one chapter
pub fn extract_units(content: &[u8], config: &DocumentConfig) -> Result<Vec<String>> {
    let mut units = Vec::new();
    walk_chapter(content, config, &mut UnitSink::Collect(&mut units))?;
    Ok(units)
}

/// Rewrite one chapter, inserting translated siblings after each unit
///
/// `cursor` indexes into `translations` and advances across chapters, so the
/// caller threads one cursor through the whole book in reading order.
pub fn weave_translations(
    content: &[u8],
    config: &DocumentConfig,
    translations: &[String],
    cursor: &mut usize,
) -> Result<Vec<u8>> {
    walk_chapter(
        content,
        config,
        &mut UnitSink::Weave {
            translations,
            cursor,
        },
    )
}

/// Stream every event of a chapter through to a rewritten copy
fn walk_chapter(content: &[u8], config: &DocumentConfig, sink: &mut UnitSink) -> Result<Vec<u8>> {
    let tags = config.tag_list();
    let mut reader = Reader::from_reader(content);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();
    let mut capture: Option<Capture> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,

            Ok(Event::Start(e)) => {
                let start = e.to_owned();
                if let Some(cap) = capture.as_mut() {
                    // Only the outermost selected element forms a unit;
                    // same-named descendants bump the depth so the right
                    // closing tag ends the capture.
                    if start.local_name().as_ref() == cap.name.as_slice() {
                        cap.depth += 1;
                    }
                } else if matches_tag(&start, &tags) {
                    capture = Some(Capture {
                        start: start.clone(),
                        name: start.local_name().as_ref().to_vec(),
                        depth: 0,
                        text: String::new(),
                    });
                }
                writer.write_event(Event::Start(start))?;
            }

            Ok(Event::End(e)) => {
                let end = e.to_owned();
                let mut finished = None;
                if let Some(cap) = capture.as_mut() {
                    if end.local_name().as_ref() == cap.name.as_slice() {
                        if cap.depth == 0 {
                            finished = capture.take();
                        } else {
                            cap.depth -= 1;
                        }
                    }
                }
                writer.write_event(Event::End(end))?;

                if let Some(cap) = finished {
                    if is_meaningful(&cap.text) {
                        if let Some(translated) = sink.accept(&cap.text) {
                            write_sibling(&mut writer, &cap.start, &translated)?;
                        }
                    }
                }
            }

            Ok(Event::Text(t)) => {
                let decoded = decode_text(&t);
                if let Some(cap) = capture.as_mut() {
                    cap.text.push_str(&decoded);
                    writer.write_event(Event::Text(t.into_owned()))?;
                } else if config.include_text_runs && is_meaningful(&decoded) {
                    writer.write_event(Event::Text(t.into_owned()))?;
                    if let Some(translated) = sink.accept(&decoded) {
                        let run = format!(" {}", translated);
                        writer.write_event(Event::Text(BytesText::new(&run)))?;
                    }
                } else {
                    writer.write_event(Event::Text(t.into_owned()))?;
                }
            }

            Ok(Event::CData(t)) => {
                if let Some(cap) = capture.as_mut() {
                    if let Ok(text) = std::str::from_utf8(t.as_ref()) {
                        cap.text.push_str(text);
                    }
                }
                writer.write_event(Event::CData(t.into_owned()))?;
            }

            // Declarations, comments, processing instructions, empty
            // elements and doctype all pass through untouched.
            Ok(event) => {
                writer.write_event(event.into_owned())?;
            }

            Err(e) => {
                return Err(anyhow!(
                    "Markup error at byte {}: {}",
                    reader.buffer_position(),
                    e
                ));
            }
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

/// Emit the bilingual sibling: same tag and attributes, translated text
fn write_sibling(writer: &mut Writer<Vec<u8>>, start: &BytesStart<'static>, translated: &str) -> Result<()> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    writer.write_event(Event::Start(start.clone()))?;
    writer.write_event(Event::Text(BytesText::new(translated)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Match an element against the selected translatable tag names
fn matches_tag(start: &BytesStart, tags: &[String]) -> bool {
    let name = start.local_name();
    tags.iter()
        .any(|tag| name.as_ref().eq_ignore_ascii_case(tag.as_bytes()))
}

/// Unescape character data, tolerating non-XML entities like &nbsp;
fn decode_text(text: &BytesText) -> String {
    match text.unescape() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(text.as_ref()).into_owned(),
    }
}
