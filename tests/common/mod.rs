/*!
 * Common test utilities for the yabtwai test suite
 */

use std::fs;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use anyhow::Result;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use yabtwai::file_utils::FileManager;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample plain-text book with three meaningful lines
///
/// The digit-only and whitespace-only lines are skipped by extraction,
/// so the book yields exactly three units.
pub fn create_test_text_book(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = "Once when I was six years old I saw a magnificent picture.\n\
                   42\n\
                   It was a picture of a boa constrictor swallowing an animal.\n\
                   \x20  \n\
                   Here is a copy of the drawing.\n";
    create_test_file(dir, filename, content)
}

/// Wraps paragraph texts into a minimal chapter document
pub fn chapter_with_paragraphs(paragraphs: &[&str]) -> String {
    let body = paragraphs
        .iter()
        .map(|p| format!("<p>{}</p>", p))
        .collect::<Vec<_>>()
        .join("");
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <html xmlns=\"http://www.w3.org/1999/xhtml\">\
         <head><title>Chapter</title></head>\
         <body>{}</body></html>",
        body
    )
}

/// Builds a complete EPUB file from chapter documents
///
/// The archive gets the standard layout: `mimetype` first and uncompressed,
/// `META-INF/container.xml` pointing at the OPF, the chapter documents in
/// reading order, and one stylesheet resource that is not a chapter.
pub fn build_test_epub(dir: &PathBuf, filename: &str, chapters: &[String]) -> Result<PathBuf> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("mimetype", stored)?;
    zip.write_all(b"application/epub+zip")?;

    zip.start_file("META-INF/container.xml", deflated)?;
    zip.write_all(
        b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
          <container version=\"1.0\" xmlns=\"urn:oasis:names:tc:opendocument:xmlns:container\">\
          <rootfiles>\
          <rootfile full-path=\"OEBPS/content.opf\" media-type=\"application/oebps-package+xml\"/>\
          </rootfiles></container>",
    )?;

    let mut manifest = String::new();
    let mut spine = String::new();
    for index in 1..=chapters.len() {
        manifest.push_str(&format!(
            "<item id=\"chapter{0}\" href=\"chapter{0}.xhtml\" media-type=\"application/xhtml+xml\"/>",
            index
        ));
        spine.push_str(&format!("<itemref idref=\"chapter{}\"/>", index));
    }
    let opf = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <package xmlns=\"http://www.idpf.org/2007/opf\" version=\"3.0\" unique-identifier=\"uid\">\
         <metadata xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\
         <dc:identifier id=\"uid\">test-book</dc:identifier>\
         <dc:title>Test Book</dc:title>\
         <dc:language>en</dc:language>\
         </metadata>\
         <manifest>{}<item id=\"css\" href=\"style.css\" media-type=\"text/css\"/></manifest>\
         <spine>{}</spine></package>",
        manifest, spine
    );
    zip.start_file("OEBPS/content.opf", deflated)?;
    zip.write_all(opf.as_bytes())?;

    for (index, chapter) in chapters.iter().enumerate() {
        zip.start_file(format!("OEBPS/chapter{}.xhtml", index + 1), deflated)?;
        zip.write_all(chapter.as_bytes())?;
    }

    zip.start_file("OEBPS/style.css", deflated)?;
    zip.write_all(b"p { margin: 0.5em 0; }")?;

    let cursor = zip.finish()?;
    let file_path = dir.join(filename);
    FileManager::write_bytes(&file_path, &cursor.into_inner())?;
    Ok(file_path)
}

/// Builds a zip file that is not a valid EPUB (no container.xml)
pub fn build_broken_epub(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    zip.start_file("mimetype", stored)?;
    zip.write_all(b"application/epub+zip")?;
    zip.start_file("OEBPS/chapter1.xhtml", stored)?;
    zip.write_all(chapter_with_paragraphs(&["Orphan chapter."]).as_bytes())?;

    let cursor = zip.finish()?;
    let file_path = dir.join(filename);
    FileManager::write_bytes(&file_path, &cursor.into_inner())?;
    Ok(file_path)
}
