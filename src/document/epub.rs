/*!
 * EPUB container handling.
 *
 * An EPUB is a zip archive: a `mimetype` entry, `META-INF/container.xml`
 * pointing at the OPF package document, and the manifest of chapter markup
 * and opaque resources. Reading keeps the archive entry order, and writing
 * restores it with `mimetype` first and uncompressed, so item order and
 * identity survive a round trip untouched.
 */

use anyhow::{Context, Result};
use log::{debug, warn};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::app_config::DocumentConfig;
use crate::document::markup;
use crate::errors::DocumentError;
use crate::file_utils::FileManager;

/// Media types the OPF manifest uses for chapter documents
const CHAPTER_MEDIA_TYPES: [&str; 2] = ["application/xhtml+xml", "text/html"];

/// One archive entry of the book
#[derive(Debug, Clone)]
pub struct EpubItem {
    /// Archive path of the entry
    pub name: String,
    /// Raw entry bytes
    pub data: Vec<u8>,
    /// Whether the manifest lists this entry as a chapter document
    pub is_chapter: bool,
}

/// An EPUB book held fully in memory, items in archive order
#[derive(Debug, Clone)]
pub struct EpubPackage {
    /// Path the book was read from
    pub source: PathBuf,
    /// All archive entries in their original order
    pub items: Vec<EpubItem>,
}

impl EpubPackage {
    /// Open an EPUB file and mark its chapter documents
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open EPUB file: {:?}", path))?;
        let mut archive = ZipArchive::new(file)
            .with_context(|| format!("Failed to read EPUB archive: {:?}", path))?;

        let mut items = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .with_context(|| format!("Failed to read EPUB entry {} in {:?}", index, path))?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut data)
                .with_context(|| format!("Failed to read EPUB entry: {}", name))?;
            items.push(EpubItem {
                name,
                data,
                is_chapter: false,
            });
        }

        let mut package = Self {
            source: path.to_path_buf(),
            items,
        };
        package.mark_chapters()?;
        Ok(package)
    }

    /// Extract all meaningful units across chapters, in reading order
    pub fn extract_units(&self, config: &DocumentConfig) -> Result<Vec<String>> {
        let mut units = Vec::new();
        for item in self.items.iter().filter(|i| i.is_chapter) {
            let chapter_units = markup::extract_units(&item.data, config)
                .map_err(|e| DocumentError::MalformedChapter {
                    item: item.name.clone(),
                    reason: e.to_string(),
                })?;
            units.extend(chapter_units);
        }
        Ok(units)
    }

    /// Build the bilingual copy of this book
    ///
    /// Translations pair up with units in extraction order; when fewer
    /// translations than units are supplied (partial artifact), the
    /// remaining units are left original-only. Resources pass through
    /// byte-identical.
    pub fn weave_translations(
        &self,
        config: &DocumentConfig,
        translations: &[String],
    ) -> Result<EpubPackage> {
        let mut cursor = 0usize;
        let mut items = Vec::with_capacity(self.items.len());

        for item in &self.items {
            if item.is_chapter {
                let woven = markup::weave_translations(&item.data, config, translations, &mut cursor)
                    .map_err(|e| DocumentError::MalformedChapter {
                        item: item.name.clone(),
                        reason: e.to_string(),
                    })?;
                items.push(EpubItem {
                    name: item.name.clone(),
                    data: woven,
                    is_chapter: true,
                });
            } else {
                items.push(item.clone());
            }
        }

        Ok(EpubPackage {
            source: self.source.clone(),
            items,
        })
    }

    /// Write the book out as a valid EPUB archive
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            FileManager::ensure_dir(parent)?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create EPUB file: {:?}", path))?;
        let mut zip = ZipWriter::new(file);

        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        // The mimetype entry must come first, uncompressed
        if let Some(item) = self.items.iter().find(|i| i.name == "mimetype") {
            zip.start_file(item.name.clone(), stored)
                .context("Failed to start mimetype entry")?;
            zip.write_all(&item.data)
                .context("Failed to write mimetype entry")?;
        }

        for item in &self.items {
            if item.name == "mimetype" {
                continue;
            }
            zip.start_file(item.name.clone(), deflated)
                .with_context(|| format!("Failed to start EPUB entry: {}", item.name))?;
            zip.write_all(&item.data)
                .with_context(|| format!("Failed to write EPUB entry: {}", item.name))?;
        }

        zip.finish()
            .with_context(|| format!("Failed to finalize EPUB archive: {:?}", path))?;
        Ok(())
    }

    /// Number of chapter documents in the manifest
    pub fn chapter_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_chapter).count()
    }

    /// Flag every item the manifest lists as a chapter document
    fn mark_chapters(&mut self) -> Result<()> {
        let opf_name = self.rootfile_path()?;
        let chapter_names = self.manifest_documents(&opf_name)?;

        let mut marked = 0;
        for item in &mut self.items {
            if chapter_names.contains(&item.name) {
                item.is_chapter = true;
                marked += 1;
            }
        }
        debug!("Marked {} chapter document(s) in {:?}", marked, self.source);
        if marked == 0 {
            warn!("No chapter documents found in EPUB manifest: {:?}", self.source);
        }
        Ok(())
    }

    /// Locate the OPF package document through META-INF/container.xml
    fn rootfile_path(&self) -> Result<String, DocumentError> {
        let container = self
            .item_data("META-INF/container.xml")
            .ok_or_else(|| DocumentError::InvalidContainer(
                "missing META-INF/container.xml".to_string(),
            ))?;

        let mut reader = Reader::from_reader(container);
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Eof) => break,
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.local_name().as_ref() == b"rootfile" {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"full-path" {
                                if let Ok(value) = attr.unescape_value() {
                                    return Ok(value.into_owned());
                                }
                            }
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    return Err(DocumentError::InvalidContainer(format!(
                        "container.xml: {}",
                        e
                    )));
                }
            }
            buf.clear();
        }

        Err(DocumentError::InvalidContainer(
            "no rootfile entry in container.xml".to_string(),
        ))
    }

    /// Collect the archive names of manifest items with a chapter media type
    fn manifest_documents(&self, opf_name: &str) -> Result<HashSet<String>, DocumentError> {
        let opf = self.item_data(opf_name).ok_or_else(|| {
            DocumentError::InvalidContainer(format!("missing package document: {}", opf_name))
        })?;
        let opf_dir = match opf_name.rfind('/') {
            Some(pos) => &opf_name[..=pos],
            None => "",
        };

        let mut names = HashSet::new();
        let mut reader = Reader::from_reader(opf);
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Eof) => break,
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.local_name().as_ref() == b"item" {
                        let mut href = None;
                        let mut media_type = None;
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"href" => {
                                    href = attr.unescape_value().ok().map(|v| v.into_owned());
                                }
                                b"media-type" => {
                                    media_type =
                                        attr.unescape_value().ok().map(|v| v.into_owned());
                                }
                                _ => {}
                            }
                        }
                        if let (Some(href), Some(media_type)) = (href, media_type) {
                            if CHAPTER_MEDIA_TYPES.contains(&media_type.as_str()) {
                                names.insert(resolve_href(opf_dir, &href));
                            }
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    return Err(DocumentError::InvalidContainer(format!(
                        "{}: {}",
                        opf_name, e
                    )));
                }
            }
            buf.clear();
        }

        Ok(names)
    }

    /// Raw bytes of an archive entry, by exact name
    fn item_data(&self, name: &str) -> Option<&[u8]> {
        self.items
            .iter()
            .find(|i| i.name == name)
            .map(|i| i.data.as_slice())
    }
}

/// Resolve a manifest href relative to the OPF directory
fn resolve_href(opf_dir: &str, href: &str) -> String {
    let joined = format!("{}{}", opf_dir, href);
    let mut parts: Vec<&str> = Vec::new();
    for part in joined.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}
