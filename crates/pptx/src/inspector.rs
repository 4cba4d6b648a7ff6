//! Reads a written deck back: slide order, backgrounds, text runs and pictures.

use deck_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// One text run with the paragraph properties it was written under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectedRun {
    pub text: String,
    /// Hundredths of a point.
    pub size: Option<u32>,
    pub bold: bool,
    /// Thousandths of a percent.
    pub line_spacing: Option<u32>,
    /// Hundredths of a point.
    pub space_before: Option<u32>,
    pub space_after: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectedSlide {
    pub number: usize,
    /// Background fill as `RRGGBB`.
    pub background: Option<String>,
    pub runs: Vec<InspectedRun>,
    pub pictures: usize,
}

impl InspectedSlide {
    /// All run texts joined by newlines.
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckSummary {
    pub slides: Vec<InspectedSlide>,
}

/// Reader for PPTX packages.
pub struct DeckInspector;

impl DeckInspector {
    pub fn new() -> Self {
        Self
    }

    /// Inspect a deck on disk.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<DeckSummary> {
        let file = std::fs::File::open(path.as_ref())?;
        self.inspect(file)
    }

    /// Inspect a deck from any seekable reader.
    pub fn inspect<R: Read + Seek>(&self, reader: R) -> Result<DeckSummary> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let presentation = read_part(&mut archive, "ppt/presentation.xml")?;
        let rels = read_part(&mut archive, "ppt/_rels/presentation.xml.rels")?;
        let parts = slide_parts(&presentation, &relationship_targets(&rels)?)?;

        let mut summary = DeckSummary::default();
        for (idx, part) in parts.iter().enumerate() {
            let content = read_part(&mut archive, part)?;
            summary.slides.push(inspect_slide(&content, idx + 1)?);
        }
        Ok(summary)
    }
}

impl Default for DeckInspector {
    fn default() -> Self {
        Self::new()
    }
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut part = archive
        .by_name(name)
        .map_err(|e| Error::ZipError(format!("Missing part '{}': {}", name, e)))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", name, e)))?;
    Ok(xml)
}

/// Relationship id → package part name, for the presentation part.
fn relationship_targets(rels_xml: &str) -> Result<HashMap<String, String>> {
    let mut targets = HashMap::new();
    let mut reader = Reader::from_str(rels_xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attr(e, b"Id"), attr(e, b"Target")) {
                    let part = match target.strip_prefix('/') {
                        Some(absolute) => absolute.to_string(),
                        None => format!("ppt/{}", target),
                    };
                    targets.insert(id, part);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(format!("Error parsing relationships: {}", e))),
            _ => {}
        }
    }
    Ok(targets)
}

/// Slide part names in `p:sldIdLst` order.
fn slide_parts(presentation_xml: &str, targets: &HashMap<String, String>) -> Result<Vec<String>> {
    let mut parts = Vec::new();
    let mut reader = Reader::from_str(presentation_xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"sldId" => {
                let rel_id = attr(e, b"r:id").unwrap_or_default();
                match targets.get(&rel_id) {
                    Some(part) => parts.push(part.clone()),
                    None => {
                        return Err(Error::XmlError(format!(
                            "Slide relationship '{}' has no target",
                            rel_id
                        )))
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(format!("Error parsing presentation: {}", e))),
            _ => {}
        }
    }
    Ok(parts)
}

/// Spacing element currently open inside `a:pPr`.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Spacing {
    None,
    Line,
    Before,
    After,
}

fn inspect_slide(xml_content: &str, number: usize) -> Result<InspectedSlide> {
    let mut slide = InspectedSlide {
        number,
        ..Default::default()
    };
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut in_background = false;
    let mut spacing = Spacing::None;
    let mut paragraph = InspectedRun::default();
    let mut run: Option<InspectedRun> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                match e.local_name().as_ref() {
                    b"bg" => in_background = true,
                    b"srgbClr" if in_background && slide.background.is_none() => {
                        slide.background = attr(e, b"val");
                    }
                    b"pic" => slide.pictures += 1,
                    b"p" => paragraph = InspectedRun::default(),
                    b"lnSpc" => spacing = Spacing::Line,
                    b"spcBef" => spacing = Spacing::Before,
                    b"spcAft" => spacing = Spacing::After,
                    b"spcPct" if spacing == Spacing::Line => {
                        paragraph.line_spacing = attr_u32(e, b"val");
                    }
                    b"spcPts" => match spacing {
                        Spacing::Before => paragraph.space_before = attr_u32(e, b"val"),
                        Spacing::After => paragraph.space_after = attr_u32(e, b"val"),
                        _ => {}
                    },
                    b"r" => run = Some(paragraph.clone()),
                    b"rPr" => {
                        if let Some(run) = run.as_mut() {
                            run.size = attr_u32(e, b"sz");
                            run.bold = attr(e, b"b").as_deref() == Some("1");
                        }
                    }
                    b"t" => in_text = run.is_some(),
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_text {
                    if let Some(run) = run.as_mut() {
                        run.text.push_str(&e.unescape().unwrap_or_default());
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                match e.local_name().as_ref() {
                    b"bg" => in_background = false,
                    b"lnSpc" | b"spcBef" | b"spcAft" => spacing = Spacing::None,
                    b"t" => in_text = false,
                    b"r" => {
                        if let Some(run) = run.take() {
                            slide.runs.push(run);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide {}: {}", number, e)));
            }
            _ => {}
        }
    }

    Ok(slide)
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

fn attr_u32(e: &BytesStart<'_>, key: &[u8]) -> Option<u32> {
    attr(e, key).and_then(|v| v.parse().ok())
}
