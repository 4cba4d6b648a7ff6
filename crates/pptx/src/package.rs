//! PPTX package writer.
//!
//! Produces the minimum set of parts PowerPoint needs to open a deck: content
//! types, relationships, document properties, the presentation part, one slide
//! master with a single blank layout, a theme, slides and PNG media.

use crate::canvas::SlideCanvas;
use crate::shapes::{escape_xml, Shape, EMU_PER_INCH};
use deck_core::{Error, Result};
use std::fmt::Write as FmtWrite;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// First id in `p:sldIdLst`.
const FIRST_SLIDE_ID: usize = 256;
/// Presentation relationships: rId1 master, rId2 theme, then slides.
const FIRST_SLIDE_REL: usize = 3;

const SP_TREE_HEADER: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

/// A deck ready to be serialized.
#[derive(Debug, Clone)]
pub struct DeckPackage {
    title: String,
    width_emu: i64,
    height_emu: i64,
    slides: Vec<SlideCanvas>,
}

impl DeckPackage {
    pub fn new(title: impl Into<String>, width_in: f64, height_in: f64) -> Self {
        Self {
            title: title.into(),
            width_emu: (width_in * EMU_PER_INCH).round() as i64,
            height_emu: (height_in * EMU_PER_INCH).round() as i64,
            slides: Vec::new(),
        }
    }

    pub fn push(&mut self, slide: SlideCanvas) {
        self.slides.push(slide);
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Serialize into an in-memory PPTX.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Serialize to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        self.write(file)
    }

    /// Serialize into any seekable writer.
    pub fn write<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let media_names = self.media_names();
        let media_total: usize = media_names.iter().map(Vec::len).sum();

        put(&mut zip, "[Content_Types].xml", &self.content_types(media_total > 0))?;
        put(&mut zip, "_rels/.rels", &package_rels())?;
        put(&mut zip, "docProps/core.xml", &self.core_props())?;
        put(&mut zip, "docProps/app.xml", &self.app_props())?;
        put(&mut zip, "ppt/presentation.xml", &self.presentation_xml())?;
        put(&mut zip, "ppt/_rels/presentation.xml.rels", &self.presentation_rels())?;
        put(&mut zip, "ppt/slideMasters/slideMaster1.xml", &slide_master())?;
        put(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &relationships(&[
                ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                ("rId2", "theme", "../theme/theme1.xml"),
            ]),
        )?;
        put(&mut zip, "ppt/slideLayouts/slideLayout1.xml", &slide_layout())?;
        put(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &relationships(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
        )?;
        put(&mut zip, "ppt/theme/theme1.xml", THEME_XML)?;

        for (idx, (slide, names)) in self.slides.iter().zip(&media_names).enumerate() {
            let n = idx + 1;
            put(&mut zip, &format!("ppt/slides/slide{}.xml", n), &slide_xml(slide)?)?;
            put(
                &mut zip,
                &format!("ppt/slides/_rels/slide{}.xml.rels", n),
                &slide_rels(names),
            )?;
            for (name, data) in names.iter().zip(slide.media()) {
                put_bytes(&mut zip, &format!("ppt/media/{}", name), data)?;
            }
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;
        Ok(())
    }

    /// Package-wide media file names, grouped per slide.
    fn media_names(&self) -> Vec<Vec<String>> {
        let mut counter = 0;
        self.slides
            .iter()
            .map(|slide| {
                slide
                    .media()
                    .iter()
                    .map(|_| {
                        counter += 1;
                        format!("image{}.png", counter)
                    })
                    .collect()
            })
            .collect()
    }

    fn content_types(&self, has_media: bool) -> String {
        let mut xml = String::from(XML_DECL);
        xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
        xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
        xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
        if has_media {
            xml.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);
        }
        let overrides = [
            ("/ppt/presentation.xml", "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"),
            ("/ppt/slideMasters/slideMaster1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"),
            ("/ppt/slideLayouts/slideLayout1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"),
            ("/ppt/theme/theme1.xml", "application/vnd.openxmlformats-officedocument.theme+xml"),
            ("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml"),
            ("/docProps/app.xml", "application/vnd.openxmlformats-officedocument.extended-properties+xml"),
        ];
        for (part, content_type) in overrides {
            let _ = write!(xml, r#"<Override PartName="{}" ContentType="{}"/>"#, part, content_type);
        }
        for n in 1..=self.slides.len() {
            let _ = write!(
                xml,
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                n
            );
        }
        xml.push_str("</Types>");
        xml
    }

    fn core_props(&self) -> String {
        format!(
            concat!(
                "{}",
                r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
                r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
                r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
                "<dc:title>{}</dc:title><dc:creator>deck</dc:creator></cp:coreProperties>"
            ),
            XML_DECL,
            escape_xml(&self.title)
        )
    }

    fn app_props(&self) -> String {
        format!(
            concat!(
                "{}",
                r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
                "<Application>deck</Application><Slides>{}</Slides></Properties>"
            ),
            XML_DECL,
            self.slides.len()
        )
    }

    fn presentation_xml(&self) -> String {
        let mut xml = String::from(XML_DECL);
        let _ = write!(
            xml,
            r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
            NS_A, NS_R, NS_P
        );
        xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for idx in 0..self.slides.len() {
                let _ = write!(
                    xml,
                    r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                    FIRST_SLIDE_ID + idx,
                    FIRST_SLIDE_REL + idx
                );
            }
            xml.push_str("</p:sldIdLst>");
        }
        let _ = write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
            self.width_emu, self.height_emu
        );
        xml
    }

    fn presentation_rels(&self) -> String {
        let targets: Vec<(String, &str, String)> = [
            ("rId1".to_string(), "slideMaster", "slideMasters/slideMaster1.xml".to_string()),
            ("rId2".to_string(), "theme", "theme/theme1.xml".to_string()),
        ]
        .into_iter()
        .chain((0..self.slides.len()).map(|idx| {
            (
                format!("rId{}", FIRST_SLIDE_REL + idx),
                "slide",
                format!("slides/slide{}.xml", idx + 1),
            )
        }))
        .collect();

        let borrowed: Vec<(&str, &str, &str)> = targets
            .iter()
            .map(|(id, kind, target)| (id.as_str(), *kind, target.as_str()))
            .collect();
        relationships(&borrowed)
    }
}

fn options() -> FileOptions {
    FileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn put<W: Write + Seek>(zip: &mut ZipWriter<W>, name: &str, content: &str) -> Result<()> {
    put_bytes(zip, name, content.as_bytes())
}

fn put_bytes<W: Write + Seek>(zip: &mut ZipWriter<W>, name: &str, data: &[u8]) -> Result<()> {
    zip.start_file(name, options())
        .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", name, e)))?;
    zip.write_all(data)?;
    Ok(())
}

/// Relationship part with officeDocument relationship types.
fn relationships(rels: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from(XML_DECL);
    let _ = write!(xml, r#"<Relationships xmlns="{}">"#, NS_PKG_RELS);
    for (id, kind, target) in rels {
        let _ = write!(
            xml,
            r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
            id, REL_BASE, kind, target
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn package_rels() -> String {
    let mut xml = String::from(XML_DECL);
    let _ = write!(xml, r#"<Relationships xmlns="{}">"#, NS_PKG_RELS);
    let _ = write!(
        xml,
        r#"<Relationship Id="rId1" Type="{}/officeDocument" Target="ppt/presentation.xml"/>"#,
        REL_BASE
    );
    xml.push_str(r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#);
    let _ = write!(
        xml,
        r#"<Relationship Id="rId3" Type="{}/extended-properties" Target="docProps/app.xml"/>"#,
        REL_BASE
    );
    xml.push_str("</Relationships>");
    xml
}

/// Slide relationships: rId1 is the layout, pictures follow from rId2.
fn slide_rels(media_names: &[String]) -> String {
    let targets: Vec<(String, String)> = media_names
        .iter()
        .enumerate()
        .map(|(idx, name)| (format!("rId{}", idx + 2), format!("../media/{}", name)))
        .collect();

    let mut rels = vec![("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")];
    rels.extend(targets.iter().map(|(id, target)| (id.as_str(), "image", target.as_str())));
    relationships(&rels)
}

fn slide_xml(slide: &SlideCanvas) -> Result<String> {
    let mut xml = String::from(XML_DECL);
    let err = |e: std::fmt::Error| Error::XmlError(e.to_string());

    write!(xml, r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#, NS_A, NS_R, NS_P).map_err(err)?;
    write!(
        xml,
        r#"<p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
        slide.background().hex()
    )
    .map_err(err)?;
    xml.push_str("<p:spTree>");
    xml.push_str(SP_TREE_HEADER);

    for (idx, shape) in slide.shapes().iter().enumerate() {
        let shape_id = idx as u32 + 2;
        let rel_id = match shape {
            Shape::Picture { media, .. } => Some(format!("rId{}", media + 2)),
            _ => None,
        };
        shape.to_xml(&mut xml, shape_id, rel_id.as_deref())?;
    }

    xml.push_str(r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#);
    Ok(xml)
}

fn slide_master() -> String {
    format!(
        concat!(
            "{}",
            r#"<p:sldMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
            r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{}</p:spTree></p:cSld>"#,
            r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" "#,
            r#"accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
            r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#,
            "</p:sldMaster>"
        ),
        XML_DECL, NS_A, NS_R, NS_P, SP_TREE_HEADER
    )
}

fn slide_layout() -> String {
    format!(
        concat!(
            "{}",
            r#"<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" type="blank" preserve="1">"#,
            r#"<p:cSld name="Blank"><p:spTree>{}</p:spTree></p:cSld>"#,
            r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
        ),
        XML_DECL, NS_A, NS_R, NS_P, SP_TREE_HEADER
    )
}

const THEME_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Deck">"#,
    r#"<a:themeElements>"#,
    r#"<a:clrScheme name="Deck">"#,
    r#"<a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1>"#,
    r#"<a:dk2><a:srgbClr val="0F172A"/></a:dk2><a:lt2><a:srgbClr val="F8FAFC"/></a:lt2>"#,
    r#"<a:accent1><a:srgbClr val="5B6CF9"/></a:accent1><a:accent2><a:srgbClr val="06B6D4"/></a:accent2>"#,
    r#"<a:accent3><a:srgbClr val="10B981"/></a:accent3><a:accent4><a:srgbClr val="F59E0B"/></a:accent4>"#,
    r#"<a:accent5><a:srgbClr val="7B8BFF"/></a:accent5><a:accent6><a:srgbClr val="64748B"/></a:accent6>"#,
    r#"<a:hlink><a:srgbClr val="5B6CF9"/></a:hlink><a:folHlink><a:srgbClr val="4A5AE8"/></a:folHlink>"#,
    r#"</a:clrScheme>"#,
    r#"<a:fontScheme name="Deck">"#,
    r#"<a:majorFont><a:latin typeface="Pretendard"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
    r#"<a:minorFont><a:latin typeface="Pretendard"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
    r#"</a:fontScheme>"#,
    r#"<a:fmtScheme name="Deck">"#,
    r#"<a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst>"#,
    r#"<a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst>"#,
    r#"<a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst>"#,
    r#"<a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst>"#,
    r#"</a:fmtScheme>"#,
    r#"</a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CanvasSettings, Rect, TextStyle};
    use deck_core::{RenderConfig, Rgb};
    use std::io::Read;
    use zip::ZipArchive;

    fn canvas() -> SlideCanvas {
        SlideCanvas::new(&CanvasSettings::from_config(&RenderConfig::default()), Rgb::WHITE)
    }

    fn read(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_package_parts() {
        let mut deck = DeckPackage::new("R&D", 13.333, 7.5);
        let mut slide = canvas();
        slide.text(Rect::new(1.0, 1.0, 5.0, 1.0), "hello", TextStyle::new(18.0, Rgb::BLACK));
        deck.push(slide);
        deck.push(canvas());

        let bytes = deck.to_bytes().unwrap();
        let types = read(&bytes, "[Content_Types].xml");
        assert!(types.contains("/ppt/slides/slide2.xml"));
        assert!(!types.contains(r#"Extension="png""#));

        let presentation = read(&bytes, "ppt/presentation.xml");
        assert!(presentation.contains(r#"<p:sldId id="256" r:id="rId3"/>"#));
        assert!(presentation.contains(r#"<p:sldId id="257" r:id="rId4"/>"#));
        assert!(presentation.contains(r#"<p:sldSz cx="12191695" cy="6858000"/>"#));

        assert!(read(&bytes, "docProps/core.xml").contains("<dc:title>R&amp;D</dc:title>"));
        assert!(read(&bytes, "ppt/slides/slide1.xml").contains("<a:t>hello</a:t>"));
        assert!(read(&bytes, "ppt/slides/slide2.xml").contains(r#"<a:srgbClr val="FFFFFF"/>"#));
    }

    #[test]
    fn test_media_names_are_package_wide() {
        let mut assets = std::collections::HashMap::new();
        let mut png = Cursor::new(Vec::new());
        image::DynamicImage::new_rgba8(2, 2)
            .write_to(&mut png, image::ImageFormat::Png)
            .unwrap();
        assets.insert("a.png".to_string(), png.into_inner());

        let mut deck = DeckPackage::new("", 13.333, 7.5);
        for _ in 0..2 {
            let mut slide = canvas();
            assert!(slide.image(&mut assets, Rect::new(0.0, 0.0, 1.0, 1.0), "a.png"));
            deck.push(slide);
        }

        let bytes = deck.to_bytes().unwrap();
        assert!(read(&bytes, "ppt/slides/_rels/slide2.xml.rels").contains("../media/image2.png"));
        assert!(read(&bytes, "ppt/slides/slide2.xml").contains(r#"r:embed="rId2""#));
        assert!(read(&bytes, "[Content_Types].xml").contains(r#"Extension="png""#));
    }
}
