//! DrawingML shapes written into slide parts.

use deck_core::{Error, Result, Rgb};
use std::fmt::Write as FmtWrite;

/// English Metric Units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Position and size in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Frame {
    fn write_xfrm(&self, xml: &mut String) -> Result<()> {
        write!(
            xml,
            r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            self.x, self.y, self.cx, self.cy
        )
        .map_err(|e| Error::XmlError(e.to_string()))
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    fn attr(&self) -> &'static str {
        match self {
            Align::Left => "l",
            Align::Center => "ctr",
            Align::Right => "r",
        }
    }
}

/// Fully resolved text body: every value is already scaled.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBody {
    pub paragraphs: Vec<String>,
    /// Font size in hundredths of a point.
    pub size: u32,
    pub color: Rgb,
    pub bold: bool,
    pub align: Align,
    pub typeface: String,
    /// Line spacing in thousandths of a percent (100000 = single).
    pub line_spacing: u32,
    /// Space before and after each paragraph, hundredths of a point.
    pub paragraph_spacing: u32,
}

/// Solid fill with optional alpha (thousandths of a percent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub color: Rgb,
    pub alpha: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    TextBox {
        frame: Frame,
        body: TextBody,
    },
    Rectangle {
        frame: Frame,
        fill: Option<Fill>,
        /// `roundRect` adjustment value; `None` draws a plain rectangle.
        corner: Option<u32>,
    },
    Picture {
        frame: Frame,
        /// Index into the owning canvas' media list.
        media: usize,
        description: String,
    },
}

impl Shape {
    /// Generate XML for this shape. Pictures need the relationship id of their media.
    pub fn to_xml(&self, xml: &mut String, shape_id: u32, rel_id: Option<&str>) -> Result<()> {
        let err = |e: std::fmt::Error| Error::XmlError(e.to_string());

        match self {
            Shape::TextBox { frame, body } => {
                xml.push_str("<p:sp><p:nvSpPr>");
                write!(xml, r#"<p:cNvPr id="{}" name="TextBox {}"/>"#, shape_id, shape_id).map_err(err)?;
                xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>"#);
                frame.write_xfrm(xml)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);
                xml.push_str(r#"<p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:noAutofit/></a:bodyPr><a:lstStyle/>"#);
                for paragraph in &body.paragraphs {
                    write_paragraph(xml, paragraph, body).map_err(err)?;
                }
                xml.push_str("</p:txBody></p:sp>");
            }
            Shape::Rectangle {
                frame,
                fill,
                corner,
            } => {
                xml.push_str("<p:sp><p:nvSpPr>");
                write!(xml, r#"<p:cNvPr id="{}" name="Shape {}"/>"#, shape_id, shape_id).map_err(err)?;
                xml.push_str("<p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>");
                frame.write_xfrm(xml)?;
                match corner {
                    Some(adj) => write!(
                        xml,
                        r#"<a:prstGeom prst="roundRect"><a:avLst><a:gd name="adj" fmla="val {}"/></a:avLst></a:prstGeom>"#,
                        adj
                    )
                    .map_err(err)?,
                    None => xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#),
                }
                match fill {
                    Some(Fill { color, alpha: Some(alpha) }) => write!(
                        xml,
                        r#"<a:solidFill><a:srgbClr val="{}"><a:alpha val="{}"/></a:srgbClr></a:solidFill>"#,
                        color.hex(),
                        alpha
                    )
                    .map_err(err)?,
                    Some(Fill { color, alpha: None }) => write!(
                        xml,
                        r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
                        color.hex()
                    )
                    .map_err(err)?,
                    None => xml.push_str("<a:noFill/>"),
                }
                xml.push_str("<a:ln><a:noFill/></a:ln></p:spPr></p:sp>");
            }
            Shape::Picture {
                frame, description, ..
            } => {
                let rel_id = rel_id.ok_or_else(|| {
                    Error::XmlError(format!("picture {} has no relationship id", shape_id))
                })?;
                xml.push_str("<p:pic><p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
                    shape_id,
                    shape_id,
                    escape_xml(description)
                )
                .map_err(err)?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);
                write!(
                    xml,
                    r#"<p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
                    rel_id
                )
                .map_err(err)?;
                xml.push_str("<p:spPr>");
                frame.write_xfrm(xml)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);
            }
        }

        Ok(())
    }
}

fn write_paragraph(xml: &mut String, text: &str, body: &TextBody) -> std::fmt::Result {
    write!(
        xml,
        concat!(
            r#"<a:p><a:pPr algn="{}">"#,
            r#"<a:lnSpc><a:spcPct val="{}"/></a:lnSpc>"#,
            r#"<a:spcBef><a:spcPts val="{}"/></a:spcBef>"#,
            r#"<a:spcAft><a:spcPts val="{}"/></a:spcAft>"#,
            "</a:pPr>"
        ),
        body.align.attr(),
        body.line_spacing,
        body.paragraph_spacing,
        body.paragraph_spacing
    )?;
    write!(
        xml,
        r#"<a:r><a:rPr lang="ko-KR" sz="{}" b="{}" dirty="0">"#,
        body.size,
        if body.bold { 1 } else { 0 }
    )?;
    write!(
        xml,
        r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:latin typeface="{typeface}"/><a:ea typeface="{typeface}"/>"#,
        body.color.hex(),
        typeface = escape_xml(&body.typeface)
    )?;
    write!(xml, "</a:rPr><a:t>{}</a:t></a:r></a:p>", escape_xml(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame {
            x: 0,
            y: 0,
            cx: 914_400,
            cy: 457_200,
        }
    }

    #[test]
    fn test_text_box_xml() {
        let shape = Shape::TextBox {
            frame: frame(),
            body: TextBody {
                paragraphs: vec!["A & B".to_string(), "second".to_string()],
                size: 1710,
                color: Rgb::WHITE,
                bold: true,
                align: Align::Center,
                typeface: "Pretendard".to_string(),
                line_spacing: 99_600,
                paragraph_spacing: 0,
            },
        };
        let mut xml = String::new();
        shape.to_xml(&mut xml, 2, None).unwrap();

        assert!(xml.contains(r#"<p:cNvPr id="2" name="TextBox 2"/>"#));
        assert_eq!(xml.matches("<a:p>").count(), 2);
        assert!(xml.contains(r#"sz="1710" b="1""#));
        assert!(xml.contains(r#"<a:spcPct val="99600"/>"#));
        assert!(xml.contains(r#"algn="ctr""#));
        assert!(xml.contains("<a:t>A &amp; B</a:t>"));
    }

    #[test]
    fn test_rounded_rectangle_with_alpha() {
        let shape = Shape::Rectangle {
            frame: frame(),
            fill: Some(Fill {
                color: Rgb(0x5B, 0x6C, 0xF9),
                alpha: Some(75_000),
            }),
            corner: Some(16_000),
        };
        let mut xml = String::new();
        shape.to_xml(&mut xml, 3, None).unwrap();

        assert!(xml.contains(r#"prst="roundRect""#));
        assert!(xml.contains(r#"fmla="val 16000""#));
        assert!(xml.contains(r#"<a:srgbClr val="5B6CF9"><a:alpha val="75000"/></a:srgbClr>"#));
    }

    #[test]
    fn test_picture_requires_rel_id() {
        let shape = Shape::Picture {
            frame: frame(),
            media: 0,
            description: "logo".to_string(),
        };
        let mut xml = String::new();
        assert!(shape.to_xml(&mut xml, 4, None).is_err());

        xml.clear();
        shape.to_xml(&mut xml, 4, Some("rId2")).unwrap();
        assert!(xml.contains(r#"<a:blip r:embed="rId2"/>"#));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml(r#"<"it's">"#), "&lt;&quot;it&apos;s&quot;&gt;");
    }
}
