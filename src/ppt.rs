//! PPT Deck Writer Module
//! Packs rendered slide images into a PowerPoint file, one slide per scene.
//!
//! The OOXML parts are written directly into a ZIP container: each slide
//! carries a title text box above its picture.

use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::ZipWriter;

/// EMU (English Metric Units) conversion: 914400 EMU = 1 inch
const EMU_PER_INCH: i64 = 914400;
/// 16:9 slide, 13.333 x 7.5 inches
const SLIDE_WIDTH: i64 = 12192000;
const SLIDE_HEIGHT: i64 = 6858000;
const MARGIN: i64 = EMU_PER_INCH * 2 / 5;
const TITLE_HEIGHT: i64 = EMU_PER_INCH * 9 / 10;

const NS_DECL: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const EMPTY_TREE: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#;

/// One rendered slide ready for packing.
#[derive(Debug, Clone)]
pub struct SlideImage {
    pub title: String,
    pub png: Vec<u8>,
    /// Pixel size of `png`, used to keep its aspect ratio on the slide
    pub size: (u32, u32),
}

/// Position and extent of a shape on the slide, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
}

/// PPTX writer for slide decks
pub struct PptGenerator;

impl PptGenerator {
    /// Write `slides` to a .pptx file at `output_path`.
    pub fn generate(slides: &[SlideImage], output_path: &Path, deck_title: &str) -> Result<()> {
        let file = File::create(output_path)
            .with_context(|| format!("Failed to create {}", output_path.display()))?;
        Self::write_to(file, slides, deck_title)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        info!(
            "PPT generated: {} ({} slides)",
            output_path.display(),
            slides.len()
        );
        Ok(())
    }

    /// Write the package into any seekable writer and hand the writer back.
    pub fn write_to<W: Write + Seek>(
        writer: W,
        slides: &[SlideImage],
        deck_title: &str,
    ) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default();

        let part = |zip: &mut ZipWriter<W>, name: String, body: &[u8]| -> Result<()> {
            zip.start_file(name.as_str(), options)
                .with_context(|| format!("Failed to start {}", name))?;
            zip.write_all(body)?;
            Ok(())
        };

        part(&mut zip, "[Content_Types].xml".into(), Self::content_types_xml(slides.len()).as_bytes())?;
        part(&mut zip, "_rels/.rels".into(), Self::package_rels_xml().as_bytes())?;
        part(&mut zip, "docProps/core.xml".into(), Self::core_props_xml(deck_title).as_bytes())?;
        part(&mut zip, "docProps/app.xml".into(), Self::app_props_xml(slides.len()).as_bytes())?;
        part(&mut zip, "ppt/presentation.xml".into(), Self::presentation_xml(slides.len()).as_bytes())?;
        part(
            &mut zip,
            "ppt/_rels/presentation.xml.rels".into(),
            Self::presentation_rels_xml(slides.len()).as_bytes(),
        )?;
        part(&mut zip, "ppt/slideMasters/slideMaster1.xml".into(), Self::slide_master_xml().as_bytes())?;
        part(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels".into(),
            Self::rels_xml(&[
                ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                ("rId2", "theme", "../theme/theme1.xml"),
            ])
            .as_bytes(),
        )?;
        part(&mut zip, "ppt/slideLayouts/slideLayout1.xml".into(), Self::slide_layout_xml().as_bytes())?;
        part(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels".into(),
            Self::rels_xml(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]).as_bytes(),
        )?;
        part(&mut zip, "ppt/theme/theme1.xml".into(), Self::theme_xml().as_bytes())?;

        for (idx, slide) in slides.iter().enumerate() {
            let num = idx + 1;
            let media = format!("../media/image{}.png", num);
            part(
                &mut zip,
                format!("ppt/slides/_rels/slide{}.xml.rels", num),
                Self::rels_xml(&[
                    ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                    ("rId2", "image", media.as_str()),
                ])
                .as_bytes(),
            )?;
            part(
                &mut zip,
                format!("ppt/slides/slide{}.xml", num),
                Self::slide_xml(&slide.title, picture_frame(slide.size)).as_bytes(),
            )?;
            part(&mut zip, format!("ppt/media/image{}.png", num), &slide.png)?;
        }

        let writer = zip.finish().context("Failed to finish PPTX archive")?;
        Ok(writer)
    }

    fn content_types_xml(slide_count: usize) -> String {
        const PML: &str = "application/vnd.openxmlformats-officedocument.presentationml";
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/ppt/presentation.xml" ContentType="{pml}.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="{pml}.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="{pml}.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
            pml = PML
        );
        for i in 1..=slide_count {
            xml.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="{}.slide+xml"/>"#,
                i, PML
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn package_rels_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#
    }

    /// Relationship part with `(id, officeDocument relationship kind, target)` entries.
    fn rels_xml(entries: &[(&str, &str, &str)]) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (id, kind, target) in entries {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
                id, REL_NS, kind, target
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }

    fn presentation_xml(slide_count: usize) -> String {
        let slide_ids: String = (1..=slide_count)
            .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + i, i + 2))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="{}" cy="{}"/><p:notesSz cx="{}" cy="{}"/></p:presentation>"#,
            NS_DECL, slide_ids, SLIDE_WIDTH, SLIDE_HEIGHT, SLIDE_HEIGHT, SLIDE_WIDTH
        )
    }

    fn presentation_rels_xml(slide_count: usize) -> String {
        let targets: Vec<(String, String)> = (1..=slide_count)
            .map(|i| (format!("rId{}", i + 2), format!("slides/slide{}.xml", i)))
            .collect();
        let mut entries = vec![
            ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
            ("rId2", "theme", "theme/theme1.xml"),
        ];
        entries.extend(
            targets
                .iter()
                .map(|(id, target)| (id.as_str(), "slide", target.as_str())),
        );
        Self::rels_xml(&entries)
    }

    fn slide_xml(title: &str, picture: Frame) -> String {
        let title_frame = Frame {
            x: MARGIN,
            y: MARGIN / 2,
            cx: SLIDE_WIDTH - 2 * MARGIN,
            cy: TITLE_HEIGHT,
        };
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {ns}><p:cSld><p:spTree>{tree}<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{title_xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr anchor="ctr"/><a:lstStyle/><a:p><a:pPr algn="ctr"/><a:r><a:rPr lang="en-US" sz="3200" b="1"/><a:t>{title}</a:t></a:r></a:p></p:txBody></p:sp><p:pic><p:nvPicPr><p:cNvPr id="3" name="Slide Image"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{pic_xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
            ns = NS_DECL,
            tree = EMPTY_TREE,
            title_xfrm = xfrm(title_frame),
            title = xml_escape(title),
            pic_xfrm = xfrm(picture),
        )
    }

    fn slide_layout_xml() -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout {} type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
            NS_DECL, EMPTY_TREE
        )
    }

    fn slide_master_xml() -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster {}><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#,
            NS_DECL, EMPTY_TREE
        )
    }

    /// Minimal theme: the category palette as accents, plain fills and lines.
    fn theme_xml() -> String {
        let colors = [
            ("dk1", "000000"),
            ("lt1", "FFFFFF"),
            ("dk2", "212121"),
            ("lt2", "EEEEEE"),
            ("accent1", "1F77B4"),
            ("accent2", "FF7F0E"),
            ("accent3", "2CA02C"),
            ("accent4", "D62728"),
            ("accent5", "9467BD"),
            ("accent6", "8C564B"),
            ("hlink", "17BECF"),
            ("folHlink", "E377C2"),
        ];
        let scheme: String = colors
            .iter()
            .map(|(slot, hex)| format!(r#"<a:{0}><a:srgbClr val="{1}"/></a:{0}>"#, slot, hex))
            .collect();
        let fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
        let fills = fill.repeat(3);
        let lines: String = [6350, 12700, 19050]
            .iter()
            .map(|w| format!(r#"<a:ln w="{}">{}</a:ln>"#, w, fill))
            .collect();
        let effects = "<a:effectStyle><a:effectLst/></a:effectStyle>".repeat(3);
        let font = |face: &str| {
            format!(
                r#"<a:latin typeface="{}"/><a:ea typeface=""/><a:cs typeface=""/>"#,
                face
            )
        };

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Slides"><a:themeElements><a:clrScheme name="Slides">{}</a:clrScheme><a:fontScheme name="Slides"><a:majorFont>{}</a:majorFont><a:minorFont>{}</a:minorFont></a:fontScheme><a:fmtScheme name="Slides"><a:fillStyleLst>{fills}</a:fillStyleLst><a:lnStyleLst>{}</a:lnStyleLst><a:effectStyleLst>{}</a:effectStyleLst><a:bgFillStyleLst>{fills}</a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#,
            scheme,
            font("Calibri Light"),
            font("Calibri"),
            lines,
            effects,
            fills = fills,
        )
    }

    fn core_props_xml(title: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>{}</dc:title><dc:creator>Chartify Slides</dc:creator></cp:coreProperties>"#,
            xml_escape(title)
        )
    }

    fn app_props_xml(slide_count: usize) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>Chartify Slides</Application><PresentationFormat>Widescreen</PresentationFormat><Slides>{}</Slides></Properties>"#,
            slide_count
        )
    }
}

fn xfrm(frame: Frame) -> String {
    format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        frame.x, frame.y, frame.cx, frame.cy
    )
}

/// Largest frame with the image's aspect ratio that fits below the title, centered.
fn picture_frame((width, height): (u32, u32)) -> Frame {
    let top = MARGIN / 2 + TITLE_HEIGHT;
    let box_w = SLIDE_WIDTH - 2 * MARGIN;
    let box_h = SLIDE_HEIGHT - top - MARGIN;
    if width == 0 || height == 0 {
        return Frame {
            x: MARGIN,
            y: top,
            cx: box_w,
            cy: box_h,
        };
    }

    let (w, h) = (i64::from(width), i64::from(height));
    let (cx, cy) = if box_w * h <= box_h * w {
        (box_w, box_w * h / w)
    } else {
        (box_h * w / h, box_h)
    };
    Frame {
        x: MARGIN + (box_w - cx) / 2,
        y: top + (box_h - cy) / 2,
        cx,
        cy,
    }
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn slide(title: &str) -> SlideImage {
        SlideImage {
            title: title.to_string(),
            png: vec![0x89, b'P', b'N', b'G'],
            size: (1280, 720),
        }
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            xml_escape(r#"Rock & "Roll" <Live> 'Tour'"#),
            "Rock &amp; &quot;Roll&quot; &lt;Live&gt; &apos;Tour&apos;"
        );
        assert_eq!(xml_escape("plain"), "plain");
    }

    #[test]
    fn picture_keeps_aspect_ratio_and_fits() {
        for size in [(1280, 720), (800, 800), (400, 1200), (3000, 200)] {
            let frame = picture_frame(size);
            assert!(frame.x >= MARGIN && frame.x + frame.cx <= SLIDE_WIDTH - MARGIN + 1);
            assert!(frame.y >= MARGIN / 2 + TITLE_HEIGHT);
            assert!(frame.y + frame.cy <= SLIDE_HEIGHT - MARGIN + 1);

            let image_ratio = size.0 as f64 / size.1 as f64;
            let frame_ratio = frame.cx as f64 / frame.cy as f64;
            assert!((image_ratio - frame_ratio).abs() / image_ratio < 0.01);
        }
    }

    #[test]
    fn zero_sized_picture_fills_content_box() {
        let frame = picture_frame((0, 0));
        assert_eq!(frame.x, MARGIN);
        assert_eq!(frame.cx, SLIDE_WIDTH - 2 * MARGIN);
    }

    #[test]
    fn presentation_lists_every_slide() {
        let rels = PptGenerator::presentation_rels_xml(3);
        assert!(rels.contains(r#"Id="rId5""#));
        assert!(rels.contains("slides/slide3.xml"));
        let pres = PptGenerator::presentation_xml(3);
        assert_eq!(pres.matches("<p:sldId ").count(), 3);
    }

    #[test]
    fn package_contains_all_parts() {
        let slides = [slide("Genre Breakdown"), slide("Q&A")];
        let cursor = PptGenerator::write_to(Cursor::new(Vec::new()), &slides, "Deck").unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
            "ppt/media/image2.png",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {}", name);
        }

        let mut xml = String::new();
        archive
            .by_name("ppt/slides/slide2.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        assert!(xml.contains("<a:t>Q&amp;A</a:t>"));
        assert!(xml.contains(r#"r:embed="rId2""#));
    }

    #[test]
    fn package_rels_point_at_core_parts() {
        let rels = PptGenerator::package_rels_xml();
        assert!(rels.starts_with("<?xml"));
        assert!(rels.ends_with("</Relationships>"));
        assert_eq!(rels.matches("<Relationship ").count(), 3);
        assert!(rels.contains("package/2006/relationships/metadata/core-properties"));
    }
}
