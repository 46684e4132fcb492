//! Inline picture embedding and ordered image splicing

use image::GenericImageView;
use log::warn;

use crate::xml::{XmlElement, XmlNode};

use super::body::{Anchor, BodyEditor};
use super::paragraph::{make_caption_para, make_text_para};
use super::{ns, DocxError, ImageAttachment, Result, WordDocument};

const EMU_PER_INCH: u64 = 914_400;
/// Embedded pictures render 3 inches wide; height follows the aspect ratio
const TARGET_WIDTH_EMU: u64 = 3 * EMU_PER_INCH;

pub(super) struct ProbedImage {
    pub ext: &'static str,
    pub content_type: &'static str,
    pub width_px: u32,
    pub height_px: u32,
}

impl ProbedImage {
    /// Display extent in EMU at the fixed target width
    pub fn scaled_extent(&self) -> (u64, u64) {
        let height = TARGET_WIDTH_EMU * u64::from(self.height_px) / u64::from(self.width_px);
        (TARGET_WIDTH_EMU, height)
    }
}

/// Decode the attachment enough to know its format and pixel size.
/// A full decode is used so truncated files are caught here, before the
/// package is touched.
pub(super) fn probe_image(bytes: &[u8]) -> Result<ProbedImage> {
    let format = image::guess_format(bytes).map_err(|e| DocxError::Image(e.to_string()))?;
    let (ext, content_type) = match format {
        image::ImageFormat::Png => ("png", "image/png"),
        image::ImageFormat::Jpeg => ("jpeg", "image/jpeg"),
        image::ImageFormat::Gif => ("gif", "image/gif"),
        image::ImageFormat::Bmp => ("bmp", "image/bmp"),
        image::ImageFormat::Tiff => ("tiff", "image/tiff"),
        other => {
            return Err(DocxError::Image(format!(
                "format {other:?} cannot be placed in a document"
            )))
        }
    };
    let decoded = image::load_from_memory(bytes).map_err(|e| DocxError::Image(e.to_string()))?;
    let (width_px, height_px) = decoded.dimensions();
    if width_px == 0 || height_px == 0 {
        return Err(DocxError::Image("image has a zero dimension".into()));
    }
    Ok(ProbedImage {
        ext,
        content_type,
        width_px,
        height_px,
    })
}

/// Centered paragraph holding one `wp:inline` drawing. DrawingML
/// namespaces are declared on the inserted elements themselves, so the
/// markup stays valid in documents whose root never declares them.
pub(super) fn drawing_paragraph(
    rel_id: &str,
    drawing_id: u32,
    name: &str,
    width_emu: u64,
    height_emu: u64,
) -> XmlElement {
    let cx = width_emu.to_string();
    let cy = height_emu.to_string();
    let id = drawing_id.to_string();

    let blip_fill = XmlElement::new("pic:blipFill")
        .with_child(
            XmlElement::new("a:blip")
                .with_attr("xmlns:r", ns::R_DOC)
                .with_attr("r:embed", rel_id),
        )
        .with_child(XmlElement::new("a:stretch").with_child(XmlElement::new("a:fillRect")));
    let sp_pr = XmlElement::new("pic:spPr")
        .with_child(
            XmlElement::new("a:xfrm")
                .with_child(
                    XmlElement::new("a:off")
                        .with_attr("x", "0")
                        .with_attr("y", "0"),
                )
                .with_child(
                    XmlElement::new("a:ext")
                        .with_attr("cx", &cx)
                        .with_attr("cy", &cy),
                ),
        )
        .with_child(
            XmlElement::new("a:prstGeom")
                .with_attr("prst", "rect")
                .with_child(XmlElement::new("a:avLst")),
        );
    let pic = XmlElement::new("pic:pic")
        .with_attr("xmlns:pic", ns::PIC)
        .with_child(
            XmlElement::new("pic:nvPicPr")
                .with_child(
                    XmlElement::new("pic:cNvPr")
                        .with_attr("id", &id)
                        .with_attr("name", name),
                )
                .with_child(XmlElement::new("pic:cNvPicPr")),
        )
        .with_child(blip_fill)
        .with_child(sp_pr);

    let inline = XmlElement::new("wp:inline")
        .with_attr("xmlns:wp", ns::WP)
        .with_attr("distT", "0")
        .with_attr("distB", "0")
        .with_attr("distL", "0")
        .with_attr("distR", "0")
        .with_child(
            XmlElement::new("wp:extent")
                .with_attr("cx", &cx)
                .with_attr("cy", &cy),
        )
        .with_child(
            XmlElement::new("wp:docPr")
                .with_attr("id", &id)
                .with_attr("name", name),
        )
        .with_child(
            XmlElement::new("wp:cNvGraphicFramePr").with_child(
                XmlElement::new("a:graphicFrameLocks")
                    .with_attr("xmlns:a", ns::A)
                    .with_attr("noChangeAspect", "1"),
            ),
        )
        .with_child(
            XmlElement::new("a:graphic")
                .with_attr("xmlns:a", ns::A)
                .with_child(
                    XmlElement::new("a:graphicData")
                        .with_attr("uri", ns::PIC)
                        .with_child(pic),
                ),
        );

    let ppr = XmlElement::new("w:pPr")
        .with_child(XmlElement::new("w:jc").with_attr("w:val", "center"));
    XmlElement::new("w:p").with_child(ppr).with_child(
        XmlElement::new("w:r").with_child(XmlElement::new("w:drawing").with_child(inline)),
    )
}

/// Insert the attachments after the anchor, each picture followed by its
/// caption paragraph, advancing the anchor so order is preserved. An
/// attachment that cannot be embedded becomes an italic placeholder note
/// instead; the remaining attachments still go in.
pub fn splice_images(
    doc: &mut WordDocument,
    editor: &mut BodyEditor,
    anchor: &mut Anchor,
    images: &[ImageAttachment],
) {
    for attachment in images {
        match doc.embed_picture(attachment) {
            Ok(picture) => {
                editor.insert_after(anchor, XmlNode::Element(picture));
                editor.insert_after(
                    anchor,
                    XmlNode::Element(make_caption_para(attachment.caption())),
                );
            }
            Err(err) => {
                let name = if attachment.name.trim().is_empty() {
                    "unknown"
                } else {
                    attachment.name.as_str()
                };
                warn!("image {name:?} not embedded: {err}");
                let note = make_text_para(
                    &format!("[Image: {name} \u{2014} could not be embedded]"),
                    false,
                    true,
                );
                editor.insert_after(anchor, XmlNode::Element(note));
            }
        }
    }
}
