use std::path::Path;

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::CapturedPage;

// A4 portrait with the margins the scanner output was designed around.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;

// Placement is computed in points from the image's native size at this DPI.
const RENDER_DPI: f32 = 150.0;

/// Builds one PDF from the ordered captured-page sequence.
///
/// One PDF page per captured page, in capture order. Each image is scaled
/// to the usable page width preserving aspect ratio; when that would
/// overflow the page height, it is scaled to the usable height instead and
/// centered horizontally. PDF binary layout is entirely `printpdf`'s.
pub struct PageAssembler {
    title: String,
}

impl PageAssembler {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Serialize the captured pages into PDF bytes.
    pub fn assemble(&self, pages: &[CapturedPage]) -> Vec<u8> {
        let page_w = Mm(PAGE_WIDTH_MM);
        let page_h = Mm(PAGE_HEIGHT_MM);
        let margin_pt = Mm(MARGIN_MM).into_pt().0;
        let usable_w_pt = Mm(PAGE_WIDTH_MM - 2.0 * MARGIN_MM).into_pt().0;
        let usable_h_pt = Mm(PAGE_HEIGHT_MM - 2.0 * MARGIN_MM).into_pt().0;
        let page_h_pt = page_h.into_pt().0;

        info!(pages = pages.len(), "assembling PDF");

        let mut doc = PdfDocument::new(self.title.as_str());
        let mut pdf_pages = Vec::with_capacity(pages.len());

        for page in pages {
            let rgb = page.image.to_rgb8();
            let (img_w, img_h) = rgb.dimensions();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: img_w as usize,
                height: img_h as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let img_w_pt = img_w as f32 / RENDER_DPI * 72.0;
            let img_h_pt = img_h as f32 / RENDER_DPI * 72.0;

            // Fit the usable width first; fall back to height-fit when the
            // page would overflow vertically.
            let mut scale = usable_w_pt / img_w_pt;
            if img_h_pt * scale > usable_h_pt {
                scale = usable_h_pt / img_h_pt;
            }

            let rendered_w_pt = img_w_pt * scale;
            let rendered_h_pt = img_h_pt * scale;
            let x_offset = margin_pt + (usable_w_pt - rendered_w_pt) / 2.0;
            let y_offset = page_h_pt - margin_pt - rendered_h_pt;

            debug!(
                index = page.index,
                rendered_w_pt, rendered_h_pt, "page placed"
            );

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(x_offset)),
                    translate_y: Some(Pt(y_offset)),
                    scale_x: Some(scale),
                    scale_y: Some(scale),
                    dpi: Some(RENDER_DPI),
                    rotate: None,
                },
            }];
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        doc.save(&PdfSaveOptions::default(), &mut warnings)
    }

    /// Assemble and write the PDF to a file.
    pub fn write_to_file(&self, pages: &[CapturedPage], path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.assemble(pages);
        std::fs::write(path.as_ref(), &bytes)?;
        info!("wrote PDF to {}", path.as_ref().display());
        Ok(())
    }
}
