use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use crate::catalog::{Catalog, LanguageVariant};
use crate::models::{Level, Ratings, CRITERIA};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 10.0;
const MARGIN_TOP: f32 = 10.0;
const MARGIN_BOTTOM: f32 = 15.0;
const LINE_HEIGHT: f32 = 10.0;
const BASELINE_OFFSET: f32 = 7.0;
const BODY_SIZE: f32 = 12.0;
const TITLE_SIZE: f32 = 14.0;
const LOGO_TOP: f32 = 8.0;
const LOGO_WIDTH: f32 = 40.0;
const PT_TO_MM: f32 = 0.352_778;
// Helvetica averages about half the point size per glyph; 90 columns keeps
// 12pt body text inside the printable width.
const WRAP_COLUMNS: usize = 90;

/// Conventional download name for a report, spaces replaced by underscores.
pub fn report_file_name(student_name: &str) -> String {
    format!("Relatorio_{}.pdf", student_name.replace(' ', "_"))
}

/// Renders one assessment into PDF bytes. The language variant is chosen by
/// the derived level. A missing or unreadable branding image is skipped with
/// a warning; nothing else is conditional.
#[allow(clippy::too_many_arguments)]
pub fn render_report(
    catalog: &Catalog,
    student_name: &str,
    student_email: &str,
    level: Level,
    date: &str,
    ratings: &Ratings,
    comment: &str,
    logo: &Path,
) -> anyhow::Result<Vec<u8>> {
    let variant = LanguageVariant::for_level(level);
    let strings = catalog.variant(variant);

    let mut writer = ReportWriter::new(&strings.title)?;
    writer.place_logo(logo);

    writer.centered(&strings.title, TITLE_SIZE);
    writer.spacer();

    writer.line(&format!("{}: {}", strings.labels.student_name, student_name));
    writer.line(&format!("{}: {}", strings.labels.student_email, student_email));
    writer.line(&format!("{}: {}", strings.labels.date, date));
    writer.line(&format!("{}: {}", strings.labels.level, level));
    writer.spacer();

    writer.heading(&strings.headings.feedback);
    for criterion in CRITERIA {
        let feedback = strings.feedback(criterion, ratings.get(criterion));
        writer.paragraph(&format!("{criterion}: {feedback}"));
    }

    writer.spacer();
    writer.heading(&strings.headings.comment);
    writer.paragraph(comment);

    writer.spacer();
    writer.heading(&strings.headings.recommendations);
    writer.paragraph(&strings.recommendations);

    writer.finish()
}

/// Cursor over an A4 document, tracking the distance from the top edge and
/// breaking to a fresh page at the bottom margin.
struct ReportWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl ReportWriter {
    fn new(title: &str) -> anyhow::Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Page 1");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .context("failed to load builtin font")?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .context("failed to load builtin font")?;
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: MARGIN_TOP,
        })
    }

    fn place_logo(&mut self, path: &Path) {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "branding image not found, skipping");
            return;
        }
        if let Err(err) = self.embed_logo(path) {
            tracing::warn!(path = %path.display(), error = %err, "branding image unusable, skipping");
        }
    }

    fn embed_logo(&mut self, path: &Path) -> anyhow::Result<()> {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let decoder = PngDecoder::new(BufReader::new(file))?;
        let image = Image::try_from(decoder)?;

        let width_px = image.image.width.0 as f32;
        let height_px = image.image.height.0 as f32;
        anyhow::ensure!(width_px > 0.0 && height_px > 0.0, "image has no pixels");

        // Scale through dpi so the logo comes out LOGO_WIDTH wide.
        let dpi = width_px * 25.4 / LOGO_WIDTH;
        let height_mm = height_px * 25.4 / dpi;
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN_LEFT)),
                translate_y: Some(Mm(PAGE_HEIGHT - LOGO_TOP - height_mm)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
        self.y += 25.0;
        Ok(())
    }

    fn centered(&mut self, text: &str, size: f32) {
        let x = ((PAGE_WIDTH - text_width_mm(text, size)) / 2.0).max(MARGIN_LEFT);
        self.write(text, size, true, x);
    }

    fn heading(&mut self, text: &str) {
        self.write(text, BODY_SIZE, true, MARGIN_LEFT);
    }

    fn line(&mut self, text: &str) {
        self.write(text, BODY_SIZE, false, MARGIN_LEFT);
    }

    fn paragraph(&mut self, text: &str) {
        for line in wrap_text(text, WRAP_COLUMNS) {
            self.write(&line, BODY_SIZE, false, MARGIN_LEFT);
        }
    }

    fn spacer(&mut self) {
        self.y += LINE_HEIGHT;
    }

    fn write(&mut self, text: &str, size: f32, bold: bool, x: f32) {
        if self.y + LINE_HEIGHT > PAGE_HEIGHT - MARGIN_BOTTOM {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Page");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = MARGIN_TOP;
        }
        let font = if bold { &self.bold } else { &self.regular };
        let baseline = PAGE_HEIGHT - self.y - BASELINE_OFFSET;
        self.layer.use_text(text, size, Mm(x), Mm(baseline), font);
        self.y += LINE_HEIGHT;
    }

    fn finish(self) -> anyhow::Result<Vec<u8>> {
        self.doc.save_to_bytes().context("failed to serialize PDF")
    }
}

fn text_width_mm(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5 * PT_TO_MM
}

/// Greedy word wrap preserving explicit newlines. Words longer than the
/// limit are kept whole.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        lines.push(current);
    }
    lines
}
