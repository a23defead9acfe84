//! PDF export of the invoice preview document.
//!
//! # Responsibility
//! - Serialize an `InvoiceDocument` into PDF bytes via `printpdf`.
//! - Write `<invoice number>.pdf` and report the outcome to the caller.
//!
//! # Invariants
//! - Export never mutates the invoice; it renders the preview document only.
//! - Content overflowing one page continues on a new page.
//! - The output file name contains no path separators or control characters.

use crate::model::invoice::Invoice;
use crate::render::preview::{InvoiceDocument, TABLE_HEADERS};
use log::{error, info};
use once_cell::sync::Lazy;
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Built-in PDF fonts cannot encode `₹`.
pub const PDF_CURRENCY_PREFIX: &str = "Rs. ";

const MM_PER_INCH: f32 = 25.4;
const MM_PER_PT: f32 = 0.3528;
// Average Helvetica glyph advance as a fraction of the font size.
const HELVETICA_AVG_ADVANCE: f32 = 0.5;
const MAX_DESCRIPTION_CHARS: usize = 48;
const FALLBACK_FILE_STEM: &str = "invoice";

static UNSAFE_FILE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[/\\:\x00-\x1f\x7f]").expect("valid file name regex"));

/// Page geometry for exported documents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
}

impl Default for ExportOptions {
    /// US Letter with a half-inch margin.
    fn default() -> Self {
        Self {
            page_width_mm: 8.5 * MM_PER_INCH,
            page_height_mm: 11.0 * MM_PER_INCH,
            margin_mm: 0.5 * MM_PER_INCH,
        }
    }
}

/// Successful export outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug)]
pub enum ExportError {
    Render(String),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(message) => write!(f, "pdf render failed: {message}"),
            Self::Io(err) => write!(f, "pdf write failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Returns the export file name `<invoice number>.pdf`.
///
/// Path separators and control characters become `_`; a blank number falls
/// back to `invoice.pdf`.
pub fn pdf_file_name(invoice_number: &str) -> String {
    let cleaned = UNSAFE_FILE_CHARS_RE.replace_all(invoice_number.trim(), "_");
    if cleaned.is_empty() {
        format!("{FALLBACK_FILE_STEM}.pdf")
    } else {
        format!("{cleaned}.pdf")
    }
}

/// Document title for the PDF info dictionary.
///
/// The info dictionary stores raw bytes, so anything outside printable ASCII
/// becomes `?` there; page text keeps the full title.
pub fn pdf_metadata_title(invoice_number: &str) -> String {
    let number: String = invoice_number
        .trim()
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '?' })
        .collect();
    format!("Invoice - {number}")
}

/// Renders `invoice` and writes it into `out_dir`.
///
/// # Side effects
/// - Creates `out_dir` when missing; overwrites an existing file of the same name.
/// - Emits `pdf_export` logging events with duration and status.
pub fn export_pdf(
    invoice: &Invoice,
    out_dir: &Path,
    options: &ExportOptions,
) -> Result<ExportReport, ExportError> {
    let started_at = Instant::now();
    info!(
        "event=pdf_export module=render status=start invoice_id={}",
        invoice.id
    );

    let result = write_pdf(invoice, out_dir, options);
    match &result {
        Ok(report) => info!(
            "event=pdf_export module=render status=ok invoice_id={} bytes={} duration_ms={}",
            invoice.id,
            report.bytes,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=pdf_export module=render status=error invoice_id={} duration_ms={} error={}",
            invoice.id,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn write_pdf(
    invoice: &Invoice,
    out_dir: &Path,
    options: &ExportOptions,
) -> Result<ExportReport, ExportError> {
    let bytes = render_pdf(invoice, options)?;
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(pdf_file_name(&invoice.invoice_number));
    std::fs::write(&path, &bytes)?;
    Ok(ExportReport {
        path,
        bytes: bytes.len(),
    })
}

/// Renders `invoice` into PDF bytes.
pub fn render_pdf(invoice: &Invoice, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    let document = InvoiceDocument::with_currency(invoice, PDF_CURRENCY_PREFIX);
    let (doc, page, layer) = PdfDocument::new(
        pdf_metadata_title(&invoice.invoice_number),
        Mm(options.page_width_mm),
        Mm(options.page_height_mm),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| ExportError::Render(err.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| ExportError::Render(err.to_string()))?;
    {
        let mut canvas = PageCanvas {
            doc: &doc,
            layer: doc.get_page(page).get_layer(layer),
            options: *options,
            y: options.page_height_mm - options.margin_mm,
            regular,
            bold,
        };
        draw_document(&mut canvas, &document);
    }

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|err| ExportError::Render(err.to_string()))?;
    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}

struct PageCanvas<'doc> {
    doc: &'doc PdfDocumentReference,
    layer: PdfLayerReference,
    options: ExportOptions,
    y: f32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PageCanvas<'_> {
    fn left(&self) -> f32 {
        self.options.margin_mm
    }

    fn right(&self) -> f32 {
        self.options.page_width_mm - self.options.margin_mm
    }

    /// Starts a new page when fewer than `needed_mm` remain above the margin.
    fn reserve(&mut self, needed_mm: f32) {
        if self.y - needed_mm >= self.options.margin_mm {
            return;
        }
        let (page, layer) = self.doc.add_page(
            Mm(self.options.page_width_mm),
            Mm(self.options.page_height_mm),
            "Layer 1",
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = self.options.page_height_mm - self.options.margin_mm;
    }

    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn text_right(&self, text: &str, size: f32, right_x: f32, bold: bool) {
        self.text(text, size, right_x - approx_width_mm(text, size), bold);
    }

    fn rule(&self) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(self.left()), Mm(self.y)), false),
                (Point::new(Mm(self.right()), Mm(self.y)), false),
            ],
            is_closed: false,
        });
    }

    fn advance(&mut self, mm: f32) {
        self.y -= mm;
    }
}

fn draw_document(canvas: &mut PageCanvas<'_>, document: &InvoiceDocument) {
    let left = canvas.left();
    let right = canvas.right();

    canvas.reserve(10.0);
    canvas.advance(6.0);
    canvas.text(&document.title, 16.0, left, true);
    canvas.advance(6.0);
    if !document.due_date.is_empty() {
        canvas.text(&format!("Due: {}", document.due_date), 10.0, left, false);
        canvas.advance(5.0);
    }
    canvas.advance(4.0);

    let letterhead_rows = document.from_lines.len().max(document.to_lines.len());
    for index in 0..letterhead_rows {
        canvas.reserve(5.0);
        if let Some(line) = document.from_lines.get(index) {
            canvas.text(line, 10.0, left, false);
        }
        if let Some(line) = document.to_lines.get(index) {
            canvas.text_right(line, 10.0, right, false);
        }
        canvas.advance(5.0);
    }
    canvas.advance(4.0);

    let qty_x = left + 105.0;
    let unit_x = left + 125.0;

    canvas.reserve(12.0);
    canvas.text(TABLE_HEADERS[0], 10.0, left, true);
    canvas.text(TABLE_HEADERS[1], 10.0, qty_x, true);
    canvas.text(TABLE_HEADERS[2], 10.0, unit_x, true);
    canvas.text_right(TABLE_HEADERS[3], 10.0, right, true);
    canvas.advance(2.5);
    canvas.rule();
    canvas.advance(5.5);

    for row in &document.rows {
        canvas.reserve(6.0);
        canvas.text(&truncate(&row.description, MAX_DESCRIPTION_CHARS), 10.0, left, false);
        canvas.text(&row.qty, 10.0, qty_x, false);
        canvas.text(&row.unit_price, 10.0, unit_x, false);
        canvas.text_right(&row.prize, 10.0, right, false);
        canvas.advance(6.0);
    }
    canvas.rule();
    canvas.advance(8.0);

    for (label, value) in document.totals_lines() {
        canvas.reserve(7.0);
        let is_total = label == "Total";
        let size = if is_total { 13.0 } else { 10.0 };
        canvas.text_right(&format!("{label}: {value}"), size, right, is_total);
        canvas.advance(if is_total { 7.0 } else { 5.5 });
    }
    canvas.advance(6.0);

    canvas.reserve(6.0);
    canvas.text("Notes:", 10.0, left, true);
    canvas.advance(5.5);
    for line in &document.notes_lines {
        canvas.reserve(5.0);
        canvas.text(line, 10.0, left, false);
        canvas.advance(5.0);
    }
}

fn approx_width_mm(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * HELVETICA_AVG_ADVANCE * MM_PER_PT
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut truncated = value.chars().take(max_chars).collect::<String>();
    if value.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}
