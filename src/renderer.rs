//! PDF rendering via `printpdf`.
//!
//! Layout is a single flowing column on A4 pages. Tables are drawn cell by
//! cell as filled and stroked rectangles with the text on top. Cell text that
//! is wider than its column wraps onto extra lines and the row grows to fit;
//! nothing is cut off. When a table runs off the bottom margin it continues
//! on a new page with its header row repeated.

use std::io::BufWriter;

use printpdf::path::PaintMode;
use printpdf::*;

use crate::document::{DetailRow, ReportDocument};
use crate::error::{ReportError, Result};

pub const REPORT_FILE_NAME: &str = "pending_on_doctors.pdf";
pub const REPORT_MIME_TYPE: &str = "application/pdf";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 13.0;
const SECTION_SIZE: f32 = 11.5;
const CELL_SIZE: f32 = 10.0;
const ROW_HEIGHT: f32 = 7.0;
const CELL_PADDING: f32 = 2.0;
const BASELINE_OFFSET: f32 = 4.8;
const PT_TO_MM: f32 = 0.3528;

const SUMMARY_WIDTHS: [f32; 3] = [53.0, 35.0, 53.0];
const DETAIL_WIDTHS: [f32; 2] = [42.0, 46.0];

const OVERDUE_MARKER: &str = " !";

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn black() -> Color {
    rgb(0.0, 0.0, 0.0)
}

fn light_grey() -> Color {
    rgb(0.83, 0.83, 0.83)
}

fn light_pink() -> Color {
    rgb(1.0, 0.71, 0.76)
}

fn grid_grey() -> Color {
    rgb(0.5, 0.5, 0.5)
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * 1.2
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RowStyle {
    Header,
    Body,
    Overdue,
}

impl RowStyle {
    fn fill(self) -> Option<Color> {
        match self {
            RowStyle::Header => Some(light_grey()),
            RowStyle::Overdue => Some(light_pink()),
            RowStyle::Body => None,
        }
    }
}

struct TableStyle<'a> {
    widths: &'a [f32],
    grid: Color,
}

/// Position and wrapped text of one cell, relative to the row's left margin.
#[derive(Debug, Clone, PartialEq)]
struct CellLayout {
    x: f32,
    width: f32,
    lines: Vec<String>,
    filled: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct RowLayout {
    height: f32,
    cells: Vec<CellLayout>,
}

/// Lay out one row: every column gets a cell, every cell shares the row fill.
fn layout_row(style: &TableStyle<'_>, cells: &[String], row_style: RowStyle) -> RowLayout {
    let filled = row_style.fill().is_some();
    let mut x = MARGIN;
    let mut layouts = Vec::with_capacity(style.widths.len());
    for (idx, width) in style.widths.iter().enumerate() {
        let lines = cells
            .get(idx)
            .map(|text| wrap_text(text, width - 2.0 * CELL_PADDING, CELL_SIZE))
            .unwrap_or_default();
        layouts.push(CellLayout {
            x,
            width: *width,
            lines,
            filled,
        });
        x += width;
    }
    let max_lines = layouts.iter().map(|c| c.lines.len()).max().unwrap_or(1).max(1);
    RowLayout {
        height: ROW_HEIGHT + (max_lines - 1) as f32 * line_height(CELL_SIZE),
        cells: layouts,
    }
}

/// Render the report into complete PDF bytes.
pub fn render_pdf(document: &ReportDocument) -> Result<Vec<u8>> {
    let canvas = draw(document)?;
    let (pages, rows, header_rows) = (canvas.pages, canvas.rows, canvas.header_rows);
    let bytes = canvas.finish()?;
    tracing::info!(
        sections = document.sections.len(),
        pages,
        rows,
        header_rows,
        bytes = bytes.len(),
        "rendered report"
    );
    Ok(bytes)
}

fn draw(document: &ReportDocument) -> Result<Canvas> {
    let mut canvas = Canvas::new(&document.title)?;

    canvas.heading(&document.title, TITLE_SIZE, 12.0);
    canvas.heading(&document.summary.heading, HEADING_SIZE, 8.0);

    let summary_style = TableStyle {
        widths: &SUMMARY_WIDTHS,
        grid: black(),
    };
    let summary_rows: Vec<(Vec<String>, RowStyle)> = document
        .summary
        .rows
        .iter()
        .map(|row| (row.cells().to_vec(), RowStyle::Body))
        .collect();
    canvas.table(&summary_style, &document.summary.header, &summary_rows);

    if document.is_empty() {
        canvas.paragraph("No claims in progress.", CELL_SIZE);
    }
    canvas.space(7.0);

    let detail_style = TableStyle {
        widths: &DETAIL_WIDTHS,
        grid: grid_grey(),
    };
    for section in &document.sections {
        // keep a heading together with the header and first row of its table
        canvas.ensure_space(8.0 + 2.0 * ROW_HEIGHT);
        canvas.heading(&section.doctor, SECTION_SIZE, 8.0);
        let rows: Vec<(Vec<String>, RowStyle)> =
            section.rows.iter().map(detail_cells).collect();
        canvas.table(&detail_style, &section.header, &rows);
        canvas.space(7.0);
    }
    Ok(canvas)
}

fn detail_cells(row: &DetailRow) -> (Vec<String>, RowStyle) {
    if row.overdue {
        (
            vec![
                row.claim_id.clone(),
                format!("{}{OVERDUE_MARKER}", row.days_since_updated),
            ],
            RowStyle::Overdue,
        )
    } else {
        (
            vec![row.claim_id.clone(), row.days_since_updated.to_string()],
            RowStyle::Body,
        )
    }
}

struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Top of the free space on the current page, in mm from the bottom edge.
    y: f32,
    pages: usize,
    rows: usize,
    header_rows: usize,
}

impl Canvas {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Page 1");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Render(format!("PDF font error: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Render(format!("PDF font error: {e}")))?;
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
            rows: 0,
            header_rows: 0,
        })
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Start a new page unless `height` mm still fit above the bottom margin.
    fn ensure_space(&mut self, height: f32) -> bool {
        if self.y - height < MARGIN {
            self.new_page();
            true
        } else {
            false
        }
    }

    fn space(&mut self, height: f32) {
        self.y -= height;
    }

    fn heading(&mut self, text: &str, size: f32, advance: f32) {
        let lines = wrap_text(text, PAGE_WIDTH - 2.0 * MARGIN, size);
        let extra = (lines.len().max(1) - 1) as f32 * line_height(size);
        self.ensure_space(advance + extra);
        self.layer.set_fill_color(black());
        let mut baseline = self.y - size * PT_TO_MM;
        for line in lines {
            self.layer
                .use_text(line, size, Mm(MARGIN), Mm(baseline), &self.bold);
            baseline -= line_height(size);
        }
        self.y -= advance + extra;
    }

    fn paragraph(&mut self, text: &str, size: f32) {
        self.ensure_space(ROW_HEIGHT);
        let baseline = self.y - size * PT_TO_MM - 1.0;
        self.layer.set_fill_color(black());
        self.layer
            .use_text(pdf_safe(text), size, Mm(MARGIN), Mm(baseline), &self.regular);
        self.y -= ROW_HEIGHT;
    }

    fn table(
        &mut self,
        style: &TableStyle<'_>,
        header: &[String],
        rows: &[(Vec<String>, RowStyle)],
    ) {
        let header_layout = layout_row(style, header, RowStyle::Header);
        self.ensure_space(header_layout.height + ROW_HEIGHT);
        self.row(style, &header_layout, RowStyle::Header);
        for (cells, row_style) in rows {
            let layout = layout_row(style, cells, *row_style);
            if self.ensure_space(layout.height) {
                self.row(style, &header_layout, RowStyle::Header);
            }
            self.row(style, &layout, *row_style);
        }
    }

    /// Draw one laid-out row; the fill covers every cell of the row.
    fn row(&mut self, style: &TableStyle<'_>, layout: &RowLayout, row_style: RowStyle) {
        let top = self.y;
        let bottom = top - layout.height;
        let fill = row_style.fill();
        let font = if row_style == RowStyle::Header {
            &self.bold
        } else {
            &self.regular
        };

        self.layer.set_outline_color(style.grid.clone());
        self.layer.set_outline_thickness(0.5);

        for cell in &layout.cells {
            let rect = Rect::new(Mm(cell.x), Mm(bottom), Mm(cell.x + cell.width), Mm(top));
            match &fill {
                Some(color) if cell.filled => {
                    self.layer.set_fill_color(color.clone());
                    self.layer.add_rect(rect.with_mode(PaintMode::FillStroke));
                }
                _ => self.layer.add_rect(rect.with_mode(PaintMode::Stroke)),
            }

            self.layer.set_fill_color(black());
            let mut baseline = top - BASELINE_OFFSET;
            for line in &cell.lines {
                self.layer.use_text(
                    line.as_str(),
                    CELL_SIZE,
                    Mm(cell.x + CELL_PADDING),
                    Mm(baseline),
                    font,
                );
                baseline -= line_height(CELL_SIZE);
            }
        }

        self.rows += 1;
        if row_style == RowStyle::Header {
            self.header_rows += 1;
        }
        self.y = bottom;
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| ReportError::Render(format!("PDF save error: {e}")))?;
        buf.into_inner()
            .map_err(|e| ReportError::Render(format!("PDF buffer error: {e}")))
    }
}

/// Replace anything the built-in fonts cannot encode.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// Split `text` into lines no wider than `width` mm, breaking at spaces where
/// possible and inside long words otherwise. No characters are dropped.
fn wrap_text(text: &str, width: f32, size: f32) -> Vec<String> {
    // upper bound for Helvetica digits and capitals
    let max_chars = (width / (0.6 * size * PT_TO_MM)).floor().max(1.0) as usize;
    let mut remaining: Vec<char> = pdf_safe(text).chars().collect();
    let mut lines = Vec::new();

    while remaining.len() > max_chars {
        let split = remaining[..=max_chars]
            .iter()
            .rposition(|c| *c == ' ')
            .filter(|&pos| pos > 0)
            .unwrap_or(max_chars);
        let line: String = remaining[..split].iter().collect();
        lines.push(line.trim_end().to_string());
        remaining.drain(..split);
        while remaining.first() == Some(&' ') {
            remaining.remove(0);
        }
    }
    if !remaining.is_empty() || lines.is_empty() {
        lines.push(remaining.into_iter().collect());
    }
    lines
}
