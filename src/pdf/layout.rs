//! Single-pass page layout for the PDF export.
//!
//! Coordinates are millimetres from the top-left corner of the page; text
//! `y` is the baseline. The writer flips them into PDF space.

use super::metrics::{text_width, wrap_text};
use super::PdfOptions;
use crate::invoice::{format_amount, format_rate, InvoiceData, LineItem};
use crate::render::{Rgb, Theme};

const MARGIN: f32 = 15.0;
/// Rows start on a new page once the cursor passes `page_height - BOTTOM_RESERVE`.
const BOTTOM_RESERVE: f32 = 40.0;
const FOOTER_OFFSET: f32 = 15.0;
const HEADER_HEIGHT: f32 = 10.0;
const ROW_HEIGHT: f32 = 8.0;

/// Column starts as fractions of the content width: item, qty, rate, gst%, amount.
const COLUMNS: [f32; 5] = [0.0, 80.0 / 180.0, 100.0 / 180.0, 130.0 / 180.0, 150.0 / 180.0];

const DIVIDER: Rgb = Rgb::new(0xcc, 0xcc, 0xcc);
const ZEBRA: Rgb = Rgb::new(0xf9, 0xf9, 0xf9);
const TOTALS_FILL: Rgb = Rgb::new(0xf5, 0xf5, 0xf5);
const FOOTER_TEXT: Rgb = Rgb::new(0x66, 0x66, 0x66);

pub const CURRENCY: &str = "Rs. ";
pub const FOOTER_LEFT: &str = "Made with care for Indian shopkeepers";
pub const FOOTER_RIGHT: &str = "gstbill - Free GST Bill Generator";

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        color: Rgb,
        text: String,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDocument {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
}

/// Drawing cursor over the pages being built
struct Canvas {
    width: f32,
    height: f32,
    scale: f32,
    pages: Vec<Page>,
}

impl Canvas {
    fn current(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
    }

    /// Font sizes are given at medium scale and multiplied here.
    fn text(&mut self, x: f32, y: f32, size: f32, bold: bool, color: Rgb, text: impl Into<String>) {
        let size = size * self.scale;
        self.current().ops.push(DrawOp::Text {
            x,
            y,
            size,
            bold,
            color,
            text: text.into(),
        });
    }

    /// Text whose right edge sits at `right`
    fn text_right(&mut self, right: f32, y: f32, size: f32, color: Rgb, text: String) {
        let x = right - text_width(&text, size * self.scale);
        self.text(x, y, size, false, color, text);
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Rgb) {
        self.current().ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
        });
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Rgb) {
        self.current().ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        });
    }
}

fn money(value: f64) -> String {
    format!("{}{}", CURRENCY, format_amount(value))
}

/// Lay the invoice out top to bottom in one pass.
///
/// The table header is drawn once; rows that spill onto continuation pages
/// start at the top margin without a repeated header.
pub fn lay_out(data: &InvoiceData, theme: Theme, options: &PdfOptions) -> LaidOutDocument {
    let (width, height) = options.page_size();
    let primary = theme.palette().primary;
    let mut canvas = Canvas {
        width,
        height,
        scale: options.font_size.factor(),
        pages: vec![Page::default()],
    };
    let content_width = width - 2.0 * MARGIN;

    let mut y = draw_shop(&mut canvas, data, primary, content_width);
    draw_invoice_meta(&mut canvas, data, primary);

    y += 10.0;
    canvas.line(MARGIN, y, width - MARGIN, y, 0.5, DIVIDER);
    y += 8.0;

    y = draw_bill_to(&mut canvas, data, content_width, y);
    y += 8.0;

    let columns = column_starts(content_width);
    draw_table_header(&mut canvas, &columns, content_width, primary, y);
    y += HEADER_HEIGHT;

    for (index, item) in data.items().iter().enumerate() {
        if y > canvas.height - BOTTOM_RESERVE {
            canvas.new_page();
            y = MARGIN;
        }
        draw_item_row(&mut canvas, &columns, content_width, index, item, y);
        y += ROW_HEIGHT;
    }

    y += 5.0;
    draw_totals(&mut canvas, data, primary, y);
    draw_footer(&mut canvas);

    LaidOutDocument {
        title: format!("Invoice {}", data.invoice_number()),
        width,
        height,
        pages: canvas.pages,
    }
}

fn draw_shop(canvas: &mut Canvas, data: &InvoiceData, primary: Rgb, content_width: f32) -> f32 {
    let shop = data.shop();
    let mut y = MARGIN;

    canvas.text(MARGIN, y, 18.0, true, primary, &shop.name);
    y += 8.0;

    let size = 10.0 * canvas.scale;
    for line in wrap_text(&shop.address, content_width * 0.6, size) {
        canvas.text(MARGIN, y, 10.0, false, Rgb::BLACK, line);
        y += 4.0;
    }

    if !shop.gstin.is_empty() {
        canvas.text(MARGIN, y, 10.0, false, Rgb::BLACK, format!("GSTIN: {}", shop.gstin));
        y += 6.0;
    }
    y
}

/// Right-hand block at fixed offsets from the top margin
fn draw_invoice_meta(canvas: &mut Canvas, data: &InvoiceData, primary: Rgb) {
    let right = canvas.width - MARGIN;
    canvas.text(right - 30.0, MARGIN + 5.0, 14.0, true, primary, "INVOICE");
    canvas.text(
        right - 50.0,
        MARGIN + 12.0,
        9.0,
        false,
        Rgb::BLACK,
        format!("Invoice #: {}", data.invoice_number()),
    );
    canvas.text(
        right - 50.0,
        MARGIN + 18.0,
        9.0,
        false,
        Rgb::BLACK,
        format!("Date: {}", data.date()),
    );
}

fn draw_bill_to(canvas: &mut Canvas, data: &InvoiceData, content_width: f32, mut y: f32) -> f32 {
    let customer = data.customer();

    canvas.text(MARGIN, y, 11.0, true, Rgb::BLACK, "Bill To:");
    y += 6.0;
    canvas.text(MARGIN, y, 10.0, false, Rgb::BLACK, &customer.name);
    y += 5.0;

    if !customer.contact.is_empty() {
        canvas.text(MARGIN, y, 10.0, false, Rgb::BLACK, &customer.contact);
        y += 5.0;
    }

    if !customer.address.is_empty() {
        let size = 10.0 * canvas.scale;
        for line in wrap_text(&customer.address, content_width * 0.7, size) {
            canvas.text(MARGIN, y, 10.0, false, Rgb::BLACK, line);
            y += 4.0;
        }
    }
    y
}

fn column_starts(content_width: f32) -> [f32; 5] {
    COLUMNS.map(|fraction| MARGIN + fraction * content_width)
}

/// Right edge of column `i`
fn column_end(columns: &[f32; 5], content_width: f32, i: usize) -> f32 {
    columns.get(i + 1).copied().unwrap_or(MARGIN + content_width)
}

fn draw_table_header(canvas: &mut Canvas, columns: &[f32; 5], content_width: f32, primary: Rgb, y: f32) {
    canvas.rect(MARGIN, y - 2.0, content_width, HEADER_HEIGHT, primary);

    canvas.text(columns[0] + 2.0, y + 5.0, 9.0, true, Rgb::WHITE, "Item");
    for (i, label) in ["Qty", "Rate", "GST%", "Amount"].into_iter().enumerate() {
        let col = i + 1;
        let size = 9.0 * canvas.scale;
        let x = column_end(columns, content_width, col) - 2.0 - text_width(label, size);
        canvas.text(x, y + 5.0, 9.0, true, Rgb::WHITE, label);
    }
}

/// First wrapped line of the name, with `...` when it did not fit.
fn truncate_name(name: &str, width: f32, size: f32) -> String {
    let lines = wrap_text(name, width, size);
    if lines.len() > 1 {
        format!("{}...", lines[0])
    } else {
        lines.into_iter().next().unwrap_or_default()
    }
}

fn draw_item_row(
    canvas: &mut Canvas,
    columns: &[f32; 5],
    content_width: f32,
    index: usize,
    item: &LineItem,
    y: f32,
) {
    if index % 2 == 1 {
        canvas.rect(MARGIN, y - 2.0, content_width, ROW_HEIGHT, ZEBRA);
    }

    let size = 8.0 * canvas.scale;
    let name_width = columns[1] - columns[0] - 5.0;
    let name = truncate_name(item.name(), name_width, size);
    canvas.text(columns[0] + 2.0, y + 4.0, 8.0, false, Rgb::BLACK, name);

    let cells = [
        item.quantity().to_string(),
        money(item.price()),
        format!("{}%", format_rate(item.gst_rate())),
        money(item.total()),
    ];
    for (i, value) in cells.into_iter().enumerate() {
        let right = column_end(columns, content_width, i + 1) - 2.0;
        canvas.text_right(right, y + 4.0, 8.0, Rgb::BLACK, value);
    }
}

fn draw_totals(canvas: &mut Canvas, data: &InvoiceData, primary: Rgb, mut y: f32) {
    let totals = data.totals();
    let x = canvas.width - MARGIN - 60.0;

    canvas.rect(x - 5.0, y - 2.0, 65.0, 25.0, TOTALS_FILL);

    canvas.text(
        x,
        y + 4.0,
        9.0,
        false,
        Rgb::BLACK,
        format!("Subtotal: {}", money(totals.subtotal)),
    );
    y += 6.0;
    canvas.text(
        x,
        y + 4.0,
        9.0,
        false,
        Rgb::BLACK,
        format!("Total GST: {}", money(totals.total_tax)),
    );
    y += 8.0;
    canvas.text(
        x,
        y + 4.0,
        11.0,
        true,
        primary,
        format!("Grand Total: {}", money(totals.grand_total)),
    );
}

fn draw_footer(canvas: &mut Canvas) {
    let y = canvas.height - FOOTER_OFFSET;
    let right = canvas.width - MARGIN;
    canvas.text(MARGIN, y, 7.0, false, FOOTER_TEXT, FOOTER_LEFT);
    canvas.text_right(right, y, 7.0, FOOTER_TEXT, FOOTER_RIGHT.to_string());
}
