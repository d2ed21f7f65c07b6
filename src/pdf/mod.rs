mod layout;
mod metrics;
mod writer;

pub use layout::{lay_out, DrawOp, LaidOutDocument, Page};
pub use metrics::{text_width, wrap_text};
pub use writer::write_pdf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BillError, Result};
use crate::invoice::InvoiceData;
use crate::render::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    A5,
    Letter,
}

impl PaperSize {
    /// Portrait (width, height) in millimetres
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontScale {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontScale {
    pub fn factor(self) -> f32 {
        match self {
            FontScale::Small => 0.8,
            FontScale::Medium => 1.0,
            FontScale::Large => 1.2,
        }
    }
}

/// Paper profile for PDF export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PdfOptions {
    #[serde(default)]
    pub paper_size: PaperSize,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub font_size: FontScale,
}

impl PdfOptions {
    /// Page (width, height) in millimetres after applying orientation
    pub fn page_size(&self) -> (f32, f32) {
        let (w, h) = self.paper_size.dimensions();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

macro_rules! option_from_str {
    ($ty:ty, $option:literal, $expected:literal, { $($name:literal => $value:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = BillError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($value),)+
                    _ => Err(BillError::InvalidOption {
                        option: $option,
                        value: s.to_string(),
                        expected: $expected,
                    }),
                }
            }
        }
    };
}

option_from_str!(PaperSize, "paper size", "a4, a5, letter", {
    "a4" => PaperSize::A4,
    "a5" => PaperSize::A5,
    "letter" => PaperSize::Letter,
});

option_from_str!(Orientation, "orientation", "portrait, landscape", {
    "portrait" => Orientation::Portrait,
    "landscape" => Orientation::Landscape,
});

option_from_str!(FontScale, "font size", "small, medium, large", {
    "small" => FontScale::Small,
    "medium" => FontScale::Medium,
    "large" => FontScale::Large,
});

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaperSize::A4 => "a4",
            PaperSize::A5 => "a5",
            PaperSize::Letter => "letter",
        })
    }
}

/// A finished PDF ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct PdfFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// `Invoice_<number>_<UTC timestamp with colons replaced>.pdf`
pub fn pdf_filename(invoice_number: &str, at: DateTime<Utc>) -> String {
    format!(
        "Invoice_{}_{}.pdf",
        invoice_number,
        at.format("%Y-%m-%dT%H-%M-%S")
    )
}

/// Lay out and serialize an invoice. Nothing is returned unless the whole
/// document was written successfully.
pub fn export_pdf(
    data: &InvoiceData,
    theme: Theme,
    options: &PdfOptions,
    at: DateTime<Utc>,
) -> Result<PdfFile> {
    if !data.has_items() {
        return Err(BillError::NoBillableItems);
    }

    let document = lay_out(data, theme, options);
    let bytes = write_pdf(&document)?;

    tracing::info!(
        invoice = data.invoice_number(),
        pages = document.pages.len(),
        paper = %options.paper_size,
        bytes = bytes.len(),
        "generated pdf"
    );

    Ok(PdfFile {
        filename: pdf_filename(data.invoice_number(), at),
        bytes,
    })
}
