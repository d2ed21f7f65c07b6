mod classic;
mod document;
mod itemized;
mod modern;
mod simple;
mod theme;

pub use document::{escape, Document, Element, Node};
pub use theme::{Palette, Rgb, Theme};

use serde::Serialize;
use std::fmt;

use crate::error::{BillError, Result};
use crate::invoice::{format_amount, InvoiceData};

pub const RUPEE: &str = "\u{20b9}";

/// Class carried by the container of every rendered line item
pub const ITEM_CLASS: &str = "line-item";
/// Class carried by the element holding the grand total amount
pub const GRAND_TOTAL_CLASS: &str = "grand-total";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateVariant {
    #[default]
    Classic,
    Modern,
    Simple,
    Itemized,
}

impl TemplateVariant {
    pub const ALL: [TemplateVariant; 4] = [
        TemplateVariant::Classic,
        TemplateVariant::Modern,
        TemplateVariant::Simple,
        TemplateVariant::Itemized,
    ];

    /// Resolve a template by name. Anything unrecognised renders as classic.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" => TemplateVariant::Classic,
            "modern" => TemplateVariant::Modern,
            "simple" => TemplateVariant::Simple,
            "itemized" => TemplateVariant::Itemized,
            other => {
                tracing::warn!(template = other, "unknown template, using classic");
                TemplateVariant::Classic
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TemplateVariant::Classic => "classic",
            TemplateVariant::Modern => "modern",
            TemplateVariant::Simple => "simple",
            TemplateVariant::Itemized => "itemized",
        }
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render an invoice snapshot with the chosen layout and theme.
///
/// Callers are expected to show an empty state instead of rendering when
/// there is nothing billable; doing it anyway is reported as an error.
pub fn render(data: &InvoiceData, variant: TemplateVariant, theme: Theme) -> Result<Document> {
    if !data.has_items() {
        return Err(BillError::NoBillableItems);
    }

    let palette = theme.palette();
    let root = match variant {
        TemplateVariant::Classic => classic::render(data, &palette),
        TemplateVariant::Modern => modern::render(data, &palette),
        TemplateVariant::Simple => simple::render(data),
        TemplateVariant::Itemized => itemized::render(data, &palette),
    };

    tracing::debug!(template = %variant, theme = %theme, "rendered invoice");

    Ok(Document {
        variant,
        theme,
        root: root.into(),
    })
}

fn money(value: f64) -> String {
    format!("{}{}", RUPEE, format_amount(value))
}

/// Outer page wrapper shared by all layouts
fn page() -> Element {
    Element::new("div")
        .class("invoice")
        .style("max-width", "42rem")
        .style("margin", "0 auto")
        .style("background", "#ffffff")
        .style("color", "#111827")
        .style("font-family", "Helvetica, Arial, sans-serif")
}

fn muted(tag: &'static str, text: impl Into<String>) -> Element {
    Element::new(tag).style("color", "#4b5563").text(text)
}

fn small_muted(text: impl Into<String>) -> Element {
    muted("p", text).style("font-size", "0.875rem")
}

fn gstin_line(data: &InvoiceData) -> Option<Element> {
    let gstin = &data.shop().gstin;
    (!gstin.is_empty()).then(|| {
        Element::new("p")
            .style("font-size", "0.875rem")
            .style("color", "#6b7280")
            .text(format!("GSTIN: {}", gstin))
    })
}

fn contact_line(data: &InvoiceData) -> Option<Element> {
    let contact = &data.customer().contact;
    (!contact.is_empty()).then(|| small_muted(contact.clone()))
}

fn address_line(data: &InvoiceData) -> Option<Element> {
    let address = &data.customer().address;
    (!address.is_empty()).then(|| small_muted(address.clone()))
}

/// Label/amount row used by the totals blocks
fn total_row(label: &str, amount: f64) -> Element {
    Element::new("div")
        .style("display", "flex")
        .style("justify-content", "space-between")
        .style("padding", "0.25rem 0")
        .child(Element::new("span").text(label))
        .child(Element::new("span").text(money(amount)))
}

fn grand_total_row(data: &InvoiceData, color: Option<Rgb>, size: &'static str) -> Element {
    let row = Element::new("div")
        .style("display", "flex")
        .style("justify-content", "space-between")
        .style("font-weight", "bold")
        .style("font-size", size);
    let row = match color {
        Some(color) => row.style("color", color.hex()),
        None => row,
    };
    row.child(Element::new("span").text("Grand Total:")).child(
        Element::new("span")
            .class(GRAND_TOTAL_CLASS)
            .text(money(data.totals().grand_total)),
    )
}

fn cell(tag: &'static str, align: &'static str) -> Element {
    Element::new(tag)
        .style("padding", "0.5rem 1rem")
        .style("text-align", align)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{assemble_at, CustomerDetails, ItemId, LineItem, ShopDetails};
    use chrono::NaiveDate;
    use rand::rngs::mock::StepRng;

    fn sample_invoice(items: &[LineItem]) -> InvoiceData {
        let shop = ShopDetails::new("Sharma General Store", "14 Station Road, Nagpur", "27abcde1234f1z5");
        let customer = CustomerDetails {
            name: "Anita Rao".to_string(),
            contact: "98200 12345".to_string(),
            address: String::new(),
        };
        let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        assemble_at(&shop, &customer, items, date, &mut StepRng::new(42, 0))
    }

    fn two_items() -> Vec<LineItem> {
        vec![
            LineItem::new(ItemId(1), "Soap", 2, 50.0, 18.0),
            LineItem::new(ItemId(2), "Basmati Rice 5kg", 1, 200.0, 5.0),
        ]
    }

    #[test]
    fn test_unknown_variant_falls_back_to_classic() {
        assert_eq!(TemplateVariant::from_name("fancy"), TemplateVariant::Classic);
        assert_eq!(TemplateVariant::from_name(""), TemplateVariant::Classic);
        assert_eq!(TemplateVariant::from_name("Itemized"), TemplateVariant::Itemized);
    }

    #[test]
    fn test_render_requires_items() {
        let data = sample_invoice(&[LineItem::blank(ItemId(1))]);
        assert!(matches!(
            render(&data, TemplateVariant::Classic, Theme::Blue),
            Err(BillError::NoBillableItems)
        ));
    }

    #[test]
    fn test_all_variants_agree_on_totals_and_items() {
        let data = sample_invoice(&two_items());
        for variant in TemplateVariant::ALL {
            let doc = render(&data, variant, Theme::Green).unwrap();
            assert_eq!(doc.elements_with_class(ITEM_CLASS).len(), 2, "{variant}");
            assert_eq!(doc.text_with_class(GRAND_TOTAL_CLASS), vec!["\u{20b9}328.00"], "{variant}");
            let text = doc.text_content();
            assert!(text.contains("Sharma General Store"), "{variant}");
            assert!(text.contains(data.invoice_number()), "{variant}");
        }
    }

    #[test]
    fn test_empty_optional_fields_are_omitted() {
        let data = sample_invoice(&two_items());
        for variant in TemplateVariant::ALL {
            let html = render(&data, variant, Theme::Blue).unwrap().to_html();
            assert!(html.contains("GSTIN: 27ABCDE1234F1Z5"));
            assert!(html.contains("98200 12345"));
            assert!(!html.contains("Address:"), "{variant}");
        }
    }

    #[test]
    fn test_theme_colour_reaches_markup() {
        let data = sample_invoice(&two_items());
        let html = render(&data, TemplateVariant::Classic, Theme::Purple).unwrap().to_html();
        assert!(html.contains("#7b1fa2"));
    }

    #[test]
    fn test_itemized_shows_breakdown() {
        let data = sample_invoice(&two_items());
        let text = render(&data, TemplateVariant::Itemized, Theme::Orange)
            .unwrap()
            .text_content();
        assert!(text.contains("Subtotal: \u{20b9}100.00 + GST: \u{20b9}18.00 = \u{20b9}118.00"));
        assert!(text.contains("GST Rate: 5%"));
    }
}
