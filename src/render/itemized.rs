//! One expanded card per item with its subtotal/GST/total breakdown, and an
//! aggregate panel tinted with the theme colour.

use super::document::Element;
use super::theme::Palette;
use super::{grand_total_row, money, muted, page, small_muted, total_row, ITEM_CLASS};
use crate::invoice::{format_rate, InvoiceData, LineItem};

const PANEL_TINT: f32 = 0.08;

pub(super) fn render(data: &InvoiceData, palette: &Palette) -> Element {
    page()
        .child(header(data, palette))
        .child(customer(data))
        .child(
            Element::new("div")
                .style("display", "flex")
                .style("flex-direction", "column")
                .style("gap", "1rem")
                .child(
                    Element::new("h3")
                        .style("font-weight", "600")
                        .style("font-size", "1.125rem")
                        .text("Items"),
                )
                .children(
                    data.items()
                        .iter()
                        .enumerate()
                        .map(|(index, item)| item_card(index, item)),
                ),
        )
        .child(aggregate_panel(data, palette))
}

fn header(data: &InvoiceData, palette: &Palette) -> Element {
    let shop = data.shop();
    let left = Element::new("div")
        .child(
            Element::new("h1")
                .style("font-size", "1.5rem")
                .style("font-weight", "bold")
                .style("color", palette.primary.hex())
                .text(&shop.name),
        )
        .child(muted("p", &shop.address))
        .child_opt(
            (!shop.gstin.is_empty()).then(|| small_muted(format!("GSTIN: {}", shop.gstin))),
        );

    let right = Element::new("div")
        .style("text-align", "right")
        .child(
            Element::new("h2")
                .style("font-size", "1.25rem")
                .style("font-weight", "bold")
                .text("INVOICE"),
        )
        .child(small_muted(format!("#{}", data.invoice_number())))
        .child(small_muted(data.date()));

    Element::new("div")
        .style("display", "flex")
        .style("justify-content", "space-between")
        .style("align-items", "flex-start")
        .style("margin-bottom", "1.5rem")
        .child(left)
        .child(right)
}

fn customer(data: &InvoiceData) -> Element {
    let c = data.customer();
    Element::new("div")
        .style("margin-bottom", "1.5rem")
        .style("padding", "1rem")
        .style("background", "#f9fafb")
        .style("border-radius", "0.25rem")
        .child(
            Element::new("h3")
                .style("font-weight", "600")
                .style("margin-bottom", "0.5rem")
                .text("Customer Information"),
        )
        .child(Element::new("p").text(&c.name))
        .child_opt((!c.contact.is_empty()).then(|| Element::new("p").text(&c.contact)))
        .child_opt((!c.address.is_empty()).then(|| Element::new("p").text(&c.address)))
}

fn item_card(index: usize, item: &LineItem) -> Element {
    let title = Element::new("div")
        .style("display", "flex")
        .style("justify-content", "space-between")
        .style("align-items", "flex-start")
        .style("margin-bottom", "0.5rem")
        .child(
            Element::new("h4")
                .style("font-weight", "500")
                .text(format!("{}. {}", index + 1, item.name())),
        )
        .child(
            Element::new("span")
                .style("font-weight", "bold")
                .style("font-size", "1.125rem")
                .text(money(item.total())),
        );

    let figures = Element::new("div")
        .style("display", "grid")
        .style("grid-template-columns", "1fr 1fr")
        .style("gap", "1rem")
        .style("font-size", "0.875rem")
        .style("color", "#4b5563")
        .child(
            Element::new("div")
                .child(Element::new("p").text(format!("Quantity: {}", item.quantity())))
                .child(Element::new("p").text(format!("Unit Price: {}", money(item.price())))),
        )
        .child(
            Element::new("div")
                .style("text-align", "right")
                .child(
                    Element::new("p").text(format!("GST Rate: {}%", format_rate(item.gst_rate()))),
                )
                .child(
                    Element::new("p").text(format!("GST Amount: {}", money(item.tax_amount()))),
                ),
        );

    let breakdown = Element::new("div")
        .style("margin-top", "0.5rem")
        .style("padding-top", "0.5rem")
        .style("border-top", "1px solid #f3f4f6")
        .child(Element::new("p").style("font-size", "0.875rem").text(format!(
            "Subtotal: {} + GST: {} = {}",
            money(item.subtotal()),
            money(item.tax_amount()),
            money(item.total())
        )));

    Element::new("div")
        .class(ITEM_CLASS)
        .style("border", "1px solid #e5e7eb")
        .style("border-radius", "0.5rem")
        .style("padding", "1rem")
        .child(title)
        .child(figures)
        .child(breakdown)
}

fn aggregate_panel(data: &InvoiceData, palette: &Palette) -> Element {
    let t = data.totals();
    Element::new("div")
        .style("margin-top", "1.5rem")
        .style("padding", "1rem")
        .style("border-radius", "0.5rem")
        .style("background-color", palette.primary.with_alpha(PANEL_TINT))
        .child(total_row("Total Amount (Before Tax):", t.subtotal))
        .child(total_row("Total GST:", t.total_tax))
        .child(
            Element::new("div")
                .style("border-top", "1px solid #d1d5db")
                .style("padding-top", "0.5rem")
                .child(grand_total_row(data, Some(palette.primary), "1.25rem")),
        )
}
