//! Gradient banner, two info cards, one card per item and a shaded totals
//! panel with the grand total in the theme colour.

use super::document::Element;
use super::theme::Palette;
use super::{
    address_line, contact_line, grand_total_row, money, page, small_muted, total_row, ITEM_CLASS,
};
use crate::invoice::{format_rate, InvoiceData, LineItem};

const CARD_BACKGROUND: &str = "#f9fafb";

pub(super) fn render(data: &InvoiceData, palette: &Palette) -> Element {
    page()
        .child(banner(data, palette))
        .child(info_cards(data))
        .child(
            Element::new("div")
                .style("display", "flex")
                .style("flex-direction", "column")
                .style("gap", "0.5rem")
                .children(data.items().iter().map(item_card)),
        )
        .child(totals_panel(data, palette))
}

fn card() -> Element {
    Element::new("div")
        .style("background", CARD_BACKGROUND)
        .style("border-radius", "0.5rem")
        .style("padding", "1rem")
}

fn banner(data: &InvoiceData, palette: &Palette) -> Element {
    let gradient = format!(
        "linear-gradient(135deg, {} 0%, {} 100%)",
        palette.primary.hex(),
        palette.secondary.hex()
    );
    let gstin = &data.shop().gstin;

    Element::new("div")
        .style("background", gradient)
        .style("border-radius", "0.5rem")
        .style("padding", "1.5rem")
        .style("margin-bottom", "1.5rem")
        .style("color", "#ffffff")
        .child(
            Element::new("h1")
                .style("font-size", "1.875rem")
                .style("font-weight", "bold")
                .style("margin-bottom", "0.5rem")
                .text(&data.shop().name),
        )
        .child(
            Element::new("p")
                .style("opacity", "0.9")
                .text(&data.shop().address),
        )
        .child_opt((!gstin.is_empty()).then(|| {
            Element::new("p")
                .style("font-size", "0.875rem")
                .style("opacity", "0.75")
                .style("margin-top", "0.25rem")
                .text(format!("GSTIN: {}", gstin))
        }))
}

fn card_title(text: &str) -> Element {
    Element::new("h3")
        .style("font-weight", "600")
        .style("margin-bottom", "0.5rem")
        .text(text)
}

fn info_cards(data: &InvoiceData) -> Element {
    let bill_to = card()
        .child(card_title("Bill To"))
        .child(
            Element::new("p")
                .style("font-weight", "500")
                .text(&data.customer().name),
        )
        .child_opt(contact_line(data))
        .child_opt(address_line(data));

    let details = card()
        .style("text-align", "right")
        .child(card_title("Invoice Details"))
        .child(labelled("Invoice #: ", data.invoice_number()))
        .child(labelled("Date: ", data.date()));

    Element::new("div")
        .style("display", "grid")
        .style("grid-template-columns", "1fr 1fr")
        .style("gap", "1.5rem")
        .style("margin-bottom", "1.5rem")
        .child(bill_to)
        .child(details)
}

fn labelled(label: &str, value: &str) -> Element {
    Element::new("p")
        .style("font-size", "0.875rem")
        .text(label)
        .child(Element::new("span").style("font-weight", "500").text(value))
}

fn item_card(item: &LineItem) -> Element {
    let detail = format!(
        "{} \u{d7} {} ({}% GST)",
        item.quantity(),
        money(item.price()),
        format_rate(item.gst_rate())
    );

    card()
        .class(ITEM_CLASS)
        .style("display", "flex")
        .style("align-items", "center")
        .style("justify-content", "space-between")
        .child(
            Element::new("div")
                .style("flex", "1")
                .child(Element::new("p").style("font-weight", "500").text(item.name()))
                .child(small_muted(detail)),
        )
        .child(
            Element::new("div").style("text-align", "right").child(
                Element::new("p")
                    .style("font-weight", "bold")
                    .text(money(item.total())),
            ),
        )
}

fn totals_panel(data: &InvoiceData, palette: &Palette) -> Element {
    let t = data.totals();
    Element::new("div")
        .style("margin-top", "1.5rem")
        .style("background", "#f3f4f6")
        .style("border-radius", "0.5rem")
        .style("padding", "1rem")
        .child(total_row("Subtotal:", t.subtotal))
        .child(total_row("Total GST:", t.total_tax))
        .child(
            Element::new("div")
                .style("border-top", "1px solid #d1d5db")
                .style("padding-top", "0.5rem")
                .child(grand_total_row(data, Some(palette.primary), "1.25rem")),
        )
}
