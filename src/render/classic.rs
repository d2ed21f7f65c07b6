//! Letterhead header, metadata on the right, bordered item grid and a
//! right-aligned totals block.

use super::document::Element;
use super::theme::Palette;
use super::{
    address_line, cell, contact_line, gstin_line, grand_total_row, money, muted, page, small_muted,
    total_row, ITEM_CLASS,
};
use crate::invoice::{format_rate, InvoiceData, LineItem};

const GRID_BORDER: &str = "1px solid #d1d5db";

pub(super) fn render(data: &InvoiceData, palette: &Palette) -> Element {
    page()
        .child(letterhead(data, palette))
        .child(parties(data))
        .child(item_table(data, palette))
        .child(totals(data))
}

fn letterhead(data: &InvoiceData, palette: &Palette) -> Element {
    Element::new("div")
        .style("border-bottom", format!("2px solid {}", palette.primary.hex()))
        .style("padding-bottom", "1rem")
        .style("margin-bottom", "1.5rem")
        .child(
            Element::new("h1")
                .style("font-size", "1.5rem")
                .style("font-weight", "bold")
                .text(&data.shop().name),
        )
        .child(muted("p", &data.shop().address))
        .child_opt(gstin_line(data))
}

fn parties(data: &InvoiceData) -> Element {
    let bill_to = Element::new("div")
        .child(
            Element::new("h2")
                .style("font-size", "1.125rem")
                .style("font-weight", "600")
                .text("Bill To:"),
        )
        .child(
            Element::new("p")
                .style("font-weight", "500")
                .text(&data.customer().name),
        )
        .child_opt(contact_line(data))
        .child_opt(address_line(data));

    let meta = Element::new("div")
        .style("text-align", "right")
        .child(meta_line("Invoice #: ", data.invoice_number()))
        .child(meta_line("Date: ", data.date()));

    Element::new("div")
        .style("display", "flex")
        .style("justify-content", "space-between")
        .style("align-items", "flex-start")
        .style("margin-bottom", "1.5rem")
        .child(bill_to)
        .child(meta)
}

fn meta_line(label: &str, value: &str) -> Element {
    small_muted(label).child(
        Element::new("span")
            .style("font-weight", "500")
            .style("color", "#111827")
            .text(value),
    )
}

fn item_table(data: &InvoiceData, palette: &Palette) -> Element {
    let headers = [
        ("Item", "left"),
        ("Qty", "right"),
        ("Price", "right"),
        ("GST%", "right"),
        ("Amount", "right"),
    ];
    let head_row = Element::new("tr")
        .style("background-color", palette.primary.hex())
        .children(headers.iter().map(|&(label, align)| {
            cell("th", align)
                .style("border", GRID_BORDER)
                .style("color", "#ffffff")
                .text(label)
        }));

    Element::new("table")
        .style("width", "100%")
        .style("border-collapse", "collapse")
        .style("border", GRID_BORDER)
        .child(Element::new("thead").child(head_row))
        .child(Element::new("tbody").children(data.items().iter().map(item_row)))
}

fn item_row(item: &LineItem) -> Element {
    let bordered = |align: &'static str| cell("td", align).style("border", GRID_BORDER);
    Element::new("tr")
        .class(ITEM_CLASS)
        .child(bordered("left").text(item.name()))
        .child(bordered("right").text(item.quantity().to_string()))
        .child(bordered("right").text(money(item.price())))
        .child(bordered("right").text(format!("{}%", format_rate(item.gst_rate()))))
        .child(bordered("right").text(money(item.total())))
}

fn totals(data: &InvoiceData) -> Element {
    let t = data.totals();
    let block = Element::new("div")
        .style("width", "16rem")
        .child(total_row("Subtotal:", t.subtotal))
        .child(total_row("Total GST:", t.total_tax))
        .child(
            Element::new("div")
                .style("border-top", "1px solid #d1d5db")
                .style("margin-top", "0.5rem")
                .style("padding-top", "0.5rem")
                .child(grand_total_row(data, None, "1.125rem")),
        );

    Element::new("div")
        .style("margin-top", "1.5rem")
        .style("display", "flex")
        .style("justify-content", "flex-end")
        .child(block)
}
