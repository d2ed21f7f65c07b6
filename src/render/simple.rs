//! Centered minimal header, one-line metadata, plain table and stacked
//! totals. Ignores the theme palette.

use super::document::Element;
use super::{cell, gstin_line, money, muted, page, GRAND_TOTAL_CLASS, ITEM_CLASS};
use crate::invoice::{format_rate, InvoiceData, LineItem};

pub(super) fn render(data: &InvoiceData) -> Element {
    page()
        .child(header(data))
        .child(
            Element::new("div")
                .style("text-align", "center")
                .style("margin-bottom", "1.5rem")
                .child(
                    Element::new("h2")
                        .style("font-size", "1.125rem")
                        .style("font-weight", "600")
                        .text("INVOICE"),
                )
                .child(Element::new("p").style("font-size", "0.875rem").text(format!(
                    "Invoice #: {} | Date: {}",
                    data.invoice_number(),
                    data.date()
                ))),
        )
        .child(customer(data))
        .child(item_table(data))
        .child(totals(data))
}

fn header(data: &InvoiceData) -> Element {
    Element::new("div")
        .style("text-align", "center")
        .style("border-bottom", "1px solid #e5e7eb")
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

fn field(label: &str, value: &str) -> Element {
    Element::new("p")
        .child(Element::new("strong").text(label))
        .text(format!(" {}", value))
}

fn customer(data: &InvoiceData) -> Element {
    let c = data.customer();
    Element::new("div")
        .style("margin-bottom", "1.5rem")
        .child(field("Customer:", &c.name))
        .child_opt((!c.contact.is_empty()).then(|| field("Contact:", &c.contact)))
        .child_opt((!c.address.is_empty()).then(|| field("Address:", &c.address)))
}

fn item_table(data: &InvoiceData) -> Element {
    let head = Element::new("tr")
        .style("border-bottom", "1px solid #d1d5db")
        .child(cell("th", "left").text("Item"))
        .child(cell("th", "right").text("Qty"))
        .child(cell("th", "right").text("Rate"))
        .child(cell("th", "right").text("GST"))
        .child(cell("th", "right").text("Amount"));

    Element::new("table")
        .style("width", "100%")
        .child(Element::new("thead").child(head))
        .child(Element::new("tbody").children(data.items().iter().map(item_row)))
}

fn item_row(item: &LineItem) -> Element {
    Element::new("tr")
        .class(ITEM_CLASS)
        .style("border-bottom", "1px solid #f3f4f6")
        .child(cell("td", "left").text(item.name()))
        .child(cell("td", "right").text(item.quantity().to_string()))
        .child(cell("td", "right").text(money(item.price())))
        .child(cell("td", "right").text(format!("{}%", format_rate(item.gst_rate()))))
        .child(cell("td", "right").text(money(item.total())))
}

fn totals(data: &InvoiceData) -> Element {
    let t = data.totals();
    Element::new("div")
        .style("margin-top", "1.5rem")
        .style("text-align", "right")
        .child(Element::new("p").text(format!("Subtotal: {}", money(t.subtotal))))
        .child(Element::new("p").text(format!("Total GST: {}", money(t.total_tax))))
        .child(
            Element::new("p")
                .style("font-size", "1.25rem")
                .style("font-weight", "bold")
                .style("border-top", "1px solid #d1d5db")
                .style("padding-top", "0.5rem")
                .text("Grand Total: ")
                .child(
                    Element::new("span")
                        .class(GRAND_TOTAL_CLASS)
                        .text(money(t.grand_total)),
                ),
        )
}
