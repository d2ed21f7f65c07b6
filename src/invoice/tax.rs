use serde::Serialize;

use super::item::LineItem;

/// GST slabs offered when entering an item. Any non-negative rate is accepted
/// by the data model.
pub const GST_RATES: [f64; 5] = [0.0, 5.0, 12.0, 18.0, 28.0];

/// Derived monetary figures for one line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineAmounts {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
}

/// Aggregate figures over the billable items of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub total_tax: f64,
    pub grand_total: f64,
}

/// Totals plus the counts shown next to the item editor
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ItemSummary {
    pub billable_items: usize,
    pub total_quantity: u64,
    pub totals: InvoiceTotals,
}

/// Compute subtotal, tax and total for a single line.
///
/// Inputs are trusted: callers clamp quantity and price before getting here.
/// No rounding is applied; amounts are rounded only when formatted.
pub fn compute_line(quantity: u32, price: f64, rate: f64) -> LineAmounts {
    let subtotal = f64::from(quantity) * price;
    let tax_amount = subtotal * rate / 100.0;
    LineAmounts {
        subtotal,
        tax_amount,
        total: subtotal + tax_amount,
    }
}

/// Sum the billable items in list order.
pub fn aggregate<'a, I>(items: I) -> InvoiceTotals
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let mut subtotal = 0.0;
    let mut total_tax = 0.0;

    for item in items.into_iter().filter(|i| i.is_billable()) {
        subtotal += item.subtotal();
        total_tax += item.tax_amount();
    }

    InvoiceTotals {
        subtotal,
        total_tax,
        grand_total: subtotal + total_tax,
    }
}

pub fn summarize(items: &[LineItem]) -> ItemSummary {
    let billable = items.iter().filter(|i| i.is_billable());
    let (count, quantity) = billable.fold((0usize, 0u64), |(n, q), item| {
        (n + 1, q + u64::from(item.quantity()))
    });

    ItemSummary {
        billable_items: count,
        total_quantity: quantity,
        totals: aggregate(items),
    }
}

/// Two-decimal rendering of an amount
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn format_money(symbol: &str, value: f64) -> String {
    format!("{}{}", symbol, format_amount(value))
}

/// Render a rate without a trailing ".0" for whole percentages.
pub fn format_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{}", rate as i64)
    } else {
        format!("{}", rate)
    }
}
