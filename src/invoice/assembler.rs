use chrono::{Datelike, Local, NaiveDate};
use rand::Rng;
use serde::Serialize;

use super::item::{CustomerDetails, LineItem, ShopDetails};
use super::tax::{aggregate, InvoiceTotals};

pub const PLACEHOLDER_SHOP_NAME: &str = "Your Shop Name";
pub const PLACEHOLDER_SHOP_ADDRESS: &str = "Your Shop Address";
pub const PLACEHOLDER_CUSTOMER_NAME: &str = "Customer Name";

/// Immutable snapshot handed to the renderers and exporters.
///
/// Built fresh for every render or export request; nothing mutates it after
/// `assemble` returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceData {
    shop: ShopDetails,
    customer: CustomerDetails,
    items: Vec<LineItem>,
    totals: InvoiceTotals,
    invoice_number: String,
    date: String,
}

impl InvoiceData {
    pub fn shop(&self) -> &ShopDetails {
        &self.shop
    }

    pub fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    /// Billable items only, in entry order
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn totals(&self) -> &InvoiceTotals {
        &self.totals
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Build an invoice snapshot stamped with today's date and a random suffix.
pub fn assemble(shop: &ShopDetails, customer: &CustomerDetails, items: &[LineItem]) -> InvoiceData {
    let today = Local::now().date_naive();
    assemble_at(shop, customer, items, today, &mut rand::thread_rng())
}

pub fn assemble_at<R: Rng + ?Sized>(
    shop: &ShopDetails,
    customer: &CustomerDetails,
    items: &[LineItem],
    date: NaiveDate,
    rng: &mut R,
) -> InvoiceData {
    let billable: Vec<LineItem> = items.iter().filter(|i| i.is_billable()).cloned().collect();
    let totals = aggregate(&billable);
    let suffix: u16 = rng.gen_range(0..1000);
    let invoice_number = invoice_number(date, suffix);

    tracing::debug!(
        invoice = %invoice_number,
        items = billable.len(),
        skipped = items.len() - billable.len(),
        "assembled invoice"
    );

    InvoiceData {
        shop: ShopDetails {
            name: or_placeholder(&shop.name, PLACEHOLDER_SHOP_NAME),
            address: or_placeholder(&shop.address, PLACEHOLDER_SHOP_ADDRESS),
            gstin: shop.gstin.clone(),
        },
        customer: CustomerDetails {
            name: or_placeholder(&customer.name, PLACEHOLDER_CUSTOMER_NAME),
            contact: customer.contact.clone(),
            address: customer.address.clone(),
        },
        items: billable,
        totals,
        invoice_number,
        date: format_indian_date(date),
    }
}

/// `INV` + yymmdd + three-digit suffix.
///
/// Not collision resistant: two bills on the same day share a 1 in 1000
/// chance of the same number.
pub fn invoice_number(date: NaiveDate, suffix: u16) -> String {
    format!(
        "INV{:02}{:02}{:02}{:03}",
        date.year().rem_euclid(100),
        date.month(),
        date.day(),
        suffix % 1000
    )
}

/// Day/month/year without zero padding, as the en-IN locale prints it.
pub fn format_indian_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::item::ItemId;
    use rand::rngs::mock::StepRng;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()
    }

    #[test]
    fn test_placeholders_for_blank_names() {
        let shop = ShopDetails::new("", "12 MG Road, Pune", "");
        let customer = CustomerDetails::default();
        let items = vec![LineItem::new(ItemId(1), "Soap", 2, 50.0, 18.0)];

        let data = assemble_at(&shop, &customer, &items, date(), &mut StepRng::new(0, 1));

        assert_eq!(data.shop().name, "Your Shop Name");
        assert_eq!(data.shop().address, "12 MG Road, Pune");
        assert_eq!(data.shop().gstin, "");
        assert_eq!(data.customer().name, "Customer Name");
        assert_eq!(data.customer().contact, "");
    }

    #[test]
    fn test_blank_address_gets_placeholder() {
        let shop = ShopDetails::new("Sharma Stores", "  ", "");
        let data = assemble_at(&shop, &CustomerDetails::default(), &[], date(), &mut StepRng::new(0, 1));
        assert_eq!(data.shop().name, "Sharma Stores");
        assert_eq!(data.shop().address, "Your Shop Address");
    }

    #[test]
    fn test_only_billable_items_are_kept() {
        let items = vec![
            LineItem::new(ItemId(1), "Soap", 2, 50.0, 18.0),
            LineItem::new(ItemId(2), "", 2, 50.0, 18.0),
            LineItem::new(ItemId(3), "Rice", 1, 200.0, 5.0),
        ];
        let data = assemble_at(
            &ShopDetails::default(),
            &CustomerDetails::default(),
            &items,
            date(),
            &mut StepRng::new(0, 1),
        );

        let ids: Vec<ItemId> = data.items().iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec![ItemId(1), ItemId(3)]);
        assert_eq!(data.totals().grand_total, 118.0 + 210.0);
    }

    #[test]
    fn test_invoice_number_format() {
        assert_eq!(invoice_number(date(), 7), "INV260305007");
        assert_eq!(invoice_number(date(), 999), "INV260305999");
    }

    #[test]
    fn test_assembled_number_shape() {
        let data = assemble(&ShopDetails::default(), &CustomerDetails::default(), &[]);
        let number = data.invoice_number();
        assert!(number.starts_with("INV"));
        assert_eq!(number.len(), 12);
        assert!(number[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_indian_date_format() {
        assert_eq!(format_indian_date(date()), "5/3/2026");
        let later = NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
        assert_eq!(format_indian_date(later), "25/12/2026");
    }
}
