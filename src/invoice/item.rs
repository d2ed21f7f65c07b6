use serde::{Deserialize, Serialize};

use super::tax::{compute_line, LineAmounts};

/// Opaque identity of a line item within an editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

/// Hands out increasing item ids for one session
#[derive(Debug, Default)]
pub struct ItemIdAllocator {
    next: u64,
}

impl ItemIdAllocator {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub fn next_id(&mut self) -> ItemId {
        let id = ItemId(self.next);
        self.next += 1;
        id
    }
}

/// A line on the bill.
///
/// Subtotal, tax amount and total are derived from quantity, price and GST
/// rate. They are only ever written together through `recompute`, so the
/// setters below are the only way to change their inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    id: ItemId,
    name: String,
    quantity: u32,
    price: f64,
    gst_rate: f64,
    subtotal: f64,
    tax_amount: f64,
    total: f64,
}

impl LineItem {
    pub fn new(id: ItemId, name: impl Into<String>, quantity: u32, price: f64, gst_rate: f64) -> Self {
        let mut item = Self {
            id,
            name: name.into(),
            quantity,
            price: clamp_non_negative(price),
            gst_rate: clamp_non_negative(gst_rate),
            subtotal: 0.0,
            tax_amount: 0.0,
            total: 0.0,
        };
        item.recompute();
        item
    }

    /// A fresh, empty row the way an editor seeds it: one unit at 18% GST.
    pub fn blank(id: ItemId) -> Self {
        Self::new(id, "", 1, 0.0, 18.0)
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn gst_rate(&self) -> f64 {
        self.gst_rate
    }

    pub fn subtotal(&self) -> f64 {
        self.subtotal
    }

    pub fn tax_amount(&self) -> f64 {
        self.tax_amount
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn amounts(&self) -> LineAmounts {
        LineAmounts {
            subtotal: self.subtotal,
            tax_amount: self.tax_amount,
            total: self.total,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.recompute();
    }

    pub fn set_price(&mut self, price: f64) {
        self.price = clamp_non_negative(price);
        self.recompute();
    }

    pub fn set_gst_rate(&mut self, rate: f64) {
        self.gst_rate = clamp_non_negative(rate);
        self.recompute();
    }

    /// Billable items have a name, a positive quantity and a positive price.
    /// A line whose total overflows is never billable.
    pub fn is_billable(&self) -> bool {
        !self.name.trim().is_empty()
            && self.quantity > 0
            && self.price > 0.0
            && self.total.is_finite()
    }

    fn recompute(&mut self) {
        let amounts = compute_line(self.quantity, self.price, self.gst_rate);
        self.subtotal = amounts.subtotal;
        self.tax_amount = amounts.tax_amount;
        self.total = amounts.total;
    }
}

/// Negative and non-finite inputs become zero.
fn clamp_non_negative(value: f64) -> f64 {
    if !value.is_finite() || value < 0.0 {
        0.0
    } else {
        value
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopDetails {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub gstin: String,
}

impl ShopDetails {
    pub fn new(name: impl Into<String>, address: impl Into<String>, gstin: &str) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            gstin: normalize_gstin(gstin),
        }
    }

    pub fn set_gstin(&mut self, gstin: &str) {
        self.gstin = normalize_gstin(gstin);
    }
}

/// GSTINs are stored upper-cased, exactly as typed otherwise.
pub fn normalize_gstin(gstin: &str) -> String {
    gstin.to_uppercase()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub address: String,
}
