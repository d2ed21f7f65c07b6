use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::profile::ProfileStore;
use crate::error::{BillError, Result};
use crate::invoice::{CustomerDetails, ItemIdAllocator, LineItem, ShopDetails};

/// One bill as written by the user: who is selling, who is buying and what.
#[derive(Debug, Deserialize)]
pub struct BillFile {
    /// Id of a saved shop profile, used when `[shop]` is absent
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub shop: Option<ShopSection>,
    #[serde(default)]
    pub customer: CustomerDetails,
    #[serde(default)]
    pub items: Vec<ItemEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ShopSection {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub gstin: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_gst")]
    pub gst: f64,
}

fn default_quantity() -> i64 {
    1
}

fn default_gst() -> f64 {
    18.0
}

impl ItemEntry {
    fn to_line_item(&self, ids: &mut ItemIdAllocator) -> LineItem {
        let quantity = u32::try_from(self.quantity.max(0)).unwrap_or(u32::MAX);
        LineItem::new(ids.next_id(), self.name.trim(), quantity, self.price, self.gst)
    }
}

/// Bill contents ready for assembly.
#[derive(Debug)]
pub struct LoadedBill {
    pub shop: ShopDetails,
    pub customer: CustomerDetails,
    pub items: Vec<LineItem>,
}

pub fn load_bill(path: &Path) -> Result<BillFile> {
    if !path.exists() {
        return Err(BillError::BillNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| BillError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

impl BillFile {
    /// Resolve the shop and build line items.
    ///
    /// Shop details come from `[shop]`, then the named profile, then the
    /// default profile.
    pub fn resolve(self, profiles: &ProfileStore) -> Result<LoadedBill> {
        let shop = match (self.shop, self.profile) {
            (Some(shop), _) => ShopDetails::new(shop.name, shop.address, &shop.gstin),
            (None, Some(id)) => profiles
                .get(&id)
                .map(|p| p.shop_details())
                .ok_or(BillError::ProfileNotFound(id))?,
            (None, None) => profiles
                .default_profile()
                .map(|p| {
                    tracing::debug!(profile = %p.id, "using default shop profile");
                    p.shop_details()
                })
                .ok_or(BillError::NoShopDetails)?,
        };

        let mut ids = ItemIdAllocator::default();
        let items = self
            .items
            .iter()
            .map(|entry| entry.to_line_item(&mut ids))
            .collect();

        Ok(LoadedBill {
            shop,
            customer: self.customer,
            items,
        })
    }
}
