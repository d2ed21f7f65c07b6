mod assembler;
mod item;
mod tax;

pub use assembler::{
    assemble, assemble_at, format_indian_date, invoice_number, InvoiceData,
    PLACEHOLDER_CUSTOMER_NAME, PLACEHOLDER_SHOP_ADDRESS, PLACEHOLDER_SHOP_NAME,
};
pub use item::{normalize_gstin, CustomerDetails, ItemId, ItemIdAllocator, LineItem, ShopDetails};
pub use tax::{
    aggregate, compute_line, format_amount, format_money, format_rate, summarize, InvoiceTotals,
    ItemSummary, LineAmounts, GST_RATES,
};
