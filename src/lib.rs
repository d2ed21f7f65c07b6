pub mod config;
pub mod delivery;
pub mod error;
pub mod invoice;
pub mod logging;
pub mod pdf;
pub mod print;
pub mod render;

pub use error::{BillError, Result};
pub use invoice::{assemble, CustomerDetails, InvoiceData, LineItem, ShopDetails};
pub use pdf::{export_pdf, PdfFile, PdfOptions};
pub use print::print_markup;
pub use render::{render, Document, TemplateVariant, Theme};
