//! Extraction adapters producing presentation JSON from PDF files and from
//! rendered HTML documents.

pub mod html;
pub mod normalize;
pub mod pdf;

pub use html::HtmlExtractor;
pub use normalize::TextNormalizer;
pub use pdf::{classify_page, PdfExtractor};
