//! Presentation document model, design-token resolution, layout
//! classification and run-wide render configuration.

pub mod config;
pub mod error;
pub mod icons;
pub mod layout;
pub mod style;
pub mod types;

pub use config::RenderConfig;
pub use error::{Error, Result};
pub use layout::{classify, Alignment, LayoutDecision, Region, Structure};
pub use style::{resolve_color, DeckPalette, MarkupTheme, Rgb};
pub use types::{Background, Element, ElementKind, Presentation, Side, Slide};
