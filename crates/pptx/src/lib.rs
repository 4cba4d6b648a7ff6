//! Native slide-deck backend.
//!
//! Renders a [`deck_core::Presentation`] into an editable PPTX package: positioned
//! text boxes, rounded pictures and filled shapes on a fixed 16:9 canvas. Slides
//! 1 to 11 may use hand-composed layouts; everything else uses a generic layout.
//! [`DeckInspector`] reads a written package back for verification.

pub mod assets;
pub mod canvas;
pub mod inspector;
pub mod layouts;
pub mod package;
pub mod picture;
pub mod renderer;
pub mod shapes;

pub use assets::{AssetResolver, AssetSource};
pub use canvas::{CanvasSettings, Rect, SlideCanvas, TextStyle};
pub use inspector::{DeckInspector, DeckSummary, InspectedRun, InspectedSlide};
pub use layouts::ComposedLayout;
pub use package::DeckPackage;
pub use renderer::{DeckRenderer, RenderReport, SlideOutcome};
