//! SVG widget pipeline
//!
//! Text is laid out against real font outlines ([`font`], [`layout`]),
//! serialised as path data ([`path`]), positioned on the card ([`frame`]),
//! bound into a style template ([`style`]) and optimised ([`optimizer`]).
//! [`service::WidgetService`] ties it together with the cache and the
//! avatar source.

pub mod assets;
pub mod avatar;
pub mod cache;
pub mod font;
pub mod frame;
pub mod layout;
pub mod optimizer;
pub mod options;
pub mod path;
pub mod service;
pub mod style;

pub use assets::{EncodedImage, WidgetAssets, WidgetImages};
pub use avatar::{AvatarSource, CdnAvatarClient};
pub use cache::{CacheEntry, CacheKey, WidgetCache};
pub use font::{FontMetrics, GlyphPath, OutlineFont};
pub use options::WidgetOptions;
pub use service::{CardLayout, WidgetService, WidgetStats};
pub use style::StyleRegistry;
