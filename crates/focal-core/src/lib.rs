//! focal-core: Focal point geometry and synchronization (sans-IO).
//!
//! A focal point is a pair of whole percentages (`"left,top"`) stored in
//! a text field and edited through a crosshair indicator laid over the
//! image. This crate holds everything about that coordinate that does
//! not touch the browser:
//!
//! - [`geometry`]: pixel <-> percentage conversion and dimension
//!   resolution for hidden images
//! - [`store`]: parsing and formatting of the field value
//! - [`sync`]: the event -> effect state machine keeping indicator, field
//!   and preview link consistent
//! - [`preview`]: preview link rewriting and the request registry
//! - [`config`]: the DOM contract a widget binds to
//!
//! All DOM interaction lives in `focal-io`.

pub mod config;
pub mod error;
pub mod geometry;
pub mod preview;
pub mod store;
pub mod sync;
pub mod types;

pub use config::WidgetConfig;
pub use error::{ConfigError, ParseError};
pub use geometry::{ImageSurface, resolve_dimensions};
pub use preview::{PreviewLink, RequestDescriptor, RequestRegistry};
pub use store::CoordinateStore;
pub use sync::{Effect, Phase, Synchronizer};
pub use types::{Dimensions, FocalPoint, FocalPointId, PixelOffset};
