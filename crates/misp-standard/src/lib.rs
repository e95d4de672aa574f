//! Typed subset of the MISP standard exchange format.
//!
//! `misp-standard` models the pieces of a MISP event that enrichment modules
//! hand back to the platform: loose [`Attribute`]s, [`MispObject`]s grouping
//! related attributes, and the [`ObjectReference`]s linking an object to
//! whatever it describes. An [`Event`] is only a transient container used to
//! assemble the graph before serializing it.
//!
//! ## Quick Start
//!
//! ```
//! use misp_standard::{Attribute, Event, MispObject};
//!
//! let ip = Attribute::new("ip-dst", "8.8.8.8");
//!
//! let mut geo = MispObject::new("ip-api-address");
//! geo.add_attribute("country", "text", "United States");
//! geo.add_reference(ip.uuid, "locates");
//!
//! let mut event = Event::new();
//! event.add_attribute(ip);
//! event.add_object(geo);
//!
//! let sections = serde_json::to_value(event.sections()).unwrap();
//! assert_eq!(sections["Object"][0]["ObjectReference"][0]["relationship_type"], "locates");
//! ```
//!
//! ## Serialization
//!
//! Field names follow the MISP JSON layout (`type`, `meta-category`,
//! `Attribute`, `ObjectReference`, ...). Empty optional fields are skipped so
//! the output stays close to what the platform itself emits.

mod attribute;
mod error;
mod event;
mod object;
pub mod scalar;

pub use crate::attribute::{category_for, Attribute};
pub use crate::error::Error;
pub use crate::event::{Event, Sections};
pub use crate::object::{MispObject, ObjectReference};

/// Re-export so callers do not need a direct `uuid` dependency to hold ids.
pub use uuid::Uuid;

/// Convenience type alias for Results using the model error.
pub type Result<T> = std::result::Result<T, Error>;
