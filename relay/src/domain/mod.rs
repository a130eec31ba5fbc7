//! Domain logic for trace replay
//!
//! - `id` - trace and span identifier decoding
//! - `attr` - tagged attribute value decoding
//! - `span` - the typed span model
//! - `resource` - merged resource attribute maps
//! - `reconstruct` - raw record to typed span

pub mod attr;
pub mod id;
pub mod reconstruct;
pub mod resource;
pub mod span;

pub use attr::{AttrValue, Attribute, DecodeWarning};
pub use id::{IdentityError, SpanId, TraceId};
pub use reconstruct::{ReconstructError, reconstruct_span};
pub use resource::Resource;
pub use span::{Span, SpanContext, SpanKind, Status, StatusCode};
