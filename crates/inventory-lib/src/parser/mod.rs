//! Vendor CLI text parsers
//!
//! Pure functions turning raw CLI output into parser intermediates.
//! Both parsers are tolerant by design: a line that matches no known
//! shape is skipped, never an error, because the text formats drift
//! across firmware revisions.

mod elabel;
mod optics;

pub use elabel::parse_elabel_brief;
pub use optics::parse_optical_module_brief;
