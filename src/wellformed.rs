//! XML well-formedness checking
//!
//! The checker runs a full, strict parse and reduces the outcome to a
//! boolean. Callers that want the parser's diagnostic use [`check`] instead.
//!
//! Nesting depth is bounded by [`Limits::max_xml_depth`], measured with a
//! flat event scan before the strict parse, so hostile nesting is rejected
//! without recursing. Documents carrying a DTD are rejected: the element
//! tree is built without entity expansion, and a document this module
//! accepts must always convert.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::limits::Limits;

/// Parse `xml` strictly and report the first well-formedness violation
pub fn check(xml: &str) -> Result<()> {
    check_with_limits(xml, &Limits::default())
}

/// [`check`] with an explicit nesting bound
pub fn check_with_limits(xml: &str, limits: &Limits) -> Result<()> {
    check_depth(xml, limits)?;
    // roxmltree's default options reject any DOCTYPE
    roxmltree::Document::parse(xml)?;
    Ok(())
}

/// Reject documents nested deeper than the limit
///
/// Scan errors are ignored here; the strict parse that follows reports them
/// with a location.
fn check_depth(xml: &str, limits: &Limits) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    reader.check_end_names(false);
    let mut depth = 0usize;

    loop {
        let reached = match reader.read_event() {
            Ok(Event::Start(_)) => {
                depth += 1;
                depth
            }
            Ok(Event::Empty(_)) => depth + 1,
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                continue;
            }
            Ok(Event::Eof) | Err(_) => return Ok(()),
            Ok(_) => continue,
        };
        limits
            .check_xml_depth(reached)
            .map_err(|err| Error::malformed(err.to_string()))?;
    }
}

/// Returns true if `xml` is a well-formed XML document
///
/// Any failure (unterminated tags, illegal characters, empty input, a
/// missing root element, excessive nesting) yields `false`; nothing is
/// propagated.
pub fn is_well_formed(xml: &str) -> bool {
    match check(xml) {
        Ok(()) => true,
        Err(err) => {
            tracing::trace!(error = %err, "document is not well-formed");
            false
        }
    }
}
