//! Write-rule classification.
//!
//! The `chercheur` table carries a trigger that rejects writes outside
//! Monday-Friday 08:00-18:00 (store time zone). A rejected write surfaces as
//! an ordinary driver error, so every failed create/update/delete must be
//! classified exactly once, here, before anything user-facing is produced.
//!
//! The trigger raises SQLSTATE [`BUSINESS_HOURS_SQLSTATE`] with a message
//! containing [`BUSINESS_HOURS_MARKER`]. Both are external contracts owned by
//! the database schema. The code is checked first; the substring is the
//! fallback for errors relayed without a code.

use super::store::WriteError;

/// SQLSTATE raised by the business-hours trigger.
pub const BUSINESS_HOURS_SQLSTATE: &str = "RSH01";

/// Marker substring in the trigger's message text. Must match the schema
/// exactly; matching is substring-based.
pub const BUSINESS_HOURS_MARKER: &str = "restricted to business hours";

/// The two-case outcome of a failed write.
#[derive(Debug)]
pub enum WriteRejection {
    /// The store's enforcement trigger blocked the write because it happened
    /// outside the permitted window.
    TimeWindow,
    /// Any other write failure: connectivity, constraint violation,
    /// malformed input. Carries the unclassified error.
    Other(WriteError),
}

/// Classify a failed write. Shared by the create, update, and delete paths;
/// call sites must not re-match the message themselves.
pub fn classify_write_error(err: WriteError) -> WriteRejection {
    let code_matches = err.code.as_deref() == Some(BUSINESS_HOURS_SQLSTATE);
    if code_matches || err.message.contains(BUSINESS_HOURS_MARKER) {
        WriteRejection::TimeWindow
    } else {
        WriteRejection::Other(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_message_is_time_window() {
        let err = WriteError::new(
            "ERROR: chercheur writes restricted to business hours (Mon-Fri 08:00-18:00)",
            None,
        );
        assert!(matches!(classify_write_error(err), WriteRejection::TimeWindow));
    }

    #[test]
    fn sqlstate_alone_is_time_window() {
        // Message relayed in another language or truncated; the code decides.
        let err = WriteError::new("mise a jour interdite", Some(BUSINESS_HOURS_SQLSTATE.into()));
        assert!(matches!(classify_write_error(err), WriteRejection::TimeWindow));
    }

    #[test]
    fn other_messages_stay_unclassified() {
        let err = WriteError::new(
            "insert or update on table \"chercheur\" violates foreign key constraint \"chercheur_supno_fkey\"",
            Some("23503".into()),
        );
        match classify_write_error(err) {
            WriteRejection::Other(e) => assert!(e.message.contains("foreign key")),
            WriteRejection::TimeWindow => panic!("constraint violation misread as time window"),
        }
    }

    #[test]
    fn connectivity_failure_stays_unclassified() {
        let err = WriteError::new("connection closed unexpectedly", None);
        assert!(matches!(classify_write_error(err), WriteRejection::Other(_)));
    }
}
