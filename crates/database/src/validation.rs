//! Record identifier validation.

use uuid::Uuid;

/// Check whether a string is a well-formed record id.
///
/// Record ids are UUIDs assigned at insert time, so anything that does not
/// parse as a UUID can be rejected without a store round trip.
pub fn is_valid_record_id(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_uuid() {
        assert!(is_valid_record_id("c27fb365-0c84-4cf2-8555-814bb065e448"));
    }

    #[test]
    fn test_rejects_malformed_ids() {
        assert!(!is_valid_record_id(""));
        assert!(!is_valid_record_id("42"));
        assert!(!is_valid_record_id("not-a-uuid"));
        assert!(!is_valid_record_id("c27fb365-0c84-4cf2-8555"));
    }
}
