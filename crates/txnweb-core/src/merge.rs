//! Field-level merge rules for create and update
//!
//! Create takes the payload as-is, defaulting only `createdAt` (to the
//! supplied clock time) and `isValid` (to `true`). Update overlays the
//! provided fields of the payload onto the stored record; `createdAt` and
//! `id` always come from the stored record.

use chrono::NaiveDateTime;

use crate::models::{NewTransaction, Transaction, TransactionInput};

/// Build the record to insert for a create request
pub fn prepare_create(input: TransactionInput, now: NaiveDateTime) -> NewTransaction {
    NewTransaction {
        customer_id: input.customer_id,
        customer_name: input.customer_name,
        amount: input.amount,
        created_at: input.created_at.unwrap_or(now),
        is_valid: input.is_valid.unwrap_or(true),
    }
}

/// Overlay the provided fields of `input` onto `existing`
pub fn merge_update(existing: Transaction, input: TransactionInput) -> Transaction {
    Transaction {
        id: existing.id,
        customer_id: input.customer_id.or(existing.customer_id),
        customer_name: input.customer_name.or(existing.customer_name),
        amount: input.amount.or(existing.amount),
        created_at: existing.created_at,
        is_valid: input.is_valid.unwrap_or(existing.is_valid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn stored() -> Transaction {
        Transaction {
            id: 1,
            customer_id: Some(1),
            customer_name: Some("Alice".to_string()),
            amount: Some(500),
            created_at: at(9),
            is_valid: true,
        }
    }

    #[test]
    fn test_create_defaults_timestamp_and_validity() {
        let input = TransactionInput::default().with_customer(1, "Alice").with_amount(500);
        let record = prepare_create(input, at(12));

        assert_eq!(record.created_at, at(12));
        assert!(record.is_valid);
        assert_eq!(record.customer_id, Some(1));
        assert_eq!(record.customer_name.as_deref(), Some("Alice"));
        assert_eq!(record.amount, Some(500));
    }

    #[test]
    fn test_create_keeps_explicit_values() {
        let input = TransactionInput::default()
            .with_validity(false)
            .with_created_at(at(3));
        let record = prepare_create(input, at(12));

        assert_eq!(record.created_at, at(3));
        assert!(!record.is_valid);
    }

    #[test]
    fn test_create_preserves_absent_fields() {
        let record = prepare_create(TransactionInput::default(), at(12));
        assert_eq!(record.customer_id, None);
        assert_eq!(record.customer_name, None);
        assert_eq!(record.amount, None);
    }

    #[test]
    fn test_create_ignores_supplied_id() {
        let input = TransactionInput { id: Some(99), ..TransactionInput::default() };
        let record = prepare_create(input, at(12)).into_transaction(5);
        assert_eq!(record.id, 5);
    }

    #[test]
    fn test_update_with_empty_payload_changes_nothing() {
        assert_eq!(merge_update(stored(), TransactionInput::default()), stored());
    }

    #[test]
    fn test_update_overwrites_present_fields_only() {
        let merged = merge_update(stored(), TransactionInput::default().with_amount(700));

        assert_eq!(merged.amount, Some(700));
        assert_eq!(merged.customer_name.as_deref(), Some("Alice"));
        assert_eq!(merged.customer_id, Some(1));
        assert!(merged.is_valid);
    }

    #[test]
    fn test_update_accepts_zero_like_values() {
        let input = TransactionInput {
            customer_id: Some(0),
            customer_name: Some(String::new()),
            amount: Some(0),
            is_valid: Some(false),
            ..TransactionInput::default()
        };
        let merged = merge_update(stored(), input);

        assert_eq!(merged.customer_id, Some(0));
        assert_eq!(merged.customer_name.as_deref(), Some(""));
        assert_eq!(merged.amount, Some(0));
        assert!(!merged.is_valid);
    }

    #[test]
    fn test_update_never_touches_created_at_or_id() {
        let input = TransactionInput {
            id: Some(77),
            created_at: Some(at(23)),
            ..TransactionInput::default()
        };
        let merged = merge_update(stored(), input);

        assert_eq!(merged.created_at, at(9));
        assert_eq!(merged.id, 1);
    }

    #[test]
    fn test_update_validity_only_when_provided() {
        let invalid = Transaction { is_valid: false, ..stored() };

        let kept = merge_update(invalid.clone(), TransactionInput::default().with_amount(1));
        assert!(!kept.is_valid);

        let restored = merge_update(invalid, TransactionInput::default().with_validity(true));
        assert!(restored.is_valid);
    }
}
