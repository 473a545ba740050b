//! Order Validator — structural completeness checks on raw order payloads.
//!
//! Pure; performs no I/O and persists nothing. Fails fast: the first missing
//! required field aborts validation.

use parcelflow_core::error::DomainError;
use parcelflow_core::model::{Address, ParcelDetails, Priority};
use chrono::NaiveDate;

use crate::domain::order::{AddressPayload, ContactPayload, OrderPayload};

/// A structurally-complete order, ready for party resolution.
#[derive(Debug, Clone)]
pub struct ValidatedOrder {
    /// Non-empty external reference.
    pub edi_reference: String,
    /// Sender contact.
    pub sender: ValidatedContact,
    /// Recipient contact.
    pub recipient: ValidatedContact,
    /// Pickup address.
    pub pickup_address: Address,
    /// Delivery address.
    pub delivery_address: Address,
    /// Descriptive attributes, passed through unchecked.
    pub details: ParcelDetails,
    /// Service priority; standard when unspecified.
    pub priority: Priority,
    /// Estimated delivery date, when promised.
    pub estimated_delivery_date: Option<NaiveDate>,
}

/// A contact with the required name and email present.
#[derive(Debug, Clone)]
pub struct ValidatedContact {
    /// Customer reference code, when supplied.
    pub reference_code: Option<String>,
    /// Contact name, non-empty.
    pub name: String,
    /// Contact email; checked only for containing an at-sign.
    pub email: String,
    /// Phone number, when supplied.
    pub phone: Option<String>,
}

/// Validates a raw order payload.
///
/// # Errors
///
/// Returns `DomainError::Validation` naming the first violated field.
pub fn validate_order(payload: &OrderPayload) -> Result<ValidatedOrder, DomainError> {
    let edi_reference = non_empty(payload.edi_reference.as_deref(), "ediReference")?;
    let sender = validate_contact(payload.sender.as_ref(), "sender")?;
    let recipient = validate_contact(payload.recipient.as_ref(), "recipient")?;
    let pickup_address = validate_address(payload.pickup_address.as_ref(), "pickupAddress")?;
    let delivery_address = validate_address(payload.delivery_address.as_ref(), "deliveryAddress")?;

    Ok(ValidatedOrder {
        edi_reference,
        sender,
        recipient,
        pickup_address,
        delivery_address,
        details: ParcelDetails {
            description: payload.parcel_details.description.clone(),
            weight_kg: payload.parcel_details.weight_kg,
            dimensions: payload.parcel_details.dimensions.clone(),
        },
        priority: payload.service_options.priority.unwrap_or(Priority::Standard),
        estimated_delivery_date: payload.service_options.estimated_delivery_date,
    })
}

fn validate_contact(
    contact: Option<&ContactPayload>,
    field: &str,
) -> Result<ValidatedContact, DomainError> {
    let contact =
        contact.ok_or_else(|| DomainError::Validation(format!("{field} is required")))?;
    let name = non_empty(contact.name.as_deref(), &format!("{field}.name"))?;
    let email = non_empty(contact.email.as_deref(), &format!("{field}.email"))?;
    // Deliberately weak email check; full RFC validation is out of scope.
    if !email.contains('@') {
        return Err(DomainError::Validation(format!(
            "{field}.email is not a valid email address"
        )));
    }
    Ok(ValidatedContact {
        reference_code: contact.reference_code.clone(),
        name,
        email,
        phone: contact.phone.clone(),
    })
}

fn validate_address(
    address: Option<&AddressPayload>,
    field: &str,
) -> Result<Address, DomainError> {
    let address =
        address.ok_or_else(|| DomainError::Validation(format!("{field} is required")))?;
    Ok(Address {
        street: non_empty(address.street.as_deref(), &format!("{field}.street"))?,
        city: non_empty(address.city.as_deref(), &format!("{field}.city"))?,
        postal_code: non_empty(address.postal_code.as_deref(), &format!("{field}.postalCode"))?,
        country: non_empty(address.country.as_deref(), &format!("{field}.country"))?,
    })
}

fn non_empty(value: Option<&str>, field: &str) -> Result<String, DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_owned()),
        _ => Err(DomainError::Validation(format!("{field} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{ParcelDetailsPayload, ServiceOptionsPayload};

    fn contact(name: &str, email: &str) -> ContactPayload {
        ContactPayload {
            reference_code: None,
            name: Some(name.to_owned()),
            email: Some(email.to_owned()),
            phone: None,
        }
    }

    fn address() -> AddressPayload {
        AddressPayload {
            street: Some("1 Warehouse Way".to_owned()),
            city: Some("Newark".to_owned()),
            postal_code: Some("07101".to_owned()),
            country: Some("US".to_owned()),
        }
    }

    fn complete_payload() -> OrderPayload {
        OrderPayload {
            edi_reference: Some("EDI-2024-001".to_owned()),
            sender: Some(contact("John Doe", "john@example.com")),
            recipient: Some(contact("Jane Smith", "jane@example.com")),
            pickup_address: Some(address()),
            delivery_address: Some(address()),
            parcel_details: ParcelDetailsPayload::default(),
            service_options: ServiceOptionsPayload::default(),
        }
    }

    #[test]
    fn test_complete_payload_validates() {
        let order = validate_order(&complete_payload()).unwrap();
        assert_eq!(order.edi_reference, "EDI-2024-001");
        assert_eq!(order.sender.name, "John Doe");
        assert_eq!(order.recipient.email, "jane@example.com");
        assert_eq!(order.priority, Priority::Standard);
    }

    #[test]
    fn test_missing_edi_reference_is_rejected_first() {
        let mut payload = complete_payload();
        payload.edi_reference = None;
        payload.sender = None;
        let err = validate_order(&payload).unwrap_err();
        // Fail-fast: the reference violation wins over the missing sender.
        match err {
            DomainError::Validation(msg) => assert_eq!(msg, "ediReference is required"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_edi_reference_is_rejected() {
        let mut payload = complete_payload();
        payload.edi_reference = Some("   ".to_owned());
        assert!(validate_order(&payload).is_err());
    }

    #[test]
    fn test_email_without_at_sign_is_rejected() {
        let mut payload = complete_payload();
        payload.recipient = Some(contact("Jane Smith", "jane.example.com"));
        let err = validate_order(&payload).unwrap_err();
        match err {
            DomainError::Validation(msg) => {
                assert_eq!(msg, "recipient.email is not a valid email address");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_delivery_address_field_is_rejected() {
        let mut payload = complete_payload();
        payload.delivery_address = Some(AddressPayload {
            postal_code: None,
            ..address()
        });
        let err = validate_order(&payload).unwrap_err();
        match err {
            DomainError::Validation(msg) => {
                assert_eq!(msg, "deliveryAddress.postalCode is required");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
