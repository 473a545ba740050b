//! Party Resolver — find-or-create for sender/recipient contact records.
//!
//! Resolution re-queries the store on every call rather than caching across
//! calls, so a sender and recipient sharing an email within one ingestion
//! resolve to the same newly-created party.

use parcelflow_core::clock::Clock;
use parcelflow_core::error::DomainError;
use parcelflow_core::ids::IdGenerator;
use parcelflow_core::model::Party;
use parcelflow_core::store::PartyStore;
use uuid::Uuid;

use crate::application::validate::ValidatedContact;

/// Resolves a contact to an existing party or creates a new one.
///
/// Lookup order: reference code, then email, then creation. Absence is never
/// an error; only store I/O failures propagate.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` on store I/O failures.
pub async fn resolve_party(
    contact: &ValidatedContact,
    store: &dyn PartyStore,
    ids: &dyn IdGenerator,
    clock: &dyn Clock,
) -> Result<Party, DomainError> {
    if let Some(code) = &contact.reference_code
        && let Some(existing) = store.find_by_reference_code(code).await?
    {
        return Ok(existing);
    }

    if let Some(existing) = store.find_by_email(&contact.email).await? {
        return Ok(existing);
    }

    let party = Party {
        id: Uuid::new_v4(),
        reference_code: Some(
            contact
                .reference_code
                .clone()
                .unwrap_or_else(|| ids.party_reference()),
        ),
        name: contact.name.clone(),
        email: contact.email.clone(),
        phone: contact.phone.clone(),
        created_at: clock.now(),
    };
    store.insert(&party).await?;
    tracing::debug!(party_id = %party.id, email = %party.email, "created new party");
    Ok(party)
}
