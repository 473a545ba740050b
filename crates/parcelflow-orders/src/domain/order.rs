//! Raw inbound order payloads, as received from customers or EDI partners.

use chrono::NaiveDate;
use parcelflow_core::model::Priority;
use serde::{Deserialize, Serialize};

/// A raw order submission, prior to validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    /// External EDI reference supplied by the submitter.
    #[serde(default)]
    pub edi_reference: Option<String>,
    /// Sender contact data.
    #[serde(default)]
    pub sender: Option<ContactPayload>,
    /// Recipient contact data.
    #[serde(default)]
    pub recipient: Option<ContactPayload>,
    /// Pickup address.
    #[serde(default)]
    pub pickup_address: Option<AddressPayload>,
    /// Delivery address.
    #[serde(default)]
    pub delivery_address: Option<AddressPayload>,
    /// Descriptive parcel attributes.
    #[serde(default)]
    pub parcel_details: ParcelDetailsPayload,
    /// Service options.
    #[serde(default)]
    pub service_options: ServiceOptionsPayload,
}

/// Contact data for a sender or recipient.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    /// Customer reference code, when the submitter already knows it.
    #[serde(default)]
    pub reference_code: Option<String>,
    /// Contact name.
    #[serde(default)]
    pub name: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// A raw address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    /// Street and number.
    #[serde(default)]
    pub street: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Country.
    #[serde(default)]
    pub country: Option<String>,
}

/// Descriptive parcel attributes; informational only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelDetailsPayload {
    /// Free-form contents description.
    #[serde(default)]
    pub description: Option<String>,
    /// Weight in kilograms.
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Dimensions, free-form.
    #[serde(default)]
    pub dimensions: Option<String>,
}

/// Service options for a parcel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOptionsPayload {
    /// Requested priority; defaults to standard when absent.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Estimated delivery date, if promised at submission.
    #[serde(default)]
    pub estimated_delivery_date: Option<NaiveDate>,
}
