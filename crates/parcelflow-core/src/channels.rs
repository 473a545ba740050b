//! Named logical channels, transport-implementation-agnostic.

/// Inbound: raw order payloads submitted for asynchronous ingestion.
pub const INCOMING_PARCEL_ORDERS: &str = "incoming-parcel-orders";

/// Inbound: status messages from the ABC transport carrier.
pub const ABC_TRANSPORT_RESPONSES: &str = "abc-transport-responses";

/// Outbound: registration events destined for the carrier.
pub const ABC_TRANSPORT_EVENTS: &str = "abc-transport-events";

/// Outbound: tracking updates for notification systems and dashboards.
pub const PARCEL_TRACKING_EVENTS: &str = "parcel-tracking-events";
