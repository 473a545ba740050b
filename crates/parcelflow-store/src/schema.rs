//! Database schema.

/// SQL to create the parties table.
pub const CREATE_PARTIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS parties (
    id             UUID PRIMARY KEY,
    reference_code TEXT UNIQUE,
    name           TEXT NOT NULL,
    email          TEXT NOT NULL,
    phone          TEXT,
    created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_parties_email ON parties (email);
";

/// SQL to create the parcels table. Pickup and delivery addresses are owned
/// by the parcel and embedded in its row; they are never shared.
pub const CREATE_PARCELS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS parcels (
    id                      UUID PRIMARY KEY,
    edi_reference           TEXT,
    sender_id               UUID NOT NULL REFERENCES parties (id),
    recipient_id            UUID NOT NULL REFERENCES parties (id),
    pickup_street           TEXT NOT NULL,
    pickup_city             TEXT NOT NULL,
    pickup_postal_code      TEXT NOT NULL,
    pickup_country          TEXT NOT NULL,
    delivery_street         TEXT NOT NULL,
    delivery_city           TEXT NOT NULL,
    delivery_postal_code    TEXT NOT NULL,
    delivery_country        TEXT NOT NULL,
    description             TEXT,
    weight_kg               DOUBLE PRECISION,
    dimensions              TEXT,
    priority                TEXT NOT NULL,
    status                  TEXT NOT NULL,
    estimated_delivery_date DATE,
    actual_delivery_date    TIMESTAMPTZ,
    created_at              TIMESTAMPTZ NOT NULL,
    updated_at              TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_parcels_edi_reference ON parcels (edi_reference);
";

/// SQL to create the append-only tracking events table.
pub const CREATE_TRACKING_EVENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS tracking_events (
    id              UUID PRIMARY KEY,
    parcel_id       UUID NOT NULL REFERENCES parcels (id),
    event_type      TEXT NOT NULL,
    description     TEXT NOT NULL,
    location        TEXT,
    vehicle_id      TEXT,
    driver_name     TEXT,
    event_timestamp TIMESTAMPTZ NOT NULL,
    recorded_at     TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tracking_events_parcel
    ON tracking_events (parcel_id, event_timestamp DESC);
";
