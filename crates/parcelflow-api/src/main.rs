//! Parcelflow backend entry point.
//!
//! Wires the PostgreSQL stores, the Kafka publisher and the two inbound
//! channel consumers behind the HTTP API, then serves until shutdown. Each
//! consumer runs under a small supervisor loop: a redelivery request or a
//! broker failure tears the consumer down, and it is rebuilt after a short
//! pause so the broker re-presents everything after the last committed
//! offset.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use parcelflow_api::error::AppError;
use parcelflow_api::routes;
use parcelflow_api::state::AppState;
use parcelflow_core::channels;
use parcelflow_core::clock::SystemClock;
use parcelflow_core::events::CorrelationIds;
use parcelflow_core::ids::SystemIdGenerator;
use parcelflow_messaging::kafka::{ChannelConsumer, KafkaEventPublisher};
use parcelflow_messaging::router::{InboundRouter, RouterContext};
use parcelflow_store::pg_parcel_store::PgParcelStore;
use parcelflow_store::pg_party_store::PgPartyStore;
use parcelflow_store::pg_tracking_ledger::PgTrackingLedger;
use parcelflow_store::schema;

/// Which inbound channel a supervised consumer serves.
#[derive(Clone, Copy)]
enum InboundChannel {
    Orders,
    CarrierResponses,
}

impl InboundChannel {
    const fn name(self) -> &'static str {
        match self {
            Self::Orders => channels::INCOMING_PARCEL_ORDERS,
            Self::CarrierResponses => channels::ABC_TRANSPORT_RESPONSES,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| AppError::Config("DATABASE_URL is not set".to_owned()))?;
    let brokers = env_or("KAFKA_BROKERS", "localhost:9092");
    let consumer_group = env_or("CONSUMER_GROUP", "parcelflow-backend");
    let host = env_or("HOST", "0.0.0.0");
    let port = env_or("PORT", "8080");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    apply_schema(&pool).await?;
    tracing::info!("database schema ready");

    let publisher = KafkaEventPublisher::new(&brokers)
        .map_err(|e| AppError::Config(format!("Kafka producer: {e}")))?;

    let state = AppState {
        parcels: Arc::new(PgParcelStore::new(pool.clone())),
        parties: Arc::new(PgPartyStore::new(pool.clone())),
        ledger: Arc::new(PgTrackingLedger::new(pool)),
        publisher: Arc::new(publisher),
        ids: Arc::new(SystemIdGenerator),
        clock: Arc::new(SystemClock),
        correlations: Arc::new(CorrelationIds::new()),
    };

    let router = InboundRouter::new(RouterContext {
        parcels: Arc::clone(&state.parcels),
        parties: Arc::clone(&state.parties),
        ledger: Arc::clone(&state.ledger),
        publisher: Arc::clone(&state.publisher),
        ids: Arc::clone(&state.ids),
        clock: Arc::clone(&state.clock),
        correlations: Arc::clone(&state.correlations),
    });
    spawn_consumer(
        InboundChannel::Orders,
        brokers.clone(),
        consumer_group.clone(),
        router.clone(),
    );
    spawn_consumer(InboundChannel::CarrierResponses, brokers, consumer_group, router);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");
    axum::serve(listener, routes::app(state)).await?;
    Ok(())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

async fn apply_schema(pool: &PgPool) -> Result<(), AppError> {
    for ddl in [
        schema::CREATE_PARTIES_TABLE,
        schema::CREATE_PARCELS_TABLE,
        schema::CREATE_TRACKING_EVENTS_TABLE,
    ] {
        sqlx::raw_sql(ddl).execute(pool).await?;
    }
    Ok(())
}

/// Runs one channel consumer under a restart loop.
fn spawn_consumer(
    channel: InboundChannel,
    brokers: String,
    consumer_group: String,
    router: InboundRouter,
) {
    tokio::spawn(async move {
        loop {
            match ChannelConsumer::new(&brokers, &consumer_group, channel.name()) {
                Ok(consumer) => {
                    let result = match channel {
                        InboundChannel::Orders => {
                            consumer
                                .run(|payload| {
                                    let router = router.clone();
                                    async move { router.handle_order_submission(&payload).await }
                                })
                                .await
                        }
                        InboundChannel::CarrierResponses => {
                            consumer
                                .run(|payload| {
                                    let router = router.clone();
                                    async move { router.handle_carrier_message(&payload).await }
                                })
                                .await
                        }
                    };
                    if let Err(e) = result {
                        tracing::warn!(channel = channel.name(), error = %e, "consumer stopped");
                    }
                }
                Err(e) => {
                    tracing::error!(channel = channel.name(), error = %e, "consumer setup failed");
                }
            }
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });
}
