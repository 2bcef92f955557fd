use async_trait::async_trait;
use ddd_application::bridge::EventBridge;
use ddd_application::command::Command;
use ddd_application::command_bus::CommandBus;
use ddd_application::command_handler::CommandHandler;
use ddd_application::config::EventBridgeConfig;
use ddd_application::context::AppContext;
use ddd_application::converter::{ConverterRegistry, EventConverter};
use ddd_application::error::AppError;
use ddd_application::{DomainEventAwareCommandHandler, InMemoryCommandBus};
use ddd_domain::domain_event::{BusinessContext, DomainEvent, DomainEventBroadcaster};
use ddd_domain::messaging::{InMemoryMessageBus, Message, MessageBusConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct StockReserved {
    sku: String,
    quantity: u32,
}
impl DomainEvent for StockReserved {}

#[derive(Debug)]
struct StockDepleted {
    sku: String,
}
impl DomainEvent for StockDepleted {}

/// 没有转换器，仅记录在日志中
#[derive(Debug)]
struct ReservationAudited {
    #[allow(dead_code)]
    sku: String,
}
impl DomainEvent for ReservationAudited {}

#[derive(Debug)]
struct StockReservedMessage {
    sku: String,
    quantity: u32,
}
impl Message for StockReservedMessage {}

#[derive(Debug)]
struct StockDepletedMessage {
    sku: String,
}
impl Message for StockDepletedMessage {}

struct StockReservedConverter;
impl EventConverter for StockReservedConverter {
    type Event = StockReserved;
    type Message = StockReservedMessage;
    fn convert(&self, event: &StockReserved) -> anyhow::Result<StockReservedMessage> {
        Ok(StockReservedMessage {
            sku: event.sku.clone(),
            quantity: event.quantity,
        })
    }
}

struct StockDepletedConverter;
impl EventConverter for StockDepletedConverter {
    type Event = StockDepleted;
    type Message = StockDepletedMessage;
    fn convert(&self, event: &StockDepleted) -> anyhow::Result<StockDepletedMessage> {
        anyhow::ensure!(!event.sku.is_empty(), "sku must not be empty");
        Ok(StockDepletedMessage {
            sku: event.sku.clone(),
        })
    }
}

#[derive(Debug)]
struct ReserveStock {
    sku: String,
    quantity: u32,
}
impl Command for ReserveStock {
    const NAME: &'static str = "ReserveStock";
}

/// 业务逻辑：只向广播器报告发生了什么
struct ReserveStockHandler {
    broadcaster: DomainEventBroadcaster,
    available: u32,
}

#[async_trait]
impl CommandHandler<ReserveStock> for ReserveStockHandler {
    async fn handle(&self, _ctx: &AppContext, cmd: ReserveStock) -> Result<(), AppError> {
        if cmd.quantity == 0 {
            return Err(AppError::Validation("quantity must be positive".into()));
        }
        if cmd.quantity > self.available {
            return Err(AppError::Validation(format!(
                "insufficient stock for {}: requested={}, available={}",
                cmd.sku, cmd.quantity, self.available
            )));
        }

        self.broadcaster.raise(&StockReserved {
            sku: cmd.sku.clone(),
            quantity: cmd.quantity,
        });
        self.broadcaster.raise(&ReservationAudited {
            sku: cmd.sku.clone(),
        });
        if cmd.quantity == self.available {
            self.broadcaster.raise(&StockDepleted { sku: cmd.sku });
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let registry = ConverterRegistry::builder()
        .converter(StockReservedConverter)
        .converter(StockDepletedConverter)
        .build()?;

    let config = EventBridgeConfig::from_json_value(serde_json::json!({
        "topics": { "StockDepleted": "inventory.alerts" },
        "default_topic": "inventory",
    }))?;

    let broadcaster = DomainEventBroadcaster::new();
    let message_bus = Arc::new(InMemoryMessageBus::with_config(MessageBusConfig::default()));
    let bridge = EventBridge::builder()
        .registry(Arc::new(registry))
        .publisher(message_bus.clone())
        .broadcaster(broadcaster.clone())
        .topic_config(&config)
        .build();

    let commands = InMemoryCommandBus::new();
    commands.register::<ReserveStock, _>(Arc::new(DomainEventAwareCommandHandler::new(
        ReserveStockHandler {
            broadcaster: broadcaster.clone(),
            available: 5,
        },
        bridge,
    )))?;

    let ctx = AppContext {
        biz: BusinessContext::builder()
            .maybe_correlation_id(Some("cor-1".into()))
            .maybe_actor_type(Some("user".into()))
            .maybe_actor_id(Some("u-1".into()))
            .build(),
        idempotency_key: Some("idem-1".into()),
        ..Default::default()
    };

    commands
        .dispatch(
            &ctx,
            ReserveStock {
                sku: "SKU-1".into(),
                quantity: 2,
            },
        )
        .await?;
    commands
        .dispatch(
            &ctx,
            ReserveStock {
                sku: "SKU-1".into(),
                quantity: 5,
            },
        )
        .await?;

    if let Err(err) = commands
        .dispatch(
            &ctx,
            ReserveStock {
                sku: "SKU-1".into(),
                quantity: 9,
            },
        )
        .await
    {
        info!(error = %err, "reservation rejected");
    }

    for published in message_bus.published() {
        let payload = if let Some(m) = published.downcast_ref::<StockReservedMessage>() {
            format!("reserved {} x{}", m.sku, m.quantity)
        } else if let Some(m) = published.downcast_ref::<StockDepletedMessage>() {
            format!("depleted {}", m.sku)
        } else {
            format!("{:?}", published.message())
        };
        info!(
            topic = published.topic().unwrap_or("<default>"),
            message_type = published.message().message_type().short_name(),
            payload = %payload,
            "message published"
        );
    }

    Ok(())
}
