//! Checks the log stream, which is the program's only observable output.

use order_processor::lifecycle::{OrderProcessor, ProcessorConfig};
use order_processor::pipeline::mock::MockDelays;
use order_processor::pipeline::Stage;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Clone, Debug)]
struct Captured {
    level: Level,
    message: String,
    order_id: Option<u64>,
}

#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<Captured>>>,
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    order_id: Option<u64>,
}

impl Visit for EventVisitor {
    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == "order_id" {
            self.order_id = Some(value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(Captured {
            level: *event.metadata().level(),
            message: visitor.message,
            order_id: visitor.order_id,
        });
    }
}

#[tokio::test(start_paused = true)]
async fn test_one_outcome_line_per_order() {
    let layer = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let delays = MockDelays::new()
        .with_default(Duration::from_millis(100))
        .fail_at(5, Stage::CheckInventory, "out of stock");
    let processor = OrderProcessor::with_delays(ProcessorConfig::default(), Arc::new(delays));
    processor.run(CancellationToken::new()).await.unwrap();

    let events = layer.events.lock().unwrap().clone();
    let for_order = |id: u64| -> Vec<Captured> {
        events
            .iter()
            .filter(|e| e.order_id == Some(id))
            .cloned()
            .collect()
    };

    let errors: Vec<&Captured> = events.iter().filter(|e| e.level == Level::ERROR).collect();
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors[0].order_id, Some(5));
    assert!(errors[0].message.contains('5'));

    for id in 1..=20u64 {
        let order_events = for_order(id);
        let outcomes: Vec<&Captured> = order_events
            .iter()
            .filter(|e| {
                e.level == Level::ERROR || e.message.contains("processed completely")
            })
            .collect();
        assert_eq!(outcomes.len(), 1, "order {id}: {outcomes:?}");
        assert!(outcomes[0].message.contains(&id.to_string()));

        let stage_lines: Vec<&Captured> = order_events
            .iter()
            .filter(|e| {
                e.level == Level::INFO
                    && Stage::ALL
                        .iter()
                        .any(|stage| e.message.starts_with(stage.activity()))
            })
            .collect();
        let expected_stages = if id == 5 { 2 } else { 4 };
        assert_eq!(stage_lines.len(), expected_stages, "order {id}");
        for line in stage_lines {
            assert!(line.message.ends_with(&format!(" {id}")), "{line:?}");
        }
    }
}
