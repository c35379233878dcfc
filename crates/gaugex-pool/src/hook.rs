use gaugex_core::events::GaugeEvent;

/// Observer for gauge notifications. Delivery is one-way and fire-and-forget;
/// a hook cannot influence or abort the operation that produced the event.
pub trait RewardsHook: Send + Sync {
    fn on_event(&self, event: &GaugeEvent);
}
