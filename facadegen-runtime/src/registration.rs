use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::Registry;

/// Register every collector, or none of them
///
/// Collectors are registered in order. If one is rejected, those registered before it are
/// unregistered again and the rejection is returned.
///
/// # Errors
///
/// Returns the error of the first collector the registry rejects.
pub fn register_all(registry: &Registry, collectors: Vec<Box<dyn Collector>>) -> prometheus::Result<()> {
    let mut registered: Vec<Vec<Desc>> = Vec::with_capacity(collectors.len());

    for collector in collectors {
        let descs: Vec<Desc> = collector.desc().into_iter().cloned().collect();

        if let Err(e) = registry.register(collector) {
            for descs in registered.into_iter().rev() {
                let _ = registry.unregister(Box::new(Registered(descs)));
            }

            return Err(e);
        }

        registered.push(descs);
    }

    Ok(())
}

/// Stand-in carrying only the descriptors of a registered collector
///
/// Registries identify collectors by their descriptors, so this is enough to unregister one.
struct Registered(Vec<Desc>);

impl Collector for Registered {
    fn desc(&self) -> Vec<&Desc> {
        self.0.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        Vec::new()
    }
}
