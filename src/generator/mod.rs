pub mod locations;
pub mod series;

pub use locations::LocationSet;
pub use series::SeriesGenerator;

use crate::config::DatasetConfig;
use crate::error::Result;
use crate::models::Reading;
use std::collections::HashMap;
use std::sync::Arc;

/// Generated data owned by one dashboard session.
///
/// Locations are drawn once when the context is created. Series are
/// generated on first use per entity and kept for the lifetime of the
/// context.
#[derive(Debug)]
pub struct DataContext {
    locations: LocationSet,
    generator: SeriesGenerator,
    simulated_entities: usize,
    series_cache: HashMap<String, Arc<[Reading]>>,
}

impl DataContext {
    pub fn generate(config: &DatasetConfig) -> Result<Self> {
        let generator = SeriesGenerator::from_config(config)?;
        let locations = LocationSet::generate(config)?;
        let simulated_entities = config
            .simulated_entities
            .map_or(locations.len(), |n| n.min(locations.len()));

        Ok(Self {
            locations,
            generator,
            simulated_entities,
            series_cache: HashMap::new(),
        })
    }

    pub fn locations(&self) -> &LocationSet {
        &self.locations
    }

    pub fn generator(&self) -> &SeriesGenerator {
        &self.generator
    }

    /// Whether `entity` carries consumption data at all.
    pub fn is_simulated(&self, entity: &str) -> bool {
        self.locations
            .position(entity)
            .is_some_and(|pos| pos < self.simulated_entities)
    }

    /// Full series of `entity`, empty for unknown or non-simulated entities.
    pub fn series(&mut self, entity: &str) -> Arc<[Reading]> {
        if let Some(cached) = self.series_cache.get(entity) {
            return Arc::clone(cached);
        }

        let series: Arc<[Reading]> = if self.is_simulated(entity) {
            self.generator.series(entity).into()
        } else {
            Arc::from(Vec::new())
        };
        tracing::debug!(entity, readings = series.len(), "Generated series");

        self.series_cache
            .insert(entity.to_string(), Arc::clone(&series));
        series
    }

    pub fn cached_series(&self) -> usize {
        self.series_cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(simulated: Option<usize>) -> DatasetConfig {
        DatasetConfig {
            location_count: 10,
            simulated_entities: simulated,
            location_seed: Some(1),
            ..DatasetConfig::default()
        }
    }

    #[test]
    fn test_series_is_cached_per_entity() {
        let mut ctx = DataContext::generate(&config(None)).unwrap();
        let a = ctx.series("RTM-002");
        let b = ctx.series("RTM-002");

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(ctx.cached_series(), 1);
        assert_eq!(a.len(), 2557);
    }

    #[test]
    fn test_only_first_entities_are_simulated() {
        let mut ctx = DataContext::generate(&config(Some(3))).unwrap();

        assert!(ctx.is_simulated("RTM-003"));
        assert!(!ctx.is_simulated("RTM-004"));
        assert!(!ctx.is_simulated("RTM-999"));
        assert!(ctx.series("RTM-004").is_empty());
        assert!(!ctx.series("RTM-001").is_empty());
    }

    #[test]
    fn test_invalid_config_is_generation_failure() {
        let mut cfg = config(None);
        cfg.watt_min = 10_000;
        assert!(matches!(
            DataContext::generate(&cfg),
            Err(crate::error::AppError::GenerationFailure(_))
        ));
    }
}
