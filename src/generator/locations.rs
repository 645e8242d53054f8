use crate::config::{BoundingBox, DatasetConfig};
use crate::error::{AppError, Result};
use crate::models::Location;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// The connection points of one session, in identifier order.
#[derive(Debug, Clone)]
pub struct LocationSet {
    locations: Vec<Location>,
    index: HashMap<String, usize>,
}

impl LocationSet {
    /// Generate `config.location_count` locations inside `config.bounds`.
    pub fn generate(config: &DatasetConfig) -> Result<Self> {
        let mut rng = match config.location_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::generate_with(
            &config.id_prefix,
            config.id_width,
            config.location_count,
            &config.bounds,
            &mut rng,
        )
    }

    pub fn generate_with<R: Rng>(
        prefix: &str,
        width: usize,
        count: usize,
        bounds: &BoundingBox,
        rng: &mut R,
    ) -> Result<Self> {
        check_bounds(bounds)?;

        if count == 0 {
            return Err(AppError::GenerationFailure(
                "location count must be positive".to_string(),
            ));
        }

        if count.to_string().len() > width {
            return Err(AppError::GenerationFailure(format!(
                "identifier width {width} cannot hold {count} locations"
            )));
        }

        let locations: Vec<Location> = (1..=count)
            .map(|n| Location {
                id: format!("{prefix}-{n:0width$}"),
                lat: rng.gen_range(bounds.lat_min..=bounds.lat_max),
                lon: rng.gen_range(bounds.lon_min..=bounds.lon_max),
            })
            .collect();

        let index = locations
            .iter()
            .enumerate()
            .map(|(i, loc)| (loc.id.clone(), i))
            .collect();

        tracing::debug!(count, prefix, "Generated locations");

        Ok(Self { locations, index })
    }

    pub fn all(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Location> {
        self.index.get(id).map(|&i| &self.locations[i])
    }

    /// Zero-based position of `id` in generation order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn first(&self) -> Option<&Location> {
        self.locations.first()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(|loc| loc.id.as_str())
    }
}

fn check_bounds(bounds: &BoundingBox) -> Result<()> {
    let values = [bounds.lat_min, bounds.lat_max, bounds.lon_min, bounds.lon_max];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AppError::GenerationFailure(
            "bounding box contains a non-finite value".to_string(),
        ));
    }
    if bounds.lat_min > bounds.lat_max || bounds.lon_min > bounds.lon_max {
        return Err(AppError::GenerationFailure(format!(
            "inverted bounding box: {bounds:?}"
        )));
    }
    if bounds.lat_min < -90.0 || bounds.lat_max > 90.0 {
        return Err(AppError::GenerationFailure(
            "latitude outside [-90, 90]".to_string(),
        ));
    }
    if bounds.lon_min < -180.0 || bounds.lon_max > 180.0 {
        return Err(AppError::GenerationFailure(
            "longitude outside [-180, 180]".to_string(),
        ));
    }
    Ok(())
}
