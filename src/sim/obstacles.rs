//! Static obstacle cells, generated once per episode

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Bounds, GridCell};
use super::spawn::rejection_sample;
use crate::config::ObstacleConfig;

/// Occupancy set of obstacle cells
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    cells: HashSet<GridCell>,
}

impl ObstacleField {
    pub fn from_cells(cells: impl IntoIterator<Item = GridCell>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    /// Scatter primaries away from the start, then grow random clusters
    pub fn generate<R: Rng + ?Sized>(
        config: &ObstacleConfig,
        bounds: Bounds,
        start: GridCell,
        rng: &mut R,
    ) -> Self {
        let mut field = Self::default();

        for _ in 0..config.count {
            let primary = rejection_sample(
                rng,
                config.attempts,
                |rng| bounds.random_inner_cell(rng, config.edge_margin_x, config.edge_margin_y),
                |cell| !field.contains(cell) && cell.distance(start) > config.min_from_start,
            );
            let Some(primary) = primary else {
                continue;
            };
            field.cells.insert(primary);

            if config.cluster_size > 0 && rng.random::<f32>() < config.cluster_probability {
                field.grow_cluster(config, bounds, start, primary, rng);
            }
        }

        field
    }

    fn grow_cluster<R: Rng + ?Sized>(
        &mut self,
        config: &ObstacleConfig,
        bounds: Bounds,
        start: GridCell,
        primary: GridCell,
        rng: &mut R,
    ) {
        let radius = config.cluster_radius;
        let extra = rng.random_range(1..=config.cluster_size);
        for _ in 0..extra {
            let cell = primary.offset(
                rng.random_range(-radius..=radius),
                rng.random_range(-radius..=radius),
            );
            // Same start clearance as primaries; duplicates are no-ops on the set
            if bounds.contains(cell) && cell.distance(start) > config.min_from_start {
                self.cells.insert(cell);
            }
        }
    }

    #[inline]
    pub fn contains(&self, cell: GridCell) -> bool {
        self.cells.contains(&cell)
    }

    /// True if an obstacle is strictly closer than `distance`.
    /// Distances of 1 or less reduce to plain membership.
    pub fn any_within(&self, cell: GridCell, distance: f32) -> bool {
        if distance <= 1.0 {
            return distance > 0.0 && self.contains(cell);
        }
        self.cells.iter().any(|&o| o.distance(cell) < distance)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.cells.iter().copied()
    }

    /// Cells in a stable order, for display and comparisons
    pub fn sorted_cells(&self) -> Vec<GridCell> {
        let mut cells: Vec<_> = self.iter().collect();
        cells.sort();
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_generated_obstacles_respect_start_and_bounds() {
        let config = ObstacleConfig {
            cluster_probability: 0.0,
            ..Default::default()
        };
        let bounds = Bounds::new(120, 54);
        let start = GridCell::new(10, 27);
        let mut rng = Pcg32::seed_from_u64(2024);
        let field = ObstacleField::generate(&config, bounds, start, &mut rng);

        assert_eq!(field.len(), config.count as usize);
        for cell in field.iter() {
            assert!(bounds.contains(cell));
            assert!(cell.distance(start) > config.min_from_start);
            assert!((20..100).contains(&cell.x));
            assert!((5..49).contains(&cell.y));
        }
    }

    #[test]
    fn test_clusters_add_cells_near_primaries() {
        let plain = ObstacleConfig {
            count: 30,
            cluster_probability: 0.0,
            ..Default::default()
        };
        let clustered = ObstacleConfig {
            count: 30,
            cluster_probability: 1.0,
            ..Default::default()
        };
        let bounds = Bounds::new(120, 54);
        let start = GridCell::new(10, 27);
        let a = ObstacleField::generate(&plain, bounds, start, &mut Pcg32::seed_from_u64(5));
        let b = ObstacleField::generate(&clustered, bounds, start, &mut Pcg32::seed_from_u64(5));
        assert!(b.len() > a.len());
        for cell in b.iter() {
            assert!(bounds.contains(cell));
        }
    }

    #[test]
    fn test_cluster_cells_clipped_at_edges() {
        // Tiny grid: margins fall back to the full axis, clusters hit the border
        let config = ObstacleConfig {
            count: 20,
            min_from_start: 0.0,
            cluster_probability: 1.0,
            cluster_radius: 3,
            ..Default::default()
        };
        let bounds = Bounds::new(4, 4);
        let field = ObstacleField::generate(
            &config,
            bounds,
            GridCell::new(0, 0),
            &mut Pcg32::seed_from_u64(11),
        );
        assert!(field.len() <= 16);
        for cell in field.iter() {
            assert!(bounds.contains(cell));
        }
    }

    #[test]
    fn test_clusters_keep_clear_of_start() {
        // Radius larger than the start clearance
        let config = ObstacleConfig {
            count: 40,
            min_from_start: 1.0,
            edge_margin_x: 0,
            edge_margin_y: 0,
            cluster_probability: 1.0,
            cluster_size: 3,
            cluster_radius: 3,
            ..Default::default()
        };
        let bounds = Bounds::new(8, 8);
        let start = GridCell::new(4, 4);
        for seed in 0..20 {
            let field =
                ObstacleField::generate(&config, bounds, start, &mut Pcg32::seed_from_u64(seed));
            assert!(!field.contains(start));
            for cell in field.iter() {
                assert!(cell.distance(start) > config.min_from_start);
            }
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let config = ObstacleConfig::default();
        let bounds = Bounds::new(120, 54);
        let start = GridCell::new(10, 27);
        let a = ObstacleField::generate(&config, bounds, start, &mut Pcg32::seed_from_u64(77));
        let b = ObstacleField::generate(&config, bounds, start, &mut Pcg32::seed_from_u64(77));
        assert_eq!(a.sorted_cells(), b.sorted_cells());
    }

    #[test]
    fn test_any_within() {
        let field = ObstacleField::from_cells([GridCell::new(5, 5)]);
        assert!(field.any_within(GridCell::new(5, 5), 1.0));
        assert!(!field.any_within(GridCell::new(6, 5), 1.0));
        assert!(field.any_within(GridCell::new(6, 5), 1.5));
        assert!(!field.any_within(GridCell::new(5, 5), 0.0));
    }
}
