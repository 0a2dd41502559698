//! Daily update engine
//!
//! Advances a forest grid by one day in four fixed phases:
//!
//! 1. Maintenance: raking on raking days, nutrient depletion every day
//! 2. Fire resolution: expired fires go out, scheduled ignitions take effect
//! 3. Growth: Poisson leaf growth and fall on every cell not burning
//! 4. Ignition check: each cell not burning may be scheduled to ignite tomorrow
//!
//! Random draws are consumed in a fixed order: all growth draws in row-major
//! cell order, then all ignition draws in row-major cell order.
//!
//! Phase 4 only writes `will_be_on_fire`, which nothing reads until phase 2 of
//! the next day, so evaluating cells in place is equivalent to evaluating them
//! against a snapshot of the fire state left by phase 2.

use crate::config::{DailyRates, FallMode, SimulationConfig};
use crate::core_types::{PoissonDraw, VolumeDraw};
use crate::grid::{ForestGrid, NeighborTopology};
use rand::Rng;

/// Leaf growth and fall samplers for one season
#[derive(Debug, Clone)]
struct SeasonDraws {
    growth: VolumeDraw,
    fall: VolumeDraw,
}

/// One-day update of a forest grid
///
/// Borrows the static configuration and the shared topology; holds no
/// per-trial state of its own, so a single instance can drive any number of
/// sequential trials on the same shape.
#[derive(Debug, Clone)]
pub struct DailyUpdate<'a> {
    config: &'a SimulationConfig,
    topology: &'a NeighborTopology,
    season_draws: [SeasonDraws; 4],
    fire_duration: PoissonDraw,
}

impl<'a> DailyUpdate<'a> {
    /// Create an engine for `config` on a grid matching `topology`
    pub fn new(config: &'a SimulationConfig, topology: &'a NeighborTopology) -> Self {
        debug_assert!(topology.matches(config.rows, config.cols));
        let season_draws = std::array::from_fn(|i| {
            // Rates only depend on the season, pick any day inside season `i`
            let rates = config.daily_rates((i as u32).saturating_mul(config.season_length));
            SeasonDraws {
                growth: VolumeDraw::new(rates.growth_mean),
                fall: VolumeDraw::new(rates.fall_mean),
            }
        });
        Self {
            config,
            topology,
            season_draws,
            fire_duration: PoissonDraw::new(config.average_fire_duration),
        }
    }

    /// Run all four phases for day `day`
    pub fn advance<R: Rng + ?Sized>(&self, grid: &mut ForestGrid, day: u32, rng: &mut R) {
        let rates = self.config.daily_rates(day);
        self.maintenance(grid, day);
        self.resolve_fires(grid, day);
        self.grow(grid, &rates, rng);
        self.check_ignitions(grid, day, &rates, rng);
    }

    /// Phase 1: rake on raking days and deplete nutrients
    pub fn maintenance(&self, grid: &mut ForestGrid, day: u32) {
        let rake = self.config.is_raking_day(day);
        for cell in grid.cells_mut() {
            if rake {
                cell.leaf_volume -= self.config.raking_amount;
            }
            cell.nutrient_volume -= self.config.nutrient_depletion_rate;
        }
    }

    /// Phase 2: extinguish expired fires, ignite cells scheduled yesterday
    ///
    /// Igniting converts the cell's standing leaves into nutrients.
    pub fn resolve_fires(&self, grid: &mut ForestGrid, day: u32) {
        for cell in grid.cells_mut() {
            if cell.is_on_fire && cell.fire_end_time <= day {
                cell.is_on_fire = false;
            }
            if cell.will_be_on_fire {
                cell.is_on_fire = true;
                cell.will_be_on_fire = false;
                let burned = cell.leaf_volume.take();
                cell.nutrient_volume += burned;
            }
        }
    }

    /// Phase 3: apply the day's leaf growth and fall to cells not burning
    pub fn grow<R: Rng + ?Sized>(&self, grid: &mut ForestGrid, rates: &DailyRates, rng: &mut R) {
        let draws = &self.season_draws[rates.season.index()];
        for cell in grid.cells_mut() {
            if cell.is_on_fire {
                continue;
            }
            let growth = draws.growth.sample(rng);
            let fall = draws.fall.sample(rng);
            let delta = match self.config.fall_mode {
                FallMode::Add => growth + fall,
                FallMode::Subtract => growth - fall,
            };
            cell.leaf_volume += delta;
        }
    }

    /// Phase 4: schedule tomorrow's ignitions
    ///
    /// A cell ignites when a uniform draw is strictly below its ignition
    /// probability, so a probability of zero never ignites.
    pub fn check_ignitions<R: Rng + ?Sized>(
        &self,
        grid: &mut ForestGrid,
        day: u32,
        rates: &DailyRates,
        rng: &mut R,
    ) {
        for index in 0..grid.len() {
            if grid.cells()[index].is_on_fire {
                continue;
            }
            let p_fire = self.ignition_probability(grid, index, rates.base_ignition);
            let draw: f64 = rng.random();
            if draw < p_fire {
                let duration = self.fire_duration.sample(rng);
                let end = day.saturating_add(u32::try_from(duration).unwrap_or(u32::MAX));
                grid.cells_mut()[index].schedule_ignition(end);
            }
        }
    }

    /// Ignition probability of the cell at flat index `index`
    ///
    /// Sum of the seasonal base rate, a contribution per burning corner and
    /// edge neighbor, and a term proportional to the cell's standing leaves.
    pub fn ignition_probability(&self, grid: &ForestGrid, index: usize, base_rate: f64) -> f64 {
        let cells = grid.cells();
        let burning = |neighbors: &[u32]| {
            neighbors
                .iter()
                .filter(|&&n| cells[n as usize].is_on_fire)
                .count() as f64
        };
        let p_neighbors = burning(self.topology.corners(index)) * self.config.p_fire_neighbor_corner
            + burning(self.topology.edges(index)) * self.config.p_fire_neighbor_edge;
        let p_fuel = *cells[index].leaf_volume * self.config.fuel_ignition_coefficient;
        base_rate + p_neighbors + p_fuel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{SeasonParams, UnitVolume};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_raking_clamps_at_zero() {
        let config = SimulationConfig {
            raking_frequency: 1,
            raking_amount: 0.06,
            ..SimulationConfig::quiescent(1, 1)
        };
        let topology = NeighborTopology::build(1, 1);
        let engine = DailyUpdate::new(&config, &topology);
        let mut grid = ForestGrid::new(1, 1);
        grid.cell_mut(0, 0).unwrap().set_leaf_volume(0.02);

        engine.maintenance(&mut grid, 0);

        assert_eq!(grid.cell(0, 0).unwrap().leaf_volume, 0.0);
    }

    #[test]
    fn test_raking_skips_off_days() {
        let config = SimulationConfig {
            raking_frequency: 7,
            raking_amount: 0.1,
            ..SimulationConfig::quiescent(1, 1)
        };
        let topology = NeighborTopology::build(1, 1);
        let engine = DailyUpdate::new(&config, &topology);
        let mut grid = ForestGrid::new(1, 1);
        grid.cell_mut(0, 0).unwrap().set_leaf_volume(0.5);

        engine.maintenance(&mut grid, 3);
        assert_eq!(grid.cell(0, 0).unwrap().leaf_volume, 0.5);
        engine.maintenance(&mut grid, 7);
        assert!((grid.cell(0, 0).unwrap().leaf_volume - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_nutrients_deplete_to_zero() {
        let config = SimulationConfig {
            nutrient_depletion_rate: 0.3,
            ..SimulationConfig::quiescent(1, 2)
        };
        let topology = NeighborTopology::build(1, 2);
        let engine = DailyUpdate::new(&config, &topology);
        let mut grid = ForestGrid::new(1, 2);
        grid.cell_mut(0, 0).unwrap().set_nutrient_volume(0.5);

        engine.maintenance(&mut grid, 1);
        assert!((grid.cell(0, 0).unwrap().nutrient_volume - 0.2).abs() < 1e-12);
        engine.maintenance(&mut grid, 2);
        assert_eq!(grid.cell(0, 0).unwrap().nutrient_volume, 0.0);
        assert_eq!(grid.cell(0, 1).unwrap().nutrient_volume, 0.0);
    }

    #[test]
    fn test_scheduled_ignition_converts_leaves() {
        let config = SimulationConfig::quiescent(1, 1);
        let topology = NeighborTopology::build(1, 1);
        let engine = DailyUpdate::new(&config, &topology);
        let mut grid = ForestGrid::new(1, 1);
        {
            let cell = grid.cell_mut(0, 0).unwrap();
            cell.set_leaf_volume(0.7);
            cell.set_nutrient_volume(0.6);
            cell.schedule_ignition(10);
        }

        engine.resolve_fires(&mut grid, 5);

        let view = grid.cell(0, 0).unwrap();
        assert!(view.is_on_fire);
        assert!(!view.will_be_on_fire);
        assert_eq!(view.leaf_volume, 0.0);
        assert_eq!(view.nutrient_volume, 1.0);
        assert_eq!(view.fire_end_time, Some(10));
    }

    #[test]
    fn test_fire_goes_out_on_end_day() {
        let config = SimulationConfig::quiescent(1, 1);
        let topology = NeighborTopology::build(1, 1);
        let engine = DailyUpdate::new(&config, &topology);
        let mut grid = ForestGrid::new(1, 1);
        grid.cell_mut(0, 0).unwrap().ignite_until(4);

        engine.resolve_fires(&mut grid, 3);
        assert!(grid.cell(0, 0).unwrap().is_on_fire);
        engine.resolve_fires(&mut grid, 4);
        assert!(!grid.cell(0, 0).unwrap().is_on_fire);
    }

    #[test]
    fn test_burning_cells_do_not_grow() {
        let config = SimulationConfig {
            average_leaf_growth: 0.05,
            ..SimulationConfig::quiescent(1, 2)
        };
        let topology = NeighborTopology::build(1, 2);
        let engine = DailyUpdate::new(&config, &topology);
        let mut grid = ForestGrid::new(1, 2);
        grid.cell_mut(0, 0).unwrap().ignite_until(100);
        let rates = config.daily_rates(0);
        let mut rng = rng();

        for _ in 0..20 {
            engine.grow(&mut grid, &rates, &mut rng);
        }

        assert_eq!(grid.cell(0, 0).unwrap().leaf_volume, 0.0);
        assert!(grid.cell(0, 1).unwrap().leaf_volume > 0.0);
    }

    #[test]
    fn test_subtract_mode_shrinks_fuel() {
        let config = SimulationConfig {
            average_leaf_fall: 0.05,
            fall_mode: FallMode::Subtract,
            ..SimulationConfig::quiescent(1, 1)
        };
        let topology = NeighborTopology::build(1, 1);
        let engine = DailyUpdate::new(&config, &topology);
        let mut grid = ForestGrid::new(1, 1);
        grid.cell_mut(0, 0).unwrap().set_leaf_volume(0.5);
        let rates = config.daily_rates(0);
        let mut rng = rng();

        for _ in 0..100 {
            engine.grow(&mut grid, &rates, &mut rng);
        }

        assert_eq!(grid.cell(0, 0).unwrap().leaf_volume, 0.0);
    }

    #[test]
    fn test_neighbor_probability_composition() {
        let config = SimulationConfig {
            seasons: [SeasonParams::new(0.0, 0.0, 0.003); 4],
            p_fire_neighbor_corner: 0.05,
            p_fire_neighbor_edge: 0.075,
            fuel_ignition_coefficient: 0.25,
            ..SimulationConfig::quiescent(2, 2)
        };
        let topology = NeighborTopology::build(2, 2);
        let engine = DailyUpdate::new(&config, &topology);
        let mut grid = ForestGrid::new(2, 2);
        grid.cell_mut(0, 0).unwrap().ignite_until(5);
        grid.cell_mut(1, 1).unwrap().set_leaf_volume(0.4);
        grid.cell_mut(0, 1).unwrap().set_leaf_volume(0.2);
        let base = config.daily_rates(0).base_ignition;

        let corner = engine.ignition_probability(&grid, grid.index(1, 1), base);
        assert!((corner - (0.003 + 0.05 + 0.4 * 0.25)).abs() < 1e-12);

        let edge = engine.ignition_probability(&grid, grid.index(0, 1), base);
        assert!((edge - (0.003 + 0.075 + 0.2 * 0.25)).abs() < 1e-12);

        let edge = engine.ignition_probability(&grid, grid.index(1, 0), base);
        assert!((edge - (0.003 + 0.075)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_probability_never_schedules() {
        let config = SimulationConfig::quiescent(3, 3);
        let topology = NeighborTopology::build(3, 3);
        let engine = DailyUpdate::new(&config, &topology);
        let mut grid = ForestGrid::new(3, 3);
        let mut rng = rng();

        for day in 0..500 {
            engine.advance(&mut grid, day, &mut rng);
            assert!(grid.cells().iter().all(|c| !c.will_be_on_fire()));
            assert_eq!(grid.burning_count(), 0);
        }
    }

    #[test]
    fn test_certain_ignition_schedules_fire_duration() {
        let config = SimulationConfig {
            seasons: [SeasonParams::new(0.0, 0.0, 1.0); 4],
            average_fire_duration: 0.0,
            ..SimulationConfig::quiescent(1, 1)
        };
        let topology = NeighborTopology::build(1, 1);
        let engine = DailyUpdate::new(&config, &topology);
        let mut grid = ForestGrid::new(1, 1);
        let rates = config.daily_rates(0);
        let mut rng = rng();

        engine.check_ignitions(&mut grid, 12, &rates, &mut rng);

        let cell = grid.cells()[0];
        assert!(cell.will_be_on_fire());
        assert!(!cell.is_on_fire());
        assert_eq!(cell.fire_end_time(), 12);
    }

    #[test]
    fn test_draws_follow_growth_then_ignition_order() {
        let config = SimulationConfig {
            seasons: [SeasonParams::new(0.0, 0.0, 0.3); 4],
            average_leaf_growth: 0.02,
            average_leaf_fall: 0.01,
            fuel_ignition_coefficient: 0.5,
            ..SimulationConfig::quiescent(1, 3)
        };
        let topology = NeighborTopology::build(1, 3);
        let engine = DailyUpdate::new(&config, &topology);
        let start = [0.1, 0.4, 0.7];
        let mut grid = ForestGrid::new(1, 3);
        for (col, &leaf) in start.iter().enumerate() {
            grid.cell_mut(0, col).unwrap().set_leaf_volume(leaf);
        }
        let day = 1;
        let rates = config.daily_rates(day);
        let mut rng = rng();
        let mut replay = rng.clone();

        engine.advance(&mut grid, day, &mut rng);

        // Growth: growth then fall per cell, row-major
        let growth = VolumeDraw::new(rates.growth_mean);
        let fall = VolumeDraw::new(rates.fall_mean);
        for (index, &leaf) in start.iter().enumerate() {
            let g = growth.sample(&mut replay);
            let f = fall.sample(&mut replay);
            let expected = UnitVolume::new(leaf) + (g + f);
            assert_eq!(grid.cells()[index].leaf_volume(), expected, "cell {index}");
        }

        // Ignition: one uniform per cell, plus a duration draw when it ignites
        let duration = PoissonDraw::new(config.average_fire_duration);
        for index in 0..grid.len() {
            let p_fire = engine.ignition_probability(&grid, index, rates.base_ignition);
            let draw: f64 = replay.random();
            let ignites = draw < p_fire;
            let cell = grid.cells()[index];
            assert_eq!(cell.will_be_on_fire(), ignites, "cell {index}");
            if ignites {
                let end = day + duration.sample(&mut replay) as u32;
                assert_eq!(cell.fire_end_time(), end, "cell {index}");
            }
        }

        // Both streams are now at the same position
        assert_eq!(rng.random::<u64>(), replay.random::<u64>());
    }
}
