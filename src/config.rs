use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;

use crate::grid::{GridError, MazeGrid};
use crate::grid_traits::GridObserver;
use crate::units::{Height, Width};

/// The options one maze generation run is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MazeConfig {
    pub width: usize,
    pub height: usize,
    /// Reproduce the same maze every time. `None` draws a seed from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl MazeConfig {
    pub fn new(width: usize, height: usize, seed: Option<u64>) -> Result<MazeConfig, GridError> {
        let config = MazeConfig { width, height, seed };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.width == 0 || self.height == 0 {
            Err(GridError::InvalidDimensions)
        } else {
            Ok(())
        }
    }

    pub fn build_grid(&self, observer: Option<Box<dyn GridObserver>>) -> Result<MazeGrid, GridError> {
        match observer {
            Some(obs) => MazeGrid::with_observer(Width(self.width), Height(self.height), obs),
            None => MazeGrid::new(Width(self.width), Height(self.height)),
        }
    }

    pub fn rng(&self) -> XorShiftRng {
        match self.seed {
            Some(seed) => XorShiftRng::seed_from_u64(seed),
            None => XorShiftRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::RecursiveBacktracker;

    #[test]
    fn non_positive_dimensions_are_invalid() {
        assert_eq!(MazeConfig::new(0, 4, None), Err(GridError::InvalidDimensions));
        assert_eq!(MazeConfig::new(4, 0, Some(1)), Err(GridError::InvalidDimensions));
        assert!(MazeConfig::new(4, 4, None).is_ok());
    }

    #[test]
    fn seeded_configs_build_identical_mazes() {
        let config = MazeConfig::new(8, 5, Some(99)).unwrap();
        let build = || {
            let mut g = config.build_grid(None).unwrap();
            RecursiveBacktracker::new(&mut g, config.rng()).run_to_completion().unwrap();
            g.cleared_walls().collect::<Vec<_>>()
        };
        assert_eq!(build(), build());
    }
}
