use super::config::{DescentConfig, DescentStrategy};
use super::error::EngineError;
use crate::core::energy::EnergyModel;
use crate::core::energy::moves::MoveSet;
use crate::core::models::minimum::Minimum;
use crate::core::models::structure::Structure;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Gradient descent to the canonical local minimum of a structure.
pub struct Walker<'a, M: EnergyModel + ?Sized> {
    moves: MoveSet<'a, M>,
    strategy: DescentStrategy,
    max_steps: usize,
    rng: StdRng,
}

impl<'a, M: EnergyModel + ?Sized> Walker<'a, M> {
    pub fn new(model: &'a M, config: &DescentConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            moves: MoveSet::new(model).with_plateau_limit(config.plateau_limit),
            strategy: config.strategy,
            max_steps: config.max_steps,
            rng,
        }
    }

    /// A walker that always takes the steepest step, whatever the configured strategy.
    pub fn steepest(model: &'a M, config: &DescentConfig) -> Self {
        let mut walker = Self::new(model, config);
        walker.strategy = DescentStrategy::Steepest;
        walker
    }

    pub fn model(&self) -> &'a M {
        self.moves.model()
    }

    /// Descends `current` in place and returns the number of steps taken.
    pub fn descend(&mut self, current: &mut Minimum) -> Result<usize, EngineError> {
        let start = current.structure.to_string();
        let mut steps = 0;
        loop {
            let moved = match self.strategy {
                DescentStrategy::Steepest => self.moves.apply_best_move(current),
                DescentStrategy::Random => {
                    self.moves.apply_random_improving_move(current, &mut self.rng)
                }
            };
            self.moves.clear_scratch();
            if !moved {
                return Ok(steps);
            }
            steps += 1;
            if steps > self.max_steps {
                return Err(EngineError::DescentLimit {
                    start,
                    steps: self.max_steps,
                });
            }
        }
    }

    pub fn descend_from(&mut self, structure: Structure) -> Result<Minimum, EngineError> {
        let mut current = self.model().evaluate(structure);
        self.descend(&mut current)?;
        Ok(current)
    }
}
