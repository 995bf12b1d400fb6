use crate::{
    error::Error,
    percolation::{EdgeRule, MIN_SIDE, PercolationSimulation},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info};

/// z-score of the two sided 95% confidence interval.
const CONFIDENCE_95: f64 = 1.96;

/// Monte Carlo estimate of the percolation threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub trials: usize,
    pub mean: f64,
    /// Sample standard deviation.
    pub stddev: f64,
    pub confidence_lo: f64,
    pub confidence_hi: f64,
}

/// Configuration for a batch of independent percolation trials on grids of
/// the same size. The same seed always produces the same results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Experiment {
    side: usize,
    trials: usize,
    seed: u64,
    edge_rule: EdgeRule,
}

/// Open random sites on a fresh grid until it percolates, and return the
/// fraction of open sites at that point.
pub fn run_trial<R: Rng + ?Sized>(
    side: usize,
    edge_rule: EdgeRule,
    rng: &mut R,
) -> Result<f64, Error> {
    let mut sim = PercolationSimulation::with_edge_rule(side, edge_rule)?;
    while !sim.is_percolating() && sim.open_random_site(rng).is_some() {}
    return Ok(sim.open_fraction());
}

impl Experiment {
    pub fn new(side: usize, trials: usize) -> Result<Experiment, Error> {
        if side < MIN_SIDE {
            return Err(Error::SideTooSmall(side));
        }
        if trials < 2 {
            return Err(Error::TooFewTrials(trials));
        }
        Ok(Experiment {
            side,
            trials,
            seed: 0,
            edge_rule: EdgeRule::default(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Experiment {
        self.seed = seed;
        self
    }

    pub fn with_edge_rule(mut self, edge_rule: EdgeRule) -> Experiment {
        self.edge_rule = edge_rule;
        self
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn edge_rule(&self) -> EdgeRule {
        self.edge_rule
    }

    /// Run all the trials and estimate the threshold from the fractions at
    /// which each grid started to percolate.
    pub fn run(&self) -> Result<Estimate, Error> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut fractions = Vec::with_capacity(self.trials);
        for trial in 0..self.trials {
            let fraction = run_trial(self.side, self.edge_rule, &mut rng)?;
            debug!(trial, fraction, "trial finished");
            fractions.push(fraction);
        }
        let estimate = estimate(&fractions);
        info!(
            side = self.side,
            trials = self.trials,
            mean = estimate.mean,
            stddev = estimate.stddev,
            "experiment finished"
        );
        return Ok(estimate);
    }

    /// Fraction of trials in which the grid percolates once `fraction` of its
    /// sites are open. Passing `PERCOLATION_THRESHOLD` tells how often the
    /// threshold heuristic is enough on grids of this size.
    pub fn percolation_probability(&self, fraction: f64) -> Result<f64, Error> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(Error::InvalidFraction);
        }
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut hits = 0usize;
        for trial in 0..self.trials {
            let mut sim = PercolationSimulation::with_edge_rule(self.side, self.edge_rule)?;
            while sim.open_fraction() < fraction && sim.open_random_site(&mut rng).is_some() {}
            let percolating = sim.is_percolating();
            debug!(trial, percolating, "trial finished");
            if percolating {
                hits += 1;
            }
        }
        return Ok(hits as f64 / self.trials as f64);
    }
}

/// Mean, sample standard deviation and 95% confidence interval of `samples`.
/// Expects at least two samples.
fn estimate(samples: &[f64]) -> Estimate {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.);
    let stddev = variance.sqrt();
    let margin = CONFIDENCE_95 * stddev / n.sqrt();
    Estimate {
        trials: samples.len(),
        mean,
        stddev,
        confidence_lo: mean - margin,
        confidence_hi: mean + margin,
    }
}
