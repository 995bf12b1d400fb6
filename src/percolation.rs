use crate::{error::Error, forest::DisjointSetForest};
use rand::Rng;
use tracing::trace;

/// Approximate fraction of open sites at which a large grid starts to
/// percolate. Callers can use this as a stopping heuristic. It is not enforced
/// anywhere in the simulation.
pub const PERCOLATION_THRESHOLD: f64 = 0.596;

/// Smallest supported side of the grid.
pub const MIN_SIDE: usize = 5;

/// How the left and right neighbors of a site are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeRule {
    /// The grid is treated as a flat row-major buffer, and a neighbor is only
    /// discarded if it falls outside that buffer. A site on the right edge of
    /// a row is therefore adjacent to the site on the left edge of the next
    /// row, and vice versa.
    #[default]
    Flat,
    /// Neighbors never cross row boundaries.
    Bounded,
}

/**
Square grid of sites that are opened one at a time, tracking whether there is
a path of open sites from the top row to the bottom row.

Site `i` of the row-major grid is node `i` of the forest. Node 0 doubles as the
virtual top, so site 0 is reserved and never opened. The virtual bottom sits
past the end of the grid at node `side * side + 1`. Both virtual nodes are
connected to their whole row up front, so percolation is a single root
comparison.
*/
#[derive(Debug, Clone)]
pub struct PercolationSimulation {
    side: usize,
    open: Vec<bool>,
    open_count: usize,
    forest: DisjointSetForest,
    edge_rule: EdgeRule,
    percolated_at: Option<usize>,
}

impl PercolationSimulation {
    /// Create a grid with `side * side` closed sites, using the flat edge
    /// rule.
    pub fn new(side: usize) -> Result<PercolationSimulation, Error> {
        Self::with_edge_rule(side, EdgeRule::Flat)
    }

    pub fn with_edge_rule(
        side: usize,
        edge_rule: EdgeRule,
    ) -> Result<PercolationSimulation, Error> {
        if side < MIN_SIDE {
            return Err(Error::SideTooSmall(side));
        }
        let site_count = side * side;
        let mut sim = PercolationSimulation {
            side,
            open: vec![false; site_count],
            open_count: 0,
            forest: DisjointSetForest::new(site_count + 2),
            edge_rule,
            percolated_at: None,
        };
        let (top, bottom) = (sim.top(), sim.bottom());
        for col in 0..side {
            sim.forest.unite(top, col);
            sim.forest.unite(bottom, site_count - side + col);
        }
        return Ok(sim);
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn site_count(&self) -> usize {
        self.open.len()
    }

    pub fn edge_rule(&self) -> EdgeRule {
        self.edge_rule
    }

    /// Number of sites opened so far.
    pub fn open_count(&self) -> usize {
        self.open_count
    }

    /// Fraction of the grid that is open, in [0, 1].
    pub fn open_fraction(&self) -> f64 {
        self.open_count as f64 / self.site_count() as f64
    }

    /// True when every site except the reserved one is open.
    pub fn is_full(&self) -> bool {
        self.open_count + 1 == self.site_count()
    }

    pub fn is_open(&self, site: usize) -> Result<bool, Error> {
        match self.open.get(site) {
            Some(flag) => Ok(*flag),
            None => Err(Error::IndexOutOfBounds(site, self.site_count())),
        }
    }

    /// True if there is a path of open sites connecting the top and bottom rows.
    pub fn is_percolating(&self) -> bool {
        self.forest.root(self.top()) == self.forest.root(self.bottom())
    }

    /// Number of open sites at the moment the grid first percolated.
    pub fn percolated_at(&self) -> Option<usize> {
        self.percolated_at
    }

    /// Open a closed site picked uniformly at random, and return it. Returns
    /// `None` without touching the grid if every site is already open.
    pub fn open_random_site<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        // Always terminates because at least one site is still closed.
        let site = loop {
            let site = rng.random_range(1..self.site_count());
            if !self.open[site] {
                break site;
            }
        };
        self.open_site(site);
        return Some(site);
    }

    /// Open `site`. Returns false if it was already open.
    pub fn open(&mut self, site: usize) -> Result<bool, Error> {
        if site == 0 {
            return Err(Error::ReservedSite);
        }
        if self.is_open(site)? {
            return Ok(false);
        }
        self.open_site(site);
        return Ok(true);
    }

    fn top(&self) -> usize {
        0
    }

    fn bottom(&self) -> usize {
        self.site_count() + 1
    }

    /// Indices of the orthogonal neighbors of `site` (up, down, left, right)
    /// that lie inside the grid, according to the edge rule.
    fn neighbors(&self, site: usize) -> [Option<usize>; 4] {
        let n = self.site_count();
        let up = site.checked_sub(self.side);
        let down = Some(site + self.side).filter(|i| *i < n);
        let (left, right) = match self.edge_rule {
            EdgeRule::Flat => (site.checked_sub(1), Some(site + 1).filter(|i| *i < n)),
            EdgeRule::Bounded => {
                let col = site % self.side;
                ((col > 0).then(|| site - 1), (col + 1 < self.side).then(|| site + 1))
            }
        };
        [up, down, left, right]
    }

    /// The caller must ensure `site` is a valid closed site.
    fn open_site(&mut self, site: usize) {
        self.open[site] = true;
        self.open_count += 1;
        for neighbor in self.neighbors(site).into_iter().flatten() {
            if self.open[neighbor] {
                self.forest.unite(site, neighbor);
            }
        }
        if self.percolated_at.is_none() && self.is_percolating() {
            self.percolated_at = Some(self.open_count);
            trace!(
                side = self.side,
                open_count = self.open_count,
                fraction = self.open_fraction(),
                "grid percolates"
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::check_forest;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn t_side_too_small() {
        for side in 0..MIN_SIDE {
            assert_eq!(
                PercolationSimulation::new(side).unwrap_err(),
                Error::SideTooSmall(side)
            );
        }
        assert!(PercolationSimulation::new(MIN_SIDE).is_ok());
    }

    #[test]
    fn t_initial_state() {
        let sim = PercolationSimulation::new(6).unwrap();
        assert_eq!(sim.side(), 6);
        assert_eq!(sim.site_count(), 36);
        assert_eq!(sim.open_count(), 0);
        assert_eq!(sim.open_fraction(), 0.);
        assert!(!sim.is_full());
        assert!(!sim.is_percolating());
        assert_eq!(sim.percolated_at(), None);
        assert_eq!(sim.edge_rule(), EdgeRule::Flat);
        for site in 0..36 {
            assert_eq!(sim.is_open(site), Ok(false));
        }
        // The virtual nodes are connected to their rows.
        assert_eq!(sim.forest.len(), 38);
        for col in 0..6 {
            assert_eq!(sim.forest.root(col), sim.forest.root(sim.top()));
            assert_eq!(sim.forest.root(30 + col), sim.forest.root(sim.bottom()));
        }
        assert_ne!(sim.forest.root(6), sim.forest.root(sim.top()));
        check_forest(&sim.forest);
    }

    #[test]
    fn t_open_row_major() {
        let mut sim = PercolationSimulation::new(5).unwrap();
        for site in 1..25 {
            assert_eq!(sim.open(site), Ok(true));
        }
        assert!(sim.is_full());
        assert!(sim.is_percolating());
        assert_eq!(sim.open_count(), 24);
        assert_eq!(sim.open_fraction(), 24. / 25.);
        check_forest(&sim.forest);
    }

    #[test]
    fn t_open_errors() {
        let mut sim = PercolationSimulation::new(5).unwrap();
        assert_eq!(sim.open(0), Err(Error::ReservedSite));
        assert_eq!(sim.open(25), Err(Error::IndexOutOfBounds(25, 25)));
        assert_eq!(sim.is_open(25), Err(Error::IndexOutOfBounds(25, 25)));
        assert_eq!(sim.open(7), Ok(true));
        assert_eq!(sim.open(7), Ok(false));
        assert_eq!(sim.open_count(), 1);
    }

    #[test]
    fn t_column_path() {
        for rule in [EdgeRule::Flat, EdgeRule::Bounded] {
            let mut sim = PercolationSimulation::with_edge_rule(7, rule).unwrap();
            for row in 0..7 {
                assert!(!sim.is_percolating());
                sim.open(row * 7 + 3).unwrap();
            }
            assert!(sim.is_percolating());
            assert_eq!(sim.percolated_at(), Some(7));
        }
    }

    #[test]
    fn t_edge_wrap() {
        // Right edge of row 0 and left edge of row 1 are adjacent in the flat
        // buffer.
        let mut flat = PercolationSimulation::with_edge_rule(5, EdgeRule::Flat).unwrap();
        let mut bounded = PercolationSimulation::with_edge_rule(5, EdgeRule::Bounded).unwrap();
        for sim in [&mut flat, &mut bounded] {
            sim.open(9).unwrap();
            sim.open(10).unwrap();
        }
        assert_eq!(flat.forest.root(9), flat.forest.root(10));
        assert_ne!(bounded.forest.root(9), bounded.forest.root(10));
        // A staircase along the wrapped edges percolates only in the flat grid.
        for sim in [&mut flat, &mut bounded] {
            for site in [4, 14, 15, 19, 20] {
                sim.open(site).unwrap();
            }
        }
        assert!(flat.is_percolating());
        assert!(!bounded.is_percolating());
    }

    #[test]
    fn t_random_until_full() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut sim = PercolationSimulation::new(8).unwrap();
        let mut opened = vec![false; 64];
        let mut was_percolating = false;
        while let Some(site) = sim.open_random_site(&mut rng) {
            assert_ne!(site, 0);
            assert!(!opened[site]);
            opened[site] = true;
            assert_eq!(sim.is_open(site), Ok(true));
            // Once percolating, always percolating.
            let now = sim.is_percolating();
            assert!(!was_percolating || now);
            was_percolating = now;
        }
        assert!(sim.is_full());
        assert_eq!(sim.open_count(), 63);
        assert!(!opened[0]);
        assert!(sim.is_percolating());
        assert!(sim.percolated_at().is_some());
        // Nothing left to open.
        assert_eq!(sim.open_random_site(&mut rng), None);
        assert_eq!(sim.open_count(), 63);
        check_forest(&sim.forest);
    }

    #[test]
    fn t_open_fraction() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut sim = PercolationSimulation::with_edge_rule(10, EdgeRule::Bounded).unwrap();
        for i in 1..=40 {
            sim.open_random_site(&mut rng).unwrap();
            assert_eq!(sim.open_fraction(), i as f64 / 100.);
        }
    }
}
