use crate::error::Error;

/*
Weighted union-find over the dense range of nodes `0..len`.

Only `union` compresses paths, using path halving while it resolves the two
roots. `find` and `connected` take `&self` and never touch the links, so a
forest that stops receiving unions keeps whatever height it has. Callers that
want flat trees for repeated queries have to get there through unions.
 */
#[derive(Debug, Clone, Default)]
pub struct DisjointSetForest {
    parents: Vec<usize>,
    // Only meaningful for roots. Stale for every other node.
    weights: Vec<usize>,
}

impl DisjointSetForest {
    /// Create a forest with `n` nodes, each in its own set.
    pub fn new(n: usize) -> DisjointSetForest {
        DisjointSetForest {
            parents: (0..n).collect(),
            weights: vec![1; n],
        }
    }

    /// Number of nodes in the forest.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Append `by` new singleton nodes at the end of the index range. The new
    /// nodes are not connected to anything.
    pub fn grow(&mut self, by: usize) -> Result<(), Error> {
        if by == 0 {
            return Err(Error::ZeroGrowth);
        }
        let old = self.len();
        self.parents.extend(old..(old + by));
        self.weights.resize(old + by, 1);
        return Ok(());
    }

    fn check(&self, id: usize) -> Result<usize, Error> {
        if id < self.len() {
            Ok(id)
        } else {
            Err(Error::IndexOutOfBounds(id, self.len()))
        }
    }

    /// Get the root of the set containing `id`. This does not compress the
    /// path from `id` to its root.
    pub fn find(&self, id: usize) -> Result<usize, Error> {
        Ok(self.root(self.check(id)?))
    }

    /// Check if `a` and `b` belong to the same set.
    pub fn connected(&self, a: usize, b: usize) -> Result<bool, Error> {
        let (a, b) = (self.check(a)?, self.check(b)?);
        return Ok(self.root(a) == self.root(b));
    }

    /// Merge the sets containing `a` and `b`. The root of the lighter set is
    /// attached under the root of the heavier set. When both sets weigh the
    /// same, the root of `a` goes under the root of `b`.
    pub fn union(&mut self, a: usize, b: usize) -> Result<(), Error> {
        let (a, b) = (self.check(a)?, self.check(b)?);
        self.unite(a, b);
        return Ok(());
    }

    /// Number of nodes in the set containing `id`.
    pub fn size_of(&self, id: usize) -> Result<usize, Error> {
        Ok(self.weights[self.find(id)?])
    }

    /// Iterator over the current roots, in ascending order.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.parents
            .iter()
            .enumerate()
            .filter_map(|(i, p)| if i == *p { Some(i) } else { None })
    }

    /// Number of disjoint sets.
    pub fn num_sets(&self) -> usize {
        self.roots().count()
    }

    /// Plain resolution. The caller must ensure `id` is in range.
    pub(crate) fn root(&self, mut id: usize) -> usize {
        while self.parents[id] != id {
            id = self.parents[id];
        }
        return id;
    }

    /// Resolution with path halving: every visited node is pointed at its
    /// grandparent on the way up.
    fn root_halving(&mut self, mut id: usize) -> usize {
        while self.parents[id] != id {
            self.parents[id] = self.parents[self.parents[id]];
            id = self.parents[id];
        }
        return id;
    }

    /// Unchecked union. The caller must ensure both indices are in range.
    pub(crate) fn unite(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let aroot = self.root_halving(a);
        let broot = self.root_halving(b);
        if aroot == broot {
            return;
        }
        let (child, parent) = if self.weights[aroot] > self.weights[broot] {
            (broot, aroot)
        } else {
            (aroot, broot)
        };
        self.parents[child] = parent;
        self.weights[parent] += self.weights[child];
    }

    #[cfg(test)]
    pub(crate) fn parents(&self) -> &[usize] {
        &self.parents
    }

    #[cfg(test)]
    pub(crate) fn weights(&self) -> &[usize] {
        &self.weights
    }
}
