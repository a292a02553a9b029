use crate::error::{Error, Result};

/// The binomial coefficient `C(n, k)`.
///
/// Fails with `DegenerateInput` when `k > n` and with `NumericDomain` when
/// the result does not fit in a `u64`.
pub fn binomial(n: u64, k: u64) -> Result<u64> {
    if k > n {
        return Err(Error::DegenerateInput(format!("cannot choose {k} of {n}")));
    }

    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // Exact at every step: acc * (n - i) is divisible by i + 1.
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        if acc > u64::MAX as u128 {
            return Err(Error::NumericDomain(format!("C({n}, {k}) overflows u64")));
        }
    }
    Ok(acc as u64)
}

/// Iterator over the `k`-element subsets of `0..n` in lexicographic order,
/// each as a sorted index vector.
#[derive(Clone, Debug)]
pub struct KSubsets {
    n: usize,
    current: Option<Vec<usize>>,
}

impl KSubsets {
    pub fn new(n: usize, k: usize) -> Result<Self> {
        if k > n {
            return Err(Error::DegenerateInput(format!("cannot choose {k} of {n}")));
        }
        Ok(Self { n, current: Some((0..k).collect()) })
    }
}

impl Iterator for KSubsets {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let subset = self.current.take()?;
        let k = subset.len();

        // Advance the rightmost index that still has room, then reset the tail.
        let mut successor = subset.clone();
        if let Some(i) = (0..k).rev().find(|&i| successor[i] < self.n - k + i) {
            successor[i] += 1;
            for j in i + 1..k {
                successor[j] = successor[j - 1] + 1;
            }
            self.current = Some(successor);
        }

        Some(subset)
    }
}
