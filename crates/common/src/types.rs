use serde::Serialize;

use crate::error::{Error, MatrixDefect};

/// Index of a tradable asset (0..N-1).
pub type Instrument = usize;

/// Type alias for a single edge list: (from, to, rate)
pub type Edge = (Instrument, Instrument, f64);

/// N×N table of conversion rates: `rows[i][j]` is how many units of `j`
/// one unit of `i` buys.
///
/// The matrix is a plain value and may hold invalid data; graph
/// construction calls [`RateMatrix::validate`] before using it.
#[derive(Debug, Clone, PartialEq)]
pub struct RateMatrix {
    rows: Vec<Vec<f64>>,
}

impl RateMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// Builds an arbitrage-free matrix from a reference price vector,
    /// `rate(i, j) = p_i / p_j`. Every closed walk over it multiplies to 1.
    pub fn from_prices(prices: &[f64]) -> Self {
        let rows = prices
            .iter()
            .map(|&p_i| prices.iter().map(|&p_j| p_i / p_j).collect())
            .collect();

        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn rate(&self, from: Instrument, to: Instrument) -> Option<f64> {
        self.rows.get(from).and_then(|row| row.get(to)).copied()
    }

    /// Replaces a single rate. The new value is validated on the next build.
    pub fn set_rate(&mut self, from: Instrument, to: Instrument, rate: f64) -> Result<(), Error> {
        let row = self
            .rows
            .get_mut(from)
            .ok_or(Error::NodeIndexOutOfBounds(from))?;
        let cell = row.get_mut(to).ok_or(Error::NodeIndexOutOfBounds(to))?;
        *cell = rate;
        Ok(())
    }

    /// Checks the matrix is square, non-empty, and holds only positive finite rates.
    ///
    /// Returns the dimension N on success, otherwise the first defect in row-major order.
    pub fn validate(&self) -> Result<usize, Error> {
        let size = self.rows.len();
        if size == 0 {
            return Err(MatrixDefect::Empty.into());
        }

        for (from, row) in self.rows.iter().enumerate() {
            if row.len() != size {
                return Err(MatrixDefect::NotSquare {
                    row: from,
                    len: row.len(),
                    expected: size,
                }
                .into());
            }

            for (to, &rate) in row.iter().enumerate() {
                check_rate(from, to, rate)?;
            }
        }

        Ok(size)
    }

    /// The `-ln(rate)` view of the matrix, cell by cell.
    pub fn log_transformed(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|rate| -rate.ln()).collect())
            .collect()
    }
}

impl From<Vec<Vec<f64>>> for RateMatrix {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        Self::new(rows)
    }
}

/// Rejects NaN, infinite, zero and negative rates.
pub fn check_rate(from: Instrument, to: Instrument, rate: f64) -> Result<(), MatrixDefect> {
    if !rate.is_finite() {
        return Err(MatrixDefect::NonFinite { from, to });
    }
    if rate <= 0.0 {
        return Err(MatrixDefect::NonPositive { from, to, rate });
    }
    Ok(())
}

/// A closed walk of conversions whose `-ln` weights sum to a negative value.
///
/// Leg `k` trades `instruments[k]` into `instruments[(k + 1) % len]` at `rates[k]`;
/// the last leg returns to the first instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrageCycle {
    pub instruments: Vec<Instrument>,
    pub rates: Vec<f64>,
    pub total_weight: f64,
}

impl ArbitrageCycle {
    /// Returns the net conversion factor for executing the cycle once.
    ///
    /// The cycle stores the transformed sum ∑ w_i where w_i = -ln(rate_i),
    /// so the product of rates is recovered as e^(-∑ w_i).
    ///
    /// Example:
    /// ```text
    /// rates [2.0, 3.0, 4.0] (∏ = 24.0)
    /// total_weight = -ln(24.0) ≈ -3.178
    /// multiplier = exp(3.178) = 24.0
    /// ```
    pub fn multiplier(&self) -> f64 {
        (-self.total_weight).exp()
    }

    /// Returns true if the cycle is profitable (multiplier > 1.0).
    pub fn is_profitable(&self) -> bool {
        self.multiplier() > 1.0
    }

    pub fn profit_percentage(&self) -> f64 {
        (self.multiplier() - 1.0) * 100.0
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Ordered `(from, to)` pairs of the walk, including the wrap-around leg.
    pub fn legs(&self) -> impl Iterator<Item = (Instrument, Instrument)> + '_ {
        let n = self.instruments.len();
        (0..n).map(move |k| (self.instruments[k], self.instruments[(k + 1) % n]))
    }
}
