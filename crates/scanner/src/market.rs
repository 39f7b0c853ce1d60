use common::types::RateMatrix;

/// The six-currency demo market used when no CSV is given.
///
/// Row `i`, column `j` is the rate from currency `i` to currency `j`.
pub fn canonical_matrix() -> RateMatrix {
    RateMatrix::new(vec![
        vec![1.00, 0.58, 0.63, 0.27, 0.17, 0.20],
        vec![1.68, 1.00, 0.39, 0.74, 0.47, 0.79],
        vec![1.57, 2.48, 1.00, 0.04, 0.15, 0.11],
        vec![3.64, 1.35, 22.94, 1.00, 0.22, 0.23],
        vec![5.84, 2.02, 6.84, 4.40, 1.00, 0.49],
        vec![4.76, 1.21, 8.59, 4.41, 1.97, 1.00],
    ])
}
