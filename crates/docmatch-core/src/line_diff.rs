//! Longest-common-subsequence diff over lines.
//!
//! Used to show the two pretty renderings of a failed comparison side by
//! side. The table is O(m·n) in memory, which is fine for test fixtures.

/// What happened to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOp {
    /// Present in both inputs.
    Equal,
    /// Only in the expected input.
    Delete,
    /// Only in the actual input.
    Insert,
}

/// One line of a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub op: DiffOp,
    pub text: String,
}

/// Computes a line diff that turns `expected` into `actual`.
///
/// Ties prefer insertions when backtracking, so in the output a block of
/// deletions comes before the insertions that replace it.
pub fn diff_lines(expected: &[&str], actual: &[&str]) -> Vec<DiffLine> {
    let (m, n) = (expected.len(), actual.len());
    let mut dp = vec![vec![0usize; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            dp[i][j] = if expected[i - 1] == actual[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut lines = Vec::with_capacity(m.max(n));
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && expected[i - 1] == actual[j - 1] {
            lines.push(line(DiffOp::Equal, expected[i - 1]));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || dp[i][j - 1] >= dp[i - 1][j]) {
            lines.push(line(DiffOp::Insert, actual[j - 1]));
            j -= 1;
        } else {
            lines.push(line(DiffOp::Delete, expected[i - 1]));
            i -= 1;
        }
    }
    lines.reverse();
    lines
}

fn line(op: DiffOp, text: &str) -> DiffLine {
    DiffLine {
        op,
        text: text.to_owned(),
    }
}
