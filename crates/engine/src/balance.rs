//! The balance accumulation rule.
//!
//! Every path that moves money goes through [`accumulate`]: an absent balance
//! counts as exactly `0`, and the delta is added without clamping. Reversals
//! are the same rule with a negated delta.
//!
//! The cached `accounts.balance` is a projection of the `balance_entries`
//! journal; [`replay`] rebuilds it from scratch so the two can be compared.

/// Differences smaller than this are treated as zero by reconciliation.
pub const RECONCILE_EPSILON: f64 = 0.01;

/// Tolerance used when comparing a cached balance against a replayed one.
pub const AUDIT_TOLERANCE: f64 = 1e-6;

/// Applies a signed delta to a (possibly absent) balance.
///
/// ```rust
/// use engine::accumulate;
///
/// assert_eq!(accumulate(None, -12.5), -12.5);
/// assert_eq!(accumulate(Some(100.0), 20.0), 120.0);
/// ```
#[must_use]
pub fn accumulate(current: Option<f64>, delta: f64) -> f64 {
    current.unwrap_or(0.0) + delta
}

/// Rebuilds a balance by folding deltas, in order, onto an absent balance.
#[must_use]
pub fn replay<I>(deltas: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    deltas
        .into_iter()
        .fold(None, |balance, delta| Some(accumulate(balance, delta)))
        .unwrap_or(0.0)
}

/// Returns `true` when a reconciliation difference is below [`RECONCILE_EPSILON`].
#[must_use]
pub fn within_epsilon(difference: f64) -> bool {
    difference.abs() < RECONCILE_EPSILON
}

/// Checks that an amount is usable as money (finite).
pub(crate) fn validate_amount(amount: f64, label: &str) -> crate::ResultEngine<f64> {
    if !amount.is_finite() {
        return Err(crate::EngineError::invalid(format!(
            "{label} must be a finite number"
        )));
    }
    Ok(amount)
}
