//! Arithmetic engine — the pure computations behind the calculator RPCs.
//!
//! Everything here is synchronous and side-effect free. The handlers in
//! [`crate::server`] own all I/O and drive these primitives one message at
//! a time, so streamed results stay lazy: [`prime_factors`] yields factors
//! on demand, and the running accumulators hold only call-scoped state.

use crate::{ReckonerError, Result};

/// Add two numbers. Total function, no error path; overflow wraps, the
/// same way int64 addition behaves on the wire.
pub fn sum(a: i64, b: i64) -> i64 {
    a.wrapping_add(b)
}

/// Lazily decompose `n` into prime factors in ascending order.
///
/// Trial division from 2 upward, dividing each factor out repeatedly
/// before advancing the divisor. For `n <= 1` the iterator is empty —
/// that is a valid (if boring) decomposition, not an error.
pub fn prime_factors(n: i64) -> PrimeFactors {
    PrimeFactors {
        remaining: n,
        divisor: 2,
    }
}

/// Iterator over the prime factors of a number, smallest first.
///
/// Produced by [`prime_factors`]; yields each factor with multiplicity,
/// so the product of all yielded items equals the original input.
#[derive(Debug, Clone)]
pub struct PrimeFactors {
    remaining: i64,
    divisor: i64,
}

impl Iterator for PrimeFactors {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.remaining <= 1 {
            return None;
        }
        while self.divisor.saturating_mul(self.divisor) <= self.remaining {
            if self.remaining % self.divisor == 0 {
                self.remaining /= self.divisor;
                return Some(self.divisor);
            }
            self.divisor += 1;
        }
        // No divisor up to sqrt(remaining): remaining is itself prime.
        let last = self.remaining;
        self.remaining = 1;
        Some(last)
    }
}

/// Running-average accumulator for one client-streaming call.
///
/// The sum is kept in an `i128` so an unbounded stream of extreme int64
/// values cannot overflow the accumulator.
#[derive(Debug, Default)]
pub struct RunningAverage {
    sum: i128,
    count: u64,
}

impl RunningAverage {
    /// Create an accumulator with no observations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the running sum and count.
    pub fn observe(&mut self, x: i64) {
        self.sum += i128::from(x);
        self.count += 1;
    }

    /// The average of everything observed so far, or `None` if nothing
    /// has been observed yet.
    pub fn result(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}

/// Running-maximum accumulator for one bidirectional-streaming call.
#[derive(Debug, Default)]
pub struct RunningMax {
    max: Option<i64>,
}

impl RunningMax {
    /// Create an accumulator with no observations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe `x` and return the maximum seen so far, including `x`.
    /// The first observation returns `x` itself.
    pub fn observe(&mut self, x: i64) -> i64 {
        let max = self.max.map_or(x, |m| m.max(x));
        self.max = Some(max);
        max
    }
}

/// Non-negative square root of `n`.
///
/// Negative input is a domain error the caller must be told about by
/// value, so the message names the offending number.
pub fn square_root(n: i64) -> Result<f64> {
    if n < 0 {
        return Err(ReckonerError::InvalidArgument(format!(
            "received a negative number: {n}"
        )));
    }
    Ok((n as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_divide_out_multiplicity() {
        let factors: Vec<i64> = prime_factors(120).collect();
        assert_eq!(factors, vec![2, 2, 2, 3, 5]);
    }

    #[test]
    fn factor_of_prime_is_itself() {
        let factors: Vec<i64> = prime_factors(74047).collect();
        assert_eq!(factors, vec![74047]);
    }

    #[test]
    fn factors_of_one_and_below_are_empty() {
        assert_eq!(prime_factors(1).count(), 0);
        assert_eq!(prime_factors(0).count(), 0);
        assert_eq!(prime_factors(-42).count(), 0);
    }

    #[test]
    fn average_of_nothing_is_none() {
        assert_eq!(RunningAverage::new().result(), None);
    }

    #[test]
    fn sum_wraps_instead_of_panicking() {
        assert_eq!(sum(i64::MAX, 1), i64::MIN);
        assert_eq!(sum(i64::MIN, -1), i64::MAX);
    }

    #[test]
    fn average_survives_extreme_observations() {
        let mut average = RunningAverage::new();
        average.observe(i64::MAX);
        average.observe(i64::MAX);
        assert_eq!(average.result(), Some(i64::MAX as f64));
    }

    #[test]
    fn first_maximum_is_the_observation() {
        let mut max = RunningMax::new();
        assert_eq!(max.observe(-7), -7);
        assert_eq!(max.observe(-9), -7);
    }

    #[test]
    fn square_root_rejects_negative_by_value() {
        let err = square_root(-2).unwrap_err();
        assert!(err.to_string().contains("-2"), "message was: {err}");
    }
}
