use std::fmt::{self, Display, Formatter};

use crate::{
    error::{AprioriError, Result},
    types::SupportCount,
};

/// Minimum support an itemset needs to be frequent.
///
/// The unit the caller chose is kept: an absolute threshold is always compared
/// as integers, a relative one as `count / n >= threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SupportThreshold {
    Absolute(usize),
    Relative(f64),
}

impl SupportThreshold {
    /// Takes exactly one of `absolute` / `relative`. `absolute` is bounded by
    /// the store size later, once a store is known.
    pub fn from_options(absolute: Option<usize>, relative: Option<f64>) -> Result<Self> {
        match (absolute, relative) {
            (Some(_), Some(_)) => Err(AprioriError::InvalidConfiguration(
                "only one of `absolute_support` and `relative_support` may be provided".into(),
            )),
            (None, None) => Err(AprioriError::InvalidConfiguration(
                "either `absolute_support` or `relative_support` must be provided".into(),
            )),
            (Some(absolute), None) => Self::absolute(absolute),
            (None, Some(relative)) => Self::relative(relative),
        }
    }

    pub fn absolute(min_count: usize) -> Result<Self> {
        if min_count == 0 {
            return Err(AprioriError::InvalidConfiguration(
                "`absolute_support` must be greater than zero".into(),
            ));
        }
        Ok(SupportThreshold::Absolute(min_count))
    }

    pub fn relative(min_support: f64) -> Result<Self> {
        // NaN fails both comparisons
        if !(min_support > 0.0 && min_support <= 1.0) {
            return Err(AprioriError::InvalidConfiguration(format!(
                "`relative_support` must be in (0, 1], got {}",
                min_support
            )));
        }
        Ok(SupportThreshold::Relative(min_support))
    }

    /// Checks the threshold against a store of `num_transactions`.
    pub fn validate_for(&self, num_transactions: usize) -> Result<()> {
        match *self {
            SupportThreshold::Absolute(min_count) if min_count > num_transactions => {
                Err(AprioriError::InvalidConfiguration(format!(
                    "`absolute_support` ({}) cannot exceed the number of transactions ({})",
                    min_count, num_transactions
                )))
            }
            _ => Ok(()),
        }
    }

    pub fn is_frequent(&self, count: SupportCount, num_transactions: usize) -> bool {
        match *self {
            SupportThreshold::Absolute(min_count) => count as usize >= min_count,
            SupportThreshold::Relative(min_support) => {
                num_transactions > 0 && count as f64 / num_transactions as f64 >= min_support
            }
        }
    }

    /// Smallest count passing [`is_frequent`](Self::is_frequent) for a store of
    /// `num_transactions`. Counts saturate at `SupportCount::MAX`.
    pub fn min_support_count(&self, num_transactions: usize) -> SupportCount {
        let n = SupportCount::try_from(num_transactions).unwrap_or(SupportCount::MAX);
        match *self {
            SupportThreshold::Absolute(min_count) => {
                SupportCount::try_from(min_count).unwrap_or(SupportCount::MAX)
            }
            SupportThreshold::Relative(min_support) => {
                let mut count =
                    ((min_support * num_transactions as f64).ceil() as SupportCount).min(n);
                // settle float rounding against the exact predicate
                while count > 0 && self.is_frequent(count - 1, num_transactions) {
                    count -= 1;
                }
                while count < n && !self.is_frequent(count, num_transactions) {
                    count += 1;
                }
                count.max(1)
            }
        }
    }

    /// Threshold as a fraction of the store.
    pub fn relative_to(&self, num_transactions: usize) -> f64 {
        match *self {
            SupportThreshold::Absolute(min_count) => min_count as f64 / num_transactions as f64,
            SupportThreshold::Relative(min_support) => min_support,
        }
    }
}

impl Display for SupportThreshold {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SupportThreshold::Absolute(min_count) => write!(f, "support count >= {}", min_count),
            SupportThreshold::Relative(min_support) => write!(f, "support >= {}", min_support),
        }
    }
}
