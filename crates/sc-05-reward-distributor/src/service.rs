//! Reward Distributor service

use crate::error::{DistributorError, DistributorResult};
use crate::ports::outbound::RewardSink;
use parking_lot::RwLock;
use primitive_types::U256;
use sc_02_stake_pool::StakePool;
use sc_03_performance::PerformanceRecord;
use shared_types::{AccountAddress, Amount, BasisPoints};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything the distributor needs to know about one active validator at
/// the epoch boundary. Built by the runtime from the lifecycle's
/// transition report plus the closing epoch's performance table.
#[derive(Clone)]
pub struct RewardableValidator {
    pub operator: AccountAddress,
    /// Voting power counted for the closing epoch.
    pub stake: Amount,
    /// Closing-epoch counters; `None` for a validator with no slot last
    /// epoch (freshly promoted).
    pub performance: Option<PerformanceRecord>,
    pub commission_rate_bps: BasisPoints,
    pub beneficiary: AccountAddress,
    pub pool: Arc<StakePool>,
}

impl RewardableValidator {
    /// `stake * successful / max(total, 1)`, with the default-credit policy:
    /// no recorded proposals counts as one successful proposal out of one.
    fn weight(&self) -> Option<u128> {
        let (successful, total) = match self.performance {
            Some(record) if record.total_proposals() > 0 => {
                (record.successful_proposals, record.total_proposals())
            }
            _ => (1, 1),
        };
        let weight = U256::from(self.stake) * U256::from(successful) / U256::from(total);
        if weight > U256::from(u128::MAX) {
            None
        } else {
            Some(weight.as_u128())
        }
    }
}

/// Per-validator outcome of one distribution.
#[derive(Clone, Debug)]
pub struct ValidatorPayout {
    pub operator: AccountAddress,
    pub weight: u128,
    pub payout: Amount,
    /// Amount the pool actually absorbed (payout minus whatever bounced).
    pub absorbed: Amount,
}

/// Outcome of one epoch-boundary distribution.
#[derive(Clone, Debug, Default)]
pub struct DistributionSummary {
    pub total_pool: Amount,
    pub payouts: Vec<ValidatorPayout>,
    /// Value routed to the fallback sink instead of being destroyed.
    pub remainder_to_sink: Amount,
}

/// Reward Distributor.
///
/// `pending_reward_pool` accumulates between boundaries and is consumed
/// fully by each `distribute` call.
pub struct RewardDistributor<S>
where
    S: RewardSink,
{
    pending: RwLock<Amount>,
    sink: Arc<S>,
}

impl<S> RewardDistributor<S>
where
    S: RewardSink,
{
    pub fn new(sink: Arc<S>) -> Self {
        Self {
            pending: RwLock::new(0),
            sink,
        }
    }

    /// Accumulate income (e.g. block fees) for the next boundary.
    pub fn add_rewards(&self, amount: Amount) -> DistributorResult<()> {
        let mut pending = self.pending.write();
        *pending = pending
            .checked_add(amount)
            .ok_or(DistributorError::RewardPoolOverflow {
                holding: *pending,
                adding: amount,
            })?;
        Ok(())
    }

    pub fn pending_rewards(&self) -> Amount {
        *self.pending.read()
    }

    /// Consume the whole pending pool, splitting it across `validators`
    /// proportionally to stake x performance weight.
    pub fn distribute(
        &self,
        validators: &[RewardableValidator],
    ) -> DistributorResult<DistributionSummary> {
        let total_pool = std::mem::take(&mut *self.pending.write());
        if total_pool == 0 {
            debug!("no pending rewards to distribute");
            return Ok(DistributionSummary::default());
        }

        let mut weights = Vec::with_capacity(validators.len());
        let mut total_weight = U256::zero();
        for validator in validators {
            let weight = validator
                .weight()
                .ok_or(DistributorError::WeightOverflow {
                    validators: validators.len(),
                })?;
            total_weight += U256::from(weight);
            weights.push(weight);
        }

        if total_weight.is_zero() {
            // Nothing reward-eligible this epoch; the pool survives intact
            // in the sink rather than vanishing.
            warn!(total_pool, "no reward-eligible weight; routing pool to sink");
            self.sink.credit(total_pool);
            return Ok(DistributionSummary {
                total_pool,
                payouts: Vec::new(),
                remainder_to_sink: total_pool,
            });
        }

        let mut summary = DistributionSummary {
            total_pool,
            ..DistributionSummary::default()
        };
        let mut paid_out: Amount = 0;
        let mut to_sink: Amount = 0;

        for (validator, weight) in validators.iter().zip(weights) {
            let payout_u256 = U256::from(total_pool) * U256::from(weight) / total_weight;
            // payout <= total_pool, so the cast cannot truncate.
            let payout = payout_u256.as_u128();
            paid_out += payout;

            let absorbed = if payout == 0 {
                0
            } else {
                match validator.pool.distribute_reward(
                    payout,
                    validator.commission_rate_bps,
                    validator.beneficiary,
                ) {
                    Ok(outcome) => {
                        to_sink += outcome.undistributed;
                        payout - outcome.undistributed
                    }
                    Err(err) => {
                        // One refusing pool must not abort the epoch for
                        // the rest; its payout is preserved in the sink.
                        warn!(
                            operator = %validator.operator,
                            error = %err,
                            payout,
                            "pool refused reward payout; routing to sink"
                        );
                        to_sink += payout;
                        0
                    }
                }
            };

            summary.payouts.push(ValidatorPayout {
                operator: validator.operator,
                weight,
                payout,
                absorbed,
            });
        }

        // Flooring residue of the proportional split.
        to_sink += total_pool - paid_out;
        if to_sink > 0 {
            self.sink.credit(to_sink);
        }
        summary.remainder_to_sink = to_sink;

        info!(
            total_pool,
            validators = validators.len(),
            remainder = to_sink,
            "epoch rewards distributed"
        );
        Ok(summary)
    }
}
