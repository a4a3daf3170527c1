//! Validator Lifecycle service

use crate::domain::status::ValidatorStatus;
use crate::domain::validator::{RegistrationParams, ValidatorRecord};
use crate::error::{LifecycleError, LifecycleResult};
use crate::events::{ActiveValidatorEntry, EpochTransitionReport};
use crate::metrics;
use crate::ports::outbound::{StakeConfigProvider, TimeSource};
use parking_lot::RwLock;
use sc_02_stake_pool::{mul_div, StakePool};
use shared_types::{
    AccountAddress, Amount, BasisPoints, ConsensusKey, EpochNumber, InvariantViolation, Shares,
    StakePoolId, BPS_DENOMINATOR,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

struct LifecycleState {
    validators: BTreeMap<AccountAddress, ValidatorRecord>,
    pools: BTreeMap<AccountAddress, Arc<StakePool>>,
    /// Current consensus slot assignment, in index order.
    slots: Vec<AccountAddress>,
    /// Sum of ACTIVE validators' voting power. Decremented immediately on
    /// leave/forced demotion (see the crate-level timing model).
    total_voting_power: Amount,
    /// Power accrued by joins since the last boundary, bounded by the
    /// configured growth cap.
    joining_power_this_epoch: Amount,
    last_report: Option<EpochTransitionReport>,
}

impl LifecycleState {
    fn new() -> Self {
        Self {
            validators: BTreeMap::new(),
            pools: BTreeMap::new(),
            slots: Vec::new(),
            total_voting_power: 0,
            joining_power_this_epoch: 0,
            last_report: None,
        }
    }

    fn active_count(&self) -> usize {
        self.validators
            .values()
            .filter(|v| v.status == ValidatorStatus::Active)
            .count()
    }

    fn consensus_set_size(&self) -> usize {
        self.validators
            .values()
            .filter(|v| {
                matches!(
                    v.status,
                    ValidatorStatus::Active | ValidatorStatus::PendingActive
                )
            })
            .count()
    }

    /// Shared demotion path for voluntary leave and stake shortfall:
    /// consensus weight is removed right away, fund maturity stays on the
    /// pool's epoch timing.
    fn demote_active(&mut self, operator: AccountAddress) -> LifecycleResult<()> {
        let record = self
            .validators
            .get_mut(&operator)
            .expect("caller verified the record exists");
        let power = record.voting_power;
        self.total_voting_power = self.total_voting_power.checked_sub(power).ok_or(
            LifecycleError::Invariant(InvariantViolation::VotingPowerUnderflow {
                current: self.total_voting_power,
                decrement: power,
            }),
        )?;
        record.status = ValidatorStatus::PendingInactive;
        record.voting_power = 0;
        Ok(())
    }
}

/// The validator-set state machine and pool orchestrator.
pub struct ValidatorLifecycle<C, T>
where
    C: StakeConfigProvider,
    T: TimeSource,
{
    config: Arc<C>,
    time: Arc<T>,
    state: RwLock<LifecycleState>,
}

impl<C, T> ValidatorLifecycle<C, T>
where
    C: StakeConfigProvider,
    T: TimeSource,
{
    pub fn new(config: Arc<C>, time: Arc<T>) -> Self {
        Self {
            config,
            time,
            state: RwLock::new(LifecycleState::new()),
        }
    }

    // ---------------------------------------------------------------------
    // Registration and identity
    // ---------------------------------------------------------------------

    /// Register a validator: validates identity and commission, creates the
    /// one owning stake pool, and bonds the initial amount into it.
    pub fn register(
        &self,
        params: RegistrationParams,
        bonded: Amount,
    ) -> LifecycleResult<StakePoolId> {
        let mut state = self.state.write();

        if state.validators.contains_key(&params.operator) {
            return Err(LifecycleError::AlreadyRegistered {
                operator: params.operator,
            });
        }
        let minimum = self.config.min_stake();
        if bonded < minimum {
            return Err(LifecycleError::BondBelowMinimum { bonded, minimum });
        }
        params
            .commission
            .validate(self.config.max_commission_rate_bps())?;
        if state.validators.values().any(|v| v.name == params.name) {
            return Err(LifecycleError::NameCollision {
                name: params.name.clone(),
            });
        }
        if state
            .validators
            .values()
            .any(|v| v.consensus_key == params.consensus_key)
        {
            return Err(LifecycleError::KeyCollision);
        }

        let record = ValidatorRecord::new(&params);
        let pool_id = record.stake_pool_id;
        let pool = Arc::new(StakePool::new(pool_id));
        // A freshly registered validator is outside consensus, so the bond
        // lands in the active bucket.
        pool.delegate(params.operator, bonded, false)?;

        info!(
            operator = %params.operator,
            name = %params.name,
            pool = %pool_id,
            bonded,
            "validator registered"
        );
        state.pools.insert(params.operator, pool);
        state.validators.insert(params.operator, record);
        metrics::record_registration();
        Ok(pool_id)
    }

    /// Rotate the consensus key, preserving uniqueness across the set.
    pub fn rotate_consensus_key(
        &self,
        operator: AccountAddress,
        new_key: ConsensusKey,
    ) -> LifecycleResult<()> {
        let mut state = self.state.write();
        if state
            .validators
            .iter()
            .any(|(op, v)| *op != operator && v.consensus_key == new_key)
        {
            return Err(LifecycleError::KeyCollision);
        }
        let record = state
            .validators
            .get_mut(&operator)
            .ok_or(LifecycleError::UnknownValidator { operator })?;
        record.consensus_key = new_key;
        info!(%operator, "consensus key rotated");
        Ok(())
    }

    /// Update the commission rate within the per-change and max bounds.
    pub fn update_commission(
        &self,
        operator: AccountAddress,
        new_rate_bps: BasisPoints,
    ) -> LifecycleResult<()> {
        let mut state = self.state.write();
        let record = state
            .validators
            .get_mut(&operator)
            .ok_or(LifecycleError::UnknownValidator { operator })?;
        record.commission.apply_change(new_rate_bps)?;
        info!(%operator, new_rate_bps, "commission updated");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Set membership
    // ---------------------------------------------------------------------

    /// Request to join the consensus set at the next epoch boundary.
    pub fn join(&self, operator: AccountAddress) -> LifecycleResult<()> {
        let mut state = self.state.write();

        let record = state
            .validators
            .get(&operator)
            .ok_or(LifecycleError::UnknownValidator { operator })?;
        if record.status != ValidatorStatus::Inactive {
            return Err(LifecycleError::InvalidStateTransition {
                operator,
                from: record.status,
                operation: "join",
            });
        }

        let capacity = self.config.max_validator_set_size();
        if state.consensus_set_size() >= capacity {
            return Err(LifecycleError::ValidatorSetFull { capacity });
        }

        let pool = state
            .pools
            .get(&operator)
            .ok_or(LifecycleError::UnknownValidator { operator })?;
        let next_stake = pool.next_epoch_voting_power();
        let (min, max) = (self.config.min_stake(), self.config.max_stake());
        if next_stake < min || next_stake > max {
            return Err(LifecycleError::StakeOutOfBounds {
                stake: next_stake,
                min,
                max,
            });
        }

        // Growth cap, waived while the set bootstraps from zero power.
        if state.total_voting_power > 0 {
            let limit_bps = self.config.voting_power_increase_limit_bps();
            let allowed = mul_div(
                state.total_voting_power,
                limit_bps as u128,
                BPS_DENOMINATOR as u128,
            )
            .ok_or(LifecycleError::Invariant(
                InvariantViolation::ArithmeticOverflow {
                    context: "voting power growth cap",
                },
            ))?;
            let joining = state
                .joining_power_this_epoch
                .checked_add(next_stake)
                .ok_or(LifecycleError::Invariant(
                    InvariantViolation::ArithmeticOverflow {
                        context: "joining power accumulator",
                    },
                ))?;
            if joining > allowed {
                return Err(LifecycleError::VotingPowerIncreaseLimitExceeded {
                    joining,
                    allowed,
                });
            }
        }

        state.joining_power_this_epoch += next_stake;
        let record = state
            .validators
            .get_mut(&operator)
            .expect("record checked above");
        record.status = ValidatorStatus::PendingActive;
        record.joining_power = next_stake;
        info!(%operator, next_stake, "validator joining at next epoch");
        metrics::record_join();
        Ok(())
    }

    /// Leave the set. Pending-active reverts immediately; active winds down
    /// through pending-inactive, losing consensus weight at once.
    pub fn leave(&self, operator: AccountAddress) -> LifecycleResult<()> {
        let mut state = self.state.write();

        let record = state
            .validators
            .get(&operator)
            .ok_or(LifecycleError::UnknownValidator { operator })?;
        match record.status {
            ValidatorStatus::PendingActive => {
                let refund = record.joining_power;
                state.joining_power_this_epoch =
                    state.joining_power_this_epoch.saturating_sub(refund);
                let record = state
                    .validators
                    .get_mut(&operator)
                    .expect("record checked above");
                record.status = ValidatorStatus::Inactive;
                record.joining_power = 0;
                info!(%operator, refund, "pending-active validator left; joining power refunded");
                Ok(())
            }
            ValidatorStatus::Active => {
                if state.active_count() <= 1 {
                    return Err(LifecycleError::LastActiveValidator);
                }
                state.demote_active(operator)?;
                info!(%operator, "active validator leaving; consensus weight removed");
                metrics::record_leave();
                Ok(())
            }
            from => Err(LifecycleError::InvalidStateTransition {
                operator,
                from,
                operation: "leave",
            }),
        }
    }

    /// Opportunistic shortfall check (e.g. after an unlock): an ACTIVE
    /// validator under the minimum is forced out the same way `leave` works.
    /// Returns whether a demotion happened.
    pub fn check_min_stake(&self, operator: AccountAddress) -> LifecycleResult<bool> {
        let mut state = self.state.write();

        let record = state
            .validators
            .get(&operator)
            .ok_or(LifecycleError::UnknownValidator { operator })?;
        if record.status != ValidatorStatus::Active {
            return Ok(false);
        }
        let pool = state
            .pools
            .get(&operator)
            .ok_or(LifecycleError::UnknownValidator { operator })?;
        // Unlocked stake no longer counts: the shortfall measure is what
        // the validator will bring to the next epoch.
        let current = pool.next_epoch_voting_power();
        let minimum = self.config.min_stake();
        if current >= minimum {
            return Ok(false);
        }
        if state.active_count() <= 1 {
            // The liveness guard outranks the shortfall; operators see it.
            warn!(%operator, current, minimum, "last active validator under minimum stake");
            return Err(LifecycleError::LastActiveValidator);
        }
        state.demote_active(operator)?;
        warn!(%operator, current, minimum, "validator forced out on stake shortfall");
        metrics::record_eviction();
        Ok(true)
    }

    // ---------------------------------------------------------------------
    // Stake pass-throughs
    // ---------------------------------------------------------------------

    fn pool(&self, operator: &AccountAddress) -> LifecycleResult<Arc<StakePool>> {
        self.state
            .read()
            .pools
            .get(operator)
            .cloned()
            .ok_or(LifecycleError::UnknownValidator {
                operator: *operator,
            })
    }

    fn owner_in_consensus(&self, operator: &AccountAddress) -> bool {
        self.state
            .read()
            .validators
            .get(operator)
            .map(|v| v.status == ValidatorStatus::Active)
            .unwrap_or(false)
    }

    pub fn delegate(
        &self,
        operator: AccountAddress,
        delegator: AccountAddress,
        amount: Amount,
    ) -> LifecycleResult<Shares> {
        let pool = self.pool(&operator)?;
        let in_consensus = self.owner_in_consensus(&operator);
        Ok(pool.delegate(delegator, amount, in_consensus)?)
    }

    pub fn unlock(
        &self,
        operator: AccountAddress,
        delegator: AccountAddress,
        shares: Shares,
    ) -> LifecycleResult<Amount> {
        let pool = self.pool(&operator)?;
        Ok(pool.unlock(delegator, shares, self.time.now_micros())?)
    }

    pub fn withdraw(
        &self,
        operator: AccountAddress,
        delegator: AccountAddress,
        amount: Amount,
    ) -> LifecycleResult<Amount> {
        let pool = self.pool(&operator)?;
        Ok(pool.withdraw(delegator, amount)?)
    }

    pub fn reactivate(
        &self,
        operator: AccountAddress,
        delegator: AccountAddress,
        shares: Shares,
    ) -> LifecycleResult<Amount> {
        let pool = self.pool(&operator)?;
        Ok(pool.reactivate(delegator, shares)?)
    }

    /// Atomic debit-source / credit-destination redelegation through the
    /// immediate `unbond` path.
    pub fn redelegate(
        &self,
        delegator: AccountAddress,
        from: AccountAddress,
        to: AccountAddress,
        shares: Shares,
    ) -> LifecycleResult<Amount> {
        let from_pool = self.pool(&from)?;
        let to_pool = self.pool(&to)?;
        if to_pool.is_halted() {
            return Err(LifecycleError::Pool(
                sc_02_stake_pool::StakePoolError::PoolHalted {
                    reason: to_pool.halt_reason().unwrap_or_default(),
                },
            ));
        }

        let paid = from_pool.unbond(delegator, shares)?;
        let to_in_consensus = self.owner_in_consensus(&to);
        match to_pool.delegate(delegator, paid, to_in_consensus) {
            Ok(_) => {
                info!(%delegator, %from, %to, paid, "stake redelegated");
                Ok(paid)
            }
            Err(err) => {
                // Compensate: the debit already committed, so the value must
                // return to the source pool rather than vanish.
                let from_in_consensus = self.owner_in_consensus(&from);
                if let Err(comp_err) = from_pool.delegate(delegator, paid, from_in_consensus) {
                    tracing::error!(
                        %delegator, %from, %to, paid,
                        error = %comp_err,
                        "redelegation compensation failed; value stranded"
                    );
                    return Err(LifecycleError::Invariant(
                        InvariantViolation::ConservationBreach {
                            pool: from_pool.id(),
                            held: 0,
                            expected: paid,
                        },
                    ));
                }
                Err(err.into())
            }
        }
    }

    // ---------------------------------------------------------------------
    // Epoch transition
    // ---------------------------------------------------------------------

    /// Apply the epoch boundary across the whole set:
    /// (a) every pool applies its own transition (halted pools are skipped,
    /// not fatal); (b) pending-active promotes; (c) pending-inactive
    /// demotes; (d) voting power is recomputed from current stake and
    /// shortfallers are forced out; (e) the joining-power accumulator
    /// resets.
    pub fn on_new_epoch(&self, epoch: EpochNumber) -> EpochTransitionReport {
        let mut state = self.state.write();
        let mut report = EpochTransitionReport {
            epoch,
            ..EpochTransitionReport::default()
        };

        // (a) pool transitions, isolated per pool
        for (operator, pool) in state.pools.iter() {
            if let Err(err) = pool.on_new_epoch() {
                warn!(%operator, error = %err, "pool epoch transition skipped");
                report.skipped_pools.push((*operator, err.to_string()));
            }
        }

        // Closing epoch's slot assignment, for performance lookups.
        let previous_indices: BTreeMap<AccountAddress, u32> = state
            .validators
            .values()
            .filter_map(|v| v.validator_index.map(|i| (v.operator, i)))
            .collect();

        // (b) + (c) status moves
        let operators: Vec<AccountAddress> = state.validators.keys().copied().collect();
        for operator in &operators {
            let record = state.validators.get_mut(operator).expect("keys just read");
            match record.status {
                ValidatorStatus::PendingActive => {
                    record.status = ValidatorStatus::Active;
                    report.promoted.push(*operator);
                }
                ValidatorStatus::PendingInactive => {
                    record.status = ValidatorStatus::Inactive;
                    record.validator_index = None;
                    record.voting_power = 0;
                    report.demoted.push(*operator);
                }
                _ => {}
            }
        }

        // (d) recompute power, evict shortfallers, assign fresh indices.
        // Order: surviving slots keep their relative order, promotions
        // append in address order.
        let minimum = self.config.min_stake();
        let mut candidates: Vec<AccountAddress> = state
            .slots
            .iter()
            .filter(|op| {
                state
                    .validators
                    .get(*op)
                    .map(|v| v.status == ValidatorStatus::Active)
                    .unwrap_or(false)
            })
            .copied()
            .collect();
        candidates.extend(report.promoted.iter().copied());

        let mut new_slots = Vec::with_capacity(candidates.len());
        let mut total_power: Amount = 0;
        for operator in candidates {
            let (power, floor_power) = state
                .pools
                .get(&operator)
                .map(|p| (p.current_voting_power(), p.next_epoch_voting_power()))
                .unwrap_or((0, 0));
            let record = state
                .validators
                .get_mut(&operator)
                .expect("candidate is registered");
            if floor_power < minimum {
                record.status = ValidatorStatus::PendingInactive;
                record.validator_index = None;
                record.voting_power = 0;
                report.evicted.push(operator);
                metrics::record_eviction();
                continue;
            }
            let index = new_slots.len() as u32;
            record.validator_index = Some(index);
            record.voting_power = power;
            total_power = total_power.saturating_add(power);
            new_slots.push(operator);
            report.entries.push(ActiveValidatorEntry {
                operator,
                previous_index: previous_indices.get(&operator).copied(),
                index,
                voting_power: power,
                commission_rate_bps: record.commission.rate_bps,
                beneficiary: record.beneficiary,
            });
        }

        if new_slots.is_empty() && !state.slots.is_empty() {
            warn!(epoch, "epoch transition left the active set empty");
        }

        state.slots = new_slots;
        state.total_voting_power = total_power;
        report.total_voting_power = total_power;

        // (e) reset the joining-power accumulator
        state.joining_power_this_epoch = 0;
        for record in state.validators.values_mut() {
            record.joining_power = 0;
        }

        info!(
            epoch,
            active = report.entries.len(),
            promoted = report.promoted.len(),
            demoted = report.demoted.len(),
            evicted = report.evicted.len(),
            total_voting_power = total_power,
            "validator set epoch transition applied"
        );
        metrics::set_active_validators(report.entries.len());
        metrics::set_total_voting_power(total_power);

        state.last_report = Some(report.clone());
        report
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// The ACTIVE set in slot order.
    pub fn active_validators(&self) -> Vec<AccountAddress> {
        self.state.read().slots.clone()
    }

    pub fn active_count(&self) -> usize {
        self.state.read().slots.len()
    }

    pub fn validator(&self, operator: &AccountAddress) -> Option<ValidatorRecord> {
        self.state.read().validators.get(operator).cloned()
    }

    pub fn validator_status(&self, operator: &AccountAddress) -> LifecycleResult<ValidatorStatus> {
        self.state
            .read()
            .validators
            .get(operator)
            .map(|v| v.status)
            .ok_or(LifecycleError::UnknownValidator {
                operator: *operator,
            })
    }

    /// Total value the operator's pool holds across all four buckets.
    pub fn stake_credit_of(&self, operator: &AccountAddress) -> LifecycleResult<Amount> {
        Ok(self.pool(operator)?.total_stake())
    }

    pub fn pool_of(&self, operator: &AccountAddress) -> Option<Arc<StakePool>> {
        self.state.read().pools.get(operator).cloned()
    }

    pub fn total_voting_power(&self) -> Amount {
        self.state.read().total_voting_power
    }

    pub fn joining_power_this_epoch(&self) -> Amount {
        self.state.read().joining_power_this_epoch
    }

    pub fn last_transition_report(&self) -> Option<EpochTransitionReport> {
        self.state.read().last_report.clone()
    }
}
