//! The controller: custody, deposits, withdrawals, swaps and rebases.

use rbpool_asset::{AssetError, BaseAsset, SignedApproval};
use rbpool_ledger::{LedgerError, RebasingLedger};
use rbpool_types::{mul_div_floor, Address, PoolSelector, SeedCommitment, SeedKey, Timestamp, BPS_DENOMINATOR};
use serde::{Deserialize, Serialize};

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::seed::SeedChain;
use crate::targeting::{split_distribution, SplitPolicy};

/// Outcome of a successful [`RebaseCoordinator::rebase`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebaseReport {
    /// Custody balance found at the start of the rebase.
    pub custody: u128,
    /// Sent to the fee collector.
    pub fee: u128,
    /// `red + black`.
    pub distributed: u128,
    pub red: u128,
    pub black: u128,
}

/// Everything the controller owns apart from the base asset itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct CoordinatorState {
    address: Address,
    pools: [RebasingLedger; 2],
    fee_basis_points: u32,
    fee_collector: Address,
    split: SplitPolicy,
    seeds: SeedChain,
}

/// Mediates all value movement between the base asset and the two pools.
///
/// The base-asset balance held at `address` equals the sum of both pools'
/// supplies plus the custody balance awaiting the next rebase. A swap
/// top-up larger than custody leaves a small [`shortfall`](Self::shortfall)
/// instead, which the next inflow absorbs before any fee is taken.
/// Every entry point validates all of its preconditions before the first
/// mutation; a returned error leaves pools, custody and seed untouched.
pub struct RebaseCoordinator<A: BaseAsset> {
    state: CoordinatorState,
    asset: A,
}

impl<A: BaseAsset> RebaseCoordinator<A> {
    /// Take over two ledgers whose admin has already registered `address`
    /// as their controller.
    pub fn new(
        address: Address,
        red: RebasingLedger,
        black: RebasingLedger,
        asset: A,
        config: &ControllerConfig,
    ) -> Result<Self, ControllerError> {
        config.validate()?;
        let state = CoordinatorState {
            address,
            pools: [red, black],
            fee_basis_points: config.fee_basis_points,
            fee_collector: config.fee_collector,
            split: config.split,
            seeds: SeedChain::new(address, config.initial_seed_commitment),
        };
        ensure_wired(&state)?;
        tracing::info!(
            controller = %address,
            fee_bps = config.fee_basis_points,
            collector = %config.fee_collector,
            split = ?config.split,
            "controller initialized"
        );
        Ok(Self { state, asset })
    }

    // ── Views ──────────────────────────────────────────────────────────

    pub fn address(&self) -> &Address {
        &self.state.address
    }

    pub fn pool(&self, selector: PoolSelector) -> &RebasingLedger {
        &self.state.pools[selector.index()]
    }

    pub fn asset(&self) -> &A {
        &self.asset
    }

    /// Direct access to the base asset, for simulating inflow to custody.
    pub fn asset_mut(&mut self) -> &mut A {
        &mut self.asset
    }

    pub fn fee_basis_points(&self) -> u32 {
        self.state.fee_basis_points
    }

    pub fn fee_collector(&self) -> &Address {
        &self.state.fee_collector
    }

    pub fn split_policy(&self) -> SplitPolicy {
        self.state.split
    }

    pub fn pending_commitment(&self) -> &SeedCommitment {
        self.state.seeds.pending()
    }

    pub fn seed_rotations(&self) -> u64 {
        self.state.seeds.rotations()
    }

    /// Base asset owed to pool holders: the sum of both pools' supplies.
    pub fn liabilities(&self) -> u128 {
        self.state.pools[0]
            .total_supply()
            .saturating_add(self.state.pools[1].total_supply())
    }

    /// Base asset held beyond what the pools owe, awaiting the next rebase.
    pub fn custody_balance(&self) -> u128 {
        self.asset
            .balance_of(&self.state.address)
            .saturating_sub(self.liabilities())
    }

    /// Units the pools owe beyond the base asset held. Nonzero only after
    /// a swap top-up that custody could not cover.
    pub fn shortfall(&self) -> u128 {
        self.liabilities()
            .saturating_sub(self.asset.balance_of(&self.state.address))
    }

    // ── Entry points ───────────────────────────────────────────────────

    /// Pull `amount` of `holder`'s base asset into custody and mint shares
    /// on the selected pool. `approval` must authorize this controller to
    /// move exactly `amount`.
    pub fn deposit(
        &mut self,
        holder: &Address,
        amount: u128,
        selector: i64,
        approval: &SignedApproval,
        now: Timestamp,
    ) -> Result<u128, ControllerError> {
        let pool = parse_selector(selector)?;
        let controller = self.state.address;

        let shares = self.state.pools[pool.index()].preview_mint(&controller, amount)?;
        self.asset
            .verify_approval(approval, holder, &controller, amount, now)?;
        let available = self.asset.balance_of(holder);
        if available < amount {
            return Err(AssetError::InsufficientFunds {
                needed: amount,
                available,
            }
            .into());
        }
        self.asset
            .balance_of(&controller)
            .checked_add(amount)
            .ok_or(AssetError::Overflow)?;

        self.asset
            .consume_approval(approval, holder, &controller, amount, now)?;
        self.asset.transfer_from(&controller, holder, &controller, amount)?;
        let minted = self.state.pools[pool.index()].mint(&controller, holder, amount)?;
        debug_assert_eq!(minted, shares);

        tracing::debug!(%holder, %pool, amount, shares = minted, "deposit");
        Ok(minted)
    }

    /// Burn `amount` of `holder`'s balance on the selected pool and release
    /// the same amount of base asset to `holder`.
    pub fn withdraw(&mut self, holder: &Address, amount: u128, selector: i64) -> Result<u128, ControllerError> {
        let pool = parse_selector(selector)?;
        if amount == 0 {
            return Err(LedgerError::ZeroAmount.into());
        }
        let controller = self.state.address;

        self.state.pools[pool.index()].preview_burn(&controller, holder, amount)?;
        self.asset.transfer(&controller, holder, amount)?;
        self.state.pools[pool.index()].burn(&controller, holder, amount)?;

        tracing::debug!(%holder, %pool, amount, "withdraw");
        Ok(amount)
    }

    /// Move `amount` of `holder`'s value from one pool to the other at 1:1.
    /// Only the holder may move their own balance.
    ///
    /// Both balances move by exactly `amount` unless share granularity
    /// would make that cost more than one share's value per pool, in which
    /// case ordinary mint/burn rounding applies. Exact placement can leave
    /// the pools owing a few units more than before; that top-up comes out
    /// of custody.
    pub fn pool_swap(
        &mut self,
        caller: &Address,
        holder: &Address,
        amount: u128,
        from: i64,
        to: i64,
    ) -> Result<(), ControllerError> {
        let from = parse_selector(from)?;
        let to = parse_selector(to)?;
        if caller != holder {
            return Err(ControllerError::Unauthorized {
                caller: *caller,
                holder: *holder,
            });
        }
        if from == to {
            return Err(ControllerError::SamePool(from));
        }
        if amount == 0 {
            return Err(LedgerError::ZeroAmount.into());
        }
        let controller = self.state.address;

        let available = self.state.pools[from.index()].balance_of(holder);
        if amount > available {
            return Err(ControllerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        let source_target = available - amount;
        let dest_target = self.state.pools[to.index()]
            .balance_of(holder)
            .checked_add(amount)
            .ok_or(ControllerError::Overflow)?;
        let debit = self.state.pools[from.index()].preview_settle(&controller, holder, source_target)?;
        let credit = self.state.pools[to.index()].preview_settle(&controller, holder, dest_target)?;
        let after = debit
            .total_supply
            .checked_add(credit.total_supply)
            .ok_or(ControllerError::Overflow)?;
        let top_up = after.saturating_sub(self.liabilities());
        let custody = self.custody_balance();

        self.state.pools[from.index()].settle(&controller, holder, source_target)?;
        self.state.pools[to.index()].settle(&controller, holder, dest_target)?;

        if top_up > custody {
            tracing::warn!(
                %holder,
                top_up,
                custody,
                "swap rounding exceeds custody, next inflow covers the shortfall"
            );
        }
        tracing::debug!(
            %holder,
            %from,
            %to,
            amount,
            top_up,
            exact = debit.exact && credit.exact,
            "pool swap"
        );
        Ok(())
    }

    /// Reveal the seed behind the pending commitment, commit to the next
    /// one, take the fee from custody and distribute the rest to the pools.
    ///
    /// When neither pool holds shares the seed still rotates, but fee and
    /// distribution are skipped and custody stays pending.
    pub fn rebase(&mut self, revealed: &SeedKey, next: SeedCommitment) -> Result<RebaseReport, ControllerError> {
        let draw = match self.state.seeds.verify(revealed, &next) {
            Ok(draw) => draw,
            Err(e) => {
                tracing::warn!(error = %e, "seed reveal rejected");
                return Err(e);
            }
        };
        let controller = self.state.address;
        let red_supply = self.state.pools[0].total_supply();
        let black_supply = self.state.pools[1].total_supply();
        let held = self.asset.balance_of(&controller);
        let liabilities = red_supply
            .checked_add(black_supply)
            .ok_or(ControllerError::Overflow)?;
        let custody = held.saturating_sub(liabilities);

        if self.state.pools.iter().all(RebasingLedger::is_empty) {
            self.state.seeds.rotate(revealed, next)?;
            tracing::warn!(
                custody,
                rotations = self.state.seeds.rotations(),
                "no pool holds shares, distribution deferred"
            );
            return Ok(RebaseReport {
                custody,
                ..RebaseReport::default()
            });
        }

        let fee = mul_div_floor(
            custody,
            u128::from(self.state.fee_basis_points),
            BPS_DENOMINATOR,
        )
        .ok_or(ControllerError::Overflow)?;
        let distributable = custody - fee;
        let (red, black) = split_distribution(
            self.state.split,
            distributable,
            red_supply,
            black_supply,
            &draw,
        )
        .ok_or(ControllerError::Overflow)?;
        self.state.pools[0].preview_rebase(&controller, red)?;
        self.state.pools[1].preview_rebase(&controller, black)?;

        if fee > 0 {
            self.asset
                .transfer(&controller, &self.state.fee_collector, fee)?;
        }
        self.state.seeds.rotate(revealed, next)?;
        let red = self.state.pools[0].rebase(&controller, red)?;
        let black = self.state.pools[1].rebase(&controller, black)?;

        let report = RebaseReport {
            custody,
            fee,
            distributed: red + black,
            red,
            black,
        };
        tracing::info!(
            custody,
            fee,
            red,
            black,
            rotations = self.state.seeds.rotations(),
            "rebase"
        );
        Ok(report)
    }

    // ── Holder transfers ───────────────────────────────────────────────

    /// Move pool value between holders without leaving the pool.
    pub fn transfer(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: u128,
        selector: i64,
    ) -> Result<(), ControllerError> {
        let pool = parse_selector(selector)?;
        self.state.pools[pool.index()].transfer(caller, to, amount)?;
        Ok(())
    }

    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u128, selector: i64) -> Result<(), ControllerError> {
        let pool = parse_selector(selector)?;
        self.state.pools[pool.index()].approve(owner, spender, amount);
        Ok(())
    }

    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
        selector: i64,
    ) -> Result<(), ControllerError> {
        let pool = parse_selector(selector)?;
        self.state.pools[pool.index()].transfer_from(spender, from, to, amount)?;
        Ok(())
    }

    // ── Persistence ────────────────────────────────────────────────────

    /// Encode pools, configuration and seed chain. The base asset is not
    /// included; it belongs to its own custodian.
    pub fn snapshot(&self) -> Result<Vec<u8>, ControllerError> {
        bincode::serialize(&self.state).map_err(|e| ControllerError::Snapshot(e.to_string()))
    }

    /// Rebuild a controller from [`snapshot`](Self::snapshot) bytes and the
    /// base asset it was running against.
    pub fn restore(bytes: &[u8], asset: A) -> Result<Self, ControllerError> {
        let state: CoordinatorState =
            bincode::deserialize(bytes).map_err(|e| ControllerError::Snapshot(e.to_string()))?;
        ensure_wired(&state)?;
        tracing::info!(
            controller = %state.address,
            rotations = state.seeds.rotations(),
            "controller restored"
        );
        Ok(Self { state, asset })
    }
}

fn parse_selector(raw: i64) -> Result<PoolSelector, ControllerError> {
    PoolSelector::try_from(raw).map_err(|_| ControllerError::InvalidPoolSelector(raw))
}

fn ensure_wired(state: &CoordinatorState) -> Result<(), ControllerError> {
    for pool in PoolSelector::ALL {
        if !state.pools[pool.index()].is_controller(&state.address) {
            return Err(ControllerError::NotWired { pool });
        }
    }
    Ok(())
}
