//! The rebasing pool token.

use std::collections::HashMap;

use rbpool_types::{mul_div_ceil, mul_div_floor, Address, POOL_DECIMALS};
use serde::{Deserialize, Serialize};

use crate::access::AccessGuard;
use crate::error::LedgerError;
use crate::shares;

/// Totals that put one holder's balance at a chosen target.
///
/// Produced by [`RebasingLedger::preview_settle`] and applied by
/// [`RebasingLedger::settle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub holder_shares: u128,
    pub total_shares: u128,
    pub total_supply: u128,
    /// The holder's balance lands exactly on the target. When `false` the
    /// plain mint/burn rounding was used instead.
    pub exact: bool,
}

/// A pool token whose balances are shares of a rebasing supply.
///
/// `balance_of(h) = floor(shares(h) * total_supply / total_shares)`.
///
/// Every mutating method checks all of its preconditions before touching
/// state, so a returned error means nothing changed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RebasingLedger {
    name: String,
    symbol: String,
    guard: AccessGuard,
    total_shares: u128,
    /// Numerator of the per-share scalar. Grows by exactly the distributed
    /// amount on every rebase.
    total_supply: u128,
    /// Holders with a nonzero share count.
    shares: HashMap<Address, u128>,
    /// owner -> spender -> remaining allowance (external units).
    allowances: HashMap<Address, HashMap<Address, u128>>,
}

impl RebasingLedger {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, admin: Address) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            guard: AccessGuard::new(admin),
            total_shares: 0,
            total_supply: 0,
            shares: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    /// The Red pool token ("rMEMO").
    pub fn red(admin: Address) -> Self {
        Self::new("Red Memo Pool", "rMEMO", admin)
    }

    /// The Black pool token ("bMEMO").
    pub fn black(admin: Address) -> Self {
        Self::new("Black Memo Pool", "bMEMO", admin)
    }

    // ── Metadata ───────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        POOL_DECIMALS
    }

    // ── Access ─────────────────────────────────────────────────────────

    /// Register the controller that may mint, burn and rebase. Admin only,
    /// exactly once.
    pub fn set_controller(&mut self, caller: &Address, controller: Address) -> Result<(), LedgerError> {
        self.guard.register(caller, controller)?;
        tracing::info!(pool = %self.symbol, %controller, "controller registered");
        Ok(())
    }

    pub fn controller(&self) -> Option<&Address> {
        self.guard.controller()
    }

    pub fn is_controller(&self, who: &Address) -> bool {
        self.guard.ensure_controller(who).is_ok()
    }

    // ── Views ──────────────────────────────────────────────────────────

    pub fn total_shares(&self) -> u128 {
        self.total_shares
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn is_empty(&self) -> bool {
        self.total_shares == 0
    }

    pub fn shares_of(&self, holder: &Address) -> u128 {
        self.shares.get(holder).copied().unwrap_or(0)
    }

    pub fn balance_of(&self, holder: &Address) -> u128 {
        self.amount_for_shares(self.shares_of(holder))
    }

    pub fn holder_count(&self) -> usize {
        self.shares.len()
    }

    /// The per-share scalar as an 18-decimal fixed-point value.
    pub fn per_share_scalar(&self) -> u128 {
        shares::scalar_fixed(self.total_shares, self.total_supply)
    }

    /// Shares a mint of `amount` would credit at the current scalar.
    pub fn shares_for_amount(&self, amount: u128) -> Result<u128, LedgerError> {
        shares::shares_for_amount_floor(amount, self.total_shares, self.total_supply)
            .ok_or(LedgerError::Overflow)
    }

    pub fn amount_for_shares(&self, shares: u128) -> u128 {
        shares::amount_for_shares(shares, self.total_shares, self.total_supply)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or(0)
    }

    // ── Privileged ─────────────────────────────────────────────────────

    /// Check that a mint would succeed and return the shares it would credit.
    pub fn preview_mint(&self, caller: &Address, amount: u128) -> Result<u128, LedgerError> {
        self.guard.ensure_controller(caller)?;
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let minted = self.shares_for_amount(amount)?;
        if minted == 0 {
            return Err(LedgerError::ZeroShares { amount });
        }
        self.total_shares
            .checked_add(minted)
            .ok_or(LedgerError::Overflow)?;
        self.total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        Ok(minted)
    }

    /// Credit `amount` of external value to `holder`. Controller only.
    ///
    /// The holder receives `floor(amount / scalar)` shares; the full `amount`
    /// is added to supply, so rounding dust accrues to existing holders.
    pub fn mint(&mut self, caller: &Address, holder: &Address, amount: u128) -> Result<u128, LedgerError> {
        let minted = self.preview_mint(caller, amount)?;
        self.total_shares += minted;
        self.total_supply += amount;
        *self.shares.entry(*holder).or_insert(0) += minted;
        tracing::debug!(pool = %self.symbol, %holder, amount, shares = minted, "minted");
        Ok(minted)
    }

    /// Check that a burn would succeed and return the shares it would debit.
    pub fn preview_burn(&self, caller: &Address, holder: &Address, amount: u128) -> Result<u128, LedgerError> {
        self.guard.ensure_controller(caller)?;
        self.shares_to_debit(holder, amount)
    }

    /// Remove `amount` of external value from `holder`. Controller only.
    pub fn burn(&mut self, caller: &Address, holder: &Address, amount: u128) -> Result<u128, LedgerError> {
        let burned = self.preview_burn(caller, holder, amount)?;
        self.debit_shares(holder, burned);
        self.total_shares -= burned;
        self.total_supply = self.total_supply.saturating_sub(amount);
        if self.total_shares == 0 {
            if self.total_supply > 0 {
                tracing::debug!(pool = %self.symbol, dust = self.total_supply, "pool emptied, scalar reset");
            }
            self.total_supply = 0;
        }
        tracing::debug!(pool = %self.symbol, %holder, amount, shares = burned, "burned");
        Ok(burned)
    }

    /// Check that a rebase would succeed and return the amount it would apply.
    pub fn preview_rebase(&self, caller: &Address, amount: u128) -> Result<u128, LedgerError> {
        self.guard.ensure_controller(caller)?;
        if self.total_shares == 0 || amount == 0 {
            return Ok(0);
        }
        self.total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        Ok(amount)
    }

    /// Grow total supply by `amount` without touching any holder's shares.
    /// Controller only.
    ///
    /// Returns the amount actually applied: `0` when the pool has no shares,
    /// in which case the caller must route the value elsewhere.
    pub fn rebase(&mut self, caller: &Address, amount: u128) -> Result<u128, LedgerError> {
        if self.preview_rebase(caller, amount)? == 0 {
            return Ok(0);
        }
        let before = self.total_supply;
        let supply = before + amount;
        self.total_supply = supply;
        tracing::info!(
            pool = %self.symbol,
            amount,
            supply_before = before,
            supply_after = supply,
            "rebased"
        );
        Ok(amount)
    }

    /// Plan the share and supply totals that move `holder`'s balance to
    /// exactly `target` without lowering the per-share scalar.
    ///
    /// The supply may end up slightly above or below `total_supply ± delta`;
    /// the caller funds or keeps the difference. Exact placement is skipped
    /// when it would cost more than one share's value plus one unit, in
    /// which case the plan falls back to an ordinary floor mint or ceil burn.
    pub fn preview_settle(&self, caller: &Address, holder: &Address, target: u128) -> Result<Settlement, LedgerError> {
        self.guard.ensure_controller(caller)?;
        let held = self.shares_of(holder);
        let current = self.balance_of(holder);
        let (shares, supply) = (self.total_shares, self.total_supply);

        if target == current {
            return Ok(Settlement {
                holder_shares: held,
                total_shares: shares,
                total_supply: supply,
                exact: true,
            });
        }
        if shares == 0 {
            return Ok(Settlement {
                holder_shares: target,
                total_shares: target,
                total_supply: target,
                exact: true,
            });
        }
        let others = shares - held;
        if target == 0 {
            let total_supply = if others == 0 {
                0
            } else {
                mul_div_ceil(supply, others, shares).ok_or(LedgerError::Overflow)?
            };
            return Ok(Settlement {
                holder_shares: 0,
                total_shares: others,
                total_supply,
                exact: true,
            });
        }

        let baseline = if target > current {
            supply.checked_add(target - current).ok_or(LedgerError::Overflow)?
        } else {
            supply - (current - target)
        };
        let share_value = mul_div_ceil(supply, 1, shares).ok_or(LedgerError::Overflow)?;
        let ceiling = baseline.saturating_add(share_value).saturating_add(1);

        let lo = mul_div_floor(target, shares, supply).ok_or(LedgerError::Overflow)?;
        let mut best: Option<Settlement> = None;
        for holder_shares in [lo.checked_add(1), Some(lo)].into_iter().flatten() {
            let Some(plan) = self.exact_plan(holder_shares, others, target)? else {
                continue;
            };
            if plan.total_supply <= ceiling
                && best.map_or(true, |b| plan.total_supply < b.total_supply)
            {
                best = Some(plan);
            }
        }
        if let Some(plan) = best {
            return Ok(plan);
        }

        if target > current {
            let amount = target - current;
            let minted = self.shares_for_amount(amount)?;
            if minted == 0 {
                return Err(LedgerError::ZeroShares { amount });
            }
            Ok(Settlement {
                holder_shares: held + minted,
                total_shares: shares.checked_add(minted).ok_or(LedgerError::Overflow)?,
                total_supply: baseline,
                exact: false,
            })
        } else {
            let burned = self.shares_to_debit(holder, current - target)?;
            let total_shares = shares - burned;
            Ok(Settlement {
                holder_shares: held - burned,
                total_shares,
                total_supply: if total_shares == 0 { 0 } else { baseline },
                exact: false,
            })
        }
    }

    /// Apply [`preview_settle`](Self::preview_settle). Controller only.
    pub fn settle(&mut self, caller: &Address, holder: &Address, target: u128) -> Result<Settlement, LedgerError> {
        let plan = self.preview_settle(caller, holder, target)?;
        if plan.holder_shares == 0 {
            self.shares.remove(holder);
        } else {
            self.shares.insert(*holder, plan.holder_shares);
        }
        self.total_shares = plan.total_shares;
        self.total_supply = plan.total_supply;
        tracing::debug!(
            pool = %self.symbol,
            %holder,
            target,
            shares = plan.holder_shares,
            supply = plan.total_supply,
            exact = plan.exact,
            "settled"
        );
        Ok(plan)
    }

    // ── Holder operations ──────────────────────────────────────────────

    /// Move `amount` of external value from `caller` to `to`.
    pub fn transfer(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<(), LedgerError> {
        let moved = self.shares_to_debit(caller, amount)?;
        self.move_shares(caller, to, moved);
        tracing::debug!(pool = %self.symbol, from = %caller, %to, amount, shares = moved, "transfer");
        Ok(())
    }

    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) {
        let entry = self.allowances.entry(*owner).or_default();
        if amount == 0 {
            entry.remove(spender);
        } else {
            entry.insert(*spender, amount);
        }
        if entry.is_empty() {
            self.allowances.remove(owner);
        }
    }

    /// Move `amount` from `from` to `to` against `spender`'s allowance.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                needed: amount,
                available: allowed,
            });
        }
        let moved = self.shares_to_debit(from, amount)?;
        self.approve(from, spender, allowed - amount);
        self.move_shares(from, to, moved);
        tracing::debug!(pool = %self.symbol, %spender, %from, %to, amount, shares = moved, "transfer_from");
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────────────

    /// Shares that must leave `holder` to remove `amount` of value (ceil).
    fn shares_to_debit(&self, holder: &Address, amount: u128) -> Result<u128, LedgerError> {
        let available = self.balance_of(holder);
        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        // amount <= balance implies ceil(amount / scalar) <= held shares.
        let debit = shares::shares_for_amount_ceil(amount, self.total_shares, self.total_supply)
            .ok_or(LedgerError::Overflow)?;
        Ok(debit.min(self.shares_of(holder)))
    }

    /// The cheapest supply at which `holder_shares` out of
    /// `others + holder_shares` are worth exactly `target`, if any, keeping
    /// the scalar at or above its current value.
    fn exact_plan(&self, holder_shares: u128, others: u128, target: u128) -> Result<Option<Settlement>, LedgerError> {
        if holder_shares == 0 {
            return Ok(None);
        }
        let total_shares = others
            .checked_add(holder_shares)
            .ok_or(LedgerError::Overflow)?;
        let keep_scalar = mul_div_ceil(self.total_supply, total_shares, self.total_shares)
            .ok_or(LedgerError::Overflow)?;
        let reach_target =
            mul_div_ceil(target, total_shares, holder_shares).ok_or(LedgerError::Overflow)?;
        let total_supply = keep_scalar.max(reach_target);
        let balance = shares::amount_for_shares(holder_shares, total_shares, total_supply);
        Ok((balance == target).then_some(Settlement {
            holder_shares,
            total_shares,
            total_supply,
            exact: true,
        }))
    }

    fn debit_shares(&mut self, holder: &Address, amount: u128) {
        if let Some(held) = self.shares.get_mut(holder) {
            *held -= amount;
            if *held == 0 {
                self.shares.remove(holder);
            }
        }
    }

    fn move_shares(&mut self, from: &Address, to: &Address, amount: u128) {
        if amount == 0 || from == to {
            return;
        }
        self.debit_shares(from, amount);
        *self.shares.entry(*to).or_insert(0) += amount;
    }
}
