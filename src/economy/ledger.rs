//! Gold ledger
//!
//! Caches the active profile's gold balance. Every change is written to the
//! profile file before the cache is updated, and the cache is dropped as
//! soon as a different profile becomes active.

use crate::error::{ProfileError, Result};
use crate::save::PlayerProfile;
use crate::session::SessionContext;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CachedBalance {
    profile: String,
    gold: u32,
}

/// Mirrored gold balance of the active profile
#[derive(Debug, Clone, Default)]
pub struct GoldLedger {
    cached: Option<CachedBalance>,
}

impl GoldLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known balance, without touching disk
    pub fn cached_balance(&self) -> Option<u32> {
        self.cached.as_ref().map(|c| c.gold)
    }

    /// Current balance of the active profile.
    ///
    /// The stored profile is authoritative: the cache is refreshed whenever
    /// the active profile changed or its gold was rewritten elsewhere, such
    /// as a profile recreated under the same name.
    pub fn balance(&mut self, ctx: &SessionContext) -> Result<u32> {
        let profile = ctx.load_active()?;
        match &self.cached {
            Some(cached) if cached.profile != profile.name => {
                log::info!("Active profile changed to '{}', reloading gold", profile.name);
            }
            Some(cached) if cached.gold != profile.gold => {
                log::warn!(
                    "Cached gold {} for '{}' is stale, saved balance is {}",
                    cached.gold,
                    cached.profile,
                    profile.gold
                );
            }
            _ => {}
        }
        self.remember(&profile);
        Ok(profile.gold)
    }

    /// Discard the cache and read the balance from disk
    pub fn reload(&mut self, ctx: &SessionContext) -> Result<u32> {
        self.cached = None;
        let profile = ctx.load_active()?;
        self.remember(&profile);
        log::debug!("Loaded gold for '{}': {}", profile.name, profile.gold);
        Ok(profile.gold)
    }

    pub fn add_gold(&mut self, ctx: &SessionContext, amount: u32) -> Result<u32> {
        self.reward(ctx, amount, |_| Ok(()))?;
        let gold = self.cached_balance().unwrap_or_default();
        log::info!("Added {} gold. New total: {}", amount, gold);
        Ok(gold)
    }

    /// Spend gold. Fails without any change when the balance is short.
    pub fn spend_gold(&mut self, ctx: &SessionContext, amount: u32) -> Result<u32> {
        self.purchase(ctx, amount, |_| Ok(()))?;
        let gold = self.cached_balance().unwrap_or_default();
        log::info!("Spent {} gold. New total: {}", amount, gold);
        Ok(gold)
    }

    /// Charge `cost` and apply `apply` to the active profile in one write.
    ///
    /// `apply` runs first so it can refuse the purchase (already owned,
    /// stack full) before funds are checked. Nothing is persisted on error.
    pub fn purchase<R>(
        &mut self,
        ctx: &SessionContext,
        cost: u32,
        apply: impl FnOnce(&mut PlayerProfile) -> Result<R>,
    ) -> Result<R> {
        self.transact(ctx, |profile| {
            let value = apply(profile)?;
            if profile.gold < cost {
                log::warn!("Not enough gold: need {}, have {}", cost, profile.gold);
                return Err(ProfileError::InsufficientFunds {
                    needed: cost,
                    available: profile.gold,
                });
            }
            profile.gold -= cost;
            Ok(value)
        })
    }

    /// Credit `amount` and apply `apply` to the active profile in one write
    pub fn reward<R>(
        &mut self,
        ctx: &SessionContext,
        amount: u32,
        apply: impl FnOnce(&mut PlayerProfile) -> Result<R>,
    ) -> Result<R> {
        self.transact(ctx, |profile| {
            let value = apply(profile)?;
            profile.gold = profile.gold.saturating_add(amount);
            Ok(value)
        })
    }

    fn transact<R>(
        &mut self,
        ctx: &SessionContext,
        f: impl FnOnce(&mut PlayerProfile) -> Result<R>,
    ) -> Result<R> {
        let mut profile = ctx.load_active()?;
        // Disk is authoritative even if the mutation below is refused
        self.remember(&profile);

        let value = f(&mut profile)?;
        ctx.store().save(&profile)?;
        self.remember(&profile);
        Ok(value)
    }

    fn remember(&mut self, profile: &PlayerProfile) {
        self.cached = Some(CachedBalance {
            profile: profile.name.clone(),
            gold: profile.gold,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::{Character, PlayerProfile};
    use crate::session::test_support::*;
    use proptest::prelude::*;

    #[test]
    fn test_spend_more_than_balance_fails() {
        let (_dir, ctx) = context_with_profile("Alice", Character::Archer);
        set_gold(&ctx, 40);
        let mut ledger = GoldLedger::new();

        let result = ledger.spend_gold(&ctx, 50);
        assert!(matches!(
            result,
            Err(ProfileError::InsufficientFunds { needed: 50, available: 40 })
        ));
        assert_eq!(ledger.balance(&ctx).unwrap(), 40);
        assert_eq!(ctx.load_active().unwrap().gold, 40);
    }

    #[test]
    fn test_add_and_spend_persist() {
        let (_dir, ctx) = context_with_profile("Bob", Character::Ninja);
        let mut ledger = GoldLedger::new();

        assert_eq!(ledger.add_gold(&ctx, 30).unwrap(), 30);
        assert_eq!(ledger.spend_gold(&ctx, 12).unwrap(), 18);
        assert_eq!(ctx.load_active().unwrap().gold, 18);
        assert_eq!(ledger.cached_balance(), Some(18));
    }

    #[test]
    fn test_cache_reloads_on_profile_switch() {
        let (_dir, mut ctx) = context_with_profile("Cleo", Character::Archer);
        let mut ledger = GoldLedger::new();
        ledger.add_gold(&ctx, 25).unwrap();

        let mut other = PlayerProfile::new("Dee", Character::Ninja);
        other.gold = 7;
        ctx.store().save(&other).unwrap();
        ctx.set_active_profile("Dee").unwrap();

        assert_eq!(ledger.balance(&ctx).unwrap(), 7);
        ledger.add_gold(&ctx, 1).unwrap();
        assert_eq!(ctx.store().load("Dee").unwrap().gold, 8);
        assert_eq!(ctx.store().load("Cleo").unwrap().gold, 25);
    }

    #[test]
    fn test_balance_follows_profile_recreated_under_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = SessionContext::in_memory(crate::save::ProfileStore::new(dir.path().join("profiles")));
        let mut ledger = GoldLedger::new();

        crate::session::ProfileSlots::new(&mut ctx)
            .create(0, "Alice", Character::Archer)
            .unwrap();
        assert_eq!(ledger.add_gold(&ctx, 50).unwrap(), 50);

        crate::session::ProfileSlots::new(&mut ctx)
            .create(0, "Alice", Character::Archer)
            .unwrap();
        assert_eq!(ledger.balance(&ctx).unwrap(), 0);
        assert_eq!(ledger.cached_balance(), Some(0));
    }

    #[test]
    fn test_balance_picks_up_external_gold_write() {
        let (_dir, ctx) = context_with_profile("Eve", Character::Ninja);
        let mut ledger = GoldLedger::new();
        ledger.add_gold(&ctx, 10).unwrap();

        set_gold(&ctx, 3);
        assert_eq!(ledger.balance(&ctx).unwrap(), 3);
    }

    #[test]
    fn test_no_active_profile() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = SessionContext::in_memory(crate::save::ProfileStore::new(dir.path()));
        let mut ledger = GoldLedger::new();
        assert!(matches!(ledger.add_gold(&ctx, 5), Err(ProfileError::NoActiveProfile)));
        assert_eq!(ledger.cached_balance(), None);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u32),
        Spend(u32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![(0u32..100).prop_map(Op::Add), (0u32..150).prop_map(Op::Spend)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_balance_matches_model(ops in proptest::collection::vec(op(), 1..20)) {
            let (_dir, ctx) = context_with_profile("Prop", Character::Archer);
            let mut ledger = GoldLedger::new();
            let mut model: u32 = 0;

            for op in ops {
                match op {
                    Op::Add(n) => {
                        ledger.add_gold(&ctx, n).unwrap();
                        model += n;
                    }
                    Op::Spend(n) => {
                        let result = ledger.spend_gold(&ctx, n);
                        if n <= model {
                            prop_assert!(result.is_ok());
                            model -= n;
                        } else {
                            prop_assert!(result.is_err());
                        }
                    }
                }
                prop_assert_eq!(ledger.cached_balance(), Some(model));
                prop_assert_eq!(ctx.load_active().unwrap().gold, model);
            }
        }
    }
}
