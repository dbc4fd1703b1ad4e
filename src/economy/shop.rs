//! Armor and potion shop

use std::fmt;
use std::str::FromStr;

use crate::data::ShopConfig;
use crate::error::{ProfileError, Result};
use crate::save::PlayerProfile;
use crate::session::SessionContext;

use super::ledger::GoldLedger;

/// Consumable potion kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PotionKind {
    /// Restores one health
    Health,
    /// Adds time to the level clock
    Timer,
    /// Brief invulnerability
    Invulnerability,
}

impl PotionKind {
    pub const ALL: [PotionKind; 3] = [PotionKind::Health, PotionKind::Timer, PotionKind::Invulnerability];

    pub fn name(&self) -> &'static str {
        match self {
            PotionKind::Health => "health potion",
            PotionKind::Timer => "timer potion",
            PotionKind::Invulnerability => "invulnerability potion",
        }
    }

    pub fn count(&self, profile: &PlayerProfile) -> u32 {
        match self {
            PotionKind::Health => profile.health_potions,
            PotionKind::Timer => profile.timer_potions,
            PotionKind::Invulnerability => profile.invulnerability_potions,
        }
    }

    fn count_mut<'a>(&self, profile: &'a mut PlayerProfile) -> &'a mut u32 {
        match self {
            PotionKind::Health => &mut profile.health_potions,
            PotionKind::Timer => &mut profile.timer_potions,
            PotionKind::Invulnerability => &mut profile.invulnerability_potions,
        }
    }
}

impl fmt::Display for PotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PotionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "health" => Ok(PotionKind::Health),
            "timer" => Ok(PotionKind::Timer),
            "invulnerability" | "invuln" => Ok(PotionKind::Invulnerability),
            _ => Err(format!("unknown potion '{}'", s)),
        }
    }
}

/// Armor tiers, each bought once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Armor {
    Tier1,
    Tier2,
    Tier3,
}

impl Armor {
    pub const ALL: [Armor; 3] = [Armor::Tier1, Armor::Tier2, Armor::Tier3];

    pub fn from_tier(tier: u8) -> Option<Armor> {
        match tier {
            1 => Some(Armor::Tier1),
            2 => Some(Armor::Tier2),
            3 => Some(Armor::Tier3),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        match self {
            Armor::Tier1 => 0,
            Armor::Tier2 => 1,
            Armor::Tier3 => 2,
        }
    }

    pub fn is_owned(&self, profile: &PlayerProfile) -> bool {
        match self {
            Armor::Tier1 => profile.armor1_unlocked,
            Armor::Tier2 => profile.armor2_unlocked,
            Armor::Tier3 => profile.armor3_unlocked,
        }
    }

    fn set_owned(&self, profile: &mut PlayerProfile) {
        match self {
            Armor::Tier1 => profile.armor1_unlocked = true,
            Armor::Tier2 => profile.armor2_unlocked = true,
            Armor::Tier3 => profile.armor3_unlocked = true,
        }
    }
}

/// Shop bound to its price list
#[derive(Debug, Clone)]
pub struct Shop {
    config: ShopConfig,
}

impl Shop {
    pub fn new(config: &ShopConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Defense from the best armor the profile owns
    pub fn defense_for(&self, profile: &PlayerProfile) -> f32 {
        Armor::ALL
            .iter()
            .rev()
            .find(|a| a.is_owned(profile))
            .map(|a| self.config.armor[a.index()].defense)
            .unwrap_or(0.0)
    }

    /// Buy an armor tier. Returns the profile's new defense.
    pub fn buy_armor(&self, ctx: &SessionContext, ledger: &mut GoldLedger, armor: Armor) -> Result<f32> {
        let tier = self.config.armor[armor.index()];
        let defense = ledger.purchase(ctx, tier.cost, |profile| {
            if armor.is_owned(profile) {
                return Err(ProfileError::AlreadyOwned("armor"));
            }
            armor.set_owned(profile);
            profile.defense = self.defense_for(profile);
            Ok(profile.defense)
        })?;
        log::info!("Bought {:?} armor, defense now {:.1}", armor, defense);
        Ok(defense)
    }

    /// Buy one potion. Refuses at the stack cap before charging anything.
    pub fn buy_potion(&self, ctx: &SessionContext, ledger: &mut GoldLedger, kind: PotionKind) -> Result<u32> {
        let potion = self.config.potion(kind);
        let count = ledger.purchase(ctx, potion.cost, |profile| {
            let count = kind.count_mut(profile);
            if *count >= potion.cap {
                return Err(ProfileError::StackFull {
                    item: kind.name(),
                    cap: potion.cap,
                });
            }
            *count += 1;
            Ok(*count)
        })?;
        log::info!("Bought {} ({}/{})", kind, count, potion.cap);
        Ok(count)
    }

    pub fn potion_cap(&self, kind: PotionKind) -> u32 {
        self.config.potion(kind).cap
    }
}

/// Use one potion from the active profile. Returns how many remain.
pub fn consume_potion(ctx: &SessionContext, kind: PotionKind) -> Result<u32> {
    let remaining = ctx.update_active(|profile| {
        let count = kind.count_mut(profile);
        if *count == 0 {
            return Err(ProfileError::PreconditionNotMet(format!("no {} left", kind)));
        }
        *count -= 1;
        Ok(*count)
    })?;
    log::info!("Used {}, {} left", kind, remaining);
    Ok(remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::Character;
    use crate::session::test_support::*;

    fn shop() -> Shop {
        Shop::new(&ShopConfig::default())
    }

    #[test]
    fn test_potion_cap_checked_before_gold() {
        let (_dir, ctx) = context_with_profile("Alice", Character::Archer);
        set_gold(&ctx, 200);
        let mut ledger = GoldLedger::new();

        assert_eq!(shop().buy_potion(&ctx, &mut ledger, PotionKind::Invulnerability).unwrap(), 1);
        let second = shop().buy_potion(&ctx, &mut ledger, PotionKind::Invulnerability);
        assert!(matches!(second, Err(ProfileError::StackFull { cap: 1, .. })));
        assert_eq!(ctx.load_active().unwrap().gold, 150);
    }

    #[test]
    fn test_potion_needs_gold() {
        let (_dir, ctx) = context_with_profile("Bob", Character::Ninja);
        set_gold(&ctx, 29);
        let mut ledger = GoldLedger::new();

        let result = shop().buy_potion(&ctx, &mut ledger, PotionKind::Timer);
        assert!(matches!(result, Err(ProfileError::InsufficientFunds { .. })));
        let profile = ctx.load_active().unwrap();
        assert_eq!(profile.timer_potions, 0);
        assert_eq!(profile.gold, 29);
    }

    #[test]
    fn test_health_potions_stack_to_three() {
        let (_dir, ctx) = context_with_profile("Cleo", Character::DragonWarrior);
        set_gold(&ctx, 100);
        let mut ledger = GoldLedger::new();

        for expected in 1..=3 {
            assert_eq!(shop().buy_potion(&ctx, &mut ledger, PotionKind::Health).unwrap(), expected);
        }
        assert!(shop().buy_potion(&ctx, &mut ledger, PotionKind::Health).is_err());
        assert_eq!(ctx.load_active().unwrap().gold, 70);
    }

    #[test]
    fn test_consume_potion() {
        let (_dir, ctx) = context_with_profile("Dee", Character::Archer);
        assert!(matches!(
            consume_potion(&ctx, PotionKind::Health),
            Err(ProfileError::PreconditionNotMet(_))
        ));

        ctx.update_active(|p| {
            p.health_potions = 2;
            Ok(())
        })
        .unwrap();
        assert_eq!(consume_potion(&ctx, PotionKind::Health).unwrap(), 1);
        assert_eq!(ctx.load_active().unwrap().health_potions, 1);
    }

    #[test]
    fn test_armor_defense_uses_best_tier() {
        let (_dir, ctx) = context_with_profile("Eve", Character::Ninja);
        set_gold(&ctx, 300);
        let mut ledger = GoldLedger::new();

        assert_eq!(shop().buy_armor(&ctx, &mut ledger, Armor::Tier2).unwrap(), 1.0);
        assert_eq!(shop().buy_armor(&ctx, &mut ledger, Armor::Tier1).unwrap(), 1.0);
        assert!(matches!(
            shop().buy_armor(&ctx, &mut ledger, Armor::Tier2),
            Err(ProfileError::AlreadyOwned(_))
        ));
        assert_eq!(shop().buy_armor(&ctx, &mut ledger, Armor::Tier3).unwrap(), 1.5);

        let profile = ctx.load_active().unwrap();
        assert_eq!(profile.gold, 0);
        assert_eq!(profile.defense, 1.5);
    }

    #[test]
    fn test_parsing() {
        assert_eq!("invuln".parse::<PotionKind>(), Ok(PotionKind::Invulnerability));
        assert!("mana".parse::<PotionKind>().is_err());
        assert_eq!(Armor::from_tier(2), Some(Armor::Tier2));
        assert_eq!(Armor::from_tier(4), None);
    }
}
