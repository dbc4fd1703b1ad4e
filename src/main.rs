//! Platformer Progress - command-line driver
//!
//! Runs one profile or progression command against the on-disk saves.
//! Usage: `platformer-progress [--dir <path>] <command> [args...]`

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use platformer_progress::economy::{consume_potion, Armor, PotionKind};
use platformer_progress::progression::{format_clock, LevelAttempt, Stat};
use platformer_progress::save::{data_dir, FileSessionStore};
use platformer_progress::session::{SlotAction, SlotStatus};
use platformer_progress::{
    Character, GameConfig, GoldLedger, LevelProgression, Milestones, MissionTracker, ProfileSlots,
    ProfileStore, SessionContext, Shop, Upgrades,
};

const USAGE: &str = "\
usage: platformer-progress [--dir <path>] <command> [args...]

commands:
  slots                               list the profile slots
  create <slot> <name> <character>    create a profile (Archer, DragonWarrior, Ninja)
  load <slot>                         make a slot's profile active
  delete <slot>                       delete a slot's profile
  status                              show the active profile
  complete <level> <remaining> <limit> [--damaged]
  kill [count]                        record enemy kills
  missions                            list missions
  claim-mission <index>
  milestones                          list star milestones
  claim-milestone <stars>             claim the milestone at that star count
  gold                                show gold balance
  buy <health|timer|invulnerability|armor1|armor2|armor3>
  use <health|timer|invulnerability>
  upgrade <speed|jump|cooldown>
  unlock <double-jump|wall-jump>
  buy-points
  export-config                       write the default config file";

/// Wires every system to one session
struct App {
    ctx: SessionContext,
    config_path: PathBuf,
    ledger: GoldLedger,
    tracker: MissionTracker,
    levels: LevelProgression,
    milestones: Milestones,
    shop: Shop,
    upgrades: Upgrades,
}

impl App {
    fn new(base: PathBuf, store: ProfileStore) -> Self {
        let config_path = base.join("game.ron");
        let config = GameConfig::load_or_default(&config_path);
        let prefs = FileSessionStore::open(base.join("session.ron"));
        let ctx = SessionContext::new(store, prefs);

        let mut tracker = MissionTracker::new(config.missions.clone());
        tracker.force_reset(&ctx);

        Self {
            ctx,
            config_path,
            ledger: GoldLedger::new(),
            tracker,
            levels: LevelProgression::new(&config),
            milestones: Milestones::new(&config),
            shop: Shop::new(&config.shop),
            upgrades: Upgrades::new(&config.upgrades),
        }
    }

    fn run(&mut self, command: &str, args: &[String]) -> Result<()> {
        match command {
            "slots" => self.print_slots(),
            "create" => {
                let slot = parse_arg(args, 0, "slot")?;
                let name = args.get(1).ok_or_else(|| anyhow!("missing profile name"))?;
                let character: Character = args
                    .get(2)
                    .ok_or_else(|| anyhow!("missing character"))?
                    .parse()
                    .map_err(|e: String| anyhow!(e))?;
                let profile = ProfileSlots::new(&mut self.ctx).create(slot, name, character)?;
                self.tracker.force_reset(&self.ctx);
                println!("Created '{}' playing {}", profile.name, profile.character);
                Ok(())
            }
            "load" => {
                let slot = parse_arg(args, 0, "slot")?;
                match ProfileSlots::new(&mut self.ctx).select(slot)? {
                    SlotAction::Load(name) => {
                        self.tracker.on_profile_changed(&self.ctx);
                        println!("Loaded '{}'", name);
                    }
                    SlotAction::Create => println!("Slot {} is empty, use `create`", slot),
                }
                Ok(())
            }
            "delete" => {
                let slot = parse_arg(args, 0, "slot")?;
                ProfileSlots::new(&mut self.ctx).delete(slot)?;
                self.tracker.force_reset(&self.ctx);
                println!("Slot {} cleared", slot);
                Ok(())
            }
            "status" => self.print_status(),
            "complete" => {
                let level: usize = parse_arg(args, 0, "level")?;
                let remaining: f32 = parse_arg(args, 1, "remaining")?;
                let limit: f32 = parse_arg(args, 2, "limit")?;
                if level == 0 {
                    bail!("levels are numbered from 1");
                }
                let mut attempt = LevelAttempt::start(level - 1);
                if args.iter().any(|a| a == "--damaged") {
                    attempt.record_damage();
                }
                let outcome = self.levels.complete_attempt(&mut self.ctx, &attempt, remaining, limit)?;
                println!("Level {} - {} Stars!", level, outcome.stars);
                if outcome.frontier_advanced {
                    println!("Unlocked level {}", outcome.current_level);
                }
                let reqs = self.levels.thresholds().requirements(limit);
                println!("{}\n(time limit {})", reqs.describe(), format_clock(limit));
                Ok(())
            }
            "kill" => {
                let count: u32 = if args.is_empty() { 1 } else { parse_arg(args, 0, "count")? };
                for _ in 0..count {
                    for index in self.tracker.record_kill(&self.ctx)? {
                        println!("Mission complete: {}", self.tracker.missions()[index].def.description);
                    }
                }
                Ok(())
            }
            "missions" => {
                let states = self.tracker.states(&self.ctx)?;
                for (i, (mission, state)) in self.tracker.missions().iter().zip(states).enumerate() {
                    println!(
                        "{}: {} [{}/{}] {:?}",
                        i,
                        mission.def.description,
                        mission.current_kills,
                        mission.def.kill_target(),
                        state
                    );
                }
                Ok(())
            }
            "claim-mission" => {
                let index = parse_arg(args, 0, "index")?;
                let gold = self.tracker.claim(&self.ctx, &mut self.ledger, index)?;
                println!("Mission claimed! +{} gold", gold);
                Ok(())
            }
            "milestones" => {
                let profile = self.ctx.load_active()?;
                println!("Total stars: {}", profile.total_stars());
                for status in self.milestones.status(&profile) {
                    println!(
                        "{} Stars - {} Gold{}",
                        status.reward.stars_required,
                        status.reward.gold,
                        if status.claimed {
                            " (claimed)"
                        } else if status.reached {
                            " (claimable)"
                        } else {
                            ""
                        }
                    );
                }
                Ok(())
            }
            "claim-milestone" => {
                let stars: u32 = parse_arg(args, 0, "stars")?;
                let tier = self
                    .milestones
                    .tier_for_stars(stars)
                    .ok_or_else(|| anyhow!("no milestone at {} stars", stars))?;
                let gold = self.milestones.claim(&self.ctx, &mut self.ledger, tier)?;
                println!("Claimed {} gold for {} stars", gold, stars);
                Ok(())
            }
            "gold" => {
                println!("Gold: {}", self.ledger.balance(&self.ctx)?);
                Ok(())
            }
            "buy" => {
                let item = args.first().ok_or_else(|| anyhow!("missing item"))?;
                if let Some(tier) = item.strip_prefix("armor") {
                    let armor = tier
                        .parse()
                        .ok()
                        .and_then(Armor::from_tier)
                        .ok_or_else(|| anyhow!("unknown armor '{}'", item))?;
                    let defense = self.shop.buy_armor(&self.ctx, &mut self.ledger, armor)?;
                    println!("Unlocked. Defense: {:.1}", defense);
                } else {
                    let kind: PotionKind = item.parse().map_err(|e: String| anyhow!(e))?;
                    let count = self.shop.buy_potion(&self.ctx, &mut self.ledger, kind)?;
                    println!("Purchased x{}/{}", count, self.shop.potion_cap(kind));
                }
                Ok(())
            }
            "use" => {
                let kind: PotionKind = args
                    .first()
                    .ok_or_else(|| anyhow!("missing potion"))?
                    .parse()
                    .map_err(|e: String| anyhow!(e))?;
                let left = consume_potion(&self.ctx, kind)?;
                println!("Used {}, {} left", kind, left);
                Ok(())
            }
            "upgrade" => {
                let stat: Stat = args
                    .first()
                    .ok_or_else(|| anyhow!("missing stat"))?
                    .parse()
                    .map_err(|e: String| anyhow!(e))?;
                let value = self.upgrades.upgrade(&self.ctx, stat)?;
                println!("{}: {:.1}", stat, value);
                Ok(())
            }
            "unlock" => {
                match args.first().map(String::as_str) {
                    Some("double-jump") => self.upgrades.unlock_double_jump(&self.ctx, &mut self.ledger)?,
                    Some("wall-jump") => self.upgrades.unlock_wall_jump(&self.ctx, &mut self.ledger)?,
                    other => bail!("unknown unlock {:?}", other),
                }
                println!("Unlocked!");
                Ok(())
            }
            "buy-points" => {
                let points = self.upgrades.buy_points(&self.ctx, &mut self.ledger)?;
                println!("Points: {:.1}", points);
                Ok(())
            }
            "export-config" => {
                GameConfig::export_default(&self.config_path)?;
                println!("Wrote {}", self.config_path.display());
                Ok(())
            }
            "help" | "--help" | "-h" => {
                println!("{}", USAGE);
                Ok(())
            }
            other => bail!("unknown command '{}'\n\n{}", other, USAGE),
        }
    }

    fn print_slots(&mut self) -> Result<()> {
        for (slot, status) in ProfileSlots::new(&mut self.ctx).statuses().into_iter().enumerate() {
            match status {
                SlotStatus::Empty => println!("{}: Empty", slot),
                SlotStatus::Occupied { name, character, gold } => {
                    println!("{}: Name: {} Character: {} Gold: {}", slot, name, character, gold)
                }
            }
        }
        Ok(())
    }

    fn print_status(&self) -> Result<()> {
        let p = self.ctx.load_active()?;
        println!("Name: {}  Character: {}", p.name, p.character);
        println!("Level: {}  Stars: {}  Gold: {}", p.current_level, p.total_stars(), p.gold);
        println!(
            "Speed: {:.1}  Jump: {:.1}  Cooldown: {:.1}  Points: {:.1}",
            p.speed, p.jump_power, p.attack_cooldown, p.upgrade_points
        );
        println!(
            "Potions: health x{}  timer x{}  invulnerability x{}  Defense: {:.1}",
            p.health_potions, p.timer_potions, p.invulnerability_potions, p.defense
        );
        for (i, stars) in p.level_stars.iter().enumerate() {
            println!("Level {} - {}/3 stars", i + 1, stars);
        }
        Ok(())
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, what: &str) -> Result<T> {
    let raw = args.get(index).ok_or_else(|| anyhow!("missing {}", what))?;
    raw.parse().map_err(|_| anyhow!("invalid {} '{}'", what, raw))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let (base, store) = if args.first().map(String::as_str) == Some("--dir") {
        if args.len() < 2 {
            bail!("--dir needs a path");
        }
        let dir = PathBuf::from(args.remove(1));
        args.remove(0);
        let store = ProfileStore::new(dir.join("profiles"));
        (dir, store)
    } else {
        (data_dir(), ProfileStore::open_default())
    };

    let Some((command, rest)) = args.split_first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    log::info!("Starting Platformer Progress v{}", env!("CARGO_PKG_VERSION"));
    let mut app = App::new(base.clone(), store);
    app.run(command, rest)
        .with_context(|| format!("'{}' failed (data in {})", command, base.display()))
}
