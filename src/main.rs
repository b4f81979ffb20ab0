//! Guildhall - Entry Point
//!
//! Starts a campaign, then runs an interactive command loop
//! over it. Every command maps onto one `Campaign` operation.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use guildhall::campaign::{Campaign, GameEventKind};
use guildhall::core::config::BalanceConfig;
use guildhall::core::error::Result;
use guildhall::core::types::{AdventurerId, Difficulty, QuestId};
use guildhall::entity::{FacilityKind, Staff, StaffRole};
use guildhall::persistence::{self, DirectorySaveStore};

/// Guildhall - run an adventurers' guild one week at a time
#[derive(Parser, Debug)]
#[command(name = "guildhall")]
#[command(about = "Turn-based guild management simulation")]
struct Args {
    /// Guild / campaign name
    #[arg(long, default_value = "The Gilded Lantern")]
    name: String,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// easy, normal, hard or brutal
    #[arg(long, default_value = "normal")]
    difficulty: Difficulty,

    /// Directory holding save slots
    #[arg(long, default_value = "saves")]
    saves: PathBuf,

    /// Balance table (TOML); built-in defaults otherwise
    #[arg(long)]
    balance: Option<PathBuf>,

    /// Log filter, e.g. "guildhall=debug"
    #[arg(long)]
    log: Option<String>,
}

const DEFAULT_STAFF_SALARY: i64 = 20;

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match &args.log {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("guildhall=info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &args.balance {
        Some(path) => BalanceConfig::load_from_toml(path)?,
        None => BalanceConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut campaign = Campaign::new(args.name.clone(), seed, args.difficulty, config)?;
    let mut saves = DirectorySaveStore::open(&args.saves)?;

    println!("\n=== GUILDHALL ===");
    println!("{} opens its doors (seed {seed})", campaign.guild().name);
    print_help();

    loop {
        print!("{} > ", campaign.state().calendar.date());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let words: Vec<&str> = input.split_whitespace().collect();
        let Some((command, rest)) = words.split_first() else {
            continue;
        };

        match *command {
            "quit" | "q" => break,
            "help" | "h" => print_help(),
            "status" | "s" => display_status(&campaign),
            "roster" | "r" => display_roster(&campaign),
            "board" | "b" => display_board(&campaign),
            "active" | "a" => display_active(&campaign),
            "accept" => accept(&mut campaign, rest),
            "week" | "w" => advance(&mut campaign, 1),
            "run" => match rest.first().and_then(|n| n.parse::<u32>().ok()) {
                Some(n) => advance(&mut campaign, n),
                None => println!("Usage: run <weeks>"),
            },
            "recruit" => recruit(&mut campaign),
            "hire" => hire(&mut campaign, rest),
            "build" => match rest.first().map(|k| k.parse::<FacilityKind>()) {
                Some(Ok(kind)) => match campaign.build_facility(kind) {
                    Ok(level) => println!("{kind:?} is now level {level}."),
                    Err(e) => println!("Cannot build: {e}"),
                },
                Some(Err(e)) => println!("{e}"),
                None => println!("Usage: build <barracks|infirmary|training|tavern>"),
            },
            "cancel" => match rest.first().and_then(|q| parse_quest(q)) {
                Some(quest) => {
                    if let Err(e) = campaign.cancel_quest(quest) {
                        println!("{e}");
                    }
                }
                None => println!("Usage: cancel <quest>"),
            },
            "save" | "load" | "delete" if rest.is_empty() => println!("Usage: {command} <name>"),
            "save" => match campaign.save_to(&mut saves, &rest.join(" ")) {
                Ok(info) => println!("Saved to '{}'.", info.slot),
                Err(e) => println!("Save failed: {e}"),
            },
            "load" => match campaign.load_from(&saves, &rest.join(" ")) {
                Ok(()) => println!("Loaded. It is now {}.", campaign.state().calendar.date()),
                Err(e) => println!("Load failed: {e}"),
            },
            "quicksave" => match campaign.quick_save_to(&mut saves) {
                Ok(_) => println!("Quick saved."),
                Err(e) => println!("Quick save failed: {e}"),
            },
            "quickload" => match campaign.quick_load_from(&saves) {
                Ok(()) => println!("Quick loaded."),
                Err(e) => println!("Quick load failed: {e}"),
            },
            "saves" => match persistence::list_saved_games(&saves) {
                Ok(list) if list.is_empty() => println!("No saves in {}.", saves.root().display()),
                Ok(list) => list.iter().for_each(|info| println!("  {info}")),
                Err(e) => println!("Cannot list saves: {e}"),
            },
            "delete" => match persistence::delete_save(&mut saves, &rest.join(" ")) {
                Ok(()) => println!("Deleted."),
                Err(e) => println!("Delete failed: {e}"),
            },
            "log" => {
                let count = rest.first().and_then(|n| n.parse().ok()).unwrap_or(10);
                for event in campaign.state().log.recent(count) {
                    println!("  [{}] {}", event.timestamp, event.message);
                }
            }
            other => println!("Unknown command '{other}'. Type 'help' for the list."),
        }
    }

    println!(
        "\nFarewell. {} ends after {} weeks with {} gold.",
        campaign.guild().name,
        campaign.state().calendar.weeks_elapsed(),
        campaign.guild().treasury
    );
    Ok(())
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  status / s                  - Guild overview");
    println!("  roster / r                  - List adventurers");
    println!("  board / b                   - Available quests");
    println!("  active / a                  - Quests in progress");
    println!("  accept <quest> <adv> [...]  - Send a party, e.g. accept Q3 A1 A2");
    println!("  week / w, run <n>           - Advance one or n weeks");
    println!("  recruit                     - Hire a random recruit");
    println!("  hire <role> <name>          - Hire staff (quartermaster, healer, trainer, scout, clerk)");
    println!("  build <facility>            - Build or upgrade a facility");
    println!("  cancel <quest>              - Try to recall a party");
    println!("  save <name>, load <name>    - Named save slots");
    println!("  quicksave, quickload        - Reserved quick slot");
    println!("  saves, delete <name>        - Manage saves");
    println!("  log [n]                     - Recent events");
    println!("  quit / q                    - Exit");
    println!();
}

fn parse_quest(raw: &str) -> Option<QuestId> {
    raw.trim_start_matches(['Q', 'q']).parse().ok().map(QuestId)
}

fn parse_adventurer(raw: &str) -> Option<AdventurerId> {
    raw.trim_start_matches(['A', 'a']).parse().ok().map(AdventurerId)
}

fn accept(campaign: &mut Campaign, args: &[&str]) {
    let Some((quest, members)) = args.split_first() else {
        println!("Usage: accept <quest> <adventurer> [adventurer...]");
        return;
    };
    let Some(quest) = parse_quest(quest) else {
        println!("'{quest}' is not a quest id");
        return;
    };
    let members: Option<Vec<AdventurerId>> = members.iter().map(|m| parse_adventurer(m)).collect();
    let Some(members) = members else {
        println!("Adventurer ids look like A3");
        return;
    };

    let chance = campaign.preview_success_chance(quest, &members).ok();
    match campaign.accept_quest(quest, &members) {
        Ok(party) => match chance {
            Some(chance) => println!(
                "{} adventurers set out on {quest} ({:.0}% chance of success).",
                party.len(),
                chance * 100.0
            ),
            None => println!("{} adventurers set out on {quest}.", party.len()),
        },
        Err(e) => println!("Cannot accept: {e}"),
    }
}

fn advance(campaign: &mut Campaign, weeks: u32) {
    for report in campaign.advance_weeks(weeks) {
        println!(
            "{}: income {}, costs {}, treasury {}{}",
            report.date,
            report.settlement.income,
            report.settlement.costs,
            report.settlement.treasury_after,
            if report.settlement.shortfall { " (shortfall!)" } else { "" }
        );
        for result in &report.resolved {
            println!(
                "  {} {:?}: {:+} gold, {} injured, {} killed",
                result.quest,
                result.outcome,
                result.gold,
                result.injured.len(),
                result.killed.len()
            );
        }
        for quest in &report.deferred {
            println!("  {quest} could not be resolved this week");
        }
        if let Some(tier) = report.promoted {
            println!("  The guild is now {tier}!");
        }
        if let Some(phase) = report.season_phase_changed {
            println!("  {phase} begins.");
        }
    }
}

fn recruit(campaign: &mut Campaign) {
    let Some(candidate) = campaign.generate_recruits(1).pop() else {
        return;
    };
    let summary = format!("{} ({:?} {:?})", candidate.name, candidate.race, candidate.class);
    match campaign.recruit(candidate) {
        Ok(id) => println!("{summary} joins as {id}."),
        Err(e) => println!("Cannot recruit: {e}"),
    }
}

fn hire(campaign: &mut Campaign, args: &[&str]) {
    let Some((role, name)) = args.split_first() else {
        println!("Usage: hire <role> <name>");
        return;
    };
    let role: StaffRole = match role.parse() {
        Ok(role) => role,
        Err(e) => {
            println!("{e}");
            return;
        }
    };
    let name = if name.is_empty() { format!("{role:?}") } else { name.join(" ") };
    campaign.hire_staff(Staff {
        name: name.clone(),
        role,
        weekly_salary: DEFAULT_STAFF_SALARY,
    });
    println!("{name} hired as {role:?}.");
}

fn display_status(campaign: &Campaign) {
    let guild = campaign.guild();
    let state = campaign.state();
    println!();
    println!("=== {} ({}) ===", guild.name, guild.tier);
    println!("  Date:       {}", state.calendar.date());
    println!("  Treasury:   {} gold{}", guild.treasury, if guild.in_financial_trouble { " (in trouble)" } else { "" });
    println!("  Reputation: {}", guild.reputation);
    println!(
        "  Roster:     {}/{}",
        state.store.adventurer_count(),
        guild.roster_capacity(campaign.config())
    );
    println!(
        "  Quests:     {} available, {} active, {} completed",
        state.board.available().len(),
        state.board.active().len(),
        state.board.completed().len()
    );
    if !guild.staff.is_empty() {
        let staff: Vec<String> = guild.staff.iter().map(|s| format!("{} ({:?})", s.name, s.role)).collect();
        println!("  Staff:      {}", staff.join(", "));
    }
    if !guild.facilities.is_empty() {
        let facilities: Vec<String> = guild
            .facilities
            .iter()
            .map(|f| format!("{:?} {}", f.kind, f.level))
            .collect();
        println!("  Facilities: {}", facilities.join(", "));
    }
    let deaths = state.log.events_of_kind(GameEventKind::AdventurerKilled).count();
    if deaths > 0 {
        println!("  Fallen:     {deaths}");
    }
    println!();
}

fn display_roster(campaign: &Campaign) {
    for adventurer in campaign.state().store.roster() {
        let status = match campaign.parties().engagement(adventurer.id) {
            Some(quest) => format!("on {quest}"),
            None if adventurer.is_injured() => format!("injured, {} weeks", adventurer.injury_weeks),
            None => format!("{:?}", adventurer.condition),
        };
        println!(
            "  {:<4} {:<20} L{} {:?} {:?} - {}",
            adventurer.id.to_string(),
            adventurer.name,
            adventurer.level,
            adventurer.race,
            adventurer.class,
            status
        );
    }
}

fn display_board(campaign: &Campaign) {
    let state = campaign.state();
    for id in state.board.available() {
        if let Ok(quest) = state.store.quest(*id) {
            println!(
                "  {:<4} {:<45} {:?}/{:?} diff {:>3}, {} gold, party {}-{}",
                id.to_string(),
                quest.title,
                quest.quest_type,
                quest.stakes,
                quest.difficulty,
                quest.reward,
                quest.min_party_size,
                quest.max_party_size
            );
        }
    }
}

fn display_active(campaign: &Campaign) {
    let state = campaign.state();
    if state.board.active().is_empty() {
        println!("  No quests in progress.");
    }
    for id in state.board.active() {
        let (Ok(quest), Some(party)) = (state.store.quest(*id), campaign.parties().party(*id)) else {
            continue;
        };
        let members: Vec<String> = party.members.iter().map(|m| m.to_string()).collect();
        println!("  {id} {} - party {}", quest.title, members.join(" "));
    }
}
