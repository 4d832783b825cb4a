use std::path::PathBuf;

use bw_core::{AttributeName, Character, StatName};
use bw_mechanics::{
    AttributeTest, CharacterStore, CirclesTest, LearningTest, MechError, RerollChoice, RollInputs,
    RollReport, RollRequest, RulesConfig, SkillTest, StatTest, TaxTest, TestRunner,
};
use clap::{Args, Subcommand};
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::prompt;
use crate::store::JsonFileStore;

#[derive(Args)]
pub struct RollArgs {
    /// Character file
    file: PathBuf,

    #[command(subcommand)]
    kind: RollKind,

    /// Obstacle (default from the rules table)
    #[arg(short, long, global = true)]
    ob: Option<String>,

    /// Bonus dice from help, gear and the like
    #[arg(short, long, global = true, default_value = "")]
    bonus: String,

    /// Dice bought with artha
    #[arg(short, long, global = true, default_value = "")]
    artha: String,

    /// Apply an optional roll modifier by label (repeatable)
    #[arg(short, long = "select", global = true)]
    select: Vec<String>,

    /// Answer yes to every prompt
    #[arg(short, long, global = true, conflicts_with = "no")]
    yes: bool,

    /// Answer no to every prompt
    #[arg(short, long, global = true)]
    no: bool,

    /// Print the report as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Rules table (TOML)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// RNG seed for reproducible rolls
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Spend a Fate point to re-roll if it would help
    #[arg(long, global = true)]
    fate: bool,

    /// Call on a trait to re-roll failed dice
    #[arg(long = "call-on", global = true)]
    call_on: Option<String>,
}

#[derive(Subcommand)]
enum RollKind {
    /// Roll a stat (will, perception, power, forte, agility, speed)
    Stat {
        /// Stat name
        stat: String,
    },

    /// Roll an attribute (health, steel, resources)
    Attribute {
        /// Attribute name
        attribute: String,
    },

    /// Roll a trained skill
    Skill {
        /// Skill name
        skill: String,

        /// FoRK in another skill (repeatable)
        #[arg(short, long = "fork")]
        forks: Vec<String>,
    },

    /// Roll Circles to find someone
    Circles {
        /// Apply a circles bonus by name (repeatable)
        #[arg(long = "with")]
        bonuses: Vec<String>,

        /// Apply a circles malus by name (repeatable)
        #[arg(long = "against")]
        maluses: Vec<String>,

        /// Call on a relationship by name
        #[arg(short, long)]
        contact: Option<String>,
    },

    /// Roll beginner's luck for a skill still being learned
    Learning {
        /// Skill name
        skill: String,
    },

    /// Roll a tax test to sustain an effect
    Tax {
        /// Effect being sustained
        #[arg(short, long, default_value = "")]
        effect: String,

        /// Stat paying the tax
        #[arg(long, default_value = "forte")]
        stat: String,
    },
}

fn load_rules(args: &RollArgs) -> Result<RulesConfig, String> {
    let rules = match &args.rules {
        Some(path) => RulesConfig::load(path).map_err(|e| e.to_string())?,
        None => RulesConfig::default(),
    };
    Ok(match args.seed {
        Some(seed) => rules.with_seed(seed),
        None => rules,
    })
}

fn inputs(args: &RollArgs, rules: &RulesConfig) -> RollInputs {
    let difficulty = args
        .ob
        .clone()
        .unwrap_or_else(|| rules.default_difficulty.to_string());
    let mut inputs = RollInputs::from_raw(&difficulty, &args.bonus, &args.artha);
    inputs.selected_modifiers = args.select.clone();
    inputs
}

fn request(
    kind: &RollKind,
    character: &Character,
    inputs: RollInputs,
) -> Result<RollRequest, String> {
    let request = match kind {
        RollKind::Stat { stat } => {
            let stat: StatName = stat.parse().map_err(|e| format!("{e}"))?;
            RollRequest::Stat(StatTest::new(stat, inputs))
        }
        RollKind::Attribute { attribute } => {
            let attribute: AttributeName = attribute.parse().map_err(|e| format!("{e}"))?;
            RollRequest::Attribute(AttributeTest::new(attribute, inputs))
        }
        RollKind::Skill { skill, forks } => {
            let id = character.find_skill(skill).map_err(|e| e.to_string())?.id;
            let test = forks
                .iter()
                .fold(SkillTest::new(id, inputs), |test, fork| test.fork(fork.clone()));
            RollRequest::Skill(test)
        }
        RollKind::Circles {
            bonuses,
            maluses,
            contact,
        } => {
            let mut test = CirclesTest::new(inputs);
            test.bonuses = bonuses.clone();
            test.maluses = maluses.clone();
            if let Some(name) = contact {
                let rel = character
                    .relationships
                    .iter()
                    .find(|r| r.name.eq_ignore_ascii_case(name))
                    .ok_or_else(|| format!("relationship not found: \"{name}\""))?;
                test = test.contact(rel.id);
            }
            RollRequest::Circles(test)
        }
        RollKind::Learning { skill } => {
            let id = character.find_skill(skill).map_err(|e| e.to_string())?.id;
            RollRequest::Learning(LearningTest::new(id, inputs))
        }
        RollKind::Tax { effect, stat } => {
            let stat: StatName = stat.parse().map_err(|e| format!("{e}"))?;
            RollRequest::Tax(
                TaxTest::new(effect.clone(), 0)
                    .with_stat(stat)
                    .with_inputs(inputs),
            )
        }
    };
    Ok(request)
}

fn print_report(report: &RollReport) {
    let msg = &report.message;
    let verdict = if msg.success {
        "Success".green().bold()
    } else {
        "Failure".red().bold()
    };
    println!("  {}  {verdict}", msg.name.bold());

    let faces: Vec<String> = msg
        .rolls
        .iter()
        .map(|d| {
            let face = if d.exploded {
                format!("{}*", d.face)
            } else {
                d.face.to_string()
            };
            if d.success {
                face.green().to_string()
            } else {
                face
            }
        })
        .collect();
    println!(
        "  {}{} dice: [{}]",
        msg.shade.letter(),
        msg.rolls.len(),
        faces.join(", ")
    );
    println!(
        "  {} successes vs Ob {} ({})",
        msg.successes, msg.obstacle_total, msg.tier
    );
    if let Some(info) = &msg.extra_info {
        println!("  {}", info.italic());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Dice", "", "Obstacle", ""]);
    let dice: Vec<_> = msg.die_sources.iter().collect();
    let mut obstacle = vec![("Difficulty".to_string(), msg.difficulty.to_string())];
    obstacle.extend(
        msg.penalty_sources
            .iter()
            .map(|l| (l.label.clone(), l.value.clone())),
    );
    for i in 0..dice.len().max(obstacle.len()) {
        let (dl, dv) = dice
            .get(i)
            .map_or((String::new(), String::new()), |l| (l.label.clone(), l.value.clone()));
        let (ol, ov) = obstacle.get(i).cloned().unwrap_or_default();
        table.add_row(vec![dl, dv, ol, ov]);
    }
    println!("{table}");

    for event in &report.events {
        println!("  {} {event}", "-".dimmed());
    }

    let rerolls = &msg.rerolls;
    if !rerolls.is_empty() {
        let mut unused = rerolls.call_ons.clone();
        if rerolls.fate {
            unused.push("Fate".to_string());
        }
        println!("  {}", format!("unused re-rolls: {}", unused.join(", ")).dimmed());
    }
}

pub fn run(args: &RollArgs) -> Result<(), String> {
    let rules = load_rules(args)?;
    let mut store = JsonFileStore::open(&args.file)?;
    let request = request(&args.kind, store.character(), inputs(args, &rules))?;

    let mut rng = match rules.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut prompt = prompt::for_flags(args.yes, args.no);
    let mut runner = TestRunner::new(&mut store, prompt.as_mut(), &rules, &mut rng);
    let mut report = runner.run(&request).map_err(|e| e.to_string())?;

    let mut choices = Vec::new();
    if let Some(name) = &args.call_on {
        choices.push(RerollChoice::CallOn(name.clone()));
    }
    if args.fate {
        choices.push(RerollChoice::Fate);
    }
    for choice in &choices {
        match runner.reroll(&mut report.message, choice) {
            Ok(_) => {}
            Err(e @ MechError::InvalidRequest(_)) => eprintln!("{} {e}", "note:".yellow()),
            Err(e) => return Err(e.to_string()),
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{json}");
    } else {
        print_report(&report);
    }
    Ok(())
}
