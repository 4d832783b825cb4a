//! Normalizing raw roll inputs into a single base-data snapshot.
//!
//! Numbers typed into a roll dialog arrive as strings. Anything that does not
//! parse counts as zero so a roll is never blocked on bad input, and every
//! number is clamped to [`INPUT_LIMIT`] so pool arithmetic cannot overflow.

use bw_core::{ModifierTarget, PhysicalCondition, RollModifier};

use crate::message::{SourceBreakdown, signed};

/// Largest magnitude any single roll input or modifier may contribute.
pub const INPUT_LIMIT: i32 = 99;

pub(crate) fn clamp_input(n: i32) -> i32 {
    n.clamp(-INPUT_LIMIT, INPUT_LIMIT)
}

pub(crate) fn clamp_count(n: u32) -> i32 {
    n.min(INPUT_LIMIT as u32) as i32
}

/// Raw inputs of a single roll attempt, as entered by the player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollInputs {
    /// Obstacle the GM set.
    pub difficulty: String,
    /// Help, gear, and other bonus dice.
    pub bonus_dice: String,
    /// Dice bought with artha.
    pub artha_dice: String,
    /// Labels of optional modifiers the player checked.
    pub selected_modifiers: Vec<String>,
}

impl RollInputs {
    /// Inputs for a test at the given obstacle with no extras.
    pub fn new(difficulty: i32) -> Self {
        Self {
            difficulty: difficulty.to_string(),
            ..Self::default()
        }
    }

    /// Inputs straight from dialog fields.
    pub fn from_raw(difficulty: &str, bonus_dice: &str, artha_dice: &str) -> Self {
        Self {
            difficulty: difficulty.to_string(),
            bonus_dice: bonus_dice.to_string(),
            artha_dice: artha_dice.to_string(),
            selected_modifiers: Vec::new(),
        }
    }

    /// Set bonus dice.
    pub fn with_bonus(mut self, dice: i32) -> Self {
        self.bonus_dice = dice.to_string();
        self
    }

    /// Set artha dice.
    pub fn with_artha(mut self, dice: i32) -> Self {
        self.artha_dice = dice.to_string();
        self
    }

    /// Check an optional modifier by label.
    pub fn select(mut self, label: impl Into<String>) -> Self {
        self.selected_modifiers.push(label.into());
        self
    }

    fn is_selected(&self, label: &str) -> bool {
        self.selected_modifiers
            .iter()
            .any(|s| s.eq_ignore_ascii_case(label))
    }
}

/// Sum of applied modifiers of one kind, with a labelled line per modifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierSum {
    /// Total adjustment.
    pub sum: i32,
    /// One line per applied modifier.
    pub entries: SourceBreakdown,
}

impl ModifierSum {
    fn add(&mut self, label: &str, amount: i32) {
        let amount = clamp_input(amount);
        self.sum = clamp_input(self.sum + amount);
        self.entries.insert(label, signed(amount));
    }
}

/// Normalized numbers for one roll attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseRollData {
    /// Dice lost to wounds.
    pub wound_dice: i32,
    /// Obstacle added by wounds.
    pub ob_penalty: i32,
    /// Nominal obstacle.
    pub difficulty: i32,
    /// Bonus dice.
    pub bonus_dice: i32,
    /// Artha dice.
    pub artha_dice: i32,
    /// Standing and selected dice modifiers.
    pub misc_dice: ModifierSum,
    /// Standing and selected obstacle modifiers.
    pub misc_obstacle: ModifierSum,
    /// Labelled obstacle penalties.
    pub penalty_sources: SourceBreakdown,
    /// `difficulty + ob_penalty + misc_obstacle.sum`.
    pub obstacle_total: i32,
}

impl BaseRollData {
    /// Raise the obstacle and label the source, e.g. for beginner's luck.
    pub fn add_obstacle(&mut self, label: &str, amount: i32) {
        self.obstacle_total += amount;
        self.penalty_sources.insert(label, signed(amount));
    }
}

/// Parse the leading integer of a field: `"3"`, `" 2 dice"`, `"-1"`.
/// Empty or non-numeric input is zero.
pub fn parse_lenient(raw: &str) -> i32 {
    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i32>().map_or(0, |n| sign * n)
}

/// Build the base data for a roll from the player's inputs, the character's
/// physical condition, and the standing modifiers of the rolled trait.
///
/// Automatic modifiers always apply; optional ones only when selected.
/// Parsed numbers, wounds and modifier sums are clamped to [`INPUT_LIMIT`].
pub fn extract_base_data(
    inputs: &RollInputs,
    condition: &PhysicalCondition,
    modifiers: &[&RollModifier],
) -> BaseRollData {
    let wound_dice = clamp_count(condition.wound_dice);
    let ob_penalty = clamp_count(condition.ob_penalty);
    let difficulty = clamp_input(parse_lenient(&inputs.difficulty));

    let mut penalty_sources = SourceBreakdown::new();
    if ob_penalty != 0 {
        penalty_sources.insert("Wound Penalty", signed(ob_penalty));
    }

    let mut misc_dice = ModifierSum::default();
    let mut misc_obstacle = ModifierSum::default();
    for modifier in modifiers {
        if modifier.optional && !inputs.is_selected(&modifier.label) {
            continue;
        }
        match modifier.target {
            ModifierTarget::Dice => misc_dice.add(&modifier.label, modifier.amount),
            ModifierTarget::Obstacle => misc_obstacle.add(&modifier.label, modifier.amount),
        }
    }
    penalty_sources.extend(&misc_obstacle.entries);

    BaseRollData {
        wound_dice,
        ob_penalty,
        difficulty,
        bonus_dice: clamp_input(parse_lenient(&inputs.bonus_dice)),
        artha_dice: clamp_input(parse_lenient(&inputs.artha_dice)),
        obstacle_total: difficulty + ob_penalty + misc_obstacle.sum,
        misc_dice,
        misc_obstacle,
        penalty_sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parsing() {
        assert_eq!(parse_lenient("3"), 3);
        assert_eq!(parse_lenient(" 2 dice"), 2);
        assert_eq!(parse_lenient("-1"), -1);
        assert_eq!(parse_lenient("+4"), 4);
        assert_eq!(parse_lenient(""), 0);
        assert_eq!(parse_lenient("abc"), 0);
        assert_eq!(parse_lenient("-"), 0);
        assert_eq!(parse_lenient("99999999999999"), 0);
    }

    #[test]
    fn unparsable_fields_default_to_zero() {
        let inputs = RollInputs::from_raw("x", "", "two");
        let base = extract_base_data(&inputs, &PhysicalCondition::default(), &[]);
        assert_eq!(base.difficulty, 0);
        assert_eq!(base.bonus_dice, 0);
        assert_eq!(base.artha_dice, 0);
        assert_eq!(base.obstacle_total, 0);
    }

    #[test]
    fn huge_inputs_are_clamped() {
        let inputs = RollInputs::from_raw("2147483647", "2147483647", "-2147483647");
        let condition = PhysicalCondition {
            wound_dice: u32::MAX,
            ob_penalty: u32::MAX,
        };
        let huge = RollModifier::dice("Huge", i32::MAX);
        let also_huge = RollModifier::dice("Also Huge", i32::MAX);
        let base = extract_base_data(&inputs, &condition, &[&huge, &also_huge]);
        assert_eq!(base.difficulty, INPUT_LIMIT);
        assert_eq!(base.bonus_dice, INPUT_LIMIT);
        assert_eq!(base.artha_dice, -INPUT_LIMIT);
        assert_eq!(base.wound_dice, INPUT_LIMIT);
        assert_eq!(base.ob_penalty, INPUT_LIMIT);
        assert_eq!(base.misc_dice.sum, INPUT_LIMIT);
        assert_eq!(base.obstacle_total, 2 * INPUT_LIMIT);
    }

    #[test]
    fn no_penalty_line_without_ob_penalty() {
        let condition = PhysicalCondition {
            wound_dice: 1,
            ob_penalty: 0,
        };
        let base = extract_base_data(&RollInputs::new(3), &condition, &[]);
        assert!(base.penalty_sources.is_empty());
        assert_eq!(base.wound_dice, 1);
        assert_eq!(base.obstacle_total, 3);
    }

    #[test]
    fn ob_penalty_raises_obstacle_and_is_labelled() {
        let condition = PhysicalCondition {
            wound_dice: 0,
            ob_penalty: 2,
        };
        let base = extract_base_data(&RollInputs::new(3), &condition, &[]);
        assert_eq!(base.obstacle_total, 5);
        assert_eq!(base.penalty_sources.get("Wound Penalty"), Some("+2"));
    }

    #[test]
    fn modifiers_split_by_target_and_selection() {
        let helper = RollModifier::dice("Helper", 1);
        let rain = RollModifier::obstacle("Rain", 1).optional();
        let focus = RollModifier::dice("Focus", 2).optional();
        let mods = [&helper, &rain, &focus];

        let inputs = RollInputs::new(2).select("rain");
        let base = extract_base_data(&inputs, &PhysicalCondition::default(), &mods);
        assert_eq!(base.misc_dice.sum, 1);
        assert_eq!(base.misc_dice.entries.get("Helper"), Some("+1"));
        assert_eq!(base.misc_dice.entries.get("Focus"), None);
        assert_eq!(base.misc_obstacle.sum, 1);
        assert_eq!(base.obstacle_total, 3);
        assert_eq!(base.penalty_sources.get("Rain"), Some("+1"));
    }

    #[test]
    fn add_obstacle_labels_source() {
        let mut base = extract_base_data(&RollInputs::new(2), &PhysicalCondition::default(), &[]);
        base.add_obstacle("Beginner's Luck", 2);
        assert_eq!(base.obstacle_total, 4);
        assert_eq!(base.penalty_sources.get("Beginner's Luck"), Some("+2"));
    }
}
