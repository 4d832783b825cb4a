//! Beginner's luck and learning new skills.

use bw_core::Skill;

use crate::config::RulesConfig;

/// Beginner's luck dice and graduation both count down from this.
pub const LEARNING_BASE: u32 = 10;

fn aptitude(skill: &Skill) -> Option<u32> {
    skill.aptitude.filter(|a| *a > 0)
}

/// Exponent rolled for a beginner's luck test: `10 - aptitude`.
pub fn beginners_luck_exponent(skill: &Skill, rules: &RulesConfig) -> u32 {
    let aptitude = aptitude(skill).unwrap_or(rules.beginners_luck_aptitude);
    LEARNING_BASE.saturating_sub(aptitude)
}

/// Routine tests needed to learn the skill.
pub fn learning_threshold(skill: &Skill, rules: &RulesConfig) -> u32 {
    aptitude(skill).unwrap_or(rules.default_learning_threshold)
}

/// Starting exponent of a skill learned at `threshold`.
pub fn graduation_exponent(threshold: u32) -> u32 {
    LEARNING_BASE.saturating_sub(threshold) / 2
}
