//! Tax on Will or Forte from failed sustaining tests.

use bw_core::StatName;
use serde::{Deserialize, Serialize};

/// Outcome of a failed tax test, before and after the player confirms it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAssessment {
    /// Stat that pays the tax.
    pub stat: StatName,
    /// Exponent of that stat.
    pub exponent: u32,
    /// How many successes short the test fell.
    pub margin: u32,
    /// Tax before this test.
    pub previous_tax: u32,
    /// Tax after this test.
    pub new_tax: u32,
    /// True when the tax would exceed the exponent.
    pub overtaxed: bool,
    /// Wound severity inflicted by overtaxing.
    pub wound_severity: Option<u32>,
    /// Whether the new tax was written to the character.
    pub committed: bool,
}

impl TaxAssessment {
    /// Title of the confirmation prompt.
    pub fn prompt_title(&self) -> &'static str {
        if self.overtaxed { "Overtaxed!" } else { "Taxed" }
    }

    /// Body of the confirmation prompt.
    pub fn prompt_body(&self) -> String {
        match self.wound_severity {
            Some(severity) if self.overtaxed => format!(
                "Failing your tax test by {} with {} untaxed {} dice has resulted in overtax. \
                 Your {} tax will be maxed out and you fall unconscious. Also apply a B{severity} wound.",
                self.margin,
                self.exponent.saturating_sub(self.previous_tax),
                self.stat,
                self.stat,
            ),
            _ => format!(
                "You failed your tax test! Your {} tax will increase by {}. \
                 Any currently sustained effects are lost.",
                self.stat, self.margin
            ),
        }
    }

    /// One-line summary for the roll message.
    pub fn summary(&self) -> String {
        match self.wound_severity {
            Some(severity) => format!(
                "Failed by {}: {} overtaxed to {}, B{severity} wound.",
                self.margin, self.stat, self.new_tax
            ),
            None => format!(
                "Failed by {}: {} tax {} -> {}.",
                self.margin, self.stat, self.previous_tax, self.new_tax
            ),
        }
    }
}

/// Assess a tax test on `stat`. Returns `None` when the test passed.
pub fn assess_tax(
    stat: StatName,
    exponent: u32,
    current_tax: u32,
    obstacle_total: i32,
    successes: u32,
) -> Option<TaxAssessment> {
    let shortfall = i64::from(obstacle_total) - i64::from(successes);
    if shortfall <= 0 {
        return None;
    }
    let margin = u32::try_from(shortfall).unwrap_or(u32::MAX);
    let burden = margin.saturating_add(current_tax);
    let overtaxed = exponent < burden;
    let (new_tax, wound_severity) = if overtaxed {
        let severity = (burden - exponent).saturating_mul(obstacle_total.max(0) as u32);
        (exponent, Some(severity))
    } else {
        (burden, None)
    };
    Some(TaxAssessment {
        stat,
        exponent,
        margin,
        previous_tax: current_tax,
        new_tax,
        overtaxed,
        wound_severity,
        committed: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passed_test_has_no_tax() {
        assert!(assess_tax(StatName::Forte, 4, 0, 3, 3).is_none());
        assert!(assess_tax(StatName::Forte, 4, 0, 0, 0).is_none());
    }

    #[test]
    fn failure_within_exponent_adds_margin() {
        let a = assess_tax(StatName::Forte, 5, 1, 4, 2).unwrap();
        assert_eq!(a.margin, 2);
        assert!(!a.overtaxed);
        assert_eq!(a.new_tax, 3);
        assert_eq!(a.wound_severity, None);
        assert!(!a.committed);
        assert_eq!(a.prompt_title(), "Taxed");
    }

    #[test]
    fn tax_reaching_exponent_is_not_overtax() {
        let a = assess_tax(StatName::Will, 4, 2, 2, 0).unwrap();
        assert!(!a.overtaxed);
        assert_eq!(a.new_tax, 4);
    }

    #[test]
    fn overtax_maxes_tax_and_wounds() {
        // exp 2, tax 1, failed Ob 5 with 1 success: margin 4.
        let a = assess_tax(StatName::Forte, 2, 1, 5, 1).unwrap();
        assert_eq!(a.margin, 4);
        assert!(a.overtaxed);
        assert_eq!(a.new_tax, 2);
        assert_eq!(a.wound_severity, Some(3 * 5));
        assert_eq!(a.prompt_title(), "Overtaxed!");
        assert!(a.prompt_body().contains("B15 wound"));
    }

    #[test]
    fn summary_lines() {
        let a = assess_tax(StatName::Forte, 5, 1, 4, 2).unwrap();
        insta::assert_snapshot!(a.summary(), @"Failed by 2: Forte tax 1 -> 3.");
        let a = assess_tax(StatName::Forte, 2, 1, 5, 1).unwrap();
        insta::assert_snapshot!(a.summary(), @"Failed by 4: Forte overtaxed to 2, B15 wound.");
    }
}
