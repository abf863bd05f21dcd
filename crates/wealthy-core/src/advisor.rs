//! Advisor - ordered, human-readable tips
//!
//! Tips are appended in a fixed order and the automation tip always closes
//! the list, so the result is never empty.

use crate::models::{Persona, StressLevel};

pub const TIP_OVERSPENDING: &str = "Track daily expenses and set spending limits.";
pub const TIP_HIGH_STRESS: &str =
    "Consider debt consolidation or talking to a financial advisor.";
pub const TIP_SAVING_BELOW_PREDICTION: &str =
    "You're saving less than predicted. Review your budget categories.";
pub const TIP_AUTOMATE: &str = "Automate savings if you can.";

/// Produce tips for a profile.
///
/// `predicted_savings` is the value as presented (after rounding).
pub fn advise(
    persona: Persona,
    stress_level: StressLevel,
    predicted_savings: f64,
    actual_savings: f64,
) -> Vec<String> {
    let mut tips = Vec::with_capacity(4);

    if persona.is_over_spending() {
        tips.push(TIP_OVERSPENDING.to_string());
    }

    if stress_level == StressLevel::High {
        tips.push(TIP_HIGH_STRESS.to_string());
    }

    if predicted_savings > actual_savings {
        tips.push(TIP_SAVING_BELOW_PREDICTION.to_string());
    }

    tips.push(TIP_AUTOMATE.to_string());

    tracing::debug!(count = tips.len(), "Tips generated");
    tips
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_over_spender_low_stress() {
        let tips = advise(Persona::OverSpender, StressLevel::Low, 3000.0, 5000.0);
        assert_eq!(tips, vec![TIP_OVERSPENDING, TIP_AUTOMATE]);
    }

    #[test]
    fn test_all_tips_in_order() {
        let tips = advise(Persona::OverSpender, StressLevel::High, 6000.0, 5000.0);
        assert_eq!(
            tips,
            vec![
                TIP_OVERSPENDING,
                TIP_HIGH_STRESS,
                TIP_SAVING_BELOW_PREDICTION,
                TIP_AUTOMATE
            ]
        );
    }

    #[test]
    fn test_only_generic_tip() {
        let tips = advise(Persona::StableSaver, StressLevel::Low, 5000.0, 5000.0);
        assert_eq!(tips, vec![TIP_AUTOMATE]);
    }

    #[test]
    fn test_unknown_persona_is_handled() {
        let tips = advise(
            Persona::Unknown { cluster: 42 },
            StressLevel::High,
            0.0,
            100.0,
        );
        assert_eq!(tips, vec![TIP_HIGH_STRESS, TIP_AUTOMATE]);
    }

    #[test]
    fn test_never_empty_and_generic_last() {
        let personas = [
            Persona::StableSaver,
            Persona::OverSpender,
            Persona::AtRisk,
            Persona::BreakEvener,
            Persona::Unknown { cluster: 3 },
        ];
        for persona in personas {
            for stress in [StressLevel::High, StressLevel::Low] {
                for (predicted, actual) in [(0.0, 1.0), (1.0, 0.0), (1.0, 1.0)] {
                    let tips = advise(persona, stress, predicted, actual);
                    assert!(!tips.is_empty());
                    assert_eq!(tips.last().map(String::as_str), Some(TIP_AUTOMATE));
                }
            }
        }
    }
}
