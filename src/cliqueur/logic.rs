//! Caca Cliqueur update rules as pure functions over `GameState`.
//!
//! Nothing here touches storage or emits events; `engine` layers those on top.

use super::state::{GameState, Purchase, Quest};

/// Manual tap: add `multiplier` to the score. Returns the gain.
pub fn tap(state: &mut GameState) -> u64 {
    let gain = state.multiplier;
    state.score = state.score.saturating_add(gain);
    gain
}

/// One elapsed second of auto-clicking. `None` (and no change) when no
/// auto-clicker has been bought.
pub fn tick(state: &mut GameState) -> Option<u64> {
    if state.auto_rate == 0 {
        return None;
    }
    let gain = state.auto_rate;
    state.score = state.score.saturating_add(gain);
    Some(gain)
}

/// Buy one more click multiplier if the score covers the price.
pub fn buy_multiplier(state: &mut GameState, cost_step: u64) -> Purchase {
    let cost = state.multiplier_cost;
    if state.score < cost {
        return Purchase::Declined {
            cost,
            score: state.score,
        };
    }
    state.score -= cost;
    state.multiplier = state.multiplier.saturating_add(1);
    state.multiplier_cost = cost.saturating_add(cost_step);
    Purchase::Bought { cost }
}

/// Buy one more auto-click per second if the score covers the price.
pub fn buy_auto_clicker(state: &mut GameState, cost_step: u64) -> Purchase {
    let cost = state.auto_click_cost;
    if state.score < cost {
        return Purchase::Declined {
            cost,
            score: state.score,
        };
    }
    state.score -= cost;
    state.auto_rate = state.auto_rate.saturating_add(1);
    state.auto_click_cost = cost.saturating_add(cost_step);
    Purchase::Bought { cost }
}

/// Mark every incomplete quest whose threshold is met. Returns the indices
/// that flipped on this call; completed quests are never touched.
pub fn evaluate_quests(quests: &mut [Quest], score: u64) -> Vec<usize> {
    let mut newly_completed = Vec::new();
    for (i, quest) in quests.iter_mut().enumerate() {
        if !quest.completed && score >= quest.threshold {
            quest.completed = true;
            newly_completed.push(i);
        }
    }
    newly_completed
}

/// Format an integer with thin-space thousands separators ("1 234 567").
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('\u{202f}');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cliqueur::config::EngineConfig;
    use crate::cliqueur::state::create_quests;

    fn state_with_score(score: u64) -> GameState {
        GameState {
            score,
            ..GameState::default()
        }
    }

    #[test]
    fn tap_adds_multiplier() {
        let mut state = GameState::default();
        assert_eq!(tap(&mut state), 1);
        assert_eq!(state.score, 1);

        state.multiplier = 5;
        assert_eq!(tap(&mut state), 5);
        assert_eq!(state.score, 6);
    }

    #[test]
    fn tap_saturates() {
        let mut state = state_with_score(u64::MAX - 1);
        state.multiplier = 10;
        tap(&mut state);
        assert_eq!(state.score, u64::MAX);
    }

    #[test]
    fn tick_without_auto_rate_does_nothing() {
        let mut state = state_with_score(42);
        assert_eq!(tick(&mut state), None);
        assert_eq!(state, state_with_score(42));
    }

    #[test]
    fn tick_adds_auto_rate() {
        let mut state = state_with_score(10);
        state.auto_rate = 3;
        assert_eq!(tick(&mut state), Some(3));
        assert_eq!(state.score, 13);
    }

    #[test]
    fn buy_multiplier_declined_when_short() {
        let mut state = state_with_score(9);
        let before = state.clone();
        assert_eq!(
            buy_multiplier(&mut state, 10),
            Purchase::Declined { cost: 10, score: 9 }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn buy_multiplier_at_exact_price() {
        let mut state = state_with_score(10);
        assert_eq!(buy_multiplier(&mut state, 10), Purchase::Bought { cost: 10 });
        assert_eq!(state.score, 0);
        assert_eq!(state.multiplier, 2);
        assert_eq!(state.multiplier_cost, 20);
    }

    #[test]
    fn buy_auto_clicker_then_tick() {
        let mut state = state_with_score(20);
        assert!(buy_auto_clicker(&mut state, 15).is_bought());
        assert_eq!(state.score, 0);
        assert_eq!(state.auto_rate, 1);
        assert_eq!(state.auto_click_cost, 35);
        assert_eq!(tick(&mut state), Some(1));
        assert_eq!(state.score, 1);
    }

    #[test]
    fn buy_auto_clicker_declined_when_short() {
        let mut state = state_with_score(19);
        let before = state.clone();
        assert!(!buy_auto_clicker(&mut state, 15).is_bought());
        assert_eq!(state, before);
    }

    #[test]
    fn ten_taps_do_not_complete_first_quest() {
        let mut state = GameState::default();
        let mut quests = create_quests(&EngineConfig::default());
        for _ in 0..10 {
            tap(&mut state);
            evaluate_quests(&mut quests, state.score);
        }
        assert_eq!(state.score, 10);
        assert_eq!(quests[0].description, "Atteindre 100 clics");
        assert!(!quests[0].completed);
    }

    #[test]
    fn quests_complete_at_threshold_and_stay_completed() {
        let mut quests = create_quests(&EngineConfig::default());
        let flipped = evaluate_quests(&mut quests, 100);
        // 100 meets the 100 and 50 quests, not 500
        assert_eq!(flipped, vec![0, 2]);
        assert!(quests[0].completed);
        assert!(!quests[1].completed);

        assert!(evaluate_quests(&mut quests, 50).is_empty());
        assert!(quests[0].completed);
    }

    #[test]
    fn evaluate_quests_below_all_thresholds() {
        let mut quests = create_quests(&EngineConfig::default());
        assert!(evaluate_quests(&mut quests, 49).is_empty());
        assert!(quests.iter().all(|q| !q.completed));
    }

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1\u{202f}000");
        assert_eq!(format_number(1_234_567), "1\u{202f}234\u{202f}567");
    }

    // ── Properties ────────────────────────────────────────

    use proptest::prelude::*;

    fn arb_state() -> impl Strategy<Value = GameState> {
        (
            0u64..1_000_000,
            1u64..1_000,
            0u64..1_000,
            1u64..100_000,
            1u64..100_000,
        )
            .prop_map(
                |(score, multiplier, auto_rate, multiplier_cost, auto_click_cost)| GameState {
                    score,
                    multiplier,
                    auto_rate,
                    multiplier_cost,
                    auto_click_cost,
                },
            )
    }

    proptest! {
        #[test]
        fn prop_tap_adds_exactly_multiplier(mut state in arb_state()) {
            let before = state.clone();
            let gain = tap(&mut state);
            prop_assert_eq!(gain, before.multiplier);
            prop_assert_eq!(state.score, before.score + before.multiplier);
            prop_assert!(state.score > before.score);
        }

        #[test]
        fn prop_tick_noop_without_auto_rate(mut state in arb_state()) {
            state.auto_rate = 0;
            let before = state.clone();
            prop_assert_eq!(tick(&mut state), None);
            prop_assert_eq!(state, before);
        }

        #[test]
        fn prop_buy_multiplier_rules(mut state in arb_state()) {
            let before = state.clone();
            let result = buy_multiplier(&mut state, 10);
            if before.score < before.multiplier_cost {
                prop_assert!(!result.is_bought());
                prop_assert_eq!(state, before);
            } else {
                prop_assert!(result.is_bought());
                prop_assert_eq!(state.score, before.score - before.multiplier_cost);
                prop_assert_eq!(state.multiplier, before.multiplier + 1);
                prop_assert_eq!(state.multiplier_cost, before.multiplier_cost + 10);
                prop_assert_eq!(state.auto_rate, before.auto_rate);
            }
        }

        #[test]
        fn prop_evaluate_quests_monotonic_idempotent(a in 0u64..1_000, b in 0u64..1_000) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let mut once = create_quests(&EngineConfig::default());
            evaluate_quests(&mut once, low);
            let mut twice = once.clone();
            evaluate_quests(&mut twice, low);
            prop_assert_eq!(&once, &twice);

            evaluate_quests(&mut twice, high);
            for (q1, q2) in once.iter().zip(twice.iter()) {
                prop_assert!(!q1.completed || q2.completed);
            }
        }

        #[test]
        fn prop_format_number_digits_preserved(n in any::<u64>()) {
            let stripped: String = format_number(n).chars().filter(|c| *c != '\u{202f}').collect();
            prop_assert_eq!(stripped, n.to_string());
        }
    }
}
