use gm_core::models::{GameAttributes, Phase};
use gm_core::phase::{PhaseMachine, Transition};
use proptest::prelude::*;

fn any_phase() -> impl Strategy<Value = Phase> {
    (0usize..Phase::ALL.len()).prop_map(|i| Phase::ALL[i])
}

fn linear_index(phase: Phase) -> Option<usize> {
    Phase::LINEAR.iter().position(|&p| p == phase)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: accepted transitions only step forward one phase (wrapping
    /// after free agency), enter an alternate track from one of its entry
    /// points, or resume the phase the track was entered from
    #[test]
    fn prop_transitions_never_skip(targets in prop::collection::vec(any_phase(), 1..60)) {
        let mut attributes = GameAttributes::new(2025);

        for target in targets {
            let current = attributes.phase;
            match PhaseMachine::check(&attributes, target) {
                Ok(Transition::Linear) => {
                    let from = linear_index(current).unwrap();
                    let to = linear_index(target).unwrap();
                    prop_assert_eq!(to, (from + 1) % Phase::LINEAR.len());
                    attributes.phase = target;
                }
                Ok(Transition::EnterAlternate) => {
                    prop_assert!(target.is_alternate());
                    prop_assert!(!current.is_alternate());
                    prop_assert!(target.alternate_entry_points().contains(&current));
                    attributes.return_phase = Some(current);
                    attributes.phase = target;
                }
                Ok(Transition::Resume) => {
                    prop_assert!(current.is_alternate());
                    prop_assert_eq!(attributes.return_phase, Some(target));
                    attributes.phase = target;
                    attributes.return_phase = None;
                }
                Err(_) => {
                    prop_assert_ne!(current.next(), Some(target));
                }
            }
        }
    }

    /// Property: a phase never transitions to itself or backwards on the
    /// linear track, except the wrap into the next preseason
    #[test]
    fn prop_no_reversal(from in 0usize..8, to in 0usize..8) {
        let mut attributes = GameAttributes::new(2025);
        attributes.phase = Phase::LINEAR[from];
        let result = PhaseMachine::check(&attributes, Phase::LINEAR[to]);
        prop_assert_eq!(result.is_ok(), to == (from + 1) % 8);
    }
}
