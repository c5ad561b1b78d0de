//! Property-based tests for transitions and machine resolution.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use flying_fsm::builder::StateMachineBuilder;
use flying_fsm::core::{Enumerable, EventHook, RuleSet, Transition};
use flying_fsm::machine::{from_fn, StateMachine};
use flying_fsm::token_enum;
use proptest::prelude::*;
use std::sync::Arc;

token_enum! {
    enum TestState {
        Initial,
        Processing,
        Complete,
        Failed,
    }
}

token_enum! {
    enum TestEvent {
        Advance,
        Fail,
        Reset,
        Unrelated,
    }
}

prop_compose! {
    fn arbitrary_state()(variant in 0..4u8) -> TestState {
        match variant {
            0 => TestState::Initial,
            1 => TestState::Processing,
            2 => TestState::Complete,
            _ => TestState::Failed,
        }
    }
}

prop_compose! {
    fn arbitrary_event()(variant in 0..3u8) -> TestEvent {
        match variant {
            0 => TestEvent::Advance,
            1 => TestEvent::Fail,
            _ => TestEvent::Reset,
        }
    }
}

/// Deterministic pipeline: every rule has probability 1.0.
fn pipeline() -> RuleSet<TestState, TestEvent> {
    let mut rules: RuleSet<TestState, TestEvent> = [
        Transition::new(TestState::Initial, TestEvent::Advance, TestState::Processing),
        Transition::new(TestState::Processing, TestEvent::Advance, TestState::Complete),
        Transition::new(TestState::Processing, TestEvent::Fail, TestState::Failed),
    ]
    .into_iter()
    .collect();
    rules.extend(Transition::from_any(
        [TestState::Complete, TestState::Failed],
        TestEvent::Reset,
        TestState::Initial,
        1.0,
    ));
    rules
}

fn expected_step(state: TestState, event: TestEvent) -> TestState {
    match (state, event) {
        (TestState::Initial, TestEvent::Advance) => TestState::Processing,
        (TestState::Processing, TestEvent::Advance) => TestState::Complete,
        (TestState::Processing, TestEvent::Fail) => TestState::Failed,
        (TestState::Complete | TestState::Failed, TestEvent::Reset) => TestState::Initial,
        (state, _) => state,
    }
}

fn machine(initial: TestState, seed: u64) -> StateMachine<TestState, TestEvent> {
    StateMachineBuilder::new()
        .initial(initial)
        .rules(pipeline())
        .seed(seed)
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn from_any_declares_one_rule_per_source(
        sources in prop::collection::vec(arbitrary_state(), 0..8),
        probability in 0.0..=1.0f64,
    ) {
        let declared = Transition::from_any(
            sources.clone(),
            TestEvent::Reset,
            TestState::Initial,
            probability,
        );

        prop_assert_eq!(declared.len(), sources.len());
        for (transition, source) in declared.iter().zip(&sources) {
            prop_assert_eq!(transition.from_state(), source);
            prop_assert_eq!(transition.event(), &TestEvent::Reset);
            prop_assert_eq!(transition.to_state(), &TestState::Initial);
            prop_assert_eq!(transition.probability(), probability);
        }
    }

    #[test]
    fn to_any_splits_the_total_equally(
        targets in prop::collection::vec(arbitrary_state(), 1..8),
        total in 0.0..=1.0f64,
    ) {
        let declared = Transition::to_any(
            TestState::Initial,
            TestEvent::Advance,
            targets.clone(),
            total,
        )
        .unwrap();

        prop_assert_eq!(declared.len(), targets.len());
        let share = total / targets.len() as f64;
        prop_assert!(declared.iter().all(|t| t.probability() == share));

        let sum: f64 = declared.iter().map(Transition::probability).sum();
        prop_assert!((sum - total).abs() < 1e-9);
    }

    #[test]
    fn unmatched_event_changes_nothing(state in arbitrary_state(), seed in any::<u64>()) {
        let mut machine = machine(state, seed);
        let before = machine.touched();

        let result = machine.input(TestEvent::Unrelated).unwrap();

        prop_assert_eq!(result, state);
        prop_assert_eq!(machine.previous_state(), &state);
        prop_assert_eq!(machine.next_state(), None);
        prop_assert!(machine.history().is_empty());
        prop_assert_eq!(machine.touched(), before);
    }

    #[test]
    fn certain_rules_are_deterministic(
        events in prop::collection::vec(arbitrary_event(), 0..20),
        seed in any::<u64>(),
    ) {
        let mut machine = machine(TestState::Initial, seed);
        let mut expected = TestState::Initial;

        for event in events {
            expected = expected_step(expected, event);
            prop_assert_eq!(machine.input(event).unwrap(), expected);
        }
        prop_assert_eq!(machine.current_state(), &expected);
    }

    #[test]
    fn vetoed_events_never_move(
        events in prop::collection::vec(arbitrary_event(), 0..20),
        seed in any::<u64>(),
    ) {
        let mut machine = machine(TestState::Initial, seed);
        for event in TestEvent::all() {
            machine.add_event_hook(
                event,
                EventHook::new(|_e: &TestEvent, _m: &StateMachine<TestState, TestEvent>| false),
            );
        }

        for event in events {
            prop_assert_eq!(machine.input(event).unwrap(), TestState::Initial);
        }
        prop_assert!(machine.history().is_empty());
        prop_assert_eq!(machine.previous_state(), &TestState::Initial);
    }

    #[test]
    fn touched_is_stable(state in arbitrary_state()) {
        let first = machine(state, 1);
        let second = machine(state, 2);

        prop_assert_eq!(first.touched(), first.touched());
        prop_assert_eq!(first.touched(), second.touched());
    }

    #[test]
    fn draws_land_on_cumulative_intervals(draw in 0.0..1.0f64) {
        let rules: RuleSet<TestState, TestEvent> = [
            Transition::new(TestState::Initial, TestEvent::Advance, TestState::Processing)
                .with_probability(0.25),
            Transition::new(TestState::Initial, TestEvent::Advance, TestState::Complete)
                .with_probability(0.5),
        ]
        .into_iter()
        .collect();

        let mut machine = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .rules(rules)
            .random_source(from_fn(move || draw))
            .build()
            .unwrap();

        let expected = if draw < 0.25 {
            TestState::Processing
        } else if draw < 0.75 {
            TestState::Complete
        } else {
            TestState::Initial
        };
        prop_assert_eq!(machine.input(TestEvent::Advance).unwrap(), expected);
    }

    #[test]
    fn seeded_machines_replay_identically(
        seed in any::<u64>(),
        steps in 1..50usize,
    ) {
        let rules: Arc<RuleSet<TestState, TestEvent>> = Arc::new(
            Transition::to_any(
                TestState::Initial,
                TestEvent::Advance,
                [TestState::Initial, TestState::Processing],
                1.0,
            )
            .unwrap()
            .into_iter()
            .chain(
                Transition::to_any(
                    TestState::Processing,
                    TestEvent::Advance,
                    [TestState::Initial, TestState::Complete],
                    0.9,
                )
                .unwrap(),
            )
            .chain(Transition::from_any(
                [TestState::Complete],
                TestEvent::Advance,
                TestState::Initial,
                1.0,
            ))
            .collect(),
        );

        let run = |rules: Arc<RuleSet<TestState, TestEvent>>| {
            let mut machine = StateMachineBuilder::new()
                .initial(TestState::Initial)
                .rules(rules)
                .seed(seed)
                .build()
                .unwrap();
            (0..steps)
                .map(|_| machine.input(TestEvent::Advance).unwrap())
                .collect::<Vec<_>>()
        };

        prop_assert_eq!(run(Arc::clone(&rules)), run(rules));
    }
}
