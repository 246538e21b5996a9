//! Execution semantics of cases and suites: failure counting, hard vs soft
//! checks, aggregation, filtering, and reentrancy.

mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use support::{only, Recorder};
use trellis::prelude::*;

fn passing(name: &str) -> Test {
    Test::case(name.to_string(), |t| {
        ensure!(t, 1 + 1 == 2);
        Ok(())
    })
}

fn failing(name: &str) -> Test {
    Test::case(name.to_string(), |t| {
        ensure!(t, 1 + 1 == 3);
        Ok(())
    })
}

/// A case that counts how often its body starts.
fn counted(name: &str, runs: &Arc<AtomicUsize>) -> Test {
    let runs = runs.clone();
    Test::case(name.to_string(), move |_| {
        runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

mod case_tests {
    use super::*;

    #[test]
    fn test_passing_case_returns_zero() {
        assert_eq!(passing("ok").run(None), 0);
    }

    #[test]
    fn test_hard_failure_skips_rest_of_body() {
        let reached = Arc::new(AtomicUsize::new(0));
        let after = reached.clone();
        let case = Test::case("hard", move |t| {
            ensure!(t, false);
            after.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        assert_eq!(case.run(None), 1);
        assert_eq!(reached.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_soft_failures_continue_and_accumulate() {
        let reached = Arc::new(AtomicUsize::new(0));
        let after = reached.clone();
        let case = Test::case("soft", move |t| {
            verify!(t, 1 > 2);
            verify!(t, "a" == "b");
            after.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        assert_eq!(case.run(None), 2);
        assert_eq!(reached.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_soft_then_hard_counts_both() {
        let case = Test::case("mixed", |t| {
            verify!(t, false);
            ensure!(t, false);
            verify!(t, false);
            Ok(())
        });
        assert_eq!(case.run(None), 2);
    }

    #[test]
    fn test_condition_evaluated_once() {
        let evaluations = Arc::new(AtomicUsize::new(0));
        let counter = evaluations.clone();
        let case = Test::case("side_effects", move |t| {
            ensure!(t, counter.fetch_add(1, Ordering::SeqCst) == 0);
            verify!(t, counter.fetch_add(1, Ordering::SeqCst) == 99);
            Ok(())
        });
        let recorder = Recorder::new();
        let mut runner = Runner::builder()
            .hooks(recorder.clone())
            .logger(recorder.logger())
            .build();
        assert_eq!(runner.run(&case, None), 1);
        assert_eq!(evaluations.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_explicit_abort_without_failure() {
        let case = Test::case("bail", |t| {
            if t.failures() == 0 {
                return t.abort();
            }
            ensure!(t, false);
            Ok(())
        });
        assert_eq!(case.run(None), 0);
    }

    #[test]
    fn test_custom_failure_then_abort() {
        let case = Test::case("custom", |t| {
            fail!(t, "TIMEOUT", "slow response", "{} ms", 900);
            verify!(t, t.failures() == 1);
            if t.failures() > 0 {
                return t.abort();
            }
            Ok(())
        });
        let recorder = Recorder::new();
        let mut runner = Runner::builder().logger(recorder.logger()).build();
        assert_eq!(runner.run(&case, None), 1);
        assert_eq!(
            recorder.events(),
            ["fail TIMEOUT slow response [900 ms]"]
        );
    }

    #[test]
    fn test_checker_exposes_case_name() {
        let case = Test::case("named", |t| {
            ensure!(t, t.name() == "named");
            Ok(())
        });
        assert_eq!(case.run(None), 0);
    }
}

mod suite_tests {
    use super::*;

    #[test]
    fn test_suite_sums_without_short_circuit() {
        let runs = Arc::new(AtomicUsize::new(0));
        let suite = Test::suite(
            "mixed",
            [
                failing("f1"),
                counted("c1", &runs),
                Test::case("two_soft", |t| {
                    verify!(t, false);
                    verify!(t, false);
                    Ok(())
                }),
                failing("f2"),
                counted("c2", &runs),
            ],
        );
        assert_eq!(suite.run(None), 4);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_nested_suites_aggregate() {
        let inner = Test::suite("inner", [failing("a"), failing("b")]);
        let outer = Test::suite("outer", [inner, passing("c"), failing("d")]);
        assert_eq!(outer.run(None), 3);
    }

    #[test]
    fn test_suite_hook_sequence() {
        let suite = Test::suite("s", [passing("a"), failing("b")]);
        let recorder = Recorder::new();
        let mut runner = Runner::builder().hooks(recorder.clone()).build();
        assert_eq!(runner.run(&suite, None), 1);

        let events = only(
            &recorder.events(),
            &["suite_", "case_", "before_subtest", "after_subtest"],
        );
        assert_eq!(
            events,
            [
                "suite_enter s 2",
                "before_subtest s 0 0 a",
                "case_enter a",
                "case_leave a 0",
                "after_subtest s 0 0 a 0",
                "before_subtest s 0 1 b",
                "case_enter b",
                "case_leave b 1",
                "after_subtest s 1 1 b 1",
                "suite_leave s 2 1",
            ]
        );
    }

    #[test]
    fn test_shared_case_runs_once_per_listing() {
        let runs = Arc::new(AtomicUsize::new(0));
        let shared = counted("shared", &runs);
        let suite = Test::suite(
            "twice",
            [shared.clone(), Test::suite("nested", [shared])],
        );
        assert_eq!(suite.run(None), 0);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}

mod filter_tests {
    use super::*;

    fn tree(runs: &Arc<AtomicUsize>) -> Test {
        Test::suite(
            "root",
            [
                counted("alpha", runs),
                Test::suite("group", [counted("beta", runs), failing("gamma")]),
            ],
        )
    }

    #[test]
    fn test_condition_selects_single_leaf() {
        let runs = Arc::new(AtomicUsize::new(0));
        assert_eq!(tree(&runs).run(Some("beta")), 0);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_non_matching_condition_runs_nothing() {
        let runs = Arc::new(AtomicUsize::new(0));
        let root = tree(&runs);
        let recorder = Recorder::new();
        let mut runner = Runner::builder().hooks(recorder.clone()).build();
        assert_eq!(runner.run(&root, Some("nope")), 0);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_direct_leaf_with_other_name_is_skipped() {
        let runs = Arc::new(AtomicUsize::new(0));
        let case = counted("alpha", &runs);
        assert_eq!(case.run(Some("beta")), 0);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(case.run(Some("alpha")), 0);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_matching_suite_runs_whole_subtree() {
        let runs = Arc::new(AtomicUsize::new(0));
        assert_eq!(tree(&runs).run(Some("group")), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_skipped_ancestors_emit_no_suite_hooks() {
        let runs = Arc::new(AtomicUsize::new(0));
        let root = tree(&runs);
        let recorder = Recorder::new();
        let mut runner = Runner::builder().hooks(recorder.clone()).build();
        assert_eq!(runner.run(&root, Some("gamma")), 1);
        assert_eq!(
            only(&recorder.events(), &["suite_", "case_", "before_subtest"]),
            ["case_enter gamma", "case_leave gamma 1"]
        );
    }

    #[test]
    fn test_selection_is_idempotent() {
        let suite = Test::suite("pair", [passing("good"), failing("bad")]);
        let mut runner = Runner::new();
        assert_eq!(runner.run(&suite, None), 1);
        assert_eq!(runner.run(&suite, Some("bad")), 1);
        assert_eq!(runner.run(&suite, Some("bad")), 1);
        assert_eq!(runner.run(&suite, Some("good")), 0);
    }

    #[test]
    fn test_skip_stops_descent() {
        let runs = Arc::new(AtomicUsize::new(0));
        let root = tree(&runs);
        let mut runner = Runner::builder()
            .filter(|test: &TestMetadata, cond: &str| {
                if test.name() == cond {
                    FilterResult::Pass
                } else if test.name() == "group" {
                    FilterResult::Skip
                } else {
                    FilterResult::SkipPropagate
                }
            })
            .build();
        assert_eq!(runner.run(&root, Some("beta")), 0);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_pass_propagate_keeps_filtering_below() {
        let runs = Arc::new(AtomicUsize::new(0));
        let root = tree(&runs);
        let recorder = Recorder::new();
        // Every suite runs its own hooks, cases still need to match.
        let mut runner = Runner::builder()
            .hooks(recorder.clone())
            .filter(|test: &TestMetadata, cond: &str| {
                if test.is_suite() {
                    FilterResult::PassPropagate
                } else if test.name() == cond {
                    FilterResult::Pass
                } else {
                    FilterResult::Skip
                }
            })
            .build();
        assert_eq!(runner.run(&root, Some("beta")), 0);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(
            only(&recorder.events(), &["suite_", "case_"]),
            [
                "suite_enter root 2",
                "suite_enter group 2",
                "case_enter beta",
                "case_leave beta 0",
                "suite_leave group 2 0",
                "suite_leave root 2 0",
            ]
        );
    }

    #[test]
    fn test_pass_on_suite_clears_condition() {
        let runs = Arc::new(AtomicUsize::new(0));
        let root = tree(&runs);
        // Only an exact name passes; everything else would be skipped outright.
        let mut runner = Runner::builder()
            .filter(|test: &TestMetadata, cond: &str| {
                if test.name() == cond {
                    FilterResult::Pass
                } else if test.is_suite() {
                    FilterResult::SkipPropagate
                } else {
                    FilterResult::Skip
                }
            })
            .build();
        assert_eq!(runner.run(&root, Some("group")), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_tag_filter_selects_tagged_units() {
        let runs = Arc::new(AtomicUsize::new(0));
        let root = Test::suite(
            "root",
            [
                counted("plain", &runs),
                counted("tagged", &runs).with_tag("slow"),
                Test::suite("slow_group", [counted("inner", &runs)]).with_tag("slow"),
            ],
        );
        let mut runner = Runner::builder().filter(TagFilter).build();
        assert_eq!(runner.run(&root, Some("slow")), 0);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_pattern_filter_selects_by_expression() {
        let runs = Arc::new(AtomicUsize::new(0));
        let root = tree(&runs);
        let mut runner = Runner::builder().filter(PatternFilter::new()).build();
        assert_eq!(runner.run(&root, Some("^(alpha|beta)$")), 0);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}

mod reentrancy_tests {
    use super::*;

    #[test]
    fn test_nested_run_keeps_counters_apart() {
        let inner = Test::case("inner", |t| {
            verify!(t, false);
            verify!(t, false);
            Ok(())
        });
        let outer = Test::case("outer", move |t| {
            verify!(t, false);
            let nested = t.run(&inner, None);
            ensure!(t, nested == 2);
            ensure!(t, t.failures() == 1);
            Ok(())
        });
        let recorder = Recorder::new();
        let mut runner = Runner::builder().hooks(recorder.clone()).build();
        assert_eq!(runner.run(&outer, None), 1);
        assert_eq!(
            only(&recorder.events(), &["case_"]),
            [
                "case_enter outer",
                "case_enter inner",
                "case_leave inner 2",
                "case_leave outer 1",
            ]
        );
    }

    #[test]
    fn test_abort_in_nested_case_stays_nested() {
        let inner = failing("inner");
        let reached = Arc::new(AtomicUsize::new(0));
        let after = reached.clone();
        let outer = Test::case("outer", move |t| {
            let nested = t.run(&inner, None);
            after.fetch_add(nested, Ordering::SeqCst);
            Ok(())
        });
        assert_eq!(outer.run(None), 0);
        assert_eq!(reached.load(Ordering::SeqCst), 1);
    }
}
