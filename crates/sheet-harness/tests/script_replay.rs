//! Replays of reference scripts and generated step sequences.

use std::io::Write;

use proptest::prelude::*;
use sheet_harness::cli::{Cli, run};
use sheet_harness::{FrameClock, SheetHarness, SheetScript, Step, replay};

const DRAG_DISMISS: &str = include_str!("../scripts/drag_dismiss.json");
const KEYBOARD_REFLOW: &str = include_str!("../scripts/keyboard_reflow.json");

#[test]
fn drag_dismiss_script() {
    let script = SheetScript::from_json_str(DRAG_DISMISS).expect("script");
    let trace = replay(&script).expect("replay");

    let show = &trace[1];
    assert_eq!(show.commands.len(), 1);
    assert_eq!(show.commands[0].target, -400.0);

    let moves: Vec<f64> = trace[4..6].iter().map(|l| l.offset).collect();
    assert_eq!(moves, vec![-380.0, -345.0]);
    assert!(trace[4..6].iter().all(|l| l.commands[0].duration_ms == 0));

    let release = &trace[6];
    assert_eq!(release.state, "dismissing");
    assert_eq!(release.commands[0].target, 400.0);
    assert_eq!(release.commands[0].duration_ms, 300);

    assert_eq!(trace[7].events, vec!["closed"]);
    let last = trace.last().expect("last line");
    assert_eq!(last.closes, 1);
    assert_eq!(last.state, "hidden");
    assert!(last.commands.is_empty());
}

#[test]
fn keyboard_reflow_script() {
    let script = SheetScript::from_json_str(KEYBOARD_REFLOW).expect("script");
    let trace = replay(&script).expect("replay");
    assert_eq!(trace[3].keyboard_height, 250.0);
    assert_eq!(trace[4].target, -450.0);
    assert_eq!(trace[5].offset, -450.0);
    assert_eq!(trace[6].keyboard_height, 0.0);
    assert_eq!(trace[8].offset, -400.0);
    assert!(trace.iter().all(|l| l.closes == 0));
}

#[test]
fn cli_writes_jsonl_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("script.json");
    let mut file = std::fs::File::create(&path).expect("create");
    file.write_all(DRAG_DISMISS.as_bytes()).expect("write");

    let cli = Cli {
        script: path.clone(),
        frame_ms: 16,
        last: false,
    };
    let mut out = Vec::new();
    run(&cli, &mut out).expect("run");
    let text = String::from_utf8(out).expect("utf8");
    assert_eq!(text.lines().count(), 9);
    for line in text.lines() {
        let value: serde_json::Value = serde_json::from_str(line).expect("json line");
        assert!(value["op"].is_string());
    }

    let cli = Cli {
        script: path,
        frame_ms: 16,
        last: true,
    };
    let mut out = Vec::new();
    run(&cli, &mut out).expect("run");
    let text = String::from_utf8(out).expect("utf8");
    assert_eq!(text.lines().count(), 1);
    assert!(text.contains("\"closes\":1"));
}

#[test]
fn replay_is_deterministic() {
    let script = SheetScript::from_json_str(DRAG_DISMISS).expect("script");
    assert_eq!(replay(&script).expect("a"), replay(&script).expect("b"));
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        any::<bool>().prop_map(|value| Step::Visible { value }),
        (0.0f64..900.0).prop_map(|height| Step::Layout { height }),
        (0.0f64..400.0).prop_map(|height| Step::KeyboardShown { height }),
        Just(Step::KeyboardHidden),
        (0.0f64..390.0, 0.0f64..844.0).prop_map(|(x, y)| Step::PointerDown { x, y }),
        (0.0f64..390.0, 0.0f64..844.0).prop_map(|(x, y)| Step::PointerMove { x, y }),
        (0.0f64..390.0, 0.0f64..844.0).prop_map(|(x, y)| Step::PointerUp { x, y }),
        Just(Step::PointerCancel),
        (0.0f64..390.0, 0.0f64..844.0).prop_map(|(x, y)| Step::Tap { x, y }),
        (1u64..400).prop_map(|ms| Step::AdvanceMs { ms }),
    ]
}

proptest! {
    #[test]
    fn closes_never_outnumber_dismiss_commands(steps in proptest::collection::vec(arb_step(), 1..60)) {
        let script = SheetScript::new(steps);
        let mut harness = SheetHarness::for_script(&script, FrameClock::default()).expect("harness");
        let trace = harness.run(&script).expect("run").to_vec();

        let closes = trace.last().map_or(0, |l| l.closes);
        let closed_events: u64 = trace
            .iter()
            .map(|l| l.events.iter().filter(|e| **e == "closed").count() as u64)
            .sum();
        prop_assert_eq!(closes, closed_events);

        // Every close is preceded by its own transition into dismissing.
        let dismisses = trace
            .windows(2)
            .filter(|w| w[0].state != "dismissing" && w[1].state == "dismissing")
            .count() as u64
            + u64::from(trace.first().is_some_and(|l| l.state == "dismissing"));
        prop_assert!(closes <= dismisses);
    }
}
