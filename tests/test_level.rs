use arcade_combat::level::{CompletionReason, LevelGoal, LevelProgress};

fn goal(length: Option<f32>, survive_ms: Option<u64>, kill_target: Option<u32>) -> LevelGoal {
    LevelGoal { length, survive_ms, kill_target }
}

#[test]
fn distance_goal() {
    let mut progress = LevelProgress::new(goal(Some(120.0), None, None));
    progress.advance(500, 120.0);
    assert_eq!(progress.check(0), None);
    progress.advance(500, 120.0);
    assert_eq!(progress.check(0), Some(CompletionReason::DistanceReached));
    assert!(progress.is_complete());
}

#[test]
fn survival_goal() {
    let mut progress = LevelProgress::new(goal(None, Some(1_000), None));
    progress.advance(999, 0.0);
    assert_eq!(progress.check(0), None);
    progress.advance(1, 0.0);
    assert_eq!(progress.check(0), Some(CompletionReason::Survived));
}

#[test]
fn kill_goal() {
    let mut progress = LevelProgress::new(goal(None, None, Some(3)));
    assert_eq!(progress.check(2), None);
    assert_eq!(progress.check(3), Some(CompletionReason::KillTargetReached));
}

#[test]
fn completion_is_reported_once() {
    let mut progress = LevelProgress::new(goal(None, None, Some(1)));
    assert!(progress.check(5).is_some());
    assert_eq!(progress.check(6), None);
    assert_eq!(progress.completion(), Some(CompletionReason::KillTargetReached));
}

#[test]
fn progress_freezes_after_completion() {
    let mut progress = LevelProgress::new(goal(None, Some(100), None));
    progress.advance(100, 50.0);
    progress.check(0);
    let (distance, elapsed) = (progress.distance(), progress.elapsed_ms());
    progress.advance(1_000, 50.0);
    assert_eq!(progress.distance(), distance);
    assert_eq!(progress.elapsed_ms(), elapsed);
}

#[test]
fn no_goal_never_completes() {
    let mut progress = LevelProgress::new(goal(None, None, None));
    progress.advance(1_000_000, 500.0);
    assert_eq!(progress.check(u32::MAX), None);
}

#[test]
fn default_goal_has_distance_and_kills() {
    let goal = LevelGoal::default();
    assert!(goal.length.is_some());
    assert!(goal.kill_target.is_some());
    assert_eq!(CompletionReason::Survived.to_string(), "survived");
}
