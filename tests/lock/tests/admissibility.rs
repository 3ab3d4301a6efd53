//! Heuristic admissibility: the start score never overestimates, and A*
//! finds the same optimum as a zero-heuristic (Dijkstra) search.

use voxelpath_harness::worlds::fixtures::{self, Fixture};
use voxelpath_search::cancel::NeverCancel;
use voxelpath_search::expander::GraphExpander;
use voxelpath_search::goal::GoalScorer;
use voxelpath_search::outcome::SearchResult;
use voxelpath_search::policy::SearchPolicyV1;
use voxelpath_search::search::search;
use voxelpath_search::state::BotState;

/// Same finish condition, no guidance.
struct ZeroHeuristic<'a>(&'a dyn GoalScorer);

impl GoalScorer for ZeroHeuristic<'_> {
    fn compute_score(&self, _state: &BotState) -> i64 {
        0
    }

    fn is_finished(&self, state: &BotState) -> bool {
        self.0.is_finished(state)
    }

    fn describe(&self) -> String {
        format!("dijkstra({})", self.0.describe())
    }
}

fn run(fixture: &Fixture, goal: &dyn GoalScorer) -> SearchResult {
    let policy = SearchPolicyV1::default();
    let expander = GraphExpander::new(&policy.expander_config());
    search(
        fixture.start_state(),
        &fixture.world,
        &expander,
        goal,
        &policy,
        &NeverCancel,
    )
    .expect("pre-flight passes")
}

#[test]
fn start_score_is_a_lower_bound() {
    for fixture in fixtures::all().unwrap() {
        let Some(optimal) = fixture.expectations.optimal_cost else {
            continue;
        };
        let goal = fixture.goal.build().unwrap();
        let score = goal.compute_score(&fixture.start_state());
        assert!(
            score <= optimal,
            "{}: score {score} exceeds optimum {optimal}",
            fixture.name
        );
    }
}

#[test]
fn a_star_matches_dijkstra() {
    for fixture in fixtures::all().unwrap() {
        let goal = fixture.goal.build().unwrap();
        let guided = run(&fixture, goal.as_ref());
        let blind = run(&fixture, &ZeroHeuristic(goal.as_ref()));
        assert_eq!(
            guided.plan().map(|p| p.total_cost),
            blind.plan().map(|p| p.total_cost),
            "{}",
            fixture.name
        );
        assert_eq!(guided.failure(), blind.failure(), "{}", fixture.name);
    }
}

#[test]
fn guidance_never_costs_expansions_on_open_ground() {
    let fixture = fixtures::flat_plane(12).unwrap();
    let goal = fixture.goal.build().unwrap();
    let guided = run(&fixture, goal.as_ref());
    let blind = run(&fixture, &ZeroHeuristic(goal.as_ref()));
    assert!(guided.stats.expansions <= blind.stats.expansions);
}

#[test]
fn score_is_zero_exactly_when_standing_on_the_goal() {
    for fixture in fixtures::all().unwrap() {
        let Some(plan) = run(&fixture, fixture.goal.build().unwrap().as_ref())
            .plan()
            .cloned()
        else {
            continue;
        };
        let goal = fixture.goal.build().unwrap();
        let mut state = fixture.start_state();
        for step in &plan.steps {
            state = state.advanced(step.action, step.destination, step.cost);
        }
        assert!(goal.is_finished(&state), "{}", fixture.name);
        assert_eq!(goal.compute_score(&state), 0, "{}", fixture.name);
    }
}
