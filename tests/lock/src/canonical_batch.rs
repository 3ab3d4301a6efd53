//! Single source of truth for the canonical planning batch.
//!
//! Used by both the `plan_fixture` binary and the in-process determinism
//! tests. Any change here changes both, so the cross-process comparison
//! never drifts from what the in-process tests expect.
//!
//! Batch: every fixture in `fixtures::all()`, two bots each. Policy and
//! worker count come from a [`RunnerConfig`]; the canonical one is the
//! default policy on two workers.

use voxelpath_harness::config::{LoggingSettings, RunnerConfig};
use voxelpath_harness::runner::{batch_digest, run_batch, EpisodeReportV1};
use voxelpath_harness::worlds::fixtures::{self, Fixture};
use voxelpath_search::cancel::NeverCancel;
use voxelpath_search::expander::GraphExpander;
use voxelpath_search::policy::SearchPolicyV1;

pub const BOTS_PER_FIXTURE: usize = 2;
pub const WORKERS: usize = 2;

/// Reports for one fixture, in request order.
#[derive(Debug, Clone)]
pub struct FixtureRun {
    pub fixture: String,
    pub world_digest: String,
    pub reports: Vec<EpisodeReportV1>,
}

/// Config `plan_fixture` runs with when given no config file. Logs stay
/// quiet and plain so stderr is readable in test failures.
#[must_use]
pub fn canonical_config() -> RunnerConfig {
    RunnerConfig {
        workers: WORKERS,
        policy: SearchPolicyV1::default(),
        logging: LoggingSettings {
            level: "warn".into(),
            ansi: false,
            thread_ids: true,
        },
    }
}

/// Plan the canonical batch.
///
/// # Panics
///
/// As [`run_configured_batch`].
#[must_use]
pub fn run_canonical_batch() -> Vec<FixtureRun> {
    run_configured_batch(&canonical_config())
}

/// Plan every fixture with `config`'s policy on `config.workers` threads.
///
/// # Panics
///
/// Panics if a fixture fails to build, the worker pool cannot start, or an
/// episode errors out; all are harness bugs, not search outcomes.
#[must_use]
pub fn run_configured_batch(config: &RunnerConfig) -> Vec<FixtureRun> {
    let expander = GraphExpander::new(&config.policy.expander_config());
    let fixtures = fixtures::all().expect("fixture worlds build");
    fixtures
        .iter()
        .map(|fixture| run_fixture(fixture, &expander, config))
        .collect()
}

fn run_fixture(fixture: &Fixture, expander: &GraphExpander, config: &RunnerConfig) -> FixtureRun {
    let requests: Vec<_> = (0..BOTS_PER_FIXTURE)
        .map(|i| fixture.request(format!("{}-bot-{i}", fixture.name)))
        .collect();
    let reports = run_batch(
        &fixture.world,
        expander,
        &requests,
        &config.policy,
        config.workers,
        &NeverCancel,
    )
    .expect("batch pool starts")
    .into_iter()
    .map(|r| r.expect("episode runs"))
    .collect();
    FixtureRun {
        fixture: fixture.name.clone(),
        world_digest: fixture
            .world
            .digest()
            .expect("snapshot digest")
            .as_str()
            .to_owned(),
        reports,
    }
}

/// Render a batch as the `key=value` lines printed by `plan_fixture`.
///
/// # Panics
///
/// Panics if a report fails to serialize.
#[must_use]
pub fn render(runs: &[FixtureRun]) -> String {
    let mut out = String::new();
    let mut all_reports = Vec::new();
    for run in runs {
        out.push_str(&format!("fixture={} world_digest={}\n", run.fixture, run.world_digest));
        for report in &run.reports {
            let cost = report
                .plan
                .as_ref()
                .map_or_else(|| "-".to_owned(), |p| p.total_cost.to_string());
            out.push_str(&format!(
                "  bot={} outcome={} cost={} expansions={} report_digest={}\n",
                report.bot_id,
                report.outcome,
                cost,
                report.stats.expansions,
                report.digest().expect("report digest").as_str(),
            ));
        }
        all_reports.extend(run.reports.iter().cloned());
    }
    out.push_str(&format!(
        "batch_digest={}\n",
        batch_digest(&all_reports).expect("batch digest").as_str()
    ));
    out
}
