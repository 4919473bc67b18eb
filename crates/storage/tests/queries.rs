use hop_storage::SqliteStore;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_db_path(label: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic enough for tests")
        .as_nanos();
    path.push(format!(
        "hop-storage-queries-{label}-{}-{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&path).expect("temp dir must be creatable");
    path.join("branches.db")
}

/// Ordered list comes out [gamma, beta, alpha]: gamma was visited last.
fn seeded_store(label: &str) -> (SqliteStore, i64) {
    let mut store = SqliteStore::open(temp_db_path(label)).expect("fresh store should open");
    let project = store
        .find_or_create_project("/repos/app", "app")
        .expect("project should be created");
    for (offset, name) in ["alpha", "beta", "gamma"].iter().enumerate() {
        store
            .record_visit(project.id, name, 1_000 + offset as i64)
            .expect("seed visit should record");
    }
    (store, project.id)
}

#[test]
fn next_branch_cycles_and_wraps() {
    let (store, project_id) = seeded_store("next");

    assert_eq!(
        store
            .next_branch(project_id, Some("gamma"))
            .expect("query should succeed")
            .as_deref(),
        Some("beta")
    );
    assert_eq!(
        store
            .next_branch(project_id, Some("alpha"))
            .expect("query should succeed")
            .as_deref(),
        Some("gamma"),
        "the tail must wrap back to the head"
    );
    assert_eq!(
        store
            .next_branch(project_id, Some("untracked"))
            .expect("query should succeed")
            .as_deref(),
        Some("gamma"),
        "an unknown current branch must resolve to the head"
    );
    assert_eq!(
        store
            .next_branch(project_id, None)
            .expect("query should succeed")
            .as_deref(),
        Some("gamma"),
        "no current branch must resolve to the head"
    );
}

#[test]
fn next_branch_on_empty_project_is_none() {
    let mut store = SqliteStore::open(temp_db_path("empty")).expect("fresh store should open");
    let project = store
        .find_or_create_project("/repos/app", "app")
        .expect("project should be created");

    assert!(
        store
            .next_branch(project.id, Some("main"))
            .expect("query should succeed")
            .is_none()
    );
    assert!(
        store
            .branch_at_index(project.id, 1)
            .expect("query should succeed")
            .is_none()
    );
}

#[test]
fn branch_at_index_is_one_based_and_bounded() {
    let (store, project_id) = seeded_store("index");

    assert_eq!(
        store
            .branch_at_index(project_id, 1)
            .expect("query should succeed")
            .as_deref(),
        Some("gamma")
    );
    assert_eq!(
        store
            .branch_at_index(project_id, 3)
            .expect("query should succeed")
            .as_deref(),
        Some("alpha")
    );
    assert!(
        store
            .branch_at_index(project_id, 4)
            .expect("query should succeed")
            .is_none(),
        "index past the tail must resolve to no branch"
    );
    assert!(
        store
            .branch_at_index(project_id, 0)
            .expect("query should succeed")
            .is_none(),
        "indices are 1-based"
    );
    assert!(
        store
            .branch_at_index(project_id, -3)
            .expect("query should succeed")
            .is_none()
    );
}

#[test]
fn project_stats_report_count_and_head() {
    let (store, project_id) = seeded_store("stats");

    let stats = store
        .project_stats(project_id)
        .expect("stats should compute");
    assert_eq!(stats.total_branches, 3);
    assert_eq!(
        stats
            .most_recent
            .expect("a seeded project has a most recent branch")
            .name,
        "gamma"
    );
}

#[test]
fn stats_on_empty_project_are_empty() {
    let mut store = SqliteStore::open(temp_db_path("stats-empty")).expect("fresh store should open");
    let project = store
        .find_or_create_project("/repos/app", "app")
        .expect("project should be created");

    let stats = store
        .project_stats(project.id)
        .expect("stats should compute");
    assert_eq!(stats.total_branches, 0);
    assert!(stats.most_recent.is_none());
}

#[test]
fn list_limit_caps_the_result() {
    let (store, project_id) = seeded_store("limit");

    let branches = store
        .list_branches(project_id, Some(2))
        .expect("branches should list");
    let names = branches
        .iter()
        .map(|branch| branch.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["gamma", "beta"]);
}
