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
        "hop-storage-mru-{label}-{}-{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&path).expect("temp dir must be creatable");
    path.join("branches.db")
}

#[test]
fn revisiting_a_branch_updates_in_place() {
    let mut store = SqliteStore::open(temp_db_path("revisit")).expect("fresh store should open");
    let project = store
        .find_or_create_project("/repos/app", "app")
        .expect("project should be created");

    store
        .record_visit(project.id, "feature/login", 1_000)
        .expect("first visit should insert");
    store
        .record_visit(project.id, "feature/login", 2_000)
        .expect("second visit should update");

    assert_eq!(
        store
            .count_branches(project.id)
            .expect("count should succeed"),
        1,
        "revisits must never duplicate a branch row"
    );

    let branches = store
        .list_branches(project.id, None)
        .expect("branches should list");
    assert_eq!(branches[0].name, "feature/login");
    assert_eq!(
        branches[0].last_visited_at_ms, 2_000,
        "revisit must bump the visit timestamp"
    );
    assert_eq!(branches[0].position, 0);
}

#[test]
fn branches_order_most_recent_first_with_gapless_positions() {
    let mut store = SqliteStore::open(temp_db_path("order")).expect("fresh store should open");
    let project = store
        .find_or_create_project("/repos/app", "app")
        .expect("project should be created");

    store
        .record_visit(project.id, "alpha", 1_000)
        .expect("alpha visit should record");
    store
        .record_visit(project.id, "beta", 2_000)
        .expect("beta visit should record");
    store
        .record_visit(project.id, "gamma", 3_000)
        .expect("gamma visit should record");

    let branches = store
        .list_branches(project.id, None)
        .expect("branches should list");
    let names = branches
        .iter()
        .map(|branch| branch.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["gamma", "beta", "alpha"]);

    for (slot, branch) in branches.iter().enumerate() {
        assert_eq!(
            branch.position, slot as i64,
            "positions must be contiguous from zero after a mutation"
        );
    }
}

#[test]
fn same_millisecond_visits_order_by_visit_sequence() {
    let mut store = SqliteStore::open(temp_db_path("ties")).expect("fresh store should open");
    let project = store
        .find_or_create_project("/repos/app", "app")
        .expect("project should be created");

    store
        .record_visit(project.id, "first", 5_000)
        .expect("first visit should record");
    store
        .record_visit(project.id, "second", 5_000)
        .expect("second visit should record");

    let branches = store
        .list_branches(project.id, None)
        .expect("branches should list");
    let names = branches
        .iter()
        .map(|branch| branch.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        ["second", "first"],
        "the later visit must win a timestamp tie"
    );
}

#[test]
fn repeat_mutation_with_no_change_keeps_positions_stable() {
    let mut store = SqliteStore::open(temp_db_path("stable")).expect("fresh store should open");
    let project = store
        .find_or_create_project("/repos/app", "app")
        .expect("project should be created");

    store
        .record_visit(project.id, "alpha", 1_000)
        .expect("alpha visit should record");
    store
        .record_visit(project.id, "beta", 2_000)
        .expect("beta visit should record");

    let before = store
        .list_branches(project.id, None)
        .expect("branches should list")
        .into_iter()
        .map(|branch| (branch.name, branch.position))
        .collect::<Vec<_>>();

    // A revisit of the head with its own timestamp re-runs the full
    // re-rank; the assignment must come out identical.
    store
        .record_visit(project.id, "beta", 2_000)
        .expect("head revisit should record");

    let after = store
        .list_branches(project.id, None)
        .expect("branches should list")
        .into_iter()
        .map(|branch| (branch.name, branch.position))
        .collect::<Vec<_>>();
    assert_eq!(before, after, "re-ranking must be idempotent");
}

#[test]
fn find_or_create_project_is_idempotent() {
    let mut store = SqliteStore::open(temp_db_path("project")).expect("fresh store should open");

    let first = store
        .find_or_create_project("/repos/app", "app")
        .expect("project should be created");
    let second = store
        .find_or_create_project("/repos/app", "app")
        .expect("existing project should be returned");

    assert_eq!(first.id, second.id, "same path must resolve to one row");
    assert_eq!(second.path, "/repos/app");
    assert_eq!(second.basename, "app");

    let other = store
        .find_or_create_project("/repos/other", "other")
        .expect("second project should be created");
    assert_ne!(first.id, other.id);
}

#[test]
fn trailing_slash_resolves_to_the_same_project() {
    let mut store = SqliteStore::open(temp_db_path("canonical")).expect("fresh store should open");

    let first = store
        .find_or_create_project("/repos/app", "app")
        .expect("project should be created");
    let second = store
        .find_or_create_project("/repos/app/", "app")
        .expect("trailing slash must canonicalize");
    assert_eq!(first.id, second.id);

    let err = store
        .find_or_create_project("relative/path", "path")
        .expect_err("relative paths must be rejected");
    assert_eq!(err.code(), "INVALID_INPUT");
}

#[test]
fn delete_branch_reranks_the_remainder() {
    let mut store = SqliteStore::open(temp_db_path("delete")).expect("fresh store should open");
    let project = store
        .find_or_create_project("/repos/app", "app")
        .expect("project should be created");

    store
        .record_visit(project.id, "alpha", 1_000)
        .expect("alpha visit should record");
    let beta = store
        .record_visit(project.id, "beta", 2_000)
        .expect("beta visit should record");
    store
        .record_visit(project.id, "gamma", 3_000)
        .expect("gamma visit should record");

    assert!(
        store
            .delete_branch(beta.id)
            .expect("delete should succeed"),
        "existing branch must report deletion"
    );
    assert!(
        !store
            .delete_branch(beta.id)
            .expect("second delete should succeed"),
        "missing branch must report no deletion"
    );

    let branches = store
        .list_branches(project.id, None)
        .expect("branches should list");
    let names = branches
        .iter()
        .map(|branch| (branch.name.as_str(), branch.position))
        .collect::<Vec<_>>();
    assert_eq!(names, [("gamma", 0), ("alpha", 1)]);
}

#[test]
fn visits_to_unknown_projects_are_rejected() {
    let mut store = SqliteStore::open(temp_db_path("unknown")).expect("fresh store should open");
    let err = store
        .record_visit(9_999, "main", 1_000)
        .expect_err("unknown project must be rejected");
    assert_eq!(err.code(), "UNKNOWN_PROJECT");
}
