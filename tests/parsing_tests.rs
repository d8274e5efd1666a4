//! File-level tests for the instance and solution parsers.

use mdvrp_plot::error::MdvrpError;
use mdvrp_plot::instance::MdvrpInstance;
use mdvrp_plot::solution::MdvrpSolution;
use proptest::prelude::*;
use std::path::PathBuf;

/// Creates an empty scratch folder unique to this test.
fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mdvrp-plot-{}-{}", test, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Two depots, four customers, laid out as in the Cordeau files.
const INSTANCE: &str = "\
4 4 2
0 80
0 80
1 10 20 0 7 1 4 1 2 4 8
2 30 40 0 30 1 4 1 2 4 8
3 50 10 0 16 1 4 1 2 4 8
4 -5 25 0 9 1 4 1 2 4 8
5 20 20 0 0
6 40 30 0 0
";

const SOLUTION: &str = "\
148.93
1 1 2 63.25 37 4 1 0
2 1 1 31.62 16 3 0
2 2 1 20.00 30 2 0
";

#[test]
fn test_spec_scenario_instance() {
    let instance =
        MdvrpInstance::parse("scenario", "1 2 1\n...\n1 10 20 ...\n2 30 40 ...\n3 0 0 ...\n")
            .unwrap();

    assert_eq!(instance.customers.len(), 2);
    assert_eq!((instance.customers[&1].x, instance.customers[&1].y), (10, 20));
    assert_eq!((instance.customers[&2].x, instance.customers[&2].y), (30, 40));
    assert_eq!(instance.depots.len(), 1);
    assert_eq!((instance.depots[&1].x, instance.depots[&1].y), (0, 0));
}

#[test]
fn test_spec_scenario_solution() {
    let solution = MdvrpSolution::parse("123.45\n1 0 2 10 5 7 9 1\n").unwrap();
    assert_eq!(solution.cost, 123.45);
    assert_eq!(solution.routes.len(), 1);
    assert_eq!(solution.routes[0].depot, 1);
    assert_eq!(solution.routes[0].customers, vec![7, 9]);
}

#[test]
fn test_instance_from_file() {
    let dir = scratch_dir("instance-file");
    let path = dir.join("p99");
    std::fs::write(&path, INSTANCE).unwrap();

    let instance = MdvrpInstance::from_file(&path).unwrap();
    assert_eq!(instance.name, "p99");
    assert_eq!(instance.customers.len(), 4);
    assert_eq!(instance.depots.len(), 2);
    assert_eq!(instance.depots[&2].x, 40);
    assert_eq!(instance.customers[&4].x, -5);
    assert_eq!(instance.total_demand(), Some(62));
}

#[test]
fn test_solution_from_file_references_instance() {
    let dir = scratch_dir("solution-file");
    std::fs::write(dir.join("p99"), INSTANCE).unwrap();
    std::fs::write(dir.join("p99.res"), SOLUTION).unwrap();

    let instance = MdvrpInstance::from_file(dir.join("p99")).unwrap();
    let solution = MdvrpSolution::from_file(dir.join("p99.res")).unwrap();

    assert_eq!(solution.routes.len(), 3);
    for route in &solution.routes {
        assert!(instance.depots.contains_key(&route.depot));
        for id in &route.customers {
            assert!(instance.customers.contains_key(id));
        }
    }
    assert_eq!(solution.customer_visits(), solution.served_customers().len());
    assert_eq!(solution.customer_visits(), instance.customers.len());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = scratch_dir("missing");
    let err = MdvrpInstance::from_file(dir.join("nope")).unwrap_err();
    assert!(matches!(err, MdvrpError::Io { .. }));

    let err = MdvrpSolution::from_file(dir.join("nope.res")).unwrap_err();
    assert!(matches!(err, MdvrpError::Io { .. }));
}

#[test]
fn test_truncated_file_reports_path() {
    let dir = scratch_dir("truncated");
    let path = dir.join("p98");
    std::fs::write(&path, "2 2 5\n0 80\n1 10 20\n2 30 40\n3 0 0\n").unwrap();

    let err = MdvrpInstance::from_file(&path).unwrap_err();
    match err {
        MdvrpError::Format { path: Some(p), .. } => assert_eq!(p, path),
        other => panic!("expected format error, got {:?}", other),
    }
}

#[test]
fn test_solution_saved_and_reloaded() {
    let dir = scratch_dir("save");
    let original = MdvrpSolution::parse(SOLUTION).unwrap();
    let path = dir.join("copy.res");
    original.save(&path).unwrap();

    let reloaded = MdvrpSolution::from_file(&path).unwrap();
    assert_eq!(reloaded.cost, original.cost);
    let depots: Vec<u32> = reloaded.routes.iter().map(|r| r.depot).collect();
    assert_eq!(depots, vec![1, 2, 2]);
    assert_eq!(reloaded.routes[0].customers, vec![4, 1]);
    assert_eq!(reloaded.routes[2].load, Some(30.0));
}

/// Build Cordeau-style text from coordinates.
fn instance_text(customers: &[(i32, i32)], depots: &[(i32, i32)]) -> String {
    let mut text = format!("2 {} {}\n", customers.len(), depots.len());
    for _ in depots {
        text.push_str("0 100\n");
    }
    for (i, (x, y)) in customers.iter().enumerate() {
        text.push_str(&format!("{} {} {} 0 5 1 4 1 2 4 8\n", i + 1, x, y));
    }
    for (i, (x, y)) in depots.iter().enumerate() {
        text.push_str(&format!("{} {} {} 0 0\n", customers.len() + i + 1, x, y));
    }
    text
}

proptest! {
    #[test]
    fn prop_entity_counts_match_header(
        customers in prop::collection::vec((-100i32..100, -100i32..100), 0..40),
        depots in prop::collection::vec((-100i32..100, -100i32..100), 1..6),
    ) {
        let text = instance_text(&customers, &depots);
        let instance = MdvrpInstance::parse("prop", &text).unwrap();

        prop_assert_eq!(instance.customers.len() + instance.depots.len(), customers.len() + depots.len());
        let depot_keys: Vec<u32> = instance.depots.keys().copied().collect();
        let expected: Vec<u32> = (1..=depots.len() as u32).collect();
        prop_assert_eq!(depot_keys, expected);
    }

    #[test]
    fn prop_parsing_is_deterministic(
        customers in prop::collection::vec((-100i32..100, -100i32..100), 0..20),
        depots in prop::collection::vec((-100i32..100, -100i32..100), 1..4),
    ) {
        let text = instance_text(&customers, &depots);
        let first = MdvrpInstance::parse("prop", &text).unwrap();
        let second = MdvrpInstance::parse("prop", &text).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_missing_trailing_depots_rejected(
        customers in prop::collection::vec((-100i32..100, -100i32..100), 1..20),
        depots in prop::collection::vec((-100i32..100, -100i32..100), 2..6),
        missing in 1usize..3,
    ) {
        let text = instance_text(&customers, &depots);
        let lines: Vec<&str> = text.lines().collect();
        let truncated = lines[..lines.len() - missing].join("\n");
        let err = MdvrpInstance::parse("prop", &truncated).unwrap_err();
        prop_assert!(err.is_format());
    }
}
