//! End-to-end tests: folders on disk, rendering and batch reports.

use mdvrp_plot::analysis::SolutionSummary;
use mdvrp_plot::batch::{discover_instances, Batch, BatchConfig};
use mdvrp_plot::config::PlotConfig;
use mdvrp_plot::instance::MdvrpInstance;
use mdvrp_plot::solution::MdvrpSolution;
use mdvrp_plot::visualization::Visualizer;
use std::path::PathBuf;

const INSTANCE: &str = "4 3 1\n0 100\n1 0 10 0 4\n2 10 10 0 4\n3 10 0 0 4\n4 0 0 0 0\n";
const SOLUTION: &str = "40.00\n1 1 3 40.00 12 1 2 3 0\n";
/// Refers to customer 9, absent from the instance.
const BROKEN_SOLUTION: &str = "10.00\n1 1 1 10.00 4 9 0\n";

/// Creates instance/solution/output folders unique to this test.
fn create_test_config(test: &str) -> PlotConfig {
    let root = std::env::temp_dir().join(format!("mdvrp-plot-batch-{}-{}", test, std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    for sub in ["instances", "solutions", "plots"] {
        std::fs::create_dir_all(root.join(sub)).unwrap();
    }
    PlotConfig::default()
        .with_instance_folder(root.join("instances"))
        .with_solution_folder(root.join("solutions"))
        .with_output_folder(root.join("plots"))
}

fn write(path: PathBuf, content: &str) {
    std::fs::write(path, content).unwrap();
}

#[test]
fn test_plot_default_instance_end_to_end() {
    let config = create_test_config("single");
    let name = config.resolve_name(None).to_string();
    write(config.instance_path(&name), INSTANCE);
    write(config.solution_path(&name), SOLUTION);

    let instance = MdvrpInstance::from_file(config.instance_path(&name)).unwrap();
    let solution = MdvrpSolution::from_file(config.solution_path(&name)).unwrap();

    let summary = SolutionSummary::new(&instance, &solution).unwrap();
    assert!((summary.computed_length - 40.0).abs() < 1e-9);
    assert!(summary.unserved.is_empty());

    let viz = Visualizer::new();
    let svg = viz.generate_svg(&instance, &solution).unwrap();
    let out = config.output_path(&name, "svg");
    viz.save_svg(&svg, &out).unwrap();

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("p01: 40"));
}

#[test]
fn test_discover_only_instances_with_solutions() {
    let config = create_test_config("discover");
    write(config.instance_path("p02"), INSTANCE);
    write(config.instance_path("p01"), INSTANCE);
    write(config.instance_path("p03"), INSTANCE);
    write(config.solution_path("p01"), SOLUTION);
    write(config.solution_path("p02"), SOLUTION);

    let names = discover_instances(&config).unwrap();
    assert_eq!(names, vec!["p01".to_string(), "p02".to_string()]);
}

#[test]
fn test_batch_records_failures_and_exports() {
    let config = create_test_config("run");
    write(config.instance_path("p01"), INSTANCE);
    write(config.solution_path("p01"), SOLUTION);
    write(config.instance_path("p02"), INSTANCE);
    write(config.solution_path("p02"), BROKEN_SOLUTION);

    let names = discover_instances(&config).unwrap();
    let mut batch = Batch::new(BatchConfig::new(config.clone()));
    batch.run(&names);

    let records = batch.records();
    assert_eq!(records.len(), 2);
    assert!(records[0].succeeded());
    assert_eq!(records[0].routes, Some(1));
    assert!(config.output_path("p01", "svg").is_file());

    assert!(!records[1].succeeded());
    assert!(records[1].error.as_deref().unwrap().contains("customer 9"));
    assert!(!config.output_path("p02", "svg").exists());

    let csv_path = config.output_folder.join("summary.csv");
    batch.export_to_csv(&csv_path).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("instance,"));
    assert_eq!(csv.lines().count(), 3);

    let report = batch.generate_report();
    assert!(report.contains("Plotted 1/2 instances"));
}

#[test]
fn test_batch_creates_missing_output_folder() {
    let config = create_test_config("mkdir");
    write(config.instance_path("p01"), INSTANCE);
    write(config.solution_path("p01"), SOLUTION);

    let nested = config.output_folder.join("nested").join("plots");
    let config = config.with_output_folder(&nested);
    let mut batch = Batch::new(BatchConfig::new(config.clone()));
    batch.run(&["p01".to_string()]);

    assert!(batch.records()[0].succeeded());
    assert!(config.output_path("p01", "svg").is_file());
}

#[test]
fn test_png_failure_keeps_svg_as_warning() {
    let config = create_test_config("png");
    write(config.instance_path("p01"), INSTANCE);
    write(config.solution_path("p01"), SOLUTION);
    // a directory in place of the PNG makes every conversion fail
    std::fs::create_dir_all(config.output_path("p01", "png")).unwrap();

    let mut batch_config = BatchConfig::new(config.clone());
    batch_config.png = true;
    let mut batch = Batch::new(batch_config);
    batch.run(&["p01".to_string()]);

    let record = &batch.records()[0];
    assert!(record.succeeded());
    assert!(record.warning.as_deref().unwrap().contains("PNG conversion failed"));
    assert!(record.output.as_deref().unwrap().ends_with("p01.svg"));
    assert!(batch.generate_report().contains("Warnings:"));
}
