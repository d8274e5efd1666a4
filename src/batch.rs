//! Batch plotting over a folder of instances.
//!
//! Every instance with a matching `.res` file is parsed, summarised and rendered.
//! Failures are recorded per instance and do not stop the run.

use crate::analysis::SolutionSummary;
use crate::config::PlotConfig;
use crate::error::{MdvrpError, Result};
use crate::instance::MdvrpInstance;
use crate::solution::MdvrpSolution;
use crate::visualization::Visualizer;

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Result of plotting a single instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotRecord {
    /// Instance name
    pub instance: String,
    pub customers: Option<usize>,
    pub depots: Option<usize>,
    pub routes: Option<usize>,
    /// Cost reported in the solution file
    pub reported_cost: Option<f64>,
    /// Length recomputed from coordinates
    pub computed_length: Option<f64>,
    /// Relative difference between both, in percent
    pub gap: Option<f64>,
    pub output: Option<String>,
    /// Non-fatal problem, such as a failed PNG conversion
    pub warning: Option<String>,
    pub error: Option<String>,
}

impl PlotRecord {
    fn failed(instance: &str, error: &MdvrpError) -> Self {
        PlotRecord {
            instance: instance.to_string(),
            customers: None,
            depots: None,
            routes: None,
            reported_cost: None,
            computed_length: None,
            gap: None,
            output: None,
            warning: None,
            error: Some(error.to_string()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Batch configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub plot: PlotConfig,
    /// Also write a PNG next to each SVG
    pub png: bool,
    /// Draw customer ids
    pub labels: bool,
}

impl BatchConfig {
    pub fn new(plot: PlotConfig) -> Self {
        BatchConfig { plot, png: false, labels: false }
    }
}

/// Batch plotting engine
pub struct Batch {
    config: BatchConfig,
    visualizer: Visualizer,
    records: Vec<PlotRecord>,
}

impl Batch {
    pub fn new(config: BatchConfig) -> Self {
        let visualizer = Visualizer::new().with_labels(config.labels);
        Batch { config, visualizer, records: Vec::new() }
    }

    /// Plot one instance and record the outcome
    pub fn run_instance(&mut self, name: &str) -> &PlotRecord {
        log::info!("Plotting instance: {}", name);
        let record = match self.plot(name) {
            Ok(record) => record,
            Err(e) => {
                log::error!("Failed to plot {}: {}", name, e);
                PlotRecord::failed(name, &e)
            }
        };
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Plot every named instance in order
    pub fn run(&mut self, names: &[String]) {
        for (i, name) in names.iter().enumerate() {
            println!("[{}/{}] Plotting {}...", i + 1, names.len(), name);
            self.run_instance(name);
        }
    }

    fn plot(&self, name: &str) -> Result<PlotRecord> {
        let plot = &self.config.plot;
        let instance = MdvrpInstance::from_file(plot.instance_path(name))?;
        let solution = MdvrpSolution::from_file(plot.solution_path(name))?;
        let summary = SolutionSummary::new(&instance, &solution)?;

        let svg = self.visualizer.generate_svg(&instance, &solution)?;
        std::fs::create_dir_all(&plot.output_folder)
            .map_err(|e| MdvrpError::io(&plot.output_folder, e))?;
        let svg_path = plot.output_path(name, "svg");
        self.visualizer.save_svg(&svg, &svg_path)?;

        let mut warning = None;
        let output = if self.config.png {
            let png_path = plot.output_path(name, "png");
            match self.visualizer.save_png(&svg, &png_path) {
                Ok(()) => png_path,
                Err(e) => {
                    log::warn!("PNG conversion failed for {} ({}), SVG kept", name, e);
                    warning = Some(format!("PNG conversion failed: {}", e));
                    svg_path
                }
            }
        } else {
            svg_path
        };

        Ok(PlotRecord {
            instance: name.to_string(),
            customers: Some(instance.customers.len()),
            depots: Some(instance.depots.len()),
            routes: Some(summary.num_routes),
            reported_cost: Some(summary.reported_cost),
            computed_length: Some(summary.computed_length),
            gap: summary.gap_percent(),
            output: Some(output.to_string_lossy().into_owned()),
            warning,
            error: None,
        })
    }

    /// Export records to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let to_io = |e: csv::Error| {
            MdvrpError::io(path, std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
        };

        let file = File::create(path).map_err(|e| MdvrpError::io(path, e))?;
        let mut writer = csv::Writer::from_writer(file);

        for record in &self.records {
            writer.serialize(record).map_err(to_io)?;
        }

        writer.flush().map_err(|e| MdvrpError::io(path, e))?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("         MDVRP Plot Report\n");
        report.push_str("========================================\n\n");

        let ok = self.records.iter().filter(|r| r.succeeded()).count();
        report.push_str(&format!("Plotted {}/{} instances\n", ok, self.records.len()));
        report.push_str("-".repeat(72).as_str());
        report.push('\n');
        report.push_str(&format!("{:<12} {:>6} {:>6} {:>7} {:>12} {:>12} {:>10}\n",
            "Instance", "Cust", "Depots", "Routes", "Reported", "Computed", "Gap%"));
        report.push_str("-".repeat(72).as_str());
        report.push('\n');

        for record in self.records.iter().filter(|r| r.succeeded()) {
            let gap_str = record.gap
                .map(|g| format!("{:.2}%", g))
                .unwrap_or_else(|| "-".to_string());

            report.push_str(&format!("{:<12} {:>6} {:>6} {:>7} {:>12.2} {:>12.2} {:>10}\n",
                record.instance,
                record.customers.unwrap_or(0),
                record.depots.unwrap_or(0),
                record.routes.unwrap_or(0),
                record.reported_cost.unwrap_or(0.0),
                record.computed_length.unwrap_or(0.0),
                gap_str));
        }

        report.push_str("-".repeat(72).as_str());
        report.push('\n');

        let warnings: Vec<_> = self.records.iter().filter(|r| r.warning.is_some()).collect();
        if !warnings.is_empty() {
            report.push_str("\nWarnings:\n");
            for record in warnings {
                report.push_str(&format!("  {}: {}\n",
                    record.instance, record.warning.as_deref().unwrap_or("")));
            }
        }

        let failures: Vec<_> = self.records.iter().filter(|r| !r.succeeded()).collect();
        if !failures.is_empty() {
            report.push_str("\nFailures:\n");
            for record in failures {
                report.push_str(&format!("  {}: {}\n",
                    record.instance, record.error.as_deref().unwrap_or("unknown error")));
            }
        }

        report
    }

    /// Get all records
    pub fn records(&self) -> &[PlotRecord] {
        &self.records
    }
}

/// Names of instances in `config.instance_folder` that have a solution file, sorted
pub fn discover_instances(config: &PlotConfig) -> Result<Vec<String>> {
    let folder = &config.instance_folder;
    let entries = std::fs::read_dir(folder).map_err(|e| MdvrpError::io(folder, e))?;

    let mut names: Vec<String> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path: PathBuf| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .filter(|name| config.solution_path(name).is_file())
        .collect();

    names.sort();
    log::debug!("Discovered {} instances with solutions in {}", names.len(), folder.display());
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, gap: Option<f64>) -> PlotRecord {
        PlotRecord {
            instance: name.to_string(),
            customers: Some(50),
            depots: Some(4),
            routes: Some(11),
            reported_cost: Some(576.87),
            computed_length: Some(576.0),
            gap,
            output: Some(format!("{}.svg", name)),
            warning: None,
            error: None,
        }
    }

    #[test]
    fn test_report_lists_successes_and_failures() {
        let mut batch = Batch::new(BatchConfig::new(PlotConfig::default()));
        batch.records.push(record("p01", Some(0.15)));
        batch.records.push(PlotRecord::failed(
            "p02",
            &MdvrpError::format(Some(3), "bad line"),
        ));

        let report = batch.generate_report();
        assert!(report.contains("Plotted 1/2 instances"));
        assert!(report.contains("p01"));
        assert!(report.contains("0.15%"));
        assert!(report.contains("p02: Format error at line 3: bad line"));
    }

    #[test]
    fn test_missing_files_are_recorded() {
        let config = PlotConfig::default()
            .with_instance_folder("/nonexistent/instances")
            .with_solution_folder("/nonexistent/solutions");
        let mut batch = Batch::new(BatchConfig::new(config));

        let record = batch.run_instance("p01");
        assert!(!record.succeeded());
        assert_eq!(batch.records().len(), 1);
    }
}
