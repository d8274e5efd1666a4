//! MDVRP Plot - Command Line Interface
//!
//! Plots MDVRP instances together with their `.res` solutions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mdvrp_plot::analysis::{solution_length, SolutionSummary};
use mdvrp_plot::batch::{discover_instances, Batch, BatchConfig};
use mdvrp_plot::config::PlotConfig;
use mdvrp_plot::instance::MdvrpInstance;
use mdvrp_plot::solution::MdvrpSolution;
use mdvrp_plot::visualization::Visualizer;

use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mdvrp-plot")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "Plot Multi-Depot VRP instances and their solutions")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Folder containing instance files
    #[arg(long, global = true)]
    instance_folder: Option<PathBuf>,

    /// Folder containing `<instance>.res` solution files
    #[arg(long, global = true)]
    solution_folder: Option<PathBuf>,

    /// Folder receiving plots and reports
    #[arg(long, global = true)]
    output_folder: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Plot one instance with its solution
    Plot {
        /// Instance name (defaults to the configured default instance)
        name: Option<String>,

        /// Also write a PNG
        #[arg(long)]
        png: bool,

        /// Draw customer ids
        #[arg(long)]
        labels: bool,
    },

    /// Print instance statistics and a solution summary
    Analyze {
        name: Option<String>,
    },

    /// Plot every instance that has a solution file
    Batch {
        /// Also write PNGs
        #[arg(long)]
        png: bool,

        /// Draw customer ids
        #[arg(long)]
        labels: bool,
    },

    /// Dump an instance and its solution as JSON
    Export {
        name: Option<String>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Write comma-separated plot data instead of JSON
        #[arg(long)]
        plot_data: bool,
    },
}

#[derive(Serialize)]
struct Export<'a> {
    instance: &'a MdvrpInstance,
    solution: &'a MdvrpSolution,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        None => plot_instance(&config, None, false, false),
        Some(Commands::Plot { name, png, labels }) => {
            plot_instance(&config, name.as_deref(), png, labels)
        }
        Some(Commands::Analyze { name }) => analyze_instance(&config, name.as_deref()),
        Some(Commands::Batch { png, labels }) => run_batch(&config, png, labels),
        Some(Commands::Export { name, output, plot_data }) => {
            export_instance(&config, name.as_deref(), &output, plot_data)
        }
    }
}

fn load_config(cli: &Cli) -> Result<PlotConfig> {
    let mut config = match &cli.config {
        Some(path) => PlotConfig::from_json_file(path)
            .with_context(|| format!("Error loading configuration {:?}", path))?,
        None => PlotConfig::default(),
    };

    if let Some(folder) = &cli.instance_folder {
        config = config.with_instance_folder(folder);
    }
    if let Some(folder) = &cli.solution_folder {
        config = config.with_solution_folder(folder);
    }
    if let Some(folder) = &cli.output_folder {
        config = config.with_output_folder(folder);
    }

    log::debug!("Using configuration {:?}", config);
    Ok(config)
}

fn load_pair(config: &PlotConfig, name: &str) -> Result<(MdvrpInstance, MdvrpSolution)> {
    let instance = MdvrpInstance::from_file(config.instance_path(name))
        .with_context(|| format!("Error loading instance {}", name))?;
    let solution = MdvrpSolution::from_file(config.solution_path(name))
        .with_context(|| format!("Error loading solution for {}", name))?;
    Ok((instance, solution))
}

fn plot_instance(config: &PlotConfig, name: Option<&str>, png: bool, labels: bool) -> Result<()> {
    if name.is_none() {
        println!("Please specify problem in arguments");
        println!("Plotting default problem {}", config.default_instance_name);
    }
    let name = config.resolve_name(name);

    let (instance, solution) = load_pair(config, name)?;

    let viz = Visualizer::new().with_labels(labels);
    let svg = viz
        .generate_svg(&instance, &solution)
        .with_context(|| format!("Error plotting {}", name))?;

    std::fs::create_dir_all(&config.output_folder)
        .with_context(|| format!("Failed to create {:?}", config.output_folder))?;

    let svg_path = config.output_path(name, "svg");
    viz.save_svg(&svg, &svg_path)?;
    println!("Plot saved to {:?}", svg_path);

    if png {
        let png_path = config.output_path(name, "png");
        match viz.save_png(&svg, &png_path) {
            Ok(()) => println!("PNG saved to {:?}", png_path),
            Err(e) => println!("PNG conversion failed ({}). SVG kept at {:?}", e, svg_path),
        }
    }

    println!("{}: {} routes, cost {:.2}", instance.name, solution.routes.len(), solution.cost);
    Ok(())
}

fn analyze_instance(config: &PlotConfig, name: Option<&str>) -> Result<()> {
    let name = config.resolve_name(name);
    let (instance, solution) = load_pair(config, name)?;

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    let summary = SolutionSummary::new(&instance, &solution)
        .with_context(|| format!("Solution does not match instance {}", name))?;
    println!("\n{}", summary);
    Ok(())
}

fn run_batch(config: &PlotConfig, png: bool, labels: bool) -> Result<()> {
    println!("Loading instances from {:?}...", config.instance_folder);
    let names = discover_instances(config)?;
    println!("Found {} instances with solutions", names.len());

    if names.is_empty() {
        eprintln!("No instances found!");
        return Ok(());
    }

    let mut batch_config = BatchConfig::new(config.clone());
    batch_config.png = png;
    batch_config.labels = labels;

    let mut batch = Batch::new(batch_config);
    batch.run(&names);

    std::fs::create_dir_all(&config.output_folder)
        .with_context(|| format!("Failed to create {:?}", config.output_folder))?;
    let csv_path = config.output_folder.join("summary.csv");
    batch.export_to_csv(&csv_path)?;
    println!("\nSummary exported to {:?}", csv_path);

    let report = batch.generate_report();
    println!("\n{}", report);

    let report_path = config.output_folder.join("report.txt");
    std::fs::write(&report_path, &report)
        .with_context(|| format!("Failed to save report {:?}", report_path))?;
    println!("Report saved to {:?}", report_path);
    Ok(())
}

fn export_instance(
    config: &PlotConfig,
    name: Option<&str>,
    output: &Path,
    plot_data: bool,
) -> Result<()> {
    let name = config.resolve_name(name);
    let (instance, solution) = load_pair(config, name)?;

    let content = if plot_data {
        let length = solution_length(&instance, &solution)
            .with_context(|| format!("Solution does not match instance {}", name))?;
        println!("Computed length: {:.2}", length);
        Visualizer::new().export_plot_data(&instance, &solution)
    } else {
        serde_json::to_string_pretty(&Export { instance: &instance, solution: &solution })?
    };
    std::fs::write(output, content).with_context(|| format!("Failed to write {:?}", output))?;
    println!("Exported {} to {:?}", name, output);
    Ok(())
}
