//! MDVRP Plot Library
//!
//! Reads Multi-Depot Vehicle Routing Problem instances (Cordeau layout) and the
//! matching `.res` solution files, and renders depots, customers and routes.
//!
//! # Features
//!
//! - Instance parser with header/layout checks
//! - Solution parser for `.res` files
//! - SVG rendering, with PNG conversion (native through the `resvg` feature)
//! - Route lengths and solution summaries
//! - Batch plotting with CSV and text reports
//!
//! # Example
//!
//! ```no_run
//! use mdvrp_plot::config::PlotConfig;
//! use mdvrp_plot::instance::MdvrpInstance;
//! use mdvrp_plot::solution::MdvrpSolution;
//! use mdvrp_plot::visualization::Visualizer;
//!
//! let config = PlotConfig::default();
//! let instance = MdvrpInstance::from_file(config.instance_path("p01")).unwrap();
//! let solution = MdvrpSolution::from_file(config.solution_path("p01")).unwrap();
//!
//! let svg = Visualizer::new().generate_svg(&instance, &solution).unwrap();
//! println!("{} routes, cost {:.2}", solution.routes.len(), solution.cost);
//! # let _ = svg;
//! ```

pub mod analysis;
pub mod batch;
pub mod config;
pub mod error;
pub mod instance;
pub mod solution;
pub mod visualization;

pub use config::PlotConfig;
pub use error::MdvrpError;
pub use instance::MdvrpInstance;
pub use solution::MdvrpSolution;
