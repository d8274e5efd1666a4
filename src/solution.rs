//! Solution representation for MDVRP `.res` files.
//!
//! The first line holds the total cost. Every following line describes one vehicle:
//! `<depot> <vehicle> <served> <duration> <load> <customer>... <sentinel>`.

use crate::error::{MdvrpError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Minimum number of tokens on a route line: depot, four metadata fields, sentinel.
const MIN_ROUTE_TOKENS: usize = 6;
const FIRST_CUSTOMER_TOKEN: usize = 5;

/// One vehicle route, implicitly starting and ending at its depot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Depot id in the local `1..=D` space
    pub depot: u32,
    /// Visiting order
    pub customers: Vec<u32>,
    /// Vehicle index within the depot
    pub vehicle: Option<u32>,
    /// Route duration as reported by the solver
    pub duration: Option<f64>,
    /// Route load as reported by the solver
    pub load: Option<f64>,
}

impl Route {
    pub fn new(depot: u32, customers: Vec<u32>) -> Self {
        Route { depot, customers, vehicle: None, duration: None, load: None }
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    fn parse_line(line: &str, line_no: usize) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < MIN_ROUTE_TOKENS {
            return Err(MdvrpError::format(
                Some(line_no),
                format!(
                    "route line needs at least {} fields, found {}",
                    MIN_ROUTE_TOKENS,
                    tokens.len()
                ),
            ));
        }

        let depot: u32 = tokens[0].parse().map_err(|_| {
            MdvrpError::format(Some(line_no), format!("invalid depot id '{}'", tokens[0]))
        })?;
        let customers = tokens[FIRST_CUSTOMER_TOKEN..tokens.len() - 1]
            .iter()
            .map(|t| {
                t.parse().map_err(|_| {
                    MdvrpError::format(Some(line_no), format!("invalid customer id '{}'", t))
                })
            })
            .collect::<Result<Vec<u32>>>()?;

        Ok(Route {
            depot,
            customers,
            vehicle: tokens[1].parse().ok(),
            duration: tokens[3].parse().ok(),
            load: tokens[4].parse().ok(),
        })
    }

    /// Format the route as a `.res` line. Unknown metadata is written as 0.
    pub fn to_res_line(&self) -> String {
        let mut fields = vec![
            self.depot.to_string(),
            self.vehicle.unwrap_or(0).to_string(),
            self.customers.len().to_string(),
            format!("{}", self.duration.unwrap_or(0.0)),
            format!("{}", self.load.unwrap_or(0.0)),
        ];
        fields.extend(self.customers.iter().map(|c| c.to_string()));
        fields.push("0".to_string());
        fields.join(" ")
    }
}

/// Represents a solution to an MDVRP instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MdvrpSolution {
    /// Total cost reported on the first line
    pub cost: f64,
    /// Routes in file order
    pub routes: Vec<Route>,
}

impl MdvrpSolution {
    pub fn new(cost: f64, routes: Vec<Route>) -> Self {
        MdvrpSolution { cost, routes }
    }

    /// Parse a `.res` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| MdvrpError::io(path, e))?;
        let solution = Self::parse(&content).map_err(|e| e.with_path(path))?;
        log::info!(
            "Loaded solution {} ({} routes, cost {:.2})",
            path.display(),
            solution.routes.len(),
            solution.cost
        );
        Ok(solution)
    }

    /// Parse `.res` text. Blank lines are skipped.
    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = content.lines().enumerate();

        let cost_line = lines
            .next()
            .map(|(_, l)| l.trim())
            .ok_or_else(|| MdvrpError::format(Some(1), "missing cost line"))?;
        let cost: f64 = cost_line
            .parse()
            .map_err(|_| MdvrpError::format(Some(1), format!("invalid cost '{}'", cost_line)))?;
        if !cost.is_finite() || cost < 0.0 {
            return Err(MdvrpError::format(
                Some(1),
                format!("cost must be a non-negative number, got {}", cost),
            ));
        }

        let routes = lines
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| Route::parse_line(line, i + 1))
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Parsed solution with {} routes", routes.len());
        Ok(MdvrpSolution { cost, routes })
    }

    /// Format the solution in the `.res` layout. Floats use the shortest exact form.
    pub fn to_res_string(&self) -> String {
        let mut out = format!("{}\n", self.cost);
        for route in &self.routes {
            out.push_str(&route.to_res_line());
            out.push('\n');
        }
        out
    }

    /// Write the solution in the `.res` layout
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_res_string()).map_err(|e| MdvrpError::io(path, e))
    }

    /// Total number of customer visits over all routes
    pub fn customer_visits(&self) -> usize {
        self.routes.iter().map(|r| r.customers.len()).sum()
    }

    /// Distinct customers visited by at least one route
    pub fn served_customers(&self) -> BTreeSet<u32> {
        self.routes
            .iter()
            .flat_map(|r| r.customers.iter().copied())
            .collect()
    }

    /// Routes grouped by depot, in file order within each depot
    pub fn routes_by_depot(&self) -> BTreeMap<u32, Vec<&Route>> {
        let mut grouped: BTreeMap<u32, Vec<&Route>> = BTreeMap::new();
        for route in &self.routes {
            grouped.entry(route.depot).or_default().push(route);
        }
        grouped
    }
}

impl std::fmt::Display for MdvrpSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution")?;
        writeln!(f, "  Cost: {:.2}", self.cost)?;
        writeln!(f, "  Routes: {}", self.routes.len())?;
        for route in &self.routes {
            writeln!(f, "  Depot {}: {:?}", route.depot, route.customers)?;
        }
        Ok(())
    }
}
