//! Geometry and summaries of a solution over its instance.
//!
//! Every lookup goes through [`MdvrpInstance::customer`] and [`MdvrpInstance::depot`],
//! so a route pointing at an unknown id surfaces as a referential error here.

use crate::error::Result;
use crate::instance::MdvrpInstance;
use crate::solution::{MdvrpSolution, Route};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Points of the closed path `depot -> customers... -> depot`.
/// Empty when the route visits no customer.
pub fn route_points(instance: &MdvrpInstance, route: &Route) -> Result<Vec<(f64, f64)>> {
    let depot = instance.depot(route.depot)?.position();
    if route.customers.is_empty() {
        return Ok(Vec::new());
    }

    let mut points = Vec::with_capacity(route.customers.len() + 2);
    points.push(depot);
    for &id in &route.customers {
        points.push(instance.customer(id)?.position());
    }
    points.push(depot);
    Ok(points)
}

/// Euclidean length of a closed route
pub fn route_length(instance: &MdvrpInstance, route: &Route) -> Result<f64> {
    let points = route_points(instance, route)?;
    Ok(points
        .windows(2)
        .map(|w| {
            let dx = w[1].0 - w[0].0;
            let dy = w[1].1 - w[0].1;
            (dx * dx + dy * dy).sqrt()
        })
        .sum())
}

/// Sum of all route lengths
pub fn solution_length(instance: &MdvrpInstance, solution: &MdvrpSolution) -> Result<f64> {
    solution.routes.iter().map(|r| route_length(instance, r)).sum()
}

/// Summary of a solution checked against its instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub instance: String,
    pub reported_cost: f64,
    /// Length recomputed from coordinates
    pub computed_length: f64,
    pub num_routes: usize,
    pub customer_visits: usize,
    pub distinct_customers: usize,
    /// Customers of the instance no route visits
    pub unserved: Vec<u32>,
    /// Index and length of the longest route
    pub longest_route: Option<(usize, f64)>,
    pub routes_per_depot: BTreeMap<u32, usize>,
}

impl SolutionSummary {
    pub fn new(instance: &MdvrpInstance, solution: &MdvrpSolution) -> Result<Self> {
        let lengths = solution
            .routes
            .iter()
            .map(|r| route_length(instance, r))
            .collect::<Result<Vec<f64>>>()?;

        let served = solution.served_customers();
        let unserved = instance
            .customers
            .keys()
            .filter(|id| !served.contains(*id))
            .copied()
            .collect();

        let longest_route = lengths
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|&(_, length)| OrderedFloat(length));

        let routes_per_depot = solution
            .routes_by_depot()
            .into_iter()
            .map(|(depot, routes)| (depot, routes.len()))
            .collect();

        Ok(SolutionSummary {
            instance: instance.name.clone(),
            reported_cost: solution.cost,
            computed_length: lengths.iter().sum(),
            num_routes: solution.routes.len(),
            customer_visits: solution.customer_visits(),
            distinct_customers: served.len(),
            unserved,
            longest_route,
            routes_per_depot,
        })
    }

    /// Relative gap between the reported cost and the recomputed length, in percent
    pub fn gap_percent(&self) -> Option<f64> {
        if self.computed_length > 0.0 {
            Some((self.reported_cost - self.computed_length) / self.computed_length * 100.0)
        } else {
            None
        }
    }
}

impl std::fmt::Display for SolutionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution for {}", self.instance)?;
        writeln!(f, "  Reported cost: {:.2}", self.reported_cost)?;
        writeln!(f, "  Computed length: {:.2}", self.computed_length)?;
        if let Some(gap) = self.gap_percent() {
            writeln!(f, "  Gap: {:.4}%", gap)?;
        }
        writeln!(f, "  Routes: {}", self.num_routes)?;
        writeln!(
            f,
            "  Customers: {} visits, {} distinct",
            self.customer_visits, self.distinct_customers
        )?;
        if !self.unserved.is_empty() {
            writeln!(f, "  Unserved: {:?}", self.unserved)?;
        }
        if let Some((index, length)) = self.longest_route {
            writeln!(f, "  Longest route: #{} ({:.2})", index + 1, length)?;
        }
        for (depot, count) in &self.routes_per_depot {
            writeln!(f, "  Depot {}: {} routes", depot, count)?;
        }
        Ok(())
    }
}
