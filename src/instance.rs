//! Module for parsing and representing MDVRP instances.
//!
//! Instances use the Cordeau text layout: a header line, one limits line per depot,
//! one line per customer and finally one coordinate line per depot. Depot ids in the
//! file follow the customer ids and are renumbered into a local `1..=D` space.

use crate::error::{EntityKind, MdvrpError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// A customer location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer identifier, as written in the file
    pub id: u32,
    pub x: i32,
    pub y: i32,
    /// Service duration (4th column), when present and numeric
    pub service_duration: Option<i32>,
    /// Demand (5th column), when present and numeric
    pub demand: Option<i32>,
}

impl Customer {
    pub fn new(id: u32, x: i32, y: i32) -> Self {
        Customer { id, x, y, service_duration: None, demand: None }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }
}

/// A depot location, keyed in the local depot space (1-based)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Depot {
    pub id: u32,
    pub x: i32,
    pub y: i32,
}

impl Depot {
    pub fn new(id: u32, x: i32, y: i32) -> Self {
        Depot { id, x, y }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }
}

/// Per-depot vehicle limits from the block following the header.
/// A limit of 0 conventionally means "unbounded".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepotLimits {
    pub max_duration: Option<f64>,
    pub max_load: Option<f64>,
}

/// Represents a complete MDVRP instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MdvrpInstance {
    /// Name of the instance (file name)
    pub name: String,
    /// First header field, vehicles available per depot. Not needed for plotting.
    pub max_vehicles: Option<u32>,
    pub num_customers: usize,
    pub num_depots: usize,
    /// One entry per depot, in file order
    pub depot_limits: Vec<DepotLimits>,
    pub customers: BTreeMap<u32, Customer>,
    /// Depots keyed by local id (`raw id - num_customers`)
    pub depots: BTreeMap<u32, Depot>,
}

/// Parse token `index` of a data line, reporting a format error on failure.
fn field<T: FromStr>(tokens: &[&str], index: usize, line_no: usize, what: &str) -> Result<T> {
    let token = tokens.get(index).ok_or_else(|| {
        MdvrpError::format(Some(line_no), format!("missing {} (column {})", what, index + 1))
    })?;
    token
        .parse()
        .map_err(|_| MdvrpError::format(Some(line_no), format!("invalid {} '{}'", what, token)))
}

/// Parse token `index` if present and well-formed.
fn optional_field<T: FromStr>(tokens: &[&str], index: usize) -> Option<T> {
    tokens.get(index).and_then(|t| t.parse().ok())
}

/// Split a coordinate line into `(id, x, y)` plus the full token list.
fn coordinate_line<'a>(line: &'a str, line_no: usize) -> Result<(u32, i32, i32, Vec<&'a str>)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(MdvrpError::format(
            Some(line_no),
            format!("expected at least 3 fields (id x y), found {}", tokens.len()),
        ));
    }
    let id = field(&tokens, 0, line_no, "id")?;
    let x = field(&tokens, 1, line_no, "x coordinate")?;
    let y = field(&tokens, 2, line_no, "y coordinate")?;
    Ok((id, x, y, tokens))
}

impl MdvrpInstance {
    /// Parse an instance file. The instance is named after the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| MdvrpError::io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let instance = Self::parse(&name, &content).map_err(|e| e.with_path(path))?;
        log::info!(
            "Loaded instance {} ({} customers, {} depots)",
            instance.name,
            instance.num_customers,
            instance.num_depots
        );
        Ok(instance)
    }

    /// Parse instance text. Header counts are checked against the actual layout.
    pub fn parse(name: &str, content: &str) -> Result<Self> {
        let mut lines: Vec<&str> = content.lines().collect();
        while lines.last().map_or(false, |l| l.trim().is_empty()) {
            lines.pop();
        }

        let header = lines
            .first()
            .ok_or_else(|| MdvrpError::format(Some(1), "empty instance file"))?;
        let header_tokens: Vec<&str> = header.split_whitespace().collect();
        if header_tokens.len() < 3 {
            return Err(MdvrpError::format(
                Some(1),
                "header must contain <vehicles> <customers> <depots>",
            ));
        }
        let max_vehicles = optional_field(&header_tokens, 0);
        let num_customers = field::<u32>(&header_tokens, 1, 1, "customer count")? as usize;
        let num_depots = field::<u32>(&header_tokens, 2, 1, "depot count")? as usize;

        let expected = 1 + 2 * num_depots + num_customers;
        if lines.len() < expected {
            return Err(MdvrpError::format(
                None,
                format!(
                    "header announces {} customers and {} depots ({} lines) but the file has {} lines",
                    num_customers,
                    num_depots,
                    expected,
                    lines.len()
                ),
            ));
        }
        if lines.len() > expected {
            return Err(MdvrpError::format(
                Some(expected + 1),
                format!("unexpected content after the {} announced lines", expected),
            ));
        }

        let customer_start = 1 + num_depots;
        let depot_start = customer_start + num_customers;

        let depot_limits = lines[1..customer_start]
            .iter()
            .map(|line| {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                DepotLimits {
                    max_duration: optional_field(&tokens, 0),
                    max_load: optional_field(&tokens, 1),
                }
            })
            .collect();

        let mut customers = BTreeMap::new();
        for (offset, line) in lines[customer_start..depot_start].iter().enumerate() {
            let line_no = customer_start + offset + 1;
            let (id, x, y, tokens) = coordinate_line(line, line_no)?;
            if id < 1 || id as usize > num_customers {
                return Err(MdvrpError::format(
                    Some(line_no),
                    format!("customer id {} outside [1, {}]", id, num_customers),
                ));
            }
            let customer = Customer {
                id,
                x,
                y,
                service_duration: optional_field(&tokens, 3),
                demand: optional_field(&tokens, 4),
            };
            if customers.insert(id, customer).is_some() {
                return Err(MdvrpError::format(
                    Some(line_no),
                    format!("duplicate customer id {}", id),
                ));
            }
        }

        let mut depots = BTreeMap::new();
        let first_depot_id = num_customers as u64 + 1;
        let last_depot_id = (num_customers + num_depots) as u64;
        for (offset, line) in lines[depot_start..].iter().enumerate() {
            let line_no = depot_start + offset + 1;
            let (raw_id, x, y, _) = coordinate_line(line, line_no)?;
            if (raw_id as u64) < first_depot_id || (raw_id as u64) > last_depot_id {
                return Err(MdvrpError::format(
                    Some(line_no),
                    format!(
                        "depot id {} outside [{}, {}]",
                        raw_id, first_depot_id, last_depot_id
                    ),
                ));
            }
            let id = raw_id - num_customers as u32;
            if depots.insert(id, Depot::new(id, x, y)).is_some() {
                return Err(MdvrpError::format(
                    Some(line_no),
                    format!("duplicate depot id {}", raw_id),
                ));
            }
        }

        log::debug!(
            "Parsed {}: {} customers, {} depots",
            name,
            customers.len(),
            depots.len()
        );

        Ok(MdvrpInstance {
            name: name.to_string(),
            max_vehicles,
            num_customers,
            num_depots,
            depot_limits,
            customers,
            depots,
        })
    }

    /// Look up a customer, failing with a referential error when absent.
    pub fn customer(&self, id: u32) -> Result<&Customer> {
        self.customers
            .get(&id)
            .ok_or(MdvrpError::Referential { kind: EntityKind::Customer, id })
    }

    /// Look up a depot by local id, failing with a referential error when absent.
    pub fn depot(&self, id: u32) -> Result<&Depot> {
        self.depots
            .get(&id)
            .ok_or(MdvrpError::Referential { kind: EntityKind::Depot, id })
    }

    /// Coordinate bounds over customers and depots: `(min_x, max_x, min_y, max_y)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        let points = self
            .customers
            .values()
            .map(Customer::position)
            .chain(self.depots.values().map(Depot::position));
        for (x, y) in points {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        if min_x > max_x {
            return (0.0, 0.0, 0.0, 0.0);
        }
        (min_x, max_x, min_y, max_y)
    }

    /// Sum of customer demands, if every customer carries one
    pub fn total_demand(&self) -> Option<i64> {
        self.customers
            .values()
            .map(|c| c.demand.map(i64::from))
            .sum()
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        InstanceStatistics {
            name: self.name.clone(),
            num_customers: self.customers.len(),
            num_depots: self.depots.len(),
            max_vehicles: self.max_vehicles,
            total_demand: self.total_demand(),
            max_load: self.depot_limits.iter().filter_map(|l| l.max_load).reduce(f64::max),
            bounds: self.bounds(),
        }
    }
}

/// Statistics about an MDVRP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub num_customers: usize,
    pub num_depots: usize,
    pub max_vehicles: Option<u32>,
    pub total_demand: Option<i64>,
    pub max_load: Option<f64>,
    pub bounds: (f64, f64, f64, f64),
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Customers: {}", self.num_customers)?;
        writeln!(f, "  Depots: {}", self.num_depots)?;
        if let Some(vehicles) = self.max_vehicles {
            writeln!(f, "  Vehicles per depot: {}", vehicles)?;
        }
        if let Some(load) = self.max_load {
            writeln!(f, "  Max vehicle load: {}", load)?;
        }
        if let Some(demand) = self.total_demand {
            writeln!(f, "  Total demand: {}", demand)?;
        }
        let (min_x, max_x, min_y, max_y) = self.bounds;
        write!(f, "  Bounds: x [{}, {}], y [{}, {}]", min_x, max_x, min_y, max_y)
    }
}
