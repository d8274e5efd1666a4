//! Visualization utilities for MDVRP solutions.
//!
//! Generates SVG plots of depots, customers and routes, and exports for plotting.

use crate::analysis::route_points;
use crate::error::{MdvrpError, Result};
use crate::instance::MdvrpInstance;
use crate::solution::MdvrpSolution;
use std::fs::File;
use std::io::Write;
use std::path::Path;
#[cfg(not(feature = "resvg"))]
use std::process::Command;
#[cfg(feature = "resvg")]
use resvg::usvg;
#[cfg(feature = "resvg")]
use resvg::render;
#[cfg(feature = "resvg")]
use resvg::FitTo;
#[cfg(feature = "resvg")]
use resvg::tiny_skia::{Pixmap, Transform};
#[cfg(feature = "resvg")]
use resvg::usvg::TreeParsing;

/// SVG visualization generator
pub struct Visualizer {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin
    pub margin: f64,
    /// Customer marker radius
    pub node_radius: f64,
    /// Depot marker half side
    pub depot_size: f64,
    /// Draw customer ids next to markers
    pub show_labels: bool,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            width: 800.0,
            height: 800.0,
            margin: 50.0,
            node_radius: 4.0,
            depot_size: 6.0,
            show_labels: false,
        }
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    /// Generate SVG plot of a solution.
    ///
    /// Fails with a referential error when a route names a depot or customer
    /// missing from the instance.
    pub fn generate_svg(&self, instance: &MdvrpInstance, solution: &MdvrpSolution) -> Result<String> {
        let paths = solution
            .routes
            .iter()
            .map(|route| route_points(instance, route))
            .collect::<Result<Vec<_>>>()?;

        let mut svg = String::new();

        let (min_x, max_x, min_y, max_y) = instance.bounds();

        let scale_x = (self.width - 2.0 * self.margin) / (max_x - min_x).max(1.0);
        let scale_y = (self.height - 2.0 * self.margin) / (max_y - min_y).max(1.0);
        let scale = scale_x.min(scale_y);

        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .customer {{ fill: #1f77b4; }}
    .depot {{ fill: #d62728; }}
    .route {{ stroke: #2ca02c; stroke-width: 1.5; stroke-opacity: 0.8; fill: none; }}
    .label {{ font-family: Arial; font-size: 9px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ffffff"/>
"##,
            self.width, self.height, self.width, self.height
        ));

        svg.push_str(&format!(
            r##"<text x="{}" y="25" class="title">{}: {}</text>
"##,
            self.margin,
            escape_xml(&instance.name),
            solution.cost
        ));

        let transform = |(x, y): (f64, f64)| -> (f64, f64) {
            let tx = self.margin + (x - min_x) * scale;
            let ty = self.height - self.margin - (y - min_y) * scale;
            (tx, ty)
        };

        for points in paths.iter().filter(|p| p.len() > 1) {
            let mut d = String::new();
            for (i, &point) in points.iter().enumerate() {
                let (x, y) = transform(point);
                if i == 0 {
                    d.push_str(&format!("M {:.2} {:.2}", x, y));
                } else {
                    d.push_str(&format!(" L {:.2} {:.2}", x, y));
                }
            }
            svg.push_str(&format!(r##"<path d="{}" class="route"/>
"##, d));
        }

        for customer in instance.customers.values() {
            let (x, y) = transform(customer.position());
            svg.push_str(&format!(
                r##"<circle cx="{:.2}" cy="{:.2}" r="{}" class="customer"/>
"##,
                x, y, self.node_radius
            ));
            if self.show_labels {
                svg.push_str(&format!(
                    r##"<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>
"##,
                    x, y - self.node_radius - 2.0, customer.id
                ));
            }
        }

        for depot in instance.depots.values() {
            let (x, y) = transform(depot.position());
            svg.push_str(&format!(
                r##"<rect x="{:.2}" y="{:.2}" width="{}" height="{}" class="depot"/>
"##,
                x - self.depot_size, y - self.depot_size, 2.0 * self.depot_size, 2.0 * self.depot_size
            ));
        }

        let legend_y = self.height - 30.0;
        svg.push_str(&format!(r##"
<rect x="{}" y="{}" width="12" height="12" class="depot"/>
<text x="{}" y="{}" class="label">Depot</text>
<circle cx="{}" cy="{}" r="6" class="customer"/>
<text x="{}" y="{}" class="label">Customer</text>
"##,
            self.margin, legend_y, self.margin + 20.0, legend_y + 10.0,
            self.margin + 86.0, legend_y + 6.0, self.margin + 100.0, legend_y + 10.0
        ));

        svg.push_str("</svg>");

        Ok(svg)
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path).map_err(|e| MdvrpError::io(path, e))?;
        file.write_all(svg.as_bytes()).map_err(|e| MdvrpError::io(path, e))
    }

    /// Save SVG as PNG.
    /// Uses the native renderer with the `resvg` feature, otherwise tries
    /// `rsvg-convert`, then `magick convert`, then `inkscape`.
    pub fn save_png<P: AsRef<Path>>(&self, svg: &str, path: P) -> Result<()> {
        self.write_png(svg, path.as_ref())
    }

    #[cfg(feature = "resvg")]
    fn write_png(&self, svg: &str, path: &Path) -> Result<()> {
        let other = |message: String| {
            MdvrpError::io(path, std::io::Error::new(std::io::ErrorKind::Other, message))
        };

        let opt = usvg::Options::default();
        let rtree = usvg::Tree::from_str(svg, &opt)
            .map_err(|e| other(format!("usvg parse error: {}", e)))?;
        let mut pixmap = Pixmap::new(self.width as u32, self.height as u32)
            .ok_or_else(|| other("Failed to create pixmap".to_string()))?;
        render(&rtree, FitTo::Original, Transform::default(), pixmap.as_mut())
            .ok_or_else(|| other("resvg render failed".to_string()))?;
        pixmap
            .save_png(path)
            .map_err(|e| other(format!("save_png failed: {}", e)))
    }

    /// Write a temporary svg next to `path` and hand it to external converters.
    #[cfg(not(feature = "resvg"))]
    fn write_png(&self, svg: &str, path: &Path) -> Result<()> {
        let tmp_svg = path.with_extension("svg.tmp");
        self.save_svg(svg, &tmp_svg)?;

        let out = path.to_string_lossy().into_owned();
        let tmp = tmp_svg.to_string_lossy().into_owned();
        let attempts: [(&str, Vec<&str>); 3] = [
            ("rsvg-convert", vec!["-o", out.as_str(), tmp.as_str()]),
            ("magick", vec!["convert", tmp.as_str(), out.as_str()]),
            ("inkscape", vec![tmp.as_str(), "--export-type=png", "--export-filename", out.as_str()]),
        ];

        for (program, args) in &attempts {
            match Command::new(program).args(args).status() {
                Ok(status) if status.success() => {
                    log::debug!("Converted {} with {}", path.display(), program);
                    let _ = std::fs::remove_file(&tmp_svg);
                    return Ok(());
                }
                Ok(status) => log::debug!("{} exited with {}", program, status),
                Err(e) => log::debug!("{} unavailable: {}", program, e),
            }
        }

        let _ = std::fs::remove_file(&tmp_svg);
        Err(MdvrpError::io(
            path,
            std::io::Error::new(
                std::io::ErrorKind::Other,
                "No SVG->PNG converter succeeded (tried rsvg-convert, magick, inkscape)",
            ),
        ))
    }

    /// Export data for external plotting (e.g., matplotlib)
    pub fn export_plot_data(&self, instance: &MdvrpInstance, solution: &MdvrpSolution) -> String {
        let mut data = String::new();

        data.push_str("# MDVRP Solution Data\n");
        data.push_str(&format!("# Instance: {}\n", instance.name));
        data.push_str(&format!("# Cost: {:.2}\n\n", solution.cost));

        data.push_str("# Customers: id, x, y\n");
        for customer in instance.customers.values() {
            data.push_str(&format!("{},{},{}\n", customer.id, customer.x, customer.y));
        }

        data.push_str("\n# Depots: id, x, y\n");
        for depot in instance.depots.values() {
            data.push_str(&format!("{},{},{}\n", depot.id, depot.x, depot.y));
        }

        data.push_str("\n# Routes: depot, customer ids\n");
        for route in &solution.routes {
            let customers: Vec<String> = route.customers.iter().map(|c| c.to_string()).collect();
            data.push_str(&format!("{},{}\n", route.depot, customers.join(",")));
        }

        data
    }
}
