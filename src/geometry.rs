/*!
# Point Distributor

Scatters a 2-D point cloud in a branching, cluster-y layout: a regular seed polygon
followed by an outward spiral whose angle nudges toward nearby points. Component A of
the generation pipeline — see `triangulate` for the next stage.
*/

use rand::Rng;
use std::f64::consts::PI;

use crate::error::GendagError;

/// A point in the plane, identified by its position in the sequence that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    fn from_polar(r: f64, theta: f64) -> Self {
        Point { x: r * theta.cos(), y: r * theta.sin() }
    }

    fn to_polar(self) -> (f64, f64) {
        let r = (self.x * self.x + self.y * self.y).sqrt();
        let theta = self.y.atan2(self.x);
        (r, theta)
    }

    fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Parameters governing the point distributor.
#[derive(Debug, Clone, Copy)]
pub struct GeometryParams {
    pub n_points: usize,
    pub n_seeds: usize,
    pub r0: f64,
    pub delta: f64,
    pub spread: f64,
    pub lumpage: usize,
}

fn turns_to_radians(turns: f64) -> f64 {
    turns * 2.0 * PI
}

fn normalize_angle(mut angle: f64) -> f64 {
    let two_pi = 2.0 * PI;
    while angle > PI {
        angle -= two_pi;
    }
    while angle <= -PI {
        angle += two_pi;
    }
    angle
}

/// Shortest signed difference between two angles, folded into `(-pi/2, pi/2]`.
fn short_diff(a: f64, b: f64) -> f64 {
    let mut raw = normalize_angle(a - b);
    if raw < -PI / 2.0 {
        raw += PI;
    }
    if raw > PI / 2.0 {
        raw -= PI;
    }
    raw
}

/// Arranges the vertices of a regular `n`-gon of radius `r`, centered on the origin.
fn seed_ring(r: f64, n: usize) -> Vec<Point> {
    (0..n)
        .map(|k| {
            let theta = turns_to_radians(k as f64 / n as f64);
            Point::from_polar(r, theta)
        })
        .collect()
}

/// Finds the up-to-`k` nearest neighbors of `point` among `plotted`, by Euclidean distance.
fn nearest_neighbors(plotted: &[Point], k: usize, point: Point) -> Vec<Point> {
    let mut with_dist: Vec<(f64, Point)> =
        plotted.iter().map(|&p| (point.distance(p), p)).collect();
    with_dist.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    with_dist.truncate(k);
    with_dist.into_iter().map(|(_, p)| p).collect()
}

/// Nudges a candidate polar point's angle toward its nearest neighbors' angles.
fn lumpy_theta(plotted: &[Point], lumpage: usize, r: f64, theta: f64) -> f64 {
    let candidate = Point::from_polar(r, theta);
    let neighbors = nearest_neighbors(plotted, lumpage, candidate);
    let denom = (1 + neighbors.len()) as f64;

    let mut running = normalize_angle(theta);
    for neighbor in neighbors {
        let (_, neighbor_theta) = neighbor.to_polar();
        running += short_diff(neighbor_theta, running) / denom;
    }
    running
}

/// Produces an ordered point cloud of length `params.n_points`: a seed polygon followed
/// by an outward spiral tail that clusters toward already-placed points.
pub fn spiral_point_distribution(
    params: GeometryParams,
    rng: &mut impl Rng,
) -> Result<Vec<Point>, GendagError> {
    if params.n_points < params.n_seeds {
        return Err(GendagError::geometry(format!(
            "nPoints ({}) cannot be less than nSeeds ({})",
            params.n_points, params.n_seeds
        )));
    }
    if params.n_points == params.n_seeds {
        tracing::warn!(
            n_points = params.n_points,
            "nPoints == nSeeds degenerates to plain seed placement with no spiral tail"
        );
    }

    let mut points = seed_ring(params.r0, params.n_seeds);
    let mut last_theta = 0.0_f64;
    let mut last_r = params.r0;

    while points.len() < params.n_points {
        last_r += params.delta;
        let u = rng.random_range(0.0..params.spread);
        last_theta = normalize_angle(last_theta + turns_to_radians(u));
        if params.lumpage > 0 {
            last_theta = lumpy_theta(&points, params.lumpage, last_r, last_theta);
        }
        points.push(Point::from_polar(last_r, last_theta));
    }

    Ok(points)
}
