//! Metric-to-visual-channel mapping for edges.
//!
//! The selected [`ViewMode`] decides which edge metric drives color, width
//! and label:
//!
//! - **wns / tns**: negative values are violations and are interpolated
//!   across the domain: the worse the slack, the redder and thicker the line.
//!   Values `>= 0` skip interpolation and get the fixed good color at minimum
//!   thickness.
//! - **connections**: one continuous interpolation over the whole domain;
//!   higher counts are worse. There is no good/bad cutoff.
//!
//! A domain is given as `[worst, best]`. Values outside it clamp to the
//! nearest endpoint; nothing is extrapolated. Color and width use separate
//! domains so they can be tuned independently.

use crate::pipeline::Stats;
use crate::style::color::Rgb;
use crate::types::{Edge, ViewMode};
use serde::{Deserialize, Serialize};

/// Default font size for node labels (px)
pub const DEFAULT_NODE_FONT_SIZE: f64 = 12.0;

/// Default font size for edge labels (px)
pub const DEFAULT_EDGE_FONT_SIZE: f64 = 10.0;

/// Default thinnest edge (px)
pub const DEFAULT_THICKNESS_MIN: f64 = 1.0;

/// Default thickest edge (px)
pub const DEFAULT_THICKNESS_MAX: f64 = 5.0;

/// Default worst-case slack used before any data is loaded (ns)
pub const DEFAULT_WORST_SLACK: f64 = -10.0;

/// Two-point value domain, worst end first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    /// Value mapped to the most intense color / thickest line
    pub worst: f64,
    /// Value mapped to the mildest color / thinnest line
    pub best: f64,
}

impl Domain {
    pub fn new(worst: f64, best: f64) -> Self {
        Self { worst, best }
    }

    /// Position of `value` in the domain: 0 at `best`, 1 at `worst`, clamped.
    ///
    /// `higher_is_worse` only matters when both endpoints coincide: values
    /// strictly past the endpoint on the worse side sit at 1, all others at 0.
    pub fn position(&self, value: f64, higher_is_worse: bool) -> f64 {
        let span = self.worst - self.best;
        if span == 0.0 || !span.is_finite() {
            let worse = if higher_is_worse {
                value > self.worst
            } else {
                value < self.worst
            };
            return if worse { 1.0 } else { 0.0 };
        }
        let t = (value - self.best) / span;
        if t.is_nan() {
            0.0
        } else {
            t.clamp(0.0, 1.0)
        }
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::new(DEFAULT_WORST_SLACK, 0.0)
    }
}

/// Visual mapping options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Metric driving the edge channels
    #[serde(default)]
    pub view_mode: ViewMode,

    /// Domain for the color gradient
    #[serde(default)]
    pub gradient_domain: Domain,

    /// Domain for the line width
    #[serde(default)]
    pub width_domain: Domain,

    /// Color at the worst end of the gradient
    #[serde(default = "default_worst_color")]
    pub worst_color: Rgb,

    /// Color at the best end of the gradient
    #[serde(default = "default_best_color")]
    pub best_color: Rgb,

    /// Color for non-violating slack
    #[serde(default = "default_good_color")]
    pub good_color: Rgb,

    /// Thinnest line (px)
    #[serde(default = "default_thickness_min")]
    pub thickness_min: f64,

    /// Thickest line (px)
    #[serde(default = "default_thickness_max")]
    pub thickness_max: f64,

    /// Node label size (px), compound nodes get 2px more
    #[serde(default = "default_node_font_size")]
    pub node_font_size: f64,

    /// Edge label size (px)
    #[serde(default = "default_edge_font_size")]
    pub edge_font_size: f64,
}

fn default_worst_color() -> Rgb {
    Rgb::WORST
}

fn default_best_color() -> Rgb {
    Rgb::BEST
}

fn default_good_color() -> Rgb {
    Rgb::GOOD
}

fn default_thickness_min() -> f64 {
    DEFAULT_THICKNESS_MIN
}

fn default_thickness_max() -> f64 {
    DEFAULT_THICKNESS_MAX
}

fn default_node_font_size() -> f64 {
    DEFAULT_NODE_FONT_SIZE
}

fn default_edge_font_size() -> f64 {
    DEFAULT_EDGE_FONT_SIZE
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::default(),
            gradient_domain: Domain::default(),
            width_domain: Domain::default(),
            worst_color: Rgb::WORST,
            best_color: Rgb::BEST,
            good_color: Rgb::GOOD,
            thickness_min: DEFAULT_THICKNESS_MIN,
            thickness_max: DEFAULT_THICKNESS_MAX,
            node_font_size: DEFAULT_NODE_FONT_SIZE,
            edge_font_size: DEFAULT_EDGE_FONT_SIZE,
        }
    }
}

impl MappingConfig {
    pub fn new(view_mode: ViewMode) -> Self {
        Self {
            view_mode,
            ..Default::default()
        }
    }

    /// Set gradient and width domain to the same `[worst, best]`.
    pub fn with_domain(mut self, worst: f64, best: f64) -> Self {
        self.gradient_domain = Domain::new(worst, best);
        self.width_domain = Domain::new(worst, best);
        self
    }

    pub fn with_thickness(mut self, min: f64, max: f64) -> Self {
        self.thickness_min = min;
        self.thickness_max = max;
        self
    }

    pub fn with_colors(mut self, worst: Rgb, best: Rgb) -> Self {
        self.worst_color = worst;
        self.best_color = best;
        self
    }

    /// Default domain for the current view mode, taken from filtered stats.
    pub fn auto_domain(view_mode: ViewMode, stats: &Stats) -> Domain {
        match view_mode {
            ViewMode::Wns => Domain::new(stats.min_wns, 0.0),
            ViewMode::Tns => Domain::new(stats.min_tns, 0.0),
            ViewMode::Connections => Domain::new(stats.max_connections as f64, 0.0),
        }
    }

    /// Reset both domains to the defaults for the current view mode.
    pub fn apply_auto_domain(&mut self, stats: &Stats) {
        let domain = Self::auto_domain(self.view_mode, stats);
        self.gradient_domain = domain;
        self.width_domain = domain;
    }

    /// Switch view mode and re-derive the domains from `stats`.
    pub fn set_view_mode(&mut self, view_mode: ViewMode, stats: &Stats) {
        self.view_mode = view_mode;
        self.apply_auto_domain(stats);
    }

    /// Font size for nodes that contain other nodes
    pub fn compound_font_size(&self) -> f64 {
        self.node_font_size + 2.0
    }
}

/// How an edge was classified for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeClass {
    /// Negative slack, interpolated
    Violation,
    /// Non-negative slack, fixed style
    Good,
    /// Connection count, interpolated
    Scaled,
}

/// Visual channels for one edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    /// Line and arrow color
    pub color: Rgb,
    /// Line width (px)
    pub width: f64,
    /// Label text color
    pub label_color: Rgb,
    /// Raw value of the selected metric
    pub value: f64,
    /// Label text (the raw value)
    pub label: String,
    pub class: EdgeClass,
}

/// Applies a [`MappingConfig`] to edges.
#[derive(Debug, Clone, Copy)]
pub struct VisualMapper {
    config: MappingConfig,
}

impl VisualMapper {
    pub fn new(config: MappingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Channels for `edge` under the configured view mode.
    pub fn map_edge(&self, edge: &Edge) -> EdgeStyle {
        self.map_value(edge.metric(self.config.view_mode))
    }

    /// Channels for every edge, in order.
    pub fn map_edges(&self, edges: &[Edge]) -> Vec<EdgeStyle> {
        edges.iter().map(|e| self.map_edge(e)).collect()
    }

    /// Channels for a raw metric value under the configured view mode.
    pub fn map_value(&self, value: f64) -> EdgeStyle {
        let c = &self.config;
        let label = display_value(value);

        if c.view_mode.is_slack() && value >= 0.0 {
            return EdgeStyle {
                color: c.good_color,
                width: c.thickness_min,
                label_color: c.good_color,
                value,
                label,
                class: EdgeClass::Good,
            };
        }

        let higher_is_worse = !c.view_mode.is_slack();
        let color_t = c.gradient_domain.position(value, higher_is_worse);
        let width_t = c.width_domain.position(value, higher_is_worse);

        let (label_color, class) = if c.view_mode.is_slack() {
            (Rgb::VIOLATION_TEXT, EdgeClass::Violation)
        } else {
            (Rgb::NEUTRAL_TEXT, EdgeClass::Scaled)
        };

        EdgeStyle {
            color: Rgb::lerp(c.best_color, c.worst_color, color_t),
            width: c.thickness_min + (c.thickness_max - c.thickness_min) * width_t,
            label_color,
            value,
            label,
            class,
        }
    }
}

/// Label text for a metric value: the raw number.
pub fn display_value(value: f64) -> String {
    format!("{}", value)
}
