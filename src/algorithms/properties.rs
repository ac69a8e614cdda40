//! Summary properties of a graph and their `properties.yaml` rendering
//!
//! ```text
//! order: 4
//! size: 3
//! max_degree: 3
//! avg_degree: 1.5
//! density: 0.5
//! connected: yes
//! ```

use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::Deserialize;

use crate::algorithms::structure::is_connected;
use crate::storage::Graph;

/// Order, size, degree statistics, density and connectivity of a graph
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GraphProperties {
    /// Number of nodes
    pub order: usize,
    /// Number of edges
    pub size: usize,
    /// Largest node degree (0 for the empty graph)
    pub max_degree: usize,
    /// Total degree / order (0.0 for the empty graph)
    pub avg_degree: f64,
    /// `2 * size / (order * (order - 1))` (0.0 when order <= 1)
    pub density: f64,
    /// True if one traversal reaches every node (false for the empty graph)
    #[serde(deserialize_with = "yes_no")]
    pub connected: bool,
}

impl GraphProperties {
    /// Compute the properties of `graph`
    ///
    /// # Example
    ///
    /// ```
    /// use graphprep::{Graph, GraphProperties};
    ///
    /// let mut graph = Graph::new();
    /// graph.add_edge("0", "1");
    /// graph.add_edge("1", "2");
    ///
    /// let props = GraphProperties::compute(&graph);
    /// assert_eq!(props.order, 3);
    /// assert_eq!(props.max_degree, 2);
    /// assert!((props.density - 2.0 / 3.0).abs() < 1e-12);
    /// assert!(props.connected);
    /// ```
    #[must_use]
    pub fn compute(graph: &Graph) -> Self {
        let order = graph.num_nodes();
        let size = graph.num_edges();
        let max_degree = graph.degrees().max().unwrap_or(0);
        let total_degree: usize = graph.degrees().sum();

        let avg_degree = if order == 0 {
            0.0
        } else {
            ratio(total_degree as u128, order as u128)
        };
        let density = if order > 1 {
            let order = order as u128;
            ratio(2 * size as u128, order * (order - 1))
        } else {
            0.0
        };

        Self {
            order,
            size,
            max_degree,
            avg_degree,
            density,
            connected: is_connected(graph),
        }
    }

    /// Render as `properties.yaml` text
    ///
    /// Keys appear in fixed order; floats always carry a fractional part and
    /// never use exponent notation.
    #[must_use]
    pub fn to_yaml(&self) -> String {
        format!(
            "order: {}\nsize: {}\nmax_degree: {}\navg_degree: {}\ndensity: {}\nconnected: {}\n",
            self.order,
            self.size,
            self.max_degree,
            format_float(self.avg_degree),
            format_float(self.density),
            if self.connected { "yes" } else { "no" },
        )
    }

    /// Parse `properties.yaml` text
    ///
    /// `connected` may be written as `yes`/`no` or `true`/`false`.
    ///
    /// # Errors
    ///
    /// Returns the YAML error for missing keys or mistyped values
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: u128, denominator: u128) -> f64 {
    numerator as f64 / denominator as f64
}

/// Shortest round-trip decimal, with `.0` appended to whole numbers
fn format_float(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}

fn yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct YesNo;

    impl Visitor<'_> for YesNo {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("yes, no, true or false")
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
            Ok(value)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<bool, E> {
            match value.to_ascii_lowercase().as_str() {
                "yes" | "true" => Ok(true),
                "no" | "false" => Ok(false),
                _ => Err(E::invalid_value(Unexpected::Str(value), &self)),
            }
        }
    }

    deserializer.deserialize_any(YesNo)
}
