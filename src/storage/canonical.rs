//! Canonical dataset files
//!
//! # Format
//!
//! A canonical dataset directory holds:
//! - `graph.edges`: one `"<u> <v>"` line per edge, `u < v`, sorted
//! - `properties.yaml`: see [`GraphProperties::to_yaml`]
//! - `node_mapping.txt` (LCC variants only): one `"<new_id> <original_id>"` line per node
//!
//! Writers produce byte-identical output for identical graphs.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::algorithms::GraphProperties;
use crate::error::{GraphError, Result};
use crate::storage::{Graph, NodeMapping};

/// Edge list file name
pub const EDGES_FILE: &str = "graph.edges";

/// Properties file name
pub const PROPERTIES_FILE: &str = "properties.yaml";

/// Node mapping file name (LCC variants)
pub const MAPPING_FILE: &str = "node_mapping.txt";

/// Write the edge list of `graph` using its labels
///
/// # Errors
///
/// Returns the writer's I/O error
pub fn write_edges<W: Write>(graph: &Graph, writer: &mut W) -> std::io::Result<()> {
    for (u, v) in graph.edges() {
        let u = graph.label(u).unwrap_or_default();
        let v = graph.label(v).unwrap_or_default();
        writeln!(writer, "{u} {v}")?;
    }
    Ok(())
}

/// Write a node mapping, ascending by new id
///
/// # Errors
///
/// Returns the writer's I/O error
pub fn write_node_mapping<W: Write>(mapping: &NodeMapping, writer: &mut W) -> std::io::Result<()> {
    for (new_id, original) in mapping.iter() {
        writeln!(writer, "{} {original}", new_id.0)?;
    }
    Ok(())
}

/// Write the canonical files for `graph` into an existing directory
///
/// # Errors
///
/// Returns [`GraphError::Io`] if any file cannot be written
pub fn write_canonical(
    dir: &Path,
    graph: &Graph,
    properties: &GraphProperties,
    mapping: Option<&NodeMapping>,
) -> Result<()> {
    write_file(&dir.join(EDGES_FILE), |w| write_edges(graph, w))?;
    write_file(&dir.join(PROPERTIES_FILE), |w| {
        w.write_all(properties.to_yaml().as_bytes())
    })?;
    if let Some(mapping) = mapping {
        write_file(&dir.join(MAPPING_FILE), |w| write_node_mapping(mapping, w))?;
    }
    Ok(())
}

fn write_file<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path).map_err(|e| GraphError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    body(&mut writer).map_err(|e| GraphError::io(path, e))?;
    writer.flush().map_err(|e| GraphError::io(path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| GraphError::io(path, e))?;
    tracing::debug!(path = %path.display(), "wrote canonical file");
    Ok(())
}

/// Read a canonical `graph.edges` file
///
/// Every non-empty line must hold exactly two non-negative integers. Nodes
/// are labeled with the integers' canonical decimal form and numbered in
/// first-seen order. Isolated nodes are not representable in this format.
///
/// # Errors
///
/// Returns [`GraphError::Io`] on read failure, [`GraphError::MalformedEdgeList`]
/// on a line that is not an integer pair
pub fn read_edges(path: &Path) -> Result<Graph> {
    let file = File::open(path).map_err(|e| GraphError::io(path, e))?;
    let mut graph = Graph::new();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| GraphError::io(path, e))?;
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let (Some(u), Some(v), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(GraphError::MalformedEdgeList {
                line: Some(line_no),
                reason: format!("expected `<u> <v>`, found `{line}`"),
            });
        };
        let u = parse_node(u, line_no)?;
        let v = parse_node(v, line_no)?;
        graph.add_edge(&u.to_string(), &v.to_string());
    }

    Ok(graph)
}

fn parse_node(token: &str, line: usize) -> Result<u64> {
    token.parse().map_err(|_| GraphError::MalformedEdgeList {
        line: Some(line),
        reason: format!("node id `{token}` is not a non-negative integer"),
    })
}

/// Read `properties.yaml` from a dataset directory
///
/// # Errors
///
/// Returns [`GraphError::Io`] or [`GraphError::InvalidProperties`]
pub fn read_properties(dir: &Path) -> Result<GraphProperties> {
    let path = dir.join(PROPERTIES_FILE);
    let text = fs::read_to_string(&path).map_err(|e| GraphError::io(&path, e))?;
    GraphProperties::from_yaml(&text).map_err(|e| GraphError::InvalidProperties {
        path,
        reason: e.to_string(),
    })
}
