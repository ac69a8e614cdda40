//! Criterion benchmarks for parsing and graph analysis
//!
//! Covers the per-dataset hot path:
//! - Edge-list and Matrix Market parsing
//! - Properties (degrees, density, connectivity)
//! - Components and LCC extraction

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fmt::Write as _;
use std::hint::black_box;

use graphprep::parse::{parse_edge_list, parse_matrix_market};
use graphprep::{bfs, components, extract_lcc, Graph, GraphProperties, NodeId};

/// Generate a sparse random graph as `(u, v)` pairs (LCG for reproducibility)
fn generate_random_edges(num_nodes: usize, edges_per_node: usize) -> Vec<(u32, u32)> {
    let mut edges = Vec::new();
    let mut rng_state = 12345_u64;

    for node in 0..num_nodes {
        for _ in 0..edges_per_node {
            rng_state = rng_state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            let target = (rng_state % num_nodes as u64) as u32;

            if target != node as u32 {
                edges.push((node as u32, target));
            }
        }
    }

    edges
}

fn edge_list_text(edges: &[(u32, u32)]) -> String {
    let mut text = String::from("% benchmark graph\n");
    for (u, v) in edges {
        writeln!(text, "{u},{v},1.0").unwrap();
    }
    text
}

fn matrix_market_text(num_nodes: usize, edges: &[(u32, u32)]) -> String {
    let mut text = String::from("%%MatrixMarket matrix coordinate real general\n");
    writeln!(text, "{num_nodes} {num_nodes} {}", edges.len()).unwrap();
    for (u, v) in edges {
        writeln!(text, "{} {} 1.0", u + 1, v + 1).unwrap();
    }
    text
}

fn build(edges: &[(u32, u32)]) -> Graph {
    let mut graph = Graph::new();
    for (u, v) in edges {
        graph.add_edge(&u.to_string(), &v.to_string());
    }
    graph
}

/// Benchmark: parsing both raw formats
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [1000, 10_000, 50_000].iter() {
        let edges = generate_random_edges(*size, 4);
        let edge_text = edge_list_text(&edges);
        let mtx_text = matrix_market_text(*size, &edges);

        group.bench_with_input(BenchmarkId::new("edge_list", size), &edge_text, |b, text| {
            b.iter(|| {
                let graph = parse_edge_list(black_box(text).lines()).unwrap();
                black_box(graph);
            });
        });

        group.bench_with_input(BenchmarkId::new("matrix_market", size), &mtx_text, |b, text| {
            b.iter(|| {
                let graph = parse_matrix_market(black_box(text)).unwrap();
                black_box(graph);
            });
        });
    }

    group.finish();
}

/// Benchmark: properties computation
fn bench_properties(c: &mut Criterion) {
    let mut group = c.benchmark_group("properties");

    for size in [1000, 10_000, 50_000].iter() {
        let graph = build(&generate_random_edges(*size, 4));

        group.bench_with_input(BenchmarkId::new("compute", size), &graph, |b, graph| {
            b.iter(|| black_box(GraphProperties::compute(black_box(graph))));
        });
    }

    group.finish();
}

/// Benchmark: traversal, components and LCC extraction
fn bench_components(c: &mut Criterion) {
    let mut group = c.benchmark_group("components");

    for size in [1000, 10_000, 50_000].iter() {
        // one edge per node leaves many small components
        let graph = build(&generate_random_edges(*size, 1));

        group.bench_with_input(BenchmarkId::new("bfs", size), &graph, |b, graph| {
            b.iter(|| black_box(bfs(black_box(graph), NodeId(0)).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("components", size), &graph, |b, graph| {
            b.iter(|| black_box(components(black_box(graph))));
        });

        group.bench_with_input(BenchmarkId::new("extract_lcc", size), &graph, |b, graph| {
            b.iter(|| black_box(extract_lcc(black_box(graph)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_properties, bench_components);
criterion_main!(benches);
