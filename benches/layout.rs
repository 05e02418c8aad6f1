use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use flowgraph_layout::layout::{DelegateError, DelegateRequest, PlacedNode, compute_layout_with};
use flowgraph_layout::{Edge, LayoutConfig, Node, compute_layout};
use std::hint::black_box;

fn chain_graph(nodes: usize) -> (Vec<Node>, Vec<Edge>) {
    let list = (0..nodes).map(|i| Node::new(format!("N{i}"))).collect();
    let edges = (1..nodes)
        .map(|i| Edge::new(format!("e{i}"), format!("N{}", i - 1), format!("N{i}")))
        .collect();
    (list, edges)
}

/// `components` disjoint pairs followed by `orphans` unconnected nodes.
fn sparse_graph(components: usize, orphans: usize) -> (Vec<Node>, Vec<Edge>) {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for c in 0..components {
        let (a, b) = (format!("C{c}a"), format!("C{c}b"));
        edges.push(Edge::new(format!("e{c}"), a.clone(), b.clone()));
        nodes.push(Node::new(a));
        nodes.push(Node::new(b));
    }
    for o in 0..orphans {
        nodes.push(Node::new(format!("O{o}")));
    }
    (nodes, edges)
}

/// Delegate that answers instantly, so the bench measures the engine itself.
fn diagonal(request: &DelegateRequest) -> Result<Vec<PlacedNode>, DelegateError> {
    Ok(request
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| PlacedNode {
            id: n.id.clone(),
            x: (i % 7) as f32 * 240.0,
            y: i as f32 * 3.5,
            width: n.width,
            height: n.height,
        })
        .collect())
}

fn bench_dagre(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_dagre");
    let config = LayoutConfig::default();
    for (name, (nodes, edges)) in [
        ("chain_50", chain_graph(50)),
        ("sparse_20_20", sparse_graph(20, 20)),
        ("orphans_100", sparse_graph(0, 100)),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &(nodes, edges), |b, input| {
            b.iter(|| {
                let out = compute_layout(black_box(&input.0), &input.1, &config)
                    .expect("layout failed");
                black_box(out.len());
            });
        });
    }
    group.finish();
}

fn bench_engine_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_engine");
    let sequential = LayoutConfig {
        parallel: false,
        ..LayoutConfig::default()
    };
    for components in [100usize, 1_000] {
        let input = sparse_graph(components, components);
        group.bench_with_input(BenchmarkId::new("sequential", components), &input, |b, input| {
            b.iter(|| {
                let out = compute_layout_with(&diagonal, black_box(&input.0), &input.1, &sequential)
                    .expect("layout failed");
                black_box(out.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dagre, bench_engine_overhead);
criterion_main!(benches);
