use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tangle_core::graph::Graph;
use tangle_core::lexer::Tokenizer;
use tangle_core::semi::SemiBuilder;

fn synthetic_source(classes: usize) -> String {
    let mut source = String::from("namespace Bench {\n");
    for i in 0..classes {
        source.push_str(&format!(
            "  public class C{i} {{\n    private int field_{i};\n    public void Run(C{} arg) {{\n      int local = {i}; // note\n    }}\n  }}\n",
            (i + 1) % classes.max(1)
        ));
    }
    source.push_str("}\n");
    source
}

fn bench_tokenizer(c: &mut Criterion) {
    let source = synthetic_source(100);
    c.bench_function("tokenize_100_classes", |b| {
        b.iter(|| {
            let mut toker = Tokenizer::from_source(black_box(&source));
            let mut count = 0usize;
            while toker.next_token().expect("tokenize").is_some() {
                count += 1;
            }
            black_box(count)
        })
    });
}

fn bench_semi_builder(c: &mut Criterion) {
    let source = synthetic_source(100);
    c.bench_function("semi_units_100_classes", |b| {
        b.iter(|| {
            let mut builder =
                SemiBuilder::new(Tokenizer::from_source(black_box(&source))).return_newlines(false);
            let mut count = 0usize;
            while builder.next().expect("semi").is_some() {
                count += 1;
            }
            black_box(count)
        })
    });
}

fn bench_strong_components(c: &mut Criterion) {
    c.bench_function("scc_ring_of_500", |b| {
        b.iter(|| {
            let mut graph: Graph<()> = Graph::new("ring");
            let ids: Vec<_> = (0..500).map(|i| graph.add_node(format!("n{i}"))).collect();
            for i in 0..ids.len() {
                graph.add_edge(ids[i], ids[(i + 1) % ids.len()], ());
            }
            graph.strong_components();
            black_box(graph.components().len())
        })
    });
}

criterion_group!(
    benches,
    bench_tokenizer,
    bench_semi_builder,
    bench_strong_components
);
criterion_main!(benches);
