//! Benchmark for parsing and comparing a mid-sized class.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jdiff_core::differ::compare_units;
use jdiff_core::parser::parse_source;
use jdiff_core::ComparisonRules;

fn sample_class(methods: usize, variant: bool) -> String {
    let mut source = String::from("package bench;\n\nimport java.util.List;\n\npublic class Sample {\n");
    for i in 0..methods {
        let ret = if variant && i % 7 == 0 { "long" } else { "int" };
        source.push_str(&format!(
            "    private {ret} field{i} = {i};\n\n    public {ret} method{i}(int a, List<String> names) {{\n        int total = a;\n        for (String n : names) {{\n            total += n.length() * {i};\n        }}\n        return total;\n    }}\n\n"
        ));
    }
    source.push_str("}\n");
    source
}

fn bench_parse(c: &mut Criterion) {
    let source = sample_class(50, false);
    c.bench_function("parse_class_50_methods", |b| {
        b.iter(|| parse_source(black_box(&source), "Sample.java").unwrap())
    });
}

fn bench_compare(c: &mut Criterion) {
    let rules = ComparisonRules::default();
    let from = parse_source(&sample_class(50, false), "a/Sample.java").unwrap();
    let to = parse_source(&sample_class(50, true), "b/Sample.java").unwrap();

    c.bench_function("compare_class_50_methods", |b| {
        b.iter(|| compare_units(black_box(&from), black_box(&to), &rules).unwrap())
    });
}

criterion_group!(benches, bench_parse, bench_compare);
criterion_main!(benches);
