use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use tsgraph_core::{resample, Axis, Element, ElementId, Rgba, SourceData, TimeSpan};

fn gen_elements(samples: usize, stacked: usize) -> Vec<Element> {
    let mut v = Vec::with_capacity(stacked * 2);
    for s in 0..stacked {
        let data = (0..samples)
            .map(|i| (i as f64 * 0.01 + s as f64).sin() * 10.0 + 20.0)
            .collect();
        v.push(Element::def(SourceData::new(0, 60, data)));
    }
    for s in 0..stacked {
        let el = Element::area(ElementId(s), Rgba::gray(0.5), "");
        v.push(if s > 0 { el.stacked() } else { el });
    }
    v
}

fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");
    for &samples in &[10_000usize, 100_000usize] {
        let elements = gen_elements(samples, 4);
        let span = TimeSpan::new(0, samples as i64 * 60);
        for &xsize in &[400usize, 2_000usize] {
            group.bench_with_input(BenchmarkId::from_parameter(format!("n{samples}_x{xsize}")), &xsize, |b, &x| {
                b.iter_batched(
                    || (elements.clone(), Axis::default()),
                    |(mut els, mut axis)| {
                        let _ = black_box(resample::process(&mut els, &mut axis, span, x));
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_resample);
criterion_main!(benches);
