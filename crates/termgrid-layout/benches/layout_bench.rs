use criterion::{black_box, criterion_group, criterion_main, Criterion};
use termgrid_core::{Axis, Rect};
use termgrid_layout::{Constraint, Flex, LayoutEngine, LayoutRequest};

fn bench_split(c: &mut Criterion) {
    let area = Rect::from_size(0, 0, 120, 1);
    let constraints = vec![
        Constraint::Fill(1),
        Constraint::Len(20),
        Constraint::Percentage(25.0),
        Constraint::Min(5),
        Constraint::Fill(2),
    ];

    c.bench_function("layout_split_five_way_space_between", |b| {
        b.iter(|| {
            let request = LayoutRequest::new(black_box(area), Axis::Horizontal)
                .constraints(constraints.clone())
                .flex(Flex::SpaceBetween);
            LayoutEngine::split(&request).unwrap();
        });
    });
}

criterion_group!(benches, bench_split);
criterion_main!(benches);
