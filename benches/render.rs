use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use zui::commit::Reconciler;
use zui::damage::DamageTracker;
use zui::instance::hooks::{AppStateSource, UpdateQueueHandle};
use zui::instance::InstanceTree;
use zui::layout::{LayoutEngine, Rect};
use zui::render::Renderer;
use zui::vnode::builder::{BoxNode, NodeBuilderMut, TextNode};
use zui::VNode;

struct NoAppState;
impl AppStateSource for NoAppState {
    fn snapshot(&self) -> Rc<dyn Any> {
        Rc::new(())
    }
}

fn wide_row(n: usize) -> VNode {
    let children: Vec<_> = (0..n).map(|i| TextNode::new(format!("cell-{i}")).build()).collect();
    BoxNode::new().children(children).build()
}

fn bench_full_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_frame");

    for &n in &[10usize, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut tree = InstanceTree::new();
                let queue = UpdateQueueHandle::new();
                let report = Reconciler::commit(&mut tree, Some(wide_row(n)), &queue, &NoAppState).unwrap();
                let root = tree.root().unwrap();

                let mut engine = LayoutEngine::new();
                let layout = engine.compute(&tree, root, 200, 10).unwrap();

                let mut tracker = DamageTracker::new();
                let viewport = Rect { x: 0, y: 0, width: 200, height: 10 };
                let damage = tracker.compute(&report, &layout, viewport, None, &HashMap::new());

                black_box(Renderer::default().render(&tree, &layout, root, viewport, &damage, 1).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_incremental_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_update");

    group.bench_function("same_shape_text_change", |b| {
        let mut tree = InstanceTree::new();
        let queue = UpdateQueueHandle::new();
        Reconciler::commit(&mut tree, Some(wide_row(100)), &queue, &NoAppState).unwrap();

        let mut engine = LayoutEngine::new();
        let mut tracker = DamageTracker::new();
        let viewport = Rect { x: 0, y: 0, width: 200, height: 10 };
        let renderer = Renderer::default();

        let mut frame = 0u64;
        b.iter(|| {
            frame += 1;
            let report = Reconciler::commit(&mut tree, Some(wide_row(100)), &queue, &NoAppState).unwrap();
            let root = tree.root().unwrap();
            let layout = engine.compute(&tree, root, 200, 10).unwrap();
            let damage = tracker.compute(&report, &layout, viewport, None, &HashMap::new());
            black_box(renderer.render(&tree, &layout, root, viewport, &damage, frame).unwrap())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_full_frame, bench_incremental_update);
criterion_main!(benches);
