use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use task_dispatch::document::models::{Item, Task, TaskDocument};
use task_dispatch::document::TaskStore;
use task_dispatch::scheduler::find_next_item;
use task_dispatch::service;
use task_dispatch::tasks::TaskManager;
use tempfile::TempDir;

const PRIORITIES: [&str; 3] = ["low", "medium", "high"];

/// `task_count` tasks with `subtasks_per_task` subtasks each. Every task
/// depends on its predecessor; the first half are done and the next one is
/// in progress, so both selection passes have real work to do.
fn build_document(task_count: i64, subtasks_per_task: i64) -> TaskDocument {
    let tasks = (1..=task_count)
        .map(|n| {
            let status = match n {
                n if n < task_count / 2 => "done",
                n if n == task_count / 2 => "in-progress",
                _ => "pending",
            };
            let subtasks = (1..=subtasks_per_task)
                .map(|s| {
                    let number = format!("{}.{}", n, s);
                    let mut st = Item::new(number.parse().unwrap_or_else(|_| n.into()))
                        .with_key(&format!("t{}-s{}", n, s))
                        .with_priority(PRIORITIES[(s % 3) as usize]);
                    if s > 1 {
                        st = st.with_precondition(&[format!("t{}-s{}", n, s - 1).as_str()]);
                    }
                    st
                })
                .collect();

            let mut item = Item::new(n.into())
                .with_key(&format!("t{}", n))
                .with_title(&format!("Task {}", n))
                .with_status(status)
                .with_priority(PRIORITIES[(n % 3) as usize]);
            if n > 1 {
                item = item.with_precondition(&[format!("t{}", n - 1).as_str()]);
            }
            Task::new(item).with_subtasks(subtasks)
        })
        .collect();

    TaskDocument::new(tasks)
}

fn bench_find_next_item(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_next_item");

    for size in [10, 100, 1000] {
        let doc = build_document(size, 5);
        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| black_box(find_next_item(black_box(&doc.tasks))));
        });
    }

    group.finish();
}

fn bench_set_status_cascade(c: &mut Criterion) {
    let doc = build_document(500, 9);
    let identifiers = vec!["t250".to_string(), "t251".to_string()];

    c.bench_function("set_status_cascade_500x9", |b| {
        b.iter_batched(
            || doc.clone(),
            |mut doc| {
                let mut mgr = TaskManager::new(&mut doc);
                black_box(mgr.set_status(&identifiers, "done").unwrap());
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_reset_all(c: &mut Criterion) {
    let doc = build_document(500, 9);

    c.bench_function("reset_all_500x9", |b| {
        b.iter_batched(
            || doc.clone(),
            |mut doc| black_box(TaskManager::new(&mut doc).reset_all()),
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_next_task_from_disk(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let store = TaskStore::new(temp_dir.path().join("tasks.json"));
    store.save(&build_document(200, 5)).unwrap();

    c.bench_function("service_next_task_200x5", |b| {
        b.iter(|| black_box(service::next_task(&store)));
    });
}

criterion_group!(
    benches,
    bench_find_next_item,
    bench_set_status_cascade,
    bench_reset_all,
    bench_next_task_from_disk
);
criterion_main!(benches);
