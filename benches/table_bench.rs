use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use user_table::models::{Company, Records};
use user_table::services::{ViewComposer, filter_users, sort_users};
use user_table::{SortConfig, SortDirection, SortField, User};

fn generate_users(count: usize) -> Vec<User> {
    (0..count)
        .map(|i| User {
            id: (count - i) as u64,
            name: format!("User {}", i % 97),
            username: format!("user{}", i),
            email: format!("user{}@example{}.com", i, i % 13),
            phone: format!("555-{:04}", (i * 7919) % 10_000),
            company: Company {
                name: format!("Company {}", i % 17),
            },
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_users");
    for size in [100, 1_000, 10_000] {
        let users = generate_users(size);
        group.bench_with_input(BenchmarkId::new("term", size), &users, |b, users| {
            b.iter(|| filter_users(black_box(users), black_box("example3")))
        });
        group.bench_with_input(BenchmarkId::new("blank", size), &users, |b, users| {
            b.iter(|| filter_users(black_box(users), black_box("  ")))
        });
    }
    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_users");
    for size in [100, 1_000, 10_000] {
        let users = generate_users(size);
        for field in [SortField::Id, SortField::Name, SortField::CompanyName] {
            let config = SortConfig::new(field, SortDirection::Descending);
            group.bench_with_input(BenchmarkId::new(field.as_str(), size), &users, |b, users| {
                b.iter(|| sort_users(black_box(users), config))
            });
        }
    }
    group.finish();
}

fn bench_composer(c: &mut Criterion) {
    let records: Records = Arc::from(generate_users(5_000));
    let sort = SortConfig::new(SortField::Email, SortDirection::Ascending);

    c.bench_function("compose_cached", |b| {
        let mut composer = ViewComposer::new();
        composer.compose(&records, "user1", sort);
        b.iter(|| composer.compose(black_box(&records), black_box("user1"), sort))
    });

    c.bench_function("compose_alternating_terms", |b| {
        let mut composer = ViewComposer::new();
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let term = if flip { "user1" } else { "user2" };
            composer.compose(black_box(&records), term, sort)
        })
    });
}

criterion_group!(benches, bench_filter, bench_sort, bench_composer);
criterion_main!(benches);
