//! Criterion benchmarks for statement assembly and a single-row lookup through
//! the DAO versus raw `rusqlite`, on the same in-memory dataset.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use rusqlite::Connection;
use table_dao::prelude::*;

/// Resolve how many rows the lookup dataset holds.
fn lookup_row_count() -> usize {
    std::env::var("BENCH_ROWS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(1000)
}

fn shuffled_ids(row_count: usize) -> Vec<i64> {
    let mut ids: Vec<i64> = (1..=row_count as i64).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(1_234_567_890);
    ids.shuffle(&mut rng);
    ids
}

fn seed(conn: &Connection, row_count: usize) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE test (id_test INTEGER PRIMARY KEY, name TEXT NOT NULL, score REAL NOT NULL);",
    )?;
    let mut stmt = conn.prepare("INSERT INTO test (id_test, name, score) VALUES (?1, ?2, ?3)")?;
    for id in 1..=row_count as i64 {
        stmt.execute(rusqlite::params![id, format!("name-{id}"), id as f64 * 0.5])?;
    }
    Ok(())
}

fn bench_builders(c: &mut Criterion) {
    let table = TableConfig::new("test");
    let criteria = Criteria::new()
        .with("status", "active")
        .with("id_test", (1..=20_i64).collect::<Vec<_>>());
    let filter = FilterOptions::new()
        .criteria(criteria.clone())
        .like("name", "Name")
        .order("score")
        .vector(SortDirection::Desc)
        .limit(50);
    let like = LikeOptions::new()
        .patterns("name", ["a", "b", "c"])
        .pattern("status", "act")
        .join(LikeJoin::Or);

    let mut group = c.benchmark_group("statement_builder");
    group.bench_function("select_where", |b| {
        b.iter(|| black_box(select_where_statement(&table, black_box(&criteria))))
    });
    group.bench_function("select_filter", |b| {
        b.iter(|| black_box(select_filter_statement(&table, black_box(&filter))))
    });
    group.bench_function("select_like", |b| {
        b.iter(|| black_box(select_like_statement(&table, black_box(&like))))
    });
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let row_count = lookup_row_count();
    let ids = shuffled_ids(row_count);

    let raw = Connection::open_in_memory().expect("open raw connection");
    seed(&raw, row_count).expect("seed raw connection");

    let dao = Dao::open(&DaoOptions::in_memory()).expect("open dao");
    seed(dao.connection(), row_count).expect("seed dao connection");
    let table = TableConfig::new("test");

    let mut group = c.benchmark_group("single_row_lookup");
    group.bench_function(BenchmarkId::new("rusqlite", ids.len()), |b| {
        let mut stmt = raw
            .prepare_cached("SELECT * FROM test WHERE id_test = ?1")
            .expect("prepare lookup");
        b.iter(|| {
            for &id in &ids {
                let name: String = stmt
                    .query_row([id], |row| row.get(1))
                    .expect("lookup row");
                black_box(name);
            }
        })
    });
    group.bench_function(BenchmarkId::new("table_dao", ids.len()), |b| {
        b.iter(|| {
            for &id in &ids {
                let row = dao.table(&table).select_id(id).expect("lookup row");
                black_box(row);
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_builders, bench_lookup);
criterion_main!(benches);
