//! Performance benchmarks for logbook-engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use logbook_engine::{
    find_duplicates, merge_lists, Checksum, FlightRecord, LogbookSnapshot, Manifest, MergeOnto,
    NextFreeId, SameFlight, TransferPlan, UNASSIGNED_ID,
};

fn logbook(size: i64) -> Vec<FlightRecord> {
    (0..size)
        .map(|i| FlightRecord {
            id: i + 1,
            aircraft_type: "B738".into(),
            registration: format!("PH-{:03}", i % 40),
            name: format!("Captain {}", i % 12),
            timestamp: 1_700_000_000 + i,
            ..FlightRecord::new("EHAM", "EGLL", i * 10_000, i * 10_000 + 4_500)
        })
        .collect()
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_lists");

    for size in [10, 100, 500].iter() {
        group.bench_with_input(BenchmarkId::new("import", size), size, |b, &size| {
            let master = logbook(size);

            // Half of the import overlaps the logbook
            let other: Vec<_> = logbook(size)
                .into_iter()
                .skip((size / 2) as usize)
                .map(|flight| FlightRecord {
                    id: UNASSIGNED_ID,
                    remarks: "roster".into(),
                    time_out: flight.time_out + 5 * size * 10_000,
                    time_in: flight.time_in + 5 * size * 10_000,
                    ..flight
                })
                .chain(logbook(size / 2).into_iter().map(|f| f.with_id(UNASSIGNED_ID)))
                .collect();

            b.iter(|| {
                let mut ids = NextFreeId::for_lists(&master, &other);
                merge_lists(
                    black_box(&master),
                    black_box(&other),
                    &SameFlight::default(),
                    &MergeOnto::default(),
                    &mut ids,
                )
            })
        });
    }

    group.finish();
}

fn bench_duplicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("duplicates");

    for size in [100, 500, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("find", size), size, |b, &size| {
            let mut records = logbook(size);
            let copies: Vec<_> = records
                .iter()
                .step_by(10)
                .map(|r| r.with_id(r.id + size))
                .collect();
            records.extend(copies);

            b.iter(|| find_duplicates(black_box(&records)))
        });
    }

    group.finish();
}

fn bench_sync_planning(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_planning");

    for size in [100, 1000, 5000].iter() {
        let local = logbook(*size);
        let remote: Vec<_> = logbook(*size)
            .into_iter()
            .map(|r| {
                if r.id % 7 == 0 {
                    r.with_timestamp(r.timestamp + 1)
                } else {
                    r
                }
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("checksum", size), &local, |b, local| {
            b.iter(|| Checksum::of(black_box(local)))
        });

        let local_manifest = Manifest::from_records(&local);
        let remote_manifest = Manifest::from_records(&remote);
        group.bench_with_input(BenchmarkId::new("transfer_plan", size), size, |b, _| {
            b.iter(|| TransferPlan::compute(black_box(&local_manifest), black_box(&remote_manifest)))
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    for size in [100, 1000].iter() {
        let snapshot = LogbookSnapshot::from_records(logbook(*size), 0).unwrap();
        let json = snapshot.to_json_pretty().unwrap();

        group.bench_with_input(BenchmarkId::new("export", size), &snapshot, |b, snapshot| {
            b.iter(|| snapshot.to_json_pretty())
        });
        group.bench_with_input(BenchmarkId::new("import", size), &json, |b, json| {
            b.iter(|| LogbookSnapshot::from_json(black_box(json)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_merge,
    bench_duplicates,
    bench_sync_planning,
    bench_snapshot,
);
criterion_main!(benches);
