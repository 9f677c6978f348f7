#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use loglog_counter::Estimator;
use tabled::{
    settings::{Settings, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct Record {
    precision: u8,
    cardinality: usize,
    allocations: String,
}

fn measure_memory_usage(precision: u8, keys: &[String]) -> (u64, usize) {
    let _profiler = dhat::Profiler::builder().testing().build();
    let mut estimator = Estimator::new(precision).unwrap();
    for key in keys {
        estimator.update(key);
    }
    let _ = estimator.estimate();
    let stats = dhat::HeapStats::get();
    (stats.total_blocks, stats.total_bytes as usize)
}

#[test]
fn test_allocations() {
    let keys: Vec<String> = (0..100_000).map(|i| format!("item{}", i)).collect();
    // register logging callsites before measuring
    drop(Estimator::new(4).unwrap());

    let mut results = Vec::new();
    for precision in [4, 8, 12, 16] {
        for cardinality in [0, 1, 1_000, 100_000] {
            let (blocks, bytes) = measure_memory_usage(precision, &keys[..cardinality]);

            // registers are allocated once at construction and never grow
            assert_eq!(blocks, 1);
            assert_eq!(bytes, 1 << precision);

            results.push(Record {
                precision,
                cardinality,
                allocations: format!("{} / {} / {}", std::mem::size_of::<Estimator>(), bytes, blocks),
            });
        }
    }

    let table_config = Settings::default().with(Style::markdown());
    println!("{}", Table::new(results).with(table_config));
}
