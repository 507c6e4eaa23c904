use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use primapos_core::Money;
use primapos_pricing::{Discount, LineItem, TaxRate, compute_invoice_totals};

fn lines(count: usize) -> Vec<LineItem> {
    (0..count)
        .map(|i| {
            LineItem::new((i % 7) as u32 + 1, Money::new(12_500 + (i as i64 * 1_337) % 500_000))
                .with_discount(Discount::percent(Decimal::new((i % 40) as i64 * 25, 1)))
                .with_service_fee(Money::new(if i % 3 == 0 { 15_000 } else { 0 }))
        })
        .collect()
}

/// Full recomputation on every edit: how does it scale with line count?
fn bench_invoice_totals(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_invoice_totals");

    for count in [1usize, 10, 100, 1_000] {
        let input = lines(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| compute_invoice_totals(black_box(input), TaxRate::PPN))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_invoice_totals);
criterion_main!(benches);
