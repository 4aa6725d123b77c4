use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use budgetscope::{AggregatedSeries, ImpactDataset, SelectionState};

const HEADER: &str = "constituency_code,constituency_name,year,family_type,income_decile,household_income,two_child_limit,fuel_duty_freeze,rail_fares_freeze,threshold_freeze_extension,freeze_student_loan_thresholds,salary_sacrifice_cap,dividend_tax_increase_2pp,savings_tax_increase_2pp,property_tax_increase_2pp,high_value_council_tax_surcharge,ev_mileage_charge";

const FAMILY_TYPES: [&str; 4] = ["single", "couple", "couple_with_children", "pensioner_couple"];

/// Synthetic dataset: 50 constituencies x 5 years x 20 household records.
fn make_dataset() -> ImpactDataset {
    let mut csv = String::from(HEADER);
    csv.push('\n');

    for c in 0..50u32 {
        let code = format!("E14{:06}", 1000 + c);
        for year in 2026..2031u32 {
            for h in 0..20u32 {
                let decile = h % 10 + 1;
                let income = 12_000 + u64::from(decile) * 4_000 + u64::from(h) * 137;
                let spend = f64::from(h % 7) * 43.0;
                let tax = -f64::from(h % 11) * 61.0;
                csv.push_str(&format!(
                    "{code},Constituency {c},{year},{family},{decile},{income},\
                     {spend},{spend},{spend},{tax},{tax},{tax},{tax},{tax},{tax},0,{tax}\n",
                    family = FAMILY_TYPES[(h % 4) as usize],
                ));
            }
        }
    }

    ImpactDataset::from_csv_str(&csv).unwrap()
}

fn bench_full_recompute(c: &mut Criterion) {
    let dataset = make_dataset();
    let state = SelectionState::default();

    let mut group = c.benchmark_group("aggregate");
    group.throughput(Throughput::Elements(dataset.len() as u64));
    group.bench_function("full_recompute", |b| {
        b.iter(|| AggregatedSeries::compute(&dataset, &state));
    });
    group.finish();
}

fn bench_scoped_recompute(c: &mut Criterion) {
    let dataset = make_dataset();
    let state = SelectionState::from_query("constituency=E14001000&policies=two_child_limit");

    c.bench_function("aggregate/scoped_recompute", |b| {
        b.iter(|| AggregatedSeries::compute(&dataset, &state));
    });
}

criterion_group!(benches, bench_full_recompute, bench_scoped_recompute);
criterion_main!(benches);
