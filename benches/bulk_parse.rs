use clinic_pricing::core::PriceBook;
use clinic_pricing::domain::Procedure;
use clinic_pricing::storage::json_backend::save_book_to_path;
use clinic_pricing::utils::ids::SequentialIds;
use clinic_pricing::{match_procedure_prices, parse_bulk_text};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;
use uuid::Uuid;

fn simple_text(lines: usize) -> String {
    (0..lines)
        .map(|idx| format!("●슈링크{}+인모드fx 얼전+리쥬란 {}회 {},000원\n", idx, idx % 5 + 1, 300 + idx))
        .collect()
}

fn enhanced_text(packages: usize) -> String {
    (0..packages)
        .map(|idx| {
            format!(
                "■리프팅 {} {}만원 (부가세별도)\nㄴ슈링크: 1체 9.9만원 / 이벤트 15만원\nㄴ인모드{}: 이벤트 12만원\n주말 예약 가능\n",
                idx,
                30 + idx % 20,
                idx
            )
        })
        .collect()
}

fn library(size: usize) -> Vec<Procedure> {
    (0..size)
        .map(|idx| {
            Procedure::new(
                Uuid::from_u128(idx as u128 + 1),
                format!("시술 {}", idx),
                50_000 + idx as u64 * 1_000,
                0,
            )
        })
        .chain(std::iter::once(Procedure::new(Uuid::nil(), "슈링크", 99_000, 150_000)))
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let simple = simple_text(1_000);
    let enhanced = enhanced_text(500);

    c.bench_function("parse_simple_1k_lines", |b| {
        b.iter(|| parse_bulk_text(black_box(&simple), &mut SequentialIds::new()))
    });
    c.bench_function("parse_enhanced_500_packages", |b| {
        b.iter(|| parse_bulk_text(black_box(&enhanced), &mut SequentialIds::new()))
    });
}

fn bench_match_and_save(c: &mut Criterion) {
    let packages = parse_bulk_text(&simple_text(1_000), &mut SequentialIds::new());
    let procedures = library(500);

    c.bench_function("match_1k_packages_500_procedures", |b| {
        b.iter(|| match_procedure_prices(black_box(&packages), black_box(&procedures)))
    });

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("price_book.json");
    let mut book = PriceBook::new();
    book.packages = match_procedure_prices(&packages, &procedures);
    book.procedures = procedures;

    c.bench_function("price_book_save_1k", |b| {
        b.iter(|| save_book_to_path(&mut book, &path).expect("save price book"))
    });
}

criterion_group!(benches, bench_parse, bench_match_and_save);
criterion_main!(benches);
