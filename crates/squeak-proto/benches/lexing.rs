//! Benchmarks for chat line lexing and invocation building.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use squeak_proto::{lex, FormattedStringExt, NoSchema, ParsedCommand};

/// Bare command
const SIMPLE_COMMAND: &str = "!sysc Alioth";

/// Command with options, quotes and a named argument
const COMPLEX_COMMAND: &str =
    "!create SpaceDawg \"Col 285 Sector AB-C d14-5\" --platform pc -cr `code red`";

/// Colored line as sent by some clients
const FORMATTED_COMMAND: &str = "\x0304,12!prep-de\x03 \x02SpaceDawg\x02 \x1Dplease\x1D";

/// Ordinary chat that is rejected on the first character
const CHAT_LINE: &str = "o7 everyone, the client is on the way";

fn benchmark_lexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Lexing");

    for (name, line) in [
        ("simple", SIMPLE_COMMAND),
        ("complex", COMPLEX_COMMAND),
        ("formatted", FORMATTED_COMMAND),
        ("chat", CHAT_LINE),
    ] {
        group.throughput(Throughput::Bytes(line.len() as u64));
        group.bench_function(name, |b| b.iter(|| black_box(lex(black_box(line)))));
    }

    group.finish();
}

fn benchmark_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("Invocation Building");
    let accepted: &[&str] = &["platform"];

    group.bench_function("complex", |b| {
        b.iter(|| black_box(ParsedCommand::parse(black_box(COMPLEX_COMMAND), accepted)))
    });
    group.bench_function("no_schema", |b| {
        b.iter(|| black_box(ParsedCommand::parse(black_box(COMPLEX_COMMAND), &NoSchema)))
    });

    group.finish();
}

fn benchmark_stripping(c: &mut Criterion) {
    c.bench_function("strip_formatting", |b| {
        b.iter(|| black_box(black_box(FORMATTED_COMMAND).strip_formatting()))
    });
}

criterion_group!(
    benches,
    benchmark_lexing,
    benchmark_building,
    benchmark_stripping
);
criterion_main!(benches);
