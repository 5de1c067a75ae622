//! Parser and writer benchmarks for ircle-protocol.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ircle_protocol::{parse, writer};

const PRIVMSG: &str =
    ":Alice!alice@client.example.org PRIVMSG #rust :Has anyone tried the new borrow checker?";

fn bench_parse_privmsg(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(PRIVMSG.len() as u64));
    group.bench_function("privmsg", |b| b.iter(|| parse(black_box(PRIVMSG))));
    group.finish();
}

fn bench_parse_many_parameters(c: &mut Criterion) {
    let tokens: Vec<String> = (0..20).map(|i| format!("token{i}")).collect();
    let line = format!("CMD {}", tokens.join(" "));

    c.bench_function("parse_20_tokens", |b| b.iter(|| parse(black_box(&line))));
}

fn bench_format(c: &mut Criterion) {
    let params = ["#rust", "Has anyone tried the new borrow checker?"];

    c.bench_function("format_privmsg", |b| {
        b.iter(|| writer::format_line(None, black_box("PRIVMSG"), black_box(&params)))
    });
}

criterion_group!(
    benches,
    bench_parse_privmsg,
    bench_parse_many_parameters,
    bench_format
);
criterion_main!(benches);
