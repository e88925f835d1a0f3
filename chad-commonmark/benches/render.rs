use std::hint::black_box;

use chad_commonmark::{
  MarkdownOptions,
  MarkdownProcessor,
  speech::to_speech_text,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

const MESSAGE_SHORT: &str = r#"The revenue figures are on
<!-- pdfnav: name="annual-report.pdf" page=12 id=f3a9 --> and the summary
uses `net_income / revenue` as the margin."#;

const MESSAGE_LONG: &str = r#"# Findings

The report covers three areas. See
<!-- pdfnav: name="annual-report.pdf" page=4 id=f3a9 --> for the overview.

<!-- pdfnav: name="appendix.pdf" page=2 id=77bc -->

## Margins

| Year | Revenue | Margin |
|------|---------|--------|
| 2022 | 1.2M    | 8%     |
| 2023 | 1.5M    | 11%    |
| 2024 | 1.9M    | 13%    |

The margin is computed as $m = \frac{n}{r}$, or in code:

```python
def margin(net_income, revenue):
    if revenue == 0:
        return None
    return net_income / revenue
```

```rust
fn margin(net: f64, revenue: f64) -> Option<f64> {
    (revenue != 0.0).then(|| net / revenue)
}
```

- Growth accelerated in `2024`
- Costs were flat, see <!-- pdfnav: name="annual-report.pdf" page=31 id=f3a9 -->
- A comment that is not a directive <!-- reviewed -->
"#;

fn bench_render(c: &mut Criterion) {
  let mut group = c.benchmark_group("render");

  let plain = MarkdownProcessor::new(MarkdownOptions::plain());
  let chat = MarkdownProcessor::new(MarkdownOptions {
    highlight_code: false,
    ..MarkdownOptions::chat()
  });
  let highlighted = MarkdownProcessor::new(MarkdownOptions::chat());

  for (size, message) in [("short", MESSAGE_SHORT), ("long", MESSAGE_LONG)] {
    group.bench_with_input(BenchmarkId::new("plain", size), message, |b, md| {
      b.iter(|| plain.render(black_box(md)));
    });
    group.bench_with_input(BenchmarkId::new("chat", size), message, |b, md| {
      b.iter(|| chat.render(black_box(md)));
    });
    group.bench_with_input(
      BenchmarkId::new("highlighted", size),
      message,
      |b, md| {
        b.iter(|| highlighted.render(black_box(md)));
      },
    );
  }

  group.finish();
}

fn bench_speech(c: &mut Criterion) {
  c.bench_function("speech/long", |b| {
    b.iter(|| to_speech_text(black_box(MESSAGE_LONG)));
  });
}

criterion_group!(benches, bench_render, bench_speech);
criterion_main!(benches);
