use criterion::{criterion_group, criterion_main, Criterion};
use trec_core::{Stemming, TextAnalyzer, ENGLISH_STOPWORDS};

const TEXT: &str = "The Federal Reserve raised interest rates on Tuesday, citing rising \
    inflation and a tightening labor market. Analysts said the decision was widely expected \
    and that further increases were likely in the coming months as policymakers weighed \
    slowing growth against persistent price pressures across housing, energy and food.";

fn bench_analyze(c: &mut Criterion) {
    for stemming in Stemming::ALL {
        let analyzer = TextAnalyzer::new(ENGLISH_STOPWORDS, stemming);
        c.bench_function(&format!("analyze_{stemming}"), |b| b.iter(|| analyzer.analyze(TEXT)));
    }
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
