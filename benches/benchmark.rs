// Throughput of the three batch stages over a synthetic catalog
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use tracklore::prelude::*;

const VOCABULARY: &[&str] = &[
    "street", "money", "gang", "flow", "night", "drip", "ice", "banjo", "road", "truck", "whiskey",
    "porch", "guitar", "riff", "scream", "dance", "love", "heart", "sun", "island", "jah", "bass",
    "chorus", "fire", "rain", "city", "lights", "gold", "chain", "crowd",
];
const GENRE_TAGS: &[&str] = &["rap", "trap", "metal", "rock", "pop", "reggae", "rnb", "country"];

fn generate_track(rng: &mut impl Rng, id: usize) -> Track {
    let lyrics: Vec<&str> = (0..rng.random_range(40..200))
        .map(|_| VOCABULARY[rng.random_range(0..VOCABULARY.len())])
        .collect();
    let tags: Vec<&str> = (0..3)
        .map(|_| VOCABULARY[rng.random_range(0..VOCABULARY.len())])
        .chain(std::iter::once(GENRE_TAGS[id % GENRE_TAGS.len()]))
        .collect();
    Track::new(format!("track_{}", id))
        .with_title(format!("{} {}", lyrics[0], lyrics[1]))
        .with_artist("Bench Artist")
        .with_lyrics(lyrics.join(" "))
        .with_tags(tags)
}

fn generate_catalog(size: usize) -> Vec<Track> {
    let mut rng = rand::rng();
    (0..size).map(|i| generate_track(&mut rng, i)).collect()
}

fn benchmark_prototypes(c: &mut Criterion) {
    let mut group = c.benchmark_group("prototypes");
    let builder = PrototypeBuilder::new(
        TermNormalizer::without_lemmatizer(Stopwords::english()),
        PrototypeConfig::default(),
    );

    for size in [100, 1000].iter() {
        let tracks = generate_catalog(*size);
        group.bench_with_input(BenchmarkId::new("build_all", size), &tracks, |b, tracks| {
            b.iter(|| black_box(builder.build_all(tracks)));
        });
    }

    group.finish();
}

fn benchmark_distill(c: &mut Criterion) {
    let mut group = c.benchmark_group("distill");
    let distiller = CategoryProfileDistiller::new(GenreLexicon::default(), DistillerConfig::light());

    for size in [100, 1000, 5000].iter() {
        let tracks = generate_catalog(*size);
        group.bench_with_input(BenchmarkId::new("distill", size), &tracks, |b, tracks| {
            b.iter(|| black_box(distiller.distill(tracks)));
        });
    }

    group.finish();
}

fn benchmark_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("match");
    let builder = PrototypeBuilder::new(
        TermNormalizer::without_lemmatizer(Stopwords::english()),
        PrototypeConfig::default(),
    );
    let composite = CompositeProfile::new("rap", "country")
        .with_rigid("street", Origin::Head)
        .with_rigid("banjo", Origin::Modifier)
        .with_typical("money", 0.9, Origin::Head)
        .with_typical("road", 0.8, Origin::Modifier)
        .with_typical("night", 0.7, Origin::Head)
        .with_selection(vec![true, true, false]);
    let query = MatchQuery::from_profile(&composite);
    let matcher = PrototypeMatcher::default();

    for size in [100, 1000, 5000].iter() {
        let tracks = generate_catalog(*size);
        let index: PrototypeIndex = builder.build_all(&tracks).into_iter().collect();
        group.bench_with_input(BenchmarkId::new("rank", size), &tracks, |b, tracks| {
            b.iter(|| black_box(matcher.rank(&query, tracks, &index)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_prototypes, benchmark_distill, benchmark_match);
criterion_main!(benches);
