use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ndformal::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn random_sentence(budget: usize, rng: &mut impl Rng) -> Sentence {
    if budget == 0 || rng.random_bool(0.2) {
        return Sentence::atomic(["A", "B", "C", "Rain", "Wet"][rng.random_range(0..5)]);
    }

    match rng.random_range(0..=4) {
        0 => random_sentence(budget - 1, rng) & random_sentence(budget - 1, rng),
        1 => random_sentence(budget - 1, rng) | random_sentence(budget - 1, rng),
        2 => random_sentence(budget - 1, rng).then(random_sentence(budget - 1, rng)),
        3 => !random_sentence(budget - 1, rng),
        _ => Sentence::iff(random_sentence(budget - 1, rng), random_sentence(budget - 1, rng)),
    }
}

fn bench_make_matches(c: &mut Criterion) {
    let mut engine = Engine::new();
    StandardLaws::install_unlocked(&mut engine).unwrap();

    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    let a = random_sentence(6, &mut rng);
    let b = random_sentence(6, &mut rng);
    let ambient = Environment::new([random_sentence(3, &mut rng)]);
    let selection = [
        Context::fact(a.clone(), ambient.clone()),
        Context::fact(a.then(b), ambient),
    ];

    c.bench_function("make_matches_pair", |bench| {
        bench.iter(|| black_box(engine.make_matches(&selection, None, true)));
    });
}

fn bench_pretty(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    let sentence = random_sentence(10, &mut rng);

    c.bench_function("pretty_string_large", |bench| {
        bench.iter(|| black_box(sentence.pretty_string()));
    });
}

criterion_group!(benches, bench_make_matches, bench_pretty);
criterion_main!(benches);
