// Performance benchmarks for similarity, clustering and per-query latency
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use shoprec::prelude::*;
use shoprec_core::{ClusterConfig, ClusterEngine, FeatureEncoder, Field, SimilarityMatrix};
use std::sync::Arc;

const GENDERS: [&str; 2] = ["Male", "Female"];
const LOCATIONS: [&str; 5] = ["Kentucky", "Maine", "Texas", "Ohio", "Nevada"];
const SIZES: [&str; 4] = ["S", "M", "L", "XL"];
const FREQUENCIES: [&str; 5] = ["Rarely", "Occasionally", "Monthly", "Weekly", "Often"];
const PRODUCTS: [(&str, &str); 8] = [
    ("Jeans", "Clothing"),
    ("Blouse", "Clothing"),
    ("Sweater", "Clothing"),
    ("Sandals", "Footwear"),
    ("Boots", "Footwear"),
    ("Jacket", "Outerwear"),
    ("Hat", "Accessories"),
    ("Backpack", "Accessories"),
];
const COLORS: [&str; 6] = ["Blue", "Red", "Black", "White", "Green", "Gray"];
const SEASONS: [&str; 4] = ["Winter", "Spring", "Summer", "Fall"];

fn pick<'a>(rng: &mut StdRng, values: &[&'a str]) -> String {
    values[rng.random_range(0..values.len())].to_string()
}

fn generate_random_shop(customers: u32) -> Arc<Dataset> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut users = Vec::with_capacity(customers as usize);
    let mut items = Vec::with_capacity(customers as usize);

    for id in 1..=customers {
        users.push(UserRecord {
            customer_id: id,
            age: Some(rng.random_range(18.0..70.0)),
            gender: Some(pick(&mut rng, &GENDERS)),
            location: Some(pick(&mut rng, &LOCATIONS)),
            size: Some(pick(&mut rng, &SIZES)),
            previous_purchases: Some(rng.random_range(0.0..50.0f64).floor()),
            purchase_frequency: Some(pick(&mut rng, &FREQUENCIES)),
            subscription_status: Some(if rng.random_bool(0.3) { "Yes" } else { "No" }.to_string()),
        });

        let (name, category) = PRODUCTS[rng.random_range(0..PRODUCTS.len())];
        items.push(ItemRecord {
            customer_id: id,
            item_name: Some(name.to_string()),
            category: Some(category.to_string()),
            purchase_amount: Some(rng.random_range(20..100) as f64),
            color: Some(pick(&mut rng, &COLORS)),
            season: Some(pick(&mut rng, &SEASONS)),
        });
    }

    Arc::new(Dataset::new(users, items).unwrap())
}

fn benchmark_similarity_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity_matrix");

    for size in [100u32, 500, 1000].iter() {
        let dataset = generate_random_shop(*size);
        let encoded = FeatureEncoder::new(&Field::USER_FIELDS)
            .encode(dataset.users())
            .unwrap();

        group.bench_with_input(BenchmarkId::new("users", size), &encoded, |b, encoded| {
            b.iter(|| black_box(SimilarityMatrix::build(encoded).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_clustering(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering");
    group.sample_size(10);

    for size in [200u32, 1000].iter() {
        let dataset = generate_random_shop(*size);
        let encoded = FeatureEncoder::new(&ClusterRecommender::USER_CLUSTER_FIELDS)
            .encode(dataset.users())
            .unwrap();
        let engine = ClusterEngine::new(ClusterConfig::default(), 42).unwrap();

        group.bench_with_input(BenchmarkId::new("elbow_and_fit", size), &encoded, |b, encoded| {
            b.iter(|| black_box(engine.fit(encoded)));
        });
    }

    group.finish();
}

fn benchmark_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");

    let dataset = generate_random_shop(2000);
    let config = RecommenderConfig::default();
    let recommenders: Vec<Box<dyn Recommender>> = vec![
        Box::new(UserBasedRecommender::new(dataset.clone(), &config).unwrap()),
        Box::new(ItemBasedRecommender::new(dataset.clone(), &config).unwrap()),
        Box::new(ClusterRecommender::new(dataset.clone(), &config).unwrap()),
    ];

    let mut rng = StdRng::seed_from_u64(11);
    for recommender in &recommenders {
        group.bench_function(recommender.kind().name(), |b| {
            b.iter(|| {
                let id = rng.random_range(1..=2000);
                black_box(recommender.recommend(black_box(id), 10))
            });
        });
    }

    group.finish();
}

fn benchmark_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation");
    group.sample_size(10);

    let dataset = generate_random_shop(500);
    let evaluator = Evaluator::with_default_recommenders(
        dataset.clone(),
        &RecommenderConfig::default(),
        EvaluatorConfig::default(),
    )
    .unwrap();
    let test_users = shoprec::sample_test_users(&dataset, 20, 42);

    group.bench_function("sweep_10_20", |b| {
        b.iter(|| black_box(evaluator.evaluate(&test_users, &[10, 20])));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_similarity_matrix,
    benchmark_clustering,
    benchmark_recommend,
    benchmark_evaluation
);
criterion_main!(benches);
