use ragdb_core::traits::Embedder;
use ragdb_embed::{get_default_embedder, HashEmbedder, EMBEDDING_DIM};

#[test]
fn hash_embedder_shape_and_determinism() {
    let embedder = HashEmbedder::new(EMBEDDING_DIM);
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), EMBEDDING_DIM);
    assert_eq!(embedder.dim(), EMBEDDING_DIM);

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[test]
fn different_texts_embed_differently() {
    let embedder = HashEmbedder::new(EMBEDDING_DIM);
    let embs = embedder
        .embed_batch(&["survival shelter".to_string(), "water purification".to_string()])
        .expect("embed_batch");
    assert_ne!(embs[0], embs[1]);
}

#[test]
fn default_embedder_honors_fake_flag() {
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");
    let embedder = get_default_embedder().expect("embedder");
    assert_eq!(embedder.dim(), EMBEDDING_DIM);
    let embs = embedder.embed_batch(&["sample".to_string()]).expect("embed_batch");
    assert_eq!(embs.len(), 1);
}
