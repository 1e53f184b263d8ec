/// Cards are identified by their index in the full deck.
pub type CardId = usize;

/// Decodes a card id into its feature values.
///
/// The id is read as a base `feature_size` number with `feature_count`
/// digits, least significant digit first.
pub fn features(card: CardId, feature_size: usize, feature_count: usize) -> Vec<usize> {
    let mut value = card;
    let mut features = Vec::with_capacity(feature_count);
    for _ in 0..feature_count {
        features.push(value % feature_size);
        value /= feature_size;
    }
    features
}
