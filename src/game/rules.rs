use super::entity::card::{features, CardId};

/// Decides whether a group of cards is a match.
///
/// Implementations must be deterministic and free of side effects, the
/// dealer calls them while holding the table lock.
pub trait MatchRules: Send + Sync {
    fn is_valid_match(&self, cards: &[CardId]) -> bool;

    /// Returns up to `at_least` matches found among `cards`, stopping early
    /// once that many are known.
    fn find_matches(&self, cards: &[CardId], at_least: usize) -> Vec<Vec<CardId>>;

    fn has_match(&self, cards: &[CardId]) -> bool {
        !self.find_matches(cards, 1).is_empty()
    }
}

/// A match is `feature_size` cards where every feature is either the same on
/// all cards or different on all cards.
#[derive(Debug, Clone)]
pub struct FeatureRules {
    feature_size: usize,
    feature_count: usize,
}

impl FeatureRules {
    pub fn new(feature_size: usize, feature_count: usize) -> Self {
        Self {
            feature_size,
            feature_count,
        }
    }

    fn search(
        &self,
        cards: &[CardId],
        start: usize,
        chosen: &mut Vec<CardId>,
        found: &mut Vec<Vec<CardId>>,
        at_least: usize,
    ) {
        if found.len() >= at_least {
            return;
        }
        if chosen.len() == self.feature_size {
            if self.is_valid_match(chosen) {
                found.push(chosen.clone());
            }
            return;
        }
        for index in start..cards.len() {
            chosen.push(cards[index]);
            self.search(cards, index + 1, chosen, found, at_least);
            chosen.pop();
        }
    }
}

impl MatchRules for FeatureRules {
    fn is_valid_match(&self, cards: &[CardId]) -> bool {
        if cards.len() != self.feature_size {
            return false;
        }

        let decoded: Vec<Vec<usize>> = cards
            .iter()
            .map(|&card| features(card, self.feature_size, self.feature_count))
            .collect();

        (0..self.feature_count).all(|feature| {
            let mut values: Vec<usize> = decoded.iter().map(|f| f[feature]).collect();
            values.sort_unstable();
            values.dedup();
            values.len() == 1 || values.len() == self.feature_size
        })
    }

    fn find_matches(&self, cards: &[CardId], at_least: usize) -> Vec<Vec<CardId>> {
        let mut found = Vec::new();
        if at_least == 0 {
            return found;
        }
        self.search(cards, 0, &mut Vec::new(), &mut found, at_least);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> FeatureRules {
        FeatureRules::new(3, 4)
    }

    #[test]
    fn test_all_distinct_feature_is_a_match() {
        // [0,0,0,0], [1,0,0,0], [2,0,0,0]
        assert!(rules().is_valid_match(&[0, 1, 2]));
    }

    #[test]
    fn test_mixed_feature_is_not_a_match() {
        // [0,0,0,0], [1,0,0,0], [0,1,0,0]
        assert!(!rules().is_valid_match(&[0, 1, 3]));
    }

    #[test]
    fn test_wrong_size_is_not_a_match() {
        assert!(!rules().is_valid_match(&[0, 1]));
        assert!(!rules().is_valid_match(&[0, 1, 2, 3]));
    }

    #[test]
    fn test_no_match_among_three_cards() {
        // [1,0,..], [0,1,..], [2,1,..]: second feature is 0,1,1
        assert!(!rules().has_match(&[1, 3, 5]));
    }

    #[test]
    fn test_find_matches_stops_at_requested_count() {
        let cards: Vec<CardId> = (0..9).collect();
        assert_eq!(rules().find_matches(&cards, 1).len(), 1);
        assert_eq!(rules().find_matches(&cards, 2).len(), 2);
        assert!(rules().find_matches(&cards, 0).is_empty());
    }

    #[test]
    fn test_found_matches_are_valid() {
        let cards: Vec<CardId> = (0..27).collect();
        let matches = rules().find_matches(&cards, usize::MAX);
        assert!(!matches.is_empty());
        assert!(matches.iter().all(|m| rules().is_valid_match(m)));
    }
}
