use std::ops::RangeInclusive;

#[derive(Clone, Debug, bincode::Encode, bincode::Decode, serde::Serialize, serde::Deserialize)]
pub struct VectorizerParams {
    ngram_range: Vec<usize>,
    /// Minimum document frequency for a token n-gram to enter the vocabulary.
    min_df: usize,
}

impl VectorizerParams {
    pub fn new(ngram_range: impl Into<RangeInclusive<usize>>, min_df: usize) -> Self {
        let n_sizes = ngram_range.into().collect::<Vec<_>>();
        assert!(
            !n_sizes.is_empty(),
            "ngram_range must contain at least one value"
        );
        assert!(
            n_sizes.iter().all(|&n| n >= 1),
            "ngram sizes must be at least 1"
        );
        assert!(min_df >= 1, "min_df must be at least 1");
        Self {
            ngram_range: n_sizes,
            min_df,
        }
    }

    #[must_use]
    pub fn ngram_counts(&self) -> &[usize] {
        &self.ngram_range
    }

    #[must_use]
    pub fn min_df(&self) -> usize {
        self.min_df
    }
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            ngram_range: vec![1],
            min_df: 1,
        }
    }
}
