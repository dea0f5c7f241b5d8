use ahash::HashMap;
use sprs::CsMat;
use tracing::debug;

use super::{ngrams, params::VectorizerParams, tokenizer};

/// Token n-gram count vectorizer.
///
/// The vocabulary maps each n-gram (as a sequence of tiktoken token IDs) to a
/// feature column. Column order is fixed at fit time and never changes
/// afterwards; n-grams outside the vocabulary contribute nothing to a row.
#[derive(Clone, Debug, bincode::Encode, bincode::Decode, serde::Serialize, serde::Deserialize)]
pub struct CountVectorizer {
    params: VectorizerParams,
    /// Vocabulary mapping n-gram to feature column index.
    vocab: HashMap<Vec<u32>, usize>,
}

impl CountVectorizer {
    pub fn fit<T: AsRef<str> + Sync>(texts: &[T], params: VectorizerParams) -> Self {
        debug!(num_texts = texts.len(), "Fitting CountVectorizer");
        let tokenized_texts = tokenizer::tokenize(texts);
        Self::fit_from_tokenized(&tokenized_texts, params)
    }

    fn fit_from_tokenized(tokenized_texts: &[Vec<u32>], params: VectorizerParams) -> Self {
        debug!("Building vocabulary from tokenized texts");
        let vocab_df = ngrams::build_vocabulary(tokenized_texts, params.ngram_counts());
        let vocab_size = vocab_df.len();

        debug!(min_df = params.min_df(), "Applying min_df filtering");
        let mut sorted_tokens = vocab_df
            .into_iter()
            .filter(|(_, df)| *df >= params.min_df())
            .map(|(ngram, _)| ngram)
            .collect::<Vec<_>>();
        debug!(
            original_size = vocab_size,
            filtered_size = sorted_tokens.len(),
            "Vocabulary filtered by min_df"
        );

        // Sorting fixes the column order independently of hash iteration order.
        sorted_tokens.sort();
        let vocab = sorted_tokens
            .into_iter()
            .enumerate()
            .map(|(idx, ngram)| (ngram, idx))
            .collect::<HashMap<Vec<u32>, usize>>();

        debug!(vocab_size = vocab.len(), "CountVectorizer fitting complete");

        Self { params, vocab }
    }

    pub fn transform<T: AsRef<str> + Sync>(&self, texts: &[T]) -> CsMat<f32> {
        debug!(
            num_texts = texts.len(),
            "Transforming texts using CountVectorizer"
        );
        let tokenized_texts = tokenizer::tokenize(texts);
        self.transform_from_tokenized(&tokenized_texts)
    }

    fn transform_from_tokenized(&self, tokenized_texts: &[Vec<u32>]) -> CsMat<f32> {
        // Build CSR format directly
        let num_texts = tokenized_texts.len();
        let mut indptr = Vec::with_capacity(num_texts + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();

        indptr.push(0);

        for tokens in tokenized_texts {
            let counts = ngrams::count_ngrams(tokens, self.params.ngram_counts());
            let mut row_entries = counts
                .iter()
                .filter_map(|(ngram, &count)| {
                    self.vocab
                        .get(ngram)
                        .map(|&col_idx| (col_idx, count as f32))
                })
                .collect::<Vec<_>>();

            row_entries.sort_by_key(|(col_idx, _)| *col_idx);
            for (col_idx, count) in row_entries {
                indices.push(col_idx);
                data.push(count);
            }
            indptr.push(indices.len());
        }

        debug!(
            non_zero_entries = data.len(),
            "Text transformation complete"
        );
        CsMat::new((num_texts, self.num_features()), indptr, indices, data)
    }

    /// Fit and transform in one pass over the tokenized corpus.
    pub fn fit_transform<T: AsRef<str> + Sync>(
        texts: &[T],
        params: VectorizerParams,
    ) -> (Self, CsMat<f32>) {
        let tokenized_texts = tokenizer::tokenize(texts);
        let vectorizer = Self::fit_from_tokenized(&tokenized_texts, params);
        let transformed = vectorizer.transform_from_tokenized(&tokenized_texts);
        (vectorizer, transformed)
    }

    pub fn num_features(&self) -> usize {
        self.vocab.len()
    }

    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }

    /// Decode a serialized vectorizer artifact.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::error::DecodeError> {
        let (vectorizer, _) = bincode::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(vectorizer)
    }

    /// Serialize the vectorizer into its artifact format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::error::EncodeError> {
        bincode::encode_to_vec(self, bincode::config::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &[&str] = &[
        "the quick brown fox jumps over the lazy dog",
        "the lazy dog sleeps all day",
        "a quick brown fox is a rare sight",
    ];

    #[test]
    fn test_fit_builds_nonempty_vocabulary() {
        let vectorizer = CountVectorizer::fit(CORPUS, VectorizerParams::new(1..=1, 1));
        assert!(vectorizer.num_features() > 0);
    }

    #[test]
    fn test_transform_shape_matches_vocabulary() {
        let vectorizer = CountVectorizer::fit(CORPUS, VectorizerParams::new(1..=1, 1));
        let matrix = vectorizer.transform(CORPUS);
        assert_eq!(matrix.rows(), CORPUS.len());
        assert_eq!(matrix.cols(), vectorizer.num_features());
    }

    #[test]
    fn test_transform_is_deterministic() {
        let vectorizer = CountVectorizer::fit(CORPUS, VectorizerParams::new(1..=2, 1));
        let first = vectorizer.transform(&[CORPUS[0]]);
        let second = vectorizer.transform(&[CORPUS[0]]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_out_of_vocabulary_contributes_nothing() {
        let vectorizer = CountVectorizer::fit(CORPUS, VectorizerParams::new(1..=1, 1));
        // None of these tokens appear in the corpus
        let matrix = vectorizer.transform(&["zxqv wvut plomx"]);
        assert_eq!(matrix.cols(), vectorizer.num_features());
        assert_eq!(matrix.nnz(), 0);
    }

    #[test]
    fn test_empty_text_yields_zero_row() {
        let vectorizer = CountVectorizer::fit(CORPUS, VectorizerParams::new(1..=1, 1));
        let matrix = vectorizer.transform(&[""]);
        assert_eq!(matrix.rows(), 1);
        assert_eq!(matrix.nnz(), 0);
    }

    #[test]
    fn test_min_df_filters_rare_ngrams() {
        let all = CountVectorizer::fit(CORPUS, VectorizerParams::new(1..=1, 1));
        let frequent = CountVectorizer::fit(CORPUS, VectorizerParams::new(1..=1, 2));
        assert!(frequent.num_features() < all.num_features());
    }

    #[test]
    fn test_bigram_range_grows_vocabulary() {
        let uni = CountVectorizer::fit(CORPUS, VectorizerParams::new(1..=1, 1));
        let bi = CountVectorizer::fit(CORPUS, VectorizerParams::new(1..=2, 1));
        assert!(bi.num_features() > uni.num_features());
    }

    #[test]
    fn test_fit_transform_matches_separate_calls() {
        let (vectorizer, transformed) =
            CountVectorizer::fit_transform(CORPUS, VectorizerParams::new(1..=2, 1));
        let separate = vectorizer.transform(CORPUS);
        assert_eq!(transformed, separate);
    }

    #[test]
    fn test_bytes_round_trip_preserves_transform() {
        let vectorizer = CountVectorizer::fit(CORPUS, VectorizerParams::new(1..=2, 1));
        let bytes = vectorizer.to_bytes().expect("encode should succeed");
        let restored = CountVectorizer::from_bytes(&bytes).expect("decode should succeed");

        assert_eq!(restored.num_features(), vectorizer.num_features());
        assert_eq!(
            restored.transform(&[CORPUS[1]]),
            vectorizer.transform(&[CORPUS[1]])
        );
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(CountVectorizer::from_bytes(&[0xFF, 0x13, 0x37]).is_err());
    }
}
