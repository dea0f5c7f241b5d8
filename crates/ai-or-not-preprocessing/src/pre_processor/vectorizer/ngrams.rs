use ahash::HashMap;
use dashmap::DashMap;
use rayon::prelude::*;

// TODO: avoid allocating a Vec per n-gram window
/// Count every n-gram of the configured sizes in one tokenized document.
pub fn count_ngrams(tokens: &[u32], ngram_sizes: &[usize]) -> HashMap<Vec<u32>, usize> {
    let mut ngram_counter = HashMap::default();

    for &n in ngram_sizes {
        for window in tokens.windows(n) {
            *ngram_counter.entry(window.to_vec()).or_insert(0) += 1;
        }
    }
    ngram_counter
}

/// Document frequency per n-gram across a corpus.
pub fn build_vocabulary(
    tokenized_texts: &[Vec<u32>],
    ngram_sizes: &[usize],
) -> DashMap<Vec<u32>, usize, ahash::RandomState> {
    let vocab_df = DashMap::with_hasher(ahash::RandomState::default());

    tokenized_texts.par_iter().for_each(|tokens| {
        for ngram in count_ngrams(tokens, ngram_sizes).into_keys() {
            vocab_df
                .entry(ngram)
                .and_modify(|df| *df += 1)
                .or_insert(1usize);
        }
    });
    vocab_df
}
