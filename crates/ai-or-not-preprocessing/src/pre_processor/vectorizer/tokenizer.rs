use rayon::prelude::*;
use tiktoken_rs::o200k_base_singleton;
use tracing::debug;

/// Minimum number of texts to consider parallelization
const MIN_TEXTS_FOR_PARALLEL: usize = 100;

/// Minimum total character count to consider parallelization
const MIN_CHARS_FOR_PARALLEL: usize = 10_000;

fn tokenize_texts_par<T: AsRef<str> + Sync>(texts: &[T]) -> Vec<Vec<u32>> {
    debug!(num_texts = texts.len(), "Using parallel tokenization");
    let bpe = o200k_base_singleton();
    texts
        .par_iter()
        .map(|text| bpe.lock().encode_ordinary(text.as_ref()))
        .collect()
}

fn tokenize_texts<T: AsRef<str>>(texts: &[T]) -> Vec<Vec<u32>> {
    debug!(num_texts = texts.len(), "Using sequential tokenization");
    let bpe = o200k_base_singleton();
    texts
        .iter()
        .map(|text| bpe.lock().encode_ordinary(text.as_ref()))
        .collect()
}

/// Determine if parallel processing should be used based on workload characteristics.
///
/// Parallelization is beneficial when:
/// - There are many texts (>= 100), OR
/// - The total character count is large (>= 10,000 chars)
///
/// This heuristic balances thread spawning overhead against tokenization work.
#[inline]
fn should_use_parallel<T: AsRef<str>>(texts: &[T]) -> bool {
    let num_texts = texts.len();

    // If we have many texts, always parallelize
    if num_texts >= MIN_TEXTS_FOR_PARALLEL {
        return true;
    }

    // For fewer texts, check total workload
    // Sample first few to estimate average length if we have many
    let total_chars: usize = if num_texts > 20 {
        // Estimate based on first 20 texts to avoid iterating all
        let sample_chars: usize = texts.iter().take(20).map(|s| s.as_ref().len()).sum();
        (sample_chars * num_texts) / 20 // estimated total
    } else {
        texts.iter().map(|s| s.as_ref().len()).sum()
    };

    total_chars >= MIN_CHARS_FOR_PARALLEL
}

pub fn tokenize<T: AsRef<str> + Sync>(texts: &[T]) -> Vec<Vec<u32>> {
    if should_use_parallel(texts) {
        tokenize_texts_par(texts)
    } else {
        tokenize_texts(texts)
    }
}
