//! Parallel decoding of independent inputs.
//!
//! Decoders are pure and `Sync`, so a batch of inputs can be decoded on the
//! rayon thread pool without coordination. Results come back in input order.

use rayon::prelude::*;

use crate::codec::Decoder;
use crate::DecodeResult;

/// Decodes every input with `decoder`, in parallel.
///
/// The result at index `i` is exactly `decoder.decode(&inputs[i])`; each
/// input is decoded from the root context.
///
/// # Example
///
/// ```rust
/// use rivet::{decode_all, number_from_string};
/// use serde_json::json;
///
/// let codec = number_from_string();
/// let inputs = vec![json!("1"), json!("x"), json!("3")];
///
/// let results = decode_all(&codec, &inputs);
///
/// assert_eq!(results.len(), 3);
/// assert!(results[0].is_success());
/// assert!(results[1].is_failure());
/// assert!(results[2].is_success());
/// ```
pub fn decode_all<D>(decoder: &D, inputs: &[D::Input]) -> Vec<DecodeResult<D::Output>>
where
    D: Decoder,
    D::Input: Sync,
    D::Output: Send,
{
    let results: Vec<_> = inputs
        .par_iter()
        .map(|input| decoder.decode(input))
        .collect();

    let failed = results.iter().filter(|r| r.is_failure()).count();
    tracing::debug!(inputs = inputs.len(), failed, "batch decoded");

    results
}
