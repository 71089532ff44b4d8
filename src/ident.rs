//! Random identifier generation for catalog items.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Generate a random alphanumeric id of `len` characters (`[a-zA-Z0-9]`).
///
/// Ids are never recomputed from content; once a track is cataloged its id is
/// permanent.
pub fn new_id(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
