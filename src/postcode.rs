//! Postcode key normalization
//!
//! Every lookup, cache read, and cache write goes through `normalize` so that
//! different spellings of the same postcode share a single cache key.

/// Normalizes a postcode (or autocomplete prefix) into its canonical form.
///
/// Upper-cases the input, strips all whitespace, and re-inserts the single
/// space of the standard UK outward/inward split (before the final three
/// characters) when at least five significant characters remain. Inputs
/// shorter than a full postcode, such as autocomplete prefixes, are returned
/// upper-cased and unspaced.
///
/// Normalization is idempotent: `normalize(normalize(s)) == normalize(s)`.
///
/// # Examples
/// * `" sw1a 1aa "` -> `"SW1A 1AA"`
/// * `"SW1A1AA"` -> `"SW1A 1AA"`
/// * `"sw"` -> `"SW"`
pub fn normalize(input: &str) -> String {
    let compact: Vec<char> = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();

    if compact.len() >= 5 {
        let outward = compact.len() - 3;
        let mut key: String = compact[..outward].iter().collect();
        key.push(' ');
        key.extend(&compact[outward..]);
        key
    } else {
        compact.into_iter().collect()
    }
}
