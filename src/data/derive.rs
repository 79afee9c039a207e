use super::model::Listing;

/// Lowercase first whitespace-delimited token of a model string.
/// Blank input yields `None`.
pub fn manufacturer_from_model(model: &str) -> Option<String> {
    model.split_whitespace().next().map(str::to_lowercase)
}

/// Title-case free text: a cased letter following a non-letter starts a
/// word and is upper-cased, every other letter is lower-cased.
///
/// `"ford f-150"` → `"Ford F-150"`, `"4runner sr5"` → `"4Runner Sr5"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Compute `manufacturer` from the raw model, then title-case the model.
pub fn derive_columns(listings: &mut [Listing]) {
    for listing in listings.iter_mut() {
        listing.manufacturer = listing.model.as_deref().and_then(manufacturer_from_model);
        if let Some(model) = listing.model.as_mut() {
            *model = title_case(model);
        }
    }
}
