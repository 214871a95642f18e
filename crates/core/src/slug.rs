//! URL slug generation
//!
//! Slugs identify chains, hotels, and drafts in display URLs. They are
//! derived from the display name once, at creation, and never change.

use crate::error::Result;

/// Reduce a display name to a URL-safe slug.
///
/// Lowercases, keeps ASCII alphanumerics, and collapses everything else
/// into single dashes: `"Test´Hotel  Chain"` becomes `"test-hotel-chain"`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Make a slug unique against a store by suffixing `-2`, `-3`, ...
///
/// The `exists` predicate answers whether a candidate is already taken.
pub fn unique_slug<F>(base: &str, exists: F) -> Result<String>
where
    F: Fn(&str) -> Result<bool>,
{
    let base = if base.is_empty() { "untitled" } else { base };

    if !exists(base)? {
        return Ok(base.to_string());
    }

    let mut counter = 2u32;
    loop {
        let candidate = format!("{}-{}", base, counter);
        if !exists(&candidate)? {
            return Ok(candidate);
        }
        counter += 1;
    }
}
