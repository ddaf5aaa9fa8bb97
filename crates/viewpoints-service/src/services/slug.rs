//! Poll URL slugs

use rand::Rng;
use viewpoints_core::DomainError;

const MAX_BASE_LEN: usize = 48;
const SUFFIX_LEN: usize = 6;

/// Lowercase the title and collapse everything but ASCII letters and digits
/// into single dashes
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
        if slug.len() >= MAX_BASE_LEN {
            break;
        }
    }

    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "poll".to_string()
    } else {
        slug.to_string()
    }
}

/// `base` plus a random suffix
pub fn with_random_suffix(base: &str) -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("{base}-{suffix}")
}

/// Check a caller-chosen slug
pub fn normalize_custom(slug: &str) -> Result<String, DomainError> {
    let slug = slug.trim().to_ascii_lowercase();
    let valid_chars = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if slug.len() < 3 || !valid_chars || slug.starts_with('-') || slug.ends_with('-') {
        return Err(DomainError::InvalidSlug(slug));
    }
    Ok(slug)
}
