//! Slug and title derivation for generated subdomains.
//!
//! `slugify` is deterministic and idempotent: feeding its output back in
//! returns the same string.

/// Delimiter used between slug words.
pub const SLUG_DELIMITER: char = '-';

/// Normalize arbitrary text into a URL-safe identifier.
///
/// Transliterates to plain ASCII, maps `&` to the literal word "and", strips
/// apostrophes, replaces every other run of non-alphanumerics with the
/// delimiter, lower-cases, and trims leading/trailing delimiters.
#[must_use]
pub fn slugify(input: &str) -> String {
    slugify_with(input, SLUG_DELIMITER)
}

/// `slugify` with an explicit delimiter.
#[must_use]
pub fn slugify_with(input: &str, delimiter: char) -> String {
    let mut slug = String::with_capacity(input.len());
    // A delimiter is owed before the next kept character.
    let mut pending = false;

    let keep = |slug: &mut String, pending: &mut bool, ch: char| {
        if *pending && !slug.is_empty() {
            slug.push(delimiter);
        }
        *pending = false;
        slug.push(ch.to_ascii_lowercase());
    };

    for ch in input.chars() {
        match ch {
            '\'' | '\u{2019}' => {}
            '&' => {
                for c in ['a', 'n', 'd'] {
                    keep(&mut slug, &mut pending, c);
                }
            }
            _ if ch.is_ascii_alphanumeric() => keep(&mut slug, &mut pending, ch),
            _ if ch.is_ascii() => pending = true,
            _ => match transliterate(ch) {
                Some(mapped) => {
                    for c in mapped.chars() {
                        keep(&mut slug, &mut pending, c);
                    }
                }
                None => pending = true,
            },
        }
    }
    slug
}

/// Title-case a slug for use as a site title: `happy-okapi` → `Happy Okapi`.
#[must_use]
pub fn title_case(slug: &str) -> String {
    slug.split(SLUG_DELIMITER)
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Best-effort ASCII transliteration for common Latin letters. Characters
/// without a mapping are treated like punctuation and become delimiters.
fn transliterate(ch: char) -> Option<&'static str> {
    let mapped = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä'
        | 'Å' | 'Ā' => "a",
        'æ' | 'Æ' => "ae",
        'ç' | 'ć' | 'č' | 'Ç' | 'Ć' | 'Č' => "c",
        'ď' | 'đ' | 'Đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' | 'È' | 'É' | 'Ê' | 'Ë' | 'Ē' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ł' | 'Ł' => "l",
        'ñ' | 'ń' | 'ň' | 'Ñ' | 'Ń' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "o",
        'œ' | 'Œ' => "oe",
        'ř' | 'Ř' => "r",
        'ś' | 'š' | 'ş' | 'Ś' | 'Š' => "s",
        'ß' => "ss",
        'ť' | 'ţ' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'Ù' | 'Ú' | 'Û' | 'Ü' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        'ź' | 'ż' | 'ž' | 'Ź' | 'Ż' | 'Ž' => "z",
        _ => return None,
    };
    Some(mapped)
}

// ── Unit tests ───────────────────────────────────────────────────────────────
