//! Random subdomain, username, and password generation.
//!
//! All generators take `&mut impl Rng` so tests can seed a deterministic rng.
//! Word lists are embedded; the subdomain generator pairs an adjective with a
//! noun and slugifies the result.

use rand::Rng;

use crate::domain::slug::slugify;

/// Characters allowed in generated passwords. Alphanumeric only, with the
/// ambiguous `0`, `O`, `1`, `l`, and `I` removed.
const PASSWORD_CHARSET: &[u8] = b"abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of generated admin/SSH passwords.
pub const PASSWORD_LENGTH: usize = 12;

const ADJECTIVES: &[&str] = &[
    "ancient", "amber", "bold", "brave", "breezy", "bright", "calm", "candid", "cheerful",
    "chilly", "clever", "cosmic", "crimson", "curious", "daring", "dapper", "dusty", "eager",
    "early", "electric", "fearless", "fluffy", "fuzzy", "gentle", "giant", "glowing", "golden",
    "graceful", "happy", "hidden", "humble", "icy", "ivory", "jolly", "jade", "keen", "kind",
    "lively", "lucky", "mellow", "mighty", "nimble", "noble", "olive", "orange", "patient",
    "peppy", "quick", "quiet", "rapid", "rustic", "sandy", "silent", "sleepy", "sparkling",
    "spry", "sturdy", "sunny", "swift", "tall", "tiny", "tranquil", "umber", "upbeat", "velvet",
    "vivid", "wandering", "warm", "wild", "witty", "young", "zany", "zesty",
];

const NOUNS: &[&str] = &[
    "albatross", "antelope", "axolotl", "badger", "bison", "bobcat", "capybara", "caracal",
    "cheetah", "chinchilla", "condor", "cougar", "crane", "dingo", "dolphin", "dormouse",
    "eagle", "echidna", "egret", "falcon", "ferret", "finch", "gazelle", "gecko", "gibbon",
    "heron", "hedgehog", "hummingbird", "ibex", "iguana", "impala", "jackal", "jaguar", "jerboa",
    "kestrel", "kiwi", "koala", "lemur", "lynx", "llama", "macaw", "marmot", "meerkat",
    "narwhal", "newt", "nightingale", "ocelot", "okapi", "otter", "owl", "panther", "pelican",
    "penguin", "quail", "quokka", "rabbit", "raccoon", "raven", "salamander", "seal", "serval",
    "sparrow", "tapir", "toucan", "turtle", "urchin", "vicuna", "vole", "walrus", "wombat",
    "wren", "yak", "zebra",
];

/// Produce a slugified adjective+noun subdomain candidate.
///
/// With `use_alliteration`, the noun is drawn from the subset sharing the
/// adjective's first letter when one exists.
pub fn generate_subdomain(rng: &mut impl Rng, use_alliteration: bool) -> String {
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let noun = if use_alliteration {
        pick_alliterative_noun(rng, adjective)
    } else {
        NOUNS[rng.gen_range(0..NOUNS.len())]
    };
    slugify(&format!("{adjective} {noun}"))
}

fn pick_alliterative_noun(rng: &mut impl Rng, adjective: &str) -> &'static str {
    let initial = adjective.as_bytes().first().copied();
    let matching: Vec<&'static str> = NOUNS
        .iter()
        .copied()
        .filter(|noun| noun.as_bytes().first().copied() == initial)
        .collect();
    if matching.is_empty() {
        NOUNS[rng.gen_range(0..NOUNS.len())]
    } else {
        matching[rng.gen_range(0..matching.len())]
    }
}

/// Generate a system username: `user` followed by 8 lowercase hex characters.
pub fn generate_username(rng: &mut impl Rng) -> String {
    let mut bytes = [0u8; 4];
    rng.fill(&mut bytes);
    let mut name = String::with_capacity(12);
    name.push_str("user");
    for b in bytes {
        name.push_str(&format!("{b:02x}"));
    }
    name
}

/// Generate a fixed-length random password from the unambiguous
/// alphanumeric charset.
pub fn generate_password(rng: &mut impl Rng) -> String {
    (0..PASSWORD_LENGTH)
        .map(|_| char::from(PASSWORD_CHARSET[rng.gen_range(0..PASSWORD_CHARSET.len())]))
        .collect()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
