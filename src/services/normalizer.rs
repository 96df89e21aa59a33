//! Pokémon name normalization service
//!
//! Maps competitive display names to canonical URL-safe slugs for consistent
//! payload lookup and sprite URL building across data sources.

/// Slug returned for empty input
pub const FALLBACK_SLUG: &str = "substitute";

/// Irregular names the generic rule gets wrong (lower-cased input → slug).
///
/// Values must already be canonical and must not appear as keys, so that
/// `to_slug` stays idempotent.
const SLUG_EXCEPTIONS: &[(&str, &str)] = &[
    ("nidoran♀", "nidoran-f"),
    ("nidoran♂", "nidoran-m"),
    ("flabébé", "flabebe"),
    ("type: null", "type-null"),
    ("aegislash", "aegislash-shield"),
    ("basculegion-f", "basculegion-female"),
    ("basculin", "basculin-red-striped"),
    ("darmanitan", "darmanitan-standard"),
    ("deoxys", "deoxys-normal"),
    ("dudunsparce", "dudunsparce-two-segment"),
    ("eiscue", "eiscue-ice"),
    ("enamorus", "enamorus-incarnate"),
    ("giratina", "giratina-altered"),
    ("gourgeist", "gourgeist-average"),
    ("indeedee-f", "indeedee-female"),
    ("keldeo", "keldeo-ordinary"),
    ("landorus", "landorus-incarnate"),
    ("lycanroc", "lycanroc-midday"),
    ("maushold", "maushold-family-of-four"),
    ("meloetta", "meloetta-aria"),
    ("meowstic-f", "meowstic-female"),
    ("mimikyu", "mimikyu-disguised"),
    ("minior", "minior-red-meteor"),
    ("morpeko", "morpeko-full-belly"),
    ("ogerpon-cornerstone", "ogerpon-cornerstone-mask"),
    ("ogerpon-hearthflame", "ogerpon-hearthflame-mask"),
    ("ogerpon-wellspring", "ogerpon-wellspring-mask"),
    ("oinkologne-f", "oinkologne-female"),
    ("oricorio", "oricorio-baile"),
    ("palafin", "palafin-zero"),
    ("pumpkaboo", "pumpkaboo-average"),
    ("shaymin", "shaymin-land"),
    ("squawkabilly", "squawkabilly-green-plumage"),
    ("tauros-paldea-aqua", "tauros-paldea-aqua-breed"),
    ("tauros-paldea-blaze", "tauros-paldea-blaze-breed"),
    ("tauros-paldea-combat", "tauros-paldea-combat-breed"),
    ("thundurus", "thundurus-incarnate"),
    ("tornadus", "tornadus-incarnate"),
    ("toxtricity", "toxtricity-amped"),
    ("urshifu", "urshifu-single-strike"),
    ("wishiwashi", "wishiwashi-solo"),
    ("wormadam", "wormadam-plant"),
    ("zygarde", "zygarde-50"),
];

/// Characters dropped by the generic rule (ASCII and typographic apostrophes,
/// periods, colons, percent signs)
const STRIPPED_CHARS: &[char] = &['\'', '\u{2019}', '\u{2018}', '.', ':', '%'];

/// Normalize a display name to a canonical slug.
///
/// Exception table first, then the generic rule:
/// - Strip apostrophes, periods, colons and percent signs
/// - Collapse whitespace runs into single hyphens
///
/// # Examples
/// ```
/// use chaosdex::services::normalizer::to_slug;
///
/// assert_eq!(to_slug("Mr. Mime"), "mr-mime");
/// assert_eq!(to_slug("Flutter Mane"), "flutter-mane");
/// assert_eq!(to_slug(""), "substitute");
/// ```
pub fn to_slug(display_name: &str) -> String {
    let lowered = display_name.trim().to_lowercase();
    if lowered.is_empty() {
        return FALLBACK_SLUG.to_string();
    }

    if let Some(slug) = lookup_exception(&lowered) {
        return slug.to_string();
    }

    let stripped: String = lowered
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();

    let slug = stripped.split_whitespace().collect::<Vec<_>>().join("-");
    if slug.is_empty() {
        // Input was only punctuation
        return FALLBACK_SLUG.to_string();
    }
    slug
}

fn lookup_exception(lowered: &str) -> Option<&'static str> {
    SLUG_EXCEPTIONS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, slug)| *slug)
}
