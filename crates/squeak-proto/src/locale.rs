//! Language codes for command locale suffixes.
//!
//! `!fact-de` asks for the German rendering of a reply. Only two-letter
//! ISO 639-1 codes are treated as real languages.

/// Locale used when a command carries no suffix.
pub const DEFAULT_LANGUAGE: &str = "en";

/// ISO 639-1 language codes, sorted.
const ISO_639_1: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg", "bh",
    "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv", "cy", "da",
    "de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi", "fj", "fo", "fr",
    "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr", "ht", "hu", "hy", "hz",
    "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja", "jv", "ka", "kg", "ki", "kj",
    "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw", "ky", "la", "lb", "lg", "li", "ln",
    "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml", "mn", "mr", "ms", "mt", "my", "na", "nb",
    "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv", "ny", "oc", "oj", "om", "or", "os", "pa", "pi",
    "pl", "ps", "pt", "qu", "rm", "rn", "ro", "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk",
    "sl", "sm", "sn", "so", "sq", "sr", "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th", "ti",
    "tk", "tl", "tn", "to", "tr", "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo",
    "wa", "wo", "xh", "yi", "yo", "za", "zh", "zu",
];

/// Check whether `code` is a two-letter ISO 639-1 language code.
///
/// Comparison is ASCII case-insensitive.
///
/// ```
/// use squeak_proto::locale::is_language_code;
///
/// assert!(is_language_code("FR"));
/// assert!(!is_language_code("xq"));
/// assert!(!is_language_code("fra"));
/// ```
pub fn is_language_code(code: &str) -> bool {
    if code.len() != 2 || !code.is_ascii() {
        return false;
    }
    let lower = code.to_ascii_lowercase();
    ISO_639_1.binary_search(&lower.as_str()).is_ok()
}

/// Interpret a pair of option characters as a language code.
///
/// Used to spot `!cmd -fr` typed where `!cmd-fr` was meant.
pub fn language_from_options(options: &[char]) -> Option<String> {
    match options {
        [first, second] => {
            let code: String = [*first, *second].iter().collect();
            is_language_code(&code).then(|| code.to_ascii_lowercase())
        }
        _ => None,
    }
}
