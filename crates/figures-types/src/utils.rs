use phf::phf_map;
use unicode_normalization::UnicodeNormalization;

static DIGIT_CHARMAP: phf::Map<char, char> = phf_map! {
    '۰' => '0', '۱' => '1', '۲' => '2', '۳' => '3', '۴' => '4',
    '۵' => '5', '۶' => '6', '۷' => '7', '۸' => '8', '۹' => '9',
    '٠' => '0', '١' => '1', '٢' => '2', '٣' => '3', '٤' => '4',
    '٥' => '5', '٦' => '6', '٧' => '7', '٨' => '8', '٩' => '9',
};

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];

/// Replaces Persian and Arabic-Indic digits with ASCII ones.
pub fn fold_digits(text: &str) -> String {
    text.chars()
        .map(|c| DIGIT_CHARMAP.get(&c).copied().unwrap_or(c))
        .collect()
}

pub fn to_persian_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => PERSIAN_DIGITS[d as usize],
            None => c,
        })
        .collect()
}

/// Year from a free-form date string: the leading integer, any digit script.
pub fn leading_year(date: &str) -> Option<i32> {
    let folded = fold_digits(date.trim());
    let (negative, rest) = match folded.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, folded.as_str()),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let year: i32 = digits.parse().ok()?;
    Some(if negative { -year } else { year })
}

/// Normal form used for case-insensitive substring search.
pub fn search_key(text: &str) -> String {
    fold_digits(&text.nfc().collect::<String>()).to_lowercase()
}

pub fn first_token(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or("")
}

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
