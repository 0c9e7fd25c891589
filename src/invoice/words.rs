use crate::error::{BillingError, Result};

/// Largest amount that can be spelled out: 2^53 - 1 sub-units, the last
/// integer an f64 holds exactly.
pub const MAX_WORDS_AMOUNT: f64 = 90_071_992_547_409.91;

const MAX_MINOR_UNITS: f64 = 9_007_199_254_740_991.0;

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const SCALES: [&str; 7] = [
    "",
    "Thousand",
    "Million",
    "Billion",
    "Trillion",
    "Quadrillion",
    "Quintillion",
];

/// Unit names and digit grouping for a currency
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyWords {
    pub major: String,
    pub minor: String,
    /// Lakh/crore grouping instead of thousand/million
    pub indian: bool,
}

impl CurrencyWords {
    pub fn for_code(code: &str) -> Self {
        let (major, minor, indian) = match code.to_ascii_uppercase().as_str() {
            "INR" => ("Rupees", "Paise", true),
            "USD" | "AUD" | "CAD" | "SGD" => ("Dollars", "Cents", false),
            "EUR" => ("Euros", "Cents", false),
            "GBP" => ("Pounds", "Pence", false),
            "AED" => ("Dirhams", "Fils", false),
            _ => return Self {
                major: code.to_ascii_uppercase(),
                minor: "Cents".to_string(),
                indian: false,
            },
        };
        Self {
            major: major.to_string(),
            minor: minor.to_string(),
            indian,
        }
    }
}

fn push_below_thousand(n: u64, out: &mut Vec<&'static str>) {
    let hundreds = n / 100;
    let rest = (n % 100) as usize;
    if hundreds > 0 {
        out.push(ONES[hundreds as usize]);
        out.push("Hundred");
    }
    if rest >= 20 {
        out.push(TENS[rest / 10]);
        if rest % 10 > 0 {
            out.push(ONES[rest % 10]);
        }
    } else if rest > 0 {
        out.push(ONES[rest]);
    }
}

fn push_indian(n: u64, out: &mut Vec<&'static str>) {
    const CRORE: u64 = 10_000_000;
    if n >= CRORE {
        push_indian(n / CRORE, out);
        out.push("Crore");
        push_indian(n % CRORE, out);
        return;
    }

    let lakhs = n / 100_000;
    let thousands = (n / 1_000) % 100;
    if lakhs > 0 {
        push_below_thousand(lakhs, out);
        out.push("Lakh");
    }
    if thousands > 0 {
        push_below_thousand(thousands, out);
        out.push("Thousand");
    }
    push_below_thousand(n % 1_000, out);
}

fn push_international(n: u64, out: &mut Vec<&'static str>) {
    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push(rest % 1_000);
        rest /= 1_000;
    }

    for (scale, group) in groups.iter().enumerate().rev() {
        if *group == 0 {
            continue;
        }
        push_below_thousand(*group, out);
        if scale > 0 {
            out.push(SCALES[scale]);
        }
    }
}

/// Spell out a whole number, "Zero" for 0
pub fn number_in_words(n: u64, indian: bool) -> String {
    if n == 0 {
        return "Zero".to_string();
    }
    let mut words = Vec::new();
    if indian {
        push_indian(n, &mut words);
    } else {
        push_international(n, &mut words);
    }
    words.join(" ")
}

/// Spell out an amount with its sub-units, e.g. "Rupees Five Hundred
/// Thirty One and Fifty Paise Only".
pub fn amount_in_words(amount: f64, currency: &CurrencyWords) -> Result<String> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(BillingError::AmountOutOfRange(amount));
    }
    let minor_units = (amount * 100.0).round();
    if minor_units > MAX_MINOR_UNITS {
        return Err(BillingError::AmountOutOfRange(amount));
    }

    let minor_units = minor_units as u64;
    let whole = minor_units / 100;
    let fraction = minor_units % 100;

    let mut words = format!(
        "{} {}",
        currency.major,
        number_in_words(whole, currency.indian)
    );
    if fraction > 0 {
        words.push_str(&format!(
            " and {} {}",
            number_in_words(fraction, currency.indian),
            currency.minor
        ));
    }
    words.push_str(" Only");
    Ok(words)
}
