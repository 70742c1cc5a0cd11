//! Deterministic synthetic identity data using curated lists.
//!
//! Provides names, emails, phone numbers, company names and IBAN-shaped
//! bank identifiers for account-holders and counterparties.
//! All generation is deterministic (same RNG seed = same output).

use crate::rng::GenRng;

/// Deterministic identity generator using curated word lists
pub struct NameGenerator;

impl NameGenerator {
    /// Generate a full name (first + last) deterministically
    pub fn generate_full_name(rng: &mut GenRng) -> String {
        let first_name = Self::generate_first_name(rng);
        let last_name = Self::generate_last_name(rng);
        format!("{} {}", first_name, last_name)
    }

    pub fn generate_first_name(rng: &mut GenRng) -> &'static str {
        *rng.pick(Self::first_names())
    }

    pub fn generate_last_name(rng: &mut GenRng) -> &'static str {
        *rng.pick(Self::last_names())
    }

    /// Counterparty company name: "Prefix Industry Suffix" or
    /// "LastName Industry Suffix".
    pub fn generate_company_name(rng: &mut GenRng) -> String {
        let industry = rng.pick(Self::business_industries());
        let suffix = rng.pick(Self::business_suffixes());

        if rng.chance(0.5) {
            format!("{} {} {}", rng.pick(Self::business_prefixes()), industry, suffix)
        } else {
            format!("{} {} {}", Self::generate_last_name(rng), industry, suffix)
        }
    }

    /// A single lowercase dictionary word.
    pub fn generate_word(rng: &mut GenRng) -> &'static str {
        *rng.pick(Self::words())
    }

    /// A made-up domain such as `harbor.net`.
    pub fn generate_domain_name(rng: &mut GenRng) -> String {
        let word = Self::generate_word(rng);
        let tld = rng.pick(&[".com", ".net", ".org", ".biz", ".info"]);
        format!("{word}{tld}")
    }

    /// An ordinary-looking address derived from the holder's name.
    pub fn generate_email(rng: &mut GenRng, display_name: &str) -> String {
        let mut parts = display_name.split_whitespace().map(str::to_lowercase);
        let first = parts.next().unwrap_or_default();
        let last = parts.next().unwrap_or_default();
        let domain = rng.pick(Self::mailbox_domains());

        if rng.chance(0.3) {
            format!("{first}.{last}{}@{domain}", rng.range_inclusive(1, 99))
        } else {
            format!("{first}.{last}@{domain}")
        }
    }

    /// North-American-style number in one of three layouts.
    pub fn generate_phone_number(rng: &mut GenRng) -> String {
        let area = rng.range_inclusive(201, 989);
        let exchange = rng.range_inclusive(200, 999);
        let line = rng.digits(4);
        match rng.next_u64_below(3) {
            0 => format!("({area}) {exchange}-{line}"),
            1 => format!("+1-{area}-{exchange}-{line}"),
            _ => format!("{area}.{exchange}.{line}"),
        }
    }

    /// IBAN-shaped identifier with valid ISO 7064 mod-97 check digits.
    pub fn generate_iban(rng: &mut GenRng) -> String {
        let country = rng.pick(Self::iban_countries());
        let bban = rng.digits(20);
        let check = 98 - mod97(&format!("{bban}{country}00")).unwrap_or(0);
        format!("{country}{check:02}{bban}")
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "James", "John", "Robert", "Michael", "William", "David", "Richard", "Joseph",
            "Thomas", "Charles", "Daniel", "Matthew", "Anthony", "Mark", "Paul", "Andrew",
            "Kevin", "Brian", "George", "Edward", "Jason", "Ryan", "Jacob", "Nicholas",
            "Eric", "Samuel", "Patrick", "Henry", "Peter", "Noah", "Ethan", "Lucas",
            "Mary", "Patricia", "Jennifer", "Linda", "Elizabeth", "Susan", "Jessica",
            "Sarah", "Karen", "Lisa", "Nancy", "Margaret", "Emily", "Michelle", "Laura",
            "Rachel", "Anna", "Emma", "Nicole", "Helen", "Julie", "Olivia", "Sophia",
            "Grace", "Chloe", "Camille", "Lea", "Manon", "Ines", "Clara", "Alice",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
            "Martinez", "Lopez", "Wilson", "Anderson", "Taylor", "Moore", "Martin", "Lee",
            "Thompson", "White", "Harris", "Clark", "Lewis", "Walker", "Young", "Allen",
            "King", "Wright", "Scott", "Hill", "Green", "Adams", "Baker", "Nelson",
            "Carter", "Mitchell", "Roberts", "Turner", "Parker", "Collins", "Stewart",
            "Morris", "Murphy", "Cook", "Rogers", "Morgan", "Cooper", "Peterson", "Reed",
            "Dubois", "Lambert", "Fontaine", "Rousseau", "Moreau", "Girard", "Bonnet",
            "Muller", "Schmidt", "Weber", "Fischer", "Rossi", "Bianchi", "Costa", "Silva",
        ]
    }

    fn business_prefixes() -> &'static [&'static str] {
        &[
            "Premier", "Elite", "First", "Superior", "Quality", "Reliable", "Trusted",
            "Precision", "Metro", "Valley", "Coastal", "Central", "United", "National",
            "Global", "Prime", "Northern", "Alpine",
        ]
    }

    fn business_suffixes() -> &'static [&'static str] {
        &[
            "LLC", "Inc", "Corp", "Group", "Partners", "Solutions", "Services",
            "Holdings", "Industries", "SA", "GmbH", "Ltd",
        ]
    }

    fn business_industries() -> &'static [&'static str] {
        &[
            "Construction", "Plumbing", "Electric", "Consulting", "Marketing", "Design",
            "Accounting", "Legal", "Medical", "Logistics", "Transport", "Wholesale",
            "Software", "Catering", "Printing", "Security", "Cleaning", "Freight",
        ]
    }

    fn words() -> &'static [&'static str] {
        &[
            "river", "stone", "maple", "harbor", "orbit", "cedar", "pixel", "falcon",
            "amber", "summit", "echo", "lunar", "vector", "willow", "ember", "quartz",
            "meadow", "cobalt", "signal", "tiger", "nimbus", "delta", "copper", "raven",
        ]
    }

    /// Domains used for ordinary addresses. Disjoint from the throwaway
    /// domains used by the suspicious-email templates.
    fn mailbox_domains() -> &'static [&'static str] {
        &[
            "example.com", "example.org", "example.net", "outlook.com", "yahoo.com",
            "proton.me", "orange.fr", "web.de",
        ]
    }

    fn iban_countries() -> &'static [&'static str] {
        &["DE", "FR", "GB", "NL", "ES", "IT", "CH", "BE", "LU", "AT"]
    }
}

/// Remainder mod 97 of a string of digits and uppercase letters,
/// letters expanded A=10 .. Z=35. `None` on any other character.
fn mod97(s: &str) -> Option<u32> {
    let mut rem = 0u32;
    for c in s.chars() {
        match c {
            '0'..='9' => rem = (rem * 10 + c.to_digit(10)?) % 97,
            'A'..='Z' => {
                let v = c as u32 - 'A' as u32 + 10;
                rem = (rem * 100 + v) % 97;
            }
            _ => return None,
        }
    }
    Some(rem)
}

/// ISO 13616 check: two-letter country, check digits in 02..=98, then
/// the account body; rearranged value mod 97 must equal 1.
pub fn iban_checksum_valid(iban: &str) -> bool {
    if iban.len() < 5 || !iban.is_ascii() {
        return false;
    }
    let (head, body) = iban.split_at(4);
    if !head[..2].chars().all(|c| c.is_ascii_uppercase()) {
        return false;
    }
    match head[2..].parse::<u32>() {
        Ok(check) if (2..=98).contains(&check) => {}
        _ => return false,
    }
    mod97(&format!("{body}{head}")) == Some(1)
}
