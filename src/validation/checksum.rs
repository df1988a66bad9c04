//! Check digit algorithms for card numbers and IBANs.

const IBAN_MIN_LEN: usize = 15;
const IBAN_MAX_LEN: usize = 34;

/// Luhn (mod 10) check over a string of ASCII digits.
///
/// Anything that is not a digit, and the empty string, fails.
pub fn is_valid_luhn(number: &str) -> bool {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = number
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let digit = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();
    sum % 10 == 0
}

/// ISO 7064 MOD 97-10 check of an IBAN.
///
/// Whitespace is ignored and letters are accepted in either case. The
/// country code must be two letters followed by two check digits, the whole
/// value 15 to 34 alphanumeric characters long.
pub fn is_valid_iban(iban: &str) -> bool {
    let compact: Vec<u8> = iban
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| b.to_ascii_uppercase())
        .collect();

    if compact.len() < IBAN_MIN_LEN || compact.len() > IBAN_MAX_LEN {
        return false;
    }
    if !compact.iter().all(|b| b.is_ascii_alphanumeric()) {
        return false;
    }
    if !(compact[0].is_ascii_alphabetic() && compact[1].is_ascii_alphabetic()) {
        return false;
    }
    if !(compact[2].is_ascii_digit() && compact[3].is_ascii_digit()) {
        return false;
    }
    // "00", "01" and "99" can never come out of the check digit computation.
    let check = &compact[2..4];
    if check == b"00" || check == b"01" || check == b"99" {
        return false;
    }

    // Country code and check digits move to the end, letters expand to 10..=35.
    let rearranged = compact[4..].iter().chain(compact[..4].iter());
    let mut remainder: u32 = 0;
    for &b in rearranged {
        let value = if b.is_ascii_digit() {
            u32::from(b - b'0')
        } else {
            u32::from(b - b'A') + 10
        };
        remainder = if value > 9 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }
    remainder == 1
}
