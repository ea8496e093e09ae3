// src/catalog/normalize.rs
//
// "VAN DER POEL Mathieu" → "Mathieu van der Poel"
//
// Startlists print the surname in capitals before the given name. Capital
// tokens (two adjacent capitals, no lowercase) form the surname, everything
// else the given name; each group keeps its source order. The reordered name
// is title-cased as a whole and the particles are then lowered wherever they
// stand, so one rule covers both input shapes and the output never contains
// a capital token. Initials ("T.", "J.P.") count as given names.

/// Canonical catalog key for a raw display name. Pure and deterministic.
/// Already-canonical input comes back unchanged.
pub fn normalize_name(raw: &str) -> String {
    let (surname, given): (Vec<&str>, Vec<&str>) =
        raw.split_whitespace().partition(|t| is_surname_token(t));

    let ordered = if given.is_empty() || surname.is_empty() {
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        join!(&given.join(" "), " ", &surname.join(" "))
    };
    lower_particles(&title_case(&ordered))
}

/// Two capitals in a row and no lowercase ("DE", "O'NEIL", not "T.").
fn is_surname_token(token: &str) -> bool {
    if token.chars().any(char::is_lowercase) {
        return false;
    }
    let mut prev_upper = false;
    for ch in token.chars() {
        let upper = ch.is_uppercase();
        if upper && prev_upper {
            return true;
        }
        prev_upper = upper;
    }
    false
}

/// Upper-case a letter that follows a non-letter, lower-case the rest.
/// Only looks at positions, so the input's casing never matters.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_letter = false;
    for ch in s.chars() {
        if prev_letter {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_letter = ch.is_alphabetic();
    }
    out
}

/// "Van Der" (anywhere) and "De" (before another token) in lowercase.
fn lower_particles(name: &str) -> String {
    let mut tokens: Vec<String> = name.split(' ').map(String::from).collect();
    let n = tokens.len();
    for i in 0..n {
        if tokens[i] == "Van" && tokens.get(i + 1).is_some_and(|t| t == "Der") {
            tokens[i] = s!("van");
            tokens[i + 1] = s!("der");
        } else if tokens[i] == "De" && i + 1 < n {
            tokens[i] = s!("de");
        }
    }
    tokens.join(" ")
}
