//! Identity Normalizer — derives the stable composite key for a sponsor row.
//!
//! The register has no native primary key, so identity is the ordered
//! concatenation of the five descriptive fields, `|`-delimited. Every field
//! is trimmed; the city is additionally title-cased so `LONDON` and `London`
//! collapse to one identity. A missing field is treated as blank — identity
//! derivation never fails.

/// Joins the five normalized fields. `|` does not occur in register data.
pub const DELIMITER: char = '|';

/// Title-case a string on word boundaries: an alphabetic character is
/// upper-cased when the preceding character was not alphabetic, lower-cased
/// otherwise. Non-alphabetic characters pass through and start a new word,
/// so `O'BRIEN LTD` becomes `O'Brien Ltd`.
pub fn title_case(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut prev_alphabetic = false;
  for c in s.chars() {
    if c.is_alphabetic() {
      if prev_alphabetic {
        out.extend(c.to_lowercase());
      } else {
        out.extend(c.to_uppercase());
      }
      prev_alphabetic = true;
    } else {
      out.push(c);
      prev_alphabetic = false;
    }
  }
  out
}

/// Canonical form of the city field: trimmed and title-cased.
pub fn normalize_city(city: &str) -> String { title_case(city.trim()) }

/// Derive the composite identity from raw descriptive field values.
///
/// The inputs need not be pre-normalized; calling this twice on its own
/// output fields is a no-op.
pub fn derive(
  organisation: &str,
  city: &str,
  county: &str,
  rating: &str,
  route: &str,
) -> String {
  let city = normalize_city(city);
  let parts =
    [organisation.trim(), city.as_str(), county.trim(), rating.trim(), route.trim()];
  let mut id = String::with_capacity(
    parts.iter().map(|p| p.len()).sum::<usize>() + parts.len() - 1,
  );
  for (i, part) in parts.iter().enumerate() {
    if i > 0 {
      id.push(DELIMITER);
    }
    id.push_str(part);
  }
  id
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn title_case_collapses_shouting() {
    assert_eq!(title_case("LONDON"), "London");
    assert_eq!(title_case("stoke-on-trent"), "Stoke-On-Trent");
    assert_eq!(title_case("O'BRIEN LTD"), "O'Brien Ltd");
  }

  #[test]
  fn derive_trims_and_joins() {
    let id = derive(" Acme Ltd ", "LONDON", "", "Worker (A rating)", "Skilled Worker");
    assert_eq!(id, "Acme Ltd|London||Worker (A rating)|Skilled Worker");
  }

  #[test]
  fn derive_is_idempotent() {
    let id = derive("Acme Ltd", "LONDON", "Greater London", "A", "Skilled Worker");
    let parts: Vec<&str> = id.split(DELIMITER).collect();
    let again = derive(parts[0], parts[1], parts[2], parts[3], parts[4]);
    assert_eq!(id, again);
  }

  #[test]
  fn city_case_variants_share_identity() {
    let a = derive("Acme Ltd", "MANCHESTER", "", "A", "Skilled Worker");
    let b = derive("Acme Ltd", "Manchester", "", "A", "Skilled Worker");
    assert_eq!(a, b);
  }

  #[test]
  fn organisation_differences_do_not_collapse() {
    let a = derive("Acme Ltd", "London", "", "A", "Skilled Worker");
    let b = derive("Acme Holdings Ltd", "London", "", "A", "Skilled Worker");
    assert_ne!(a, b);
  }
}
