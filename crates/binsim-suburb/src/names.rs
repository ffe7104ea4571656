//! Street-name pools for synthesized addresses and street records.

/// Short pool cycled through when synthesizing house addresses.
pub const ADDRESS_STREET_NAMES: [&str; 5] =
    ["Main St", "Oak Ave", "Elm Cres", "Pine Ln", "Maple Pde"];

/// Full pool drawn on (shuffled) when naming generated streets.
pub const STREET_NAMES: [&str; 21] = [
    "Main St",
    "Oak Ave",
    "Elm Cres",
    "Pine Ln",
    "Maple Pde",
    "Currawong Ct",
    "Ironbark Ct",
    "Bramley Pl",
    "Warranwah Dr",
    "Condon St",
    "Marnie Rd",
    "Kiandra Way",
    "Tatiana Close",
    "Regency Pl",
    "Greenwood Dr",
    "Inorom Pl",
    "Langford Rd",
    "Vincent Dr",
    "Bambara Close",
    "Parade E",
    "Strathfieldsaye Rd",
];

/// Synthesize a house address from a 1-based house number.
///
/// The street-name pool is cycled so two addresses never collide within
/// one generation run (the number part is unique).
#[allow(clippy::arithmetic_side_effects)] // pool length is a nonzero constant
pub fn house_address(number: usize) -> String {
    let name = ADDRESS_STREET_NAMES
        .get(number.wrapping_sub(1) % ADDRESS_STREET_NAMES.len())
        .copied()
        .unwrap_or("Main St");
    format!("{number} {name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_cycle_through_the_pool() {
        assert_eq!(house_address(1), "1 Main St");
        assert_eq!(house_address(2), "2 Oak Ave");
        assert_eq!(house_address(6), "6 Main St");
    }

    #[test]
    fn street_pool_has_no_duplicates() {
        let unique: std::collections::BTreeSet<&str> = STREET_NAMES.iter().copied().collect();
        assert_eq!(unique.len(), STREET_NAMES.len());
    }
}
