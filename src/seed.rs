// src/seed.rs
//
// Hand-kept dataset for when no startlist can be read. Prices and points are
// last season's manual estimates; unlisted races count as 0.

use crate::catalog::{Catalog, Entity, normalize_name};

type Row = (&'static str, &'static str, f64, &'static str, &'static [(&'static str, f64)]);

const RIDERS: &[Row] = &[
    ("Tadej Pogacar", "UAE Team Emirates", 12_000_000.0, "Klimmer/Kassei",
        &[("SB", 100.0), ("MSR", 80.0), ("LBL", 120.0)]),
    ("Mathieu van der Poel", "Alpecin-Deceuninck", 12_000_000.0, "Kassei",
        &[("MSR", 90.0), ("E3", 80.0), ("GW", 80.0), ("RVV", 120.0), ("PR", 120.0)]),
    ("Wout van Aert", "Visma-Lease a Bike", 11_000_000.0, "Kassei/Sprint",
        &[("OHN", 70.0), ("KBK", 60.0), ("E3", 90.0), ("GW", 80.0), ("DDV", 70.0), ("RVV", 100.0), ("PR", 100.0)]),
    ("Remco Evenepoel", "Soudal Quick-Step", 11_000_000.0, "Heuvel",
        &[("AGR", 80.0), ("WP", 90.0), ("LBL", 100.0)]),
    ("Mads Pedersen", "Lidl-Trek", 10_000_000.0, "Kassei/Sprint",
        &[("OHN", 60.0), ("KBK", 60.0), ("MSR", 70.0), ("E3", 70.0), ("GW", 90.0), ("RVV", 80.0), ("PR", 80.0)]),
    ("Jasper Philipsen", "Alpecin-Deceuninck", 10_000_000.0, "Sprinter",
        &[("OHN", 50.0), ("KBK", 70.0), ("MSR", 100.0), ("GW", 90.0), ("PR", 80.0), ("EF", 50.0)]),
    ("Arnaud De Lie", "Lotto Dstny", 9_000_000.0, "Sprinter/Kassei",
        &[("OHN", 80.0), ("KBK", 50.0), ("GW", 60.0), ("DDV", 50.0), ("RVV", 40.0), ("EF", 40.0)]),
    ("Tom Pidcock", "INEOS Grenadiers", 8_000_000.0, "Heuvel/Kassei",
        &[("OHN", 40.0), ("SB", 90.0), ("MSR", 40.0), ("RVV", 50.0), ("AGR", 70.0), ("WP", 60.0), ("LBL", 60.0)]),
    ("Matteo Jorgenson", "Visma-Lease a Bike", 7_000_000.0, "Heuvel",
        &[("OHN", 50.0), ("KBK", 40.0), ("E3", 60.0), ("DDV", 50.0), ("RVV", 60.0)]),
    ("Maxim Van Gils", "Lotto Dstny", 5_000_000.0, "Heuvel",
        &[("SB", 60.0), ("MSR", 30.0), ("AGR", 50.0), ("WP", 60.0), ("LBL", 50.0), ("EF", 40.0)]),
    ("Oier Lazkano", "Movistar Team", 3_000_000.0, "Kassei",
        &[("OHN", 40.0), ("KBK", 30.0), ("E3", 40.0), ("DDV", 45.0), ("RVV", 30.0), ("PR", 30.0)]),
    ("Tim Wellens", "UAE Team Emirates", 5_000_000.0, "Heuvel/Kassei",
        &[("OHN", 60.0), ("KBK", 40.0), ("SB", 40.0), ("E3", 50.0), ("RVV", 40.0)]),
];

/// The backup catalog, keyed by canonical name and zero-filled.
pub fn backup_catalog() -> Catalog {
    Catalog::from_entities(RIDERS.iter().map(|(name, team, price, kind, points)| Entity {
        name: normalize_name(name),
        group: s!(*team),
        cost: *price,
        category: s!(*kind),
        scores: points.iter().map(|(code, p)| (s!(*code), *p)).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_riders_all_canonical() {
        let cat = backup_catalog();
        assert_eq!(cat.len(), 12);
        assert!(cat.is_rectangular());
        for e in cat.iter() {
            assert_eq!(normalize_name(&e.name), e.name);
        }
        assert!(cat.contains("Mathieu van der Poel"));
        assert!(cat.contains("Arnaud de Lie"));
        assert!(cat.contains("Wout Van Aert"));
    }

    #[test]
    fn unlisted_races_are_zero() {
        let cat = backup_catalog();
        let remco = cat.get("Remco Evenepoel").unwrap();
        assert_eq!(remco.score("RVV"), 0.0);
        assert_eq!(remco.total_score(), 270.0);
        assert!(cat.event_codes().contains("EF"));
    }
}
