// src/config/consts.rs

// Merge defaults for a rider first seen on a startlist
pub const PRESENCE_POINTS: f64 = 100.0;
pub const DEFAULT_COST: f64 = 5_000_000.0;
pub const DEFAULT_GROUP: &str = "Unknown";
pub const DEFAULT_CATEGORY: &str = "General";

// Selection
pub const DEFAULT_BUDGET: f64 = 120_000_000.0;
pub const DEFAULT_ROSTER_SIZE: usize = 20;

// Local store
pub const STORE_DIR: &str = ".store";
pub const DEFAULT_CATALOG_FILE: &str = "riders.csv";
pub const DEFAULT_LOG_FILE: &str = ".store/debug.log";

// Spring classics, in calendar order
pub const DEFAULT_EVENTS: &[(&str, &str)] = &[
    ("OHN", "Omloop Het Nieuwsblad"),
    ("KBK", "Kuurne-Brussel-Kuurne"),
    ("SB", "Strade Bianche"),
    ("MSR", "Milano-Sanremo"),
    ("E3", "E3 Saxo Classic"),
    ("GW", "Gent-Wevelgem"),
    ("DDV", "Dwars door Vlaanderen"),
    ("RVV", "Ronde van Vlaanderen"),
    ("PR", "Paris-Roubaix"),
    ("AGR", "Amstel Gold Race"),
    ("WP", "La Flèche Wallonne"),
    ("LBL", "Liège-Bastogne-Liège"),
];
